//! Definition file parsing.

use std::path::Path;

use super::{DefinitionFormat, DefinitionRecord};
use crate::error::{SeedingError, SeedingResult};

/// Parser for definition files.
#[derive(Debug, Default)]
pub struct DefinitionParser;

impl DefinitionParser {
	/// Creates a parser.
	pub fn new() -> Self {
		Self
	}

	/// Parses a file, detecting the format from its extension.
	///
	/// # Errors
	///
	/// - [`SeedingError::UnsupportedExtension`] for unknown extensions.
	/// - [`SeedingError::Io`] if the file cannot be read.
	/// - A parse or validation error for bad content.
	pub fn parse_file(&self, path: &Path) -> SeedingResult<Vec<DefinitionRecord>> {
		let format = DefinitionFormat::from_path(path)
			.ok_or_else(|| SeedingError::UnsupportedExtension(path.display().to_string()))?;
		let content = std::fs::read_to_string(path)?;

		self.parse_string(&content, format).map_err(|e| match e {
			SeedingError::ParseError(message) => {
				SeedingError::ParseError(format!("{}: {}", path.display(), message))
			}
			other => other,
		})
	}

	/// Parses definition records from a string.
	pub fn parse_string(
		&self,
		content: &str,
		format: DefinitionFormat,
	) -> SeedingResult<Vec<DefinitionRecord>> {
		let records = match format {
			DefinitionFormat::Json => self.parse_json(content)?,
			DefinitionFormat::Yaml => self.parse_yaml(content)?,
		};

		for record in &records {
			self.validate_record(record)?;
		}
		Ok(records)
	}

	fn parse_json(&self, content: &str) -> SeedingResult<Vec<DefinitionRecord>> {
		let value: serde_json::Value = serde_json::from_str(content)?;

		match value {
			serde_json::Value::Array(items) => items
				.into_iter()
				.enumerate()
				.map(|(idx, item)| {
					serde_json::from_value(item).map_err(|e| {
						SeedingError::ParseError(format!("invalid record at index {}: {}", idx, e))
					})
				})
				.collect(),
			serde_json::Value::Object(_) => Ok(vec![serde_json::from_value(value)?]),
			_ => Err(SeedingError::ParseError(
				"expected an array or an object".to_string(),
			)),
		}
	}

	#[cfg(feature = "yaml")]
	fn parse_yaml(&self, content: &str) -> SeedingResult<Vec<DefinitionRecord>> {
		let value: serde_yaml::Value = serde_yaml::from_str(content)?;

		match value {
			serde_yaml::Value::Sequence(items) => items
				.into_iter()
				.enumerate()
				.map(|(idx, item)| {
					serde_yaml::from_value(item).map_err(|e| {
						SeedingError::ParseError(format!("invalid record at index {}: {}", idx, e))
					})
				})
				.collect(),
			serde_yaml::Value::Mapping(_) => Ok(vec![serde_yaml::from_value(value)?]),
			_ => Err(SeedingError::ParseError(
				"expected a sequence or a mapping".to_string(),
			)),
		}
	}

	#[cfg(not(feature = "yaml"))]
	fn parse_yaml(&self, _content: &str) -> SeedingResult<Vec<DefinitionRecord>> {
		Err(SeedingError::UnsupportedExtension(
			"YAML support requires the 'yaml' feature".to_string(),
		))
	}

	fn validate_record(&self, record: &DefinitionRecord) -> SeedingResult<()> {
		if record.model.trim().is_empty() {
			return Err(SeedingError::ValidationError {
				field: "model".to_string(),
				message: "model identifier must not be empty".to_string(),
			});
		}

		if let Some(name) = record.attributes.keys().find(|name| name.trim().is_empty()) {
			return Err(SeedingError::ValidationError {
				field: format!("{}.attributes", record.model),
				message: format!("attribute name '{}' must not be blank", name),
			});
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use serde_json::json;
	use std::io::Write;

	#[rstest]
	fn test_parse_json_array() {
		let content = r#"[
			{"model": "User", "attributes": {"name": "name"}},
			{"model": "admin:User", "attributes": {"role": "admin"}}
		]"#;

		let records = DefinitionParser::new()
			.parse_string(content, DefinitionFormat::Json)
			.unwrap();
		assert_eq!(records.len(), 2);
		assert_eq!(records[1].model, "admin:User");
		assert_eq!(records[1].attributes["role"], json!("admin"));
	}

	#[rstest]
	fn test_parse_json_single_object() {
		let content = r#"{"model": "Post", "attributes": {"title": "sentence|4"}}"#;
		let records = DefinitionParser::new()
			.parse_string(content, DefinitionFormat::Json)
			.unwrap();
		assert_eq!(records.len(), 1);
	}

	#[rstest]
	#[case("42")]
	#[case(r#"[{"attributes": {}}]"#)]
	#[case("not json")]
	fn test_parse_json_invalid(#[case] content: &str) {
		let result = DefinitionParser::new().parse_string(content, DefinitionFormat::Json);
		assert!(matches!(
			result,
			Err(SeedingError::ParseError(_)) | Err(SeedingError::Json(_))
		));
	}

	#[rstest]
	#[case(r#"{"model": "  "}"#, "model")]
	#[case(r#"{"model": "User", "attributes": {" ": "name"}}"#, "User.attributes")]
	fn test_validation(#[case] content: &str, #[case] expected_field: &str) {
		let result = DefinitionParser::new().parse_string(content, DefinitionFormat::Json);
		match result {
			Err(SeedingError::ValidationError { field, .. }) => assert_eq!(field, expected_field),
			other => panic!("unexpected result: {:?}", other),
		}
	}

	#[rstest]
	fn test_parse_file() {
		let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
		file.write_all(br#"{"model": "User", "attributes": {"email": "email"}}"#)
			.unwrap();

		let records = DefinitionParser::new().parse_file(file.path()).unwrap();
		assert_eq!(records[0].model, "User");
	}

	#[rstest]
	fn test_parse_file_unsupported_extension() {
		let file = tempfile::Builder::new().suffix(".php").tempfile().unwrap();
		let result = DefinitionParser::new().parse_file(file.path());
		assert!(matches!(result, Err(SeedingError::UnsupportedExtension(_))));
	}

	#[cfg(feature = "yaml")]
	#[rstest]
	fn test_parse_yaml() {
		let content = "- model: User\n  attributes:\n    name: name\n    age: 30\n";
		let records = DefinitionParser::new()
			.parse_string(content, DefinitionFormat::Yaml)
			.unwrap();
		assert_eq!(records[0].attributes["age"], json!(30));
	}
}
