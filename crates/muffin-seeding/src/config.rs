//! Engine configuration.
//!
//! Supports TOML and JSON configuration files. Missing keys take their
//! defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SeedingError, SeedingResult};
use crate::lifecycle::{DEFAULT_DELETE_METHOD, DEFAULT_SAVE_METHOD};

/// Default provider locale.
pub const DEFAULT_FAKER_LOCALE: &str = "en_EN";

/// Default limit for nested model references.
pub const DEFAULT_MAX_DEPTH: usize = 16;

/// Configuration for a [`Muffin`](crate::Muffin) engine.
///
/// # Example
///
/// ```
/// use muffin_seeding::MuffinConfig;
///
/// let config = MuffinConfig::from_toml_str(
///     r#"
///     save_method = "store"
///     faker_seed = 42
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.save_method, "store");
/// assert_eq!(config.delete_method, "delete");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MuffinConfig {
	/// Name of the lifecycle method called to persist objects.
	pub save_method: String,

	/// Name of the lifecycle method called during teardown.
	pub delete_method: String,

	/// Provider locale, e.g. `"en_US"` or `"fr_FR"`.
	pub faker_locale: String,

	/// Seed for the provider RNG. Unseeded providers draw from entropy.
	pub faker_seed: Option<u64>,

	/// Maximum nesting of `factory|` references.
	pub max_depth: usize,
}

impl Default for MuffinConfig {
	fn default() -> Self {
		Self {
			save_method: DEFAULT_SAVE_METHOD.to_string(),
			delete_method: DEFAULT_DELETE_METHOD.to_string(),
			faker_locale: DEFAULT_FAKER_LOCALE.to_string(),
			faker_seed: None,
			max_depth: DEFAULT_MAX_DEPTH,
		}
	}
}

impl MuffinConfig {
	/// Creates the default configuration.
	pub fn new() -> Self {
		Self::default()
	}

	/// Sets the save method name.
	pub fn with_save_method(mut self, method: impl Into<String>) -> Self {
		self.save_method = method.into();
		self
	}

	/// Sets the delete method name.
	pub fn with_delete_method(mut self, method: impl Into<String>) -> Self {
		self.delete_method = method.into();
		self
	}

	/// Sets the provider locale.
	pub fn with_faker_locale(mut self, locale: impl Into<String>) -> Self {
		self.faker_locale = locale.into();
		self
	}

	/// Seeds the provider RNG.
	pub fn with_faker_seed(mut self, seed: u64) -> Self {
		self.faker_seed = Some(seed);
		self
	}

	/// Sets the model reference depth limit.
	pub fn with_max_depth(mut self, depth: usize) -> Self {
		self.max_depth = depth;
		self
	}

	/// Parses configuration from a TOML string.
	pub fn from_toml_str(content: &str) -> SeedingResult<Self> {
		toml::from_str(content).map_err(|e| SeedingError::Config(e.to_string()))
	}

	/// Loads configuration from a `.toml` or `.json` file.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::UnsupportedExtension`] for other extensions,
	/// or an I/O or parse error.
	pub fn from_file(path: impl AsRef<Path>) -> SeedingResult<Self> {
		let path = path.as_ref();
		let content = std::fs::read_to_string(path)?;

		match path.extension().and_then(|ext| ext.to_str()) {
			Some("toml") => Self::from_toml_str(&content),
			Some("json") => Ok(serde_json::from_str(&content)?),
			_ => Err(SeedingError::UnsupportedExtension(
				path.display().to_string(),
			)),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[rstest]
	fn test_defaults() {
		let config = MuffinConfig::default();
		assert_eq!(config.save_method, "save");
		assert_eq!(config.delete_method, "delete");
		assert_eq!(config.faker_locale, "en_EN");
		assert_eq!(config.faker_seed, None);
		assert_eq!(config.max_depth, 16);
	}

	#[rstest]
	fn test_builder() {
		let config = MuffinConfig::new()
			.with_save_method("persist")
			.with_delete_method("destroy")
			.with_faker_locale("fr_FR")
			.with_faker_seed(7)
			.with_max_depth(4);

		assert_eq!(config.save_method, "persist");
		assert_eq!(config.delete_method, "destroy");
		assert_eq!(config.faker_locale, "fr_FR");
		assert_eq!(config.faker_seed, Some(7));
		assert_eq!(config.max_depth, 4);
	}

	#[rstest]
	fn test_from_toml_str_partial() {
		let config = MuffinConfig::from_toml_str("max_depth = 3\n").unwrap();
		assert_eq!(config.max_depth, 3);
		assert_eq!(config.save_method, "save");
	}

	#[rstest]
	fn test_from_toml_str_invalid() {
		let result = MuffinConfig::from_toml_str("max_depth = \"deep\"");
		assert!(matches!(result, Err(SeedingError::Config(_))));
	}

	#[rstest]
	#[case(".toml", "faker_locale = \"de_DE\"\n")]
	#[case(".json", r#"{"faker_locale": "de_DE"}"#)]
	fn test_from_file(#[case] suffix: &str, #[case] content: &str) {
		let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
		file.write_all(content.as_bytes()).unwrap();

		let config = MuffinConfig::from_file(file.path()).unwrap();
		assert_eq!(config.faker_locale, "de_DE");
	}

	#[rstest]
	fn test_from_file_unsupported_extension() {
		let mut file = NamedTempFile::new().unwrap();
		file.write_all(b"save_method = \"x\"").unwrap();

		let result = MuffinConfig::from_file(file.path());
		assert!(matches!(result, Err(SeedingError::UnsupportedExtension(_))));
	}
}
