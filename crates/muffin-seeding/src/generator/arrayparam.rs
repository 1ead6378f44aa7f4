//! The `arrayparam` composite generator.
//!
//! `arrayparam|<delimiter>|<segment>[;<segment>...]` describes a literal list in
//! one descriptor string. Segments are separated by `;`. A segment containing
//! the declared delimiter is split again into a nested list.
//!
//! ```
//! # use muffin_seeding::generator::ArrayParam;
//! # use serde_json::json;
//! let param = ArrayParam::parse("arrayparam|,|a,b;c").unwrap();
//! assert_eq!(param.to_value(), json!([["a", "b"], "c"]));
//!
//! // A lone split segment is the list itself.
//! let param = ArrayParam::parse("arrayparam|,|1,2,3").unwrap();
//! assert_eq!(param.to_value(), json!(["1", "2", "3"]));
//! ```

use serde_json::Value as JsonValue;

use crate::error::{SeedingError, SeedingResult};

/// One element of an `arrayparam` list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArrayItem {
	/// A segment without the delimiter.
	Scalar(String),
	/// A segment split by the delimiter.
	List(Vec<String>),
}

/// Parsed `arrayparam` descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayParam {
	delimiter: Option<char>,
	items: Vec<ArrayItem>,
}

impl ArrayParam {
	/// Strategy tag, including the separating pipe.
	pub const PREFIX: &'static str = "arrayparam|";

	/// Parses a full `arrayparam|...` descriptor.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::MalformedDescriptor`] if the descriptor does not
	/// start with exactly `arrayparam|`, or if the delimiter is longer than one
	/// character.
	pub fn parse(kind: &str) -> SeedingResult<Self> {
		let body = kind.strip_prefix(Self::PREFIX).ok_or_else(|| {
			SeedingError::malformed(kind, format!("does not start with '{}'", Self::PREFIX))
		})?;

		// Anything after the delimiter segment is list text, pipes included.
		let (delimiter, list) = body.split_once('|').unwrap_or((body, ""));

		let mut chars = delimiter.chars();
		let delimiter = match (chars.next(), chars.next()) {
			(None, _) => None,
			(Some(c), None) => Some(c),
			(Some(_), Some(_)) => {
				return Err(SeedingError::malformed(
					kind,
					format!("delimiter '{}' must be a single character", delimiter),
				));
			}
		};

		let items = if list.is_empty() {
			Vec::new()
		} else {
			list.split(';')
				.map(|segment| match delimiter {
					Some(d) if segment.contains(d) => {
						ArrayItem::List(segment.split(d).map(str::to_string).collect())
					}
					_ => ArrayItem::Scalar(segment.to_string()),
				})
				.collect()
		};

		Ok(Self { delimiter, items })
	}

	/// The declared element delimiter, if any.
	pub fn delimiter(&self) -> Option<char> {
		self.delimiter
	}

	/// The parsed list elements, one per segment.
	///
	/// This keeps the segment structure even where [`to_value`](Self::to_value)
	/// flattens it: `arrayparam|,|a,b` has the single item
	/// `ArrayItem::List(["a", "b"])` but renders as `["a", "b"]`. A one-element
	/// nested list such as `[["a", "b"]]` has no descriptor.
	pub fn items(&self) -> &[ArrayItem] {
		&self.items
	}

	/// Renders the list as JSON: scalars as strings, nested lists as arrays.
	///
	/// A descriptor with exactly one segment that was split renders as that
	/// segment's list, not as a list wrapping it, so its shape differs from
	/// [`items`](Self::items).
	pub fn to_value(&self) -> JsonValue {
		match self.items.as_slice() {
			[ArrayItem::List(parts)] => strings(parts),
			items => JsonValue::Array(
				items
					.iter()
					.map(|item| match item {
						ArrayItem::Scalar(s) => JsonValue::String(s.clone()),
						ArrayItem::List(parts) => strings(parts),
					})
					.collect(),
			),
		}
	}
}

fn strings(parts: &[String]) -> JsonValue {
	JsonValue::Array(parts.iter().cloned().map(JsonValue::String).collect())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;
	use rstest::rstest;
	use serde_json::json;

	#[rstest]
	#[case("arrayparam|,|a,b;c", json!([["a", "b"], "c"]))]
	#[case("arrayparam|,|1,2,3", json!(["1", "2", "3"]))]
	#[case("arrayparam|,|a", json!(["a"]))]
	#[case("arrayparam|;|", json!([]))]
	#[case("arrayparam|", json!([]))]
	#[case("arrayparam|,", json!([]))]
	#[case("arrayparam||a;b", json!(["a", "b"]))]
	#[case("arrayparam|;|a;b", json!(["a", "b"]))]
	#[case("arrayparam|:|x:y;;z", json!([["x", "y"], "", "z"]))]
	#[case("arrayparam|,|a|b;c", json!(["a|b", "c"]))]
	fn test_parse(#[case] kind: &str, #[case] expected: JsonValue) {
		let param = ArrayParam::parse(kind).unwrap();
		assert_eq!(param.to_value(), expected);
	}

	#[rstest]
	fn test_lone_split_segment_items_keep_nesting() {
		let param = ArrayParam::parse("arrayparam|,|a,b").unwrap();
		assert_eq!(
			param.items(),
			&[ArrayItem::List(vec!["a".to_string(), "b".to_string()])]
		);
		assert_eq!(param.to_value(), json!(["a", "b"]));
	}

	#[rstest]
	fn test_delimiter_is_optional() {
		assert_eq!(ArrayParam::parse("arrayparam|").unwrap().delimiter(), None);
		assert_eq!(
			ArrayParam::parse("arrayparam|-|a").unwrap().delimiter(),
			Some('-')
		);
	}

	#[rstest]
	#[case("notarrayparam|x|y")]
	#[case("arrayparam")]
	#[case("ARRAYPARAM|,|a")]
	#[case(" arrayparam|,|a")]
	#[case("arrayparam|::|a")]
	fn test_malformed(#[case] kind: &str) {
		let result = ArrayParam::parse(kind);
		assert!(matches!(
			result,
			Err(SeedingError::MalformedDescriptor { .. })
		));
	}

	proptest! {
		#[test]
		fn prop_one_item_per_segment(segments in prop::collection::vec("[a-z,]{0,6}", 1..6)) {
			let kind = format!("arrayparam|,|{}", segments.join(";"));
			let param = ArrayParam::parse(&kind).unwrap();
			// A single empty segment is indistinguishable from an empty list.
			if segments.len() == 1 && segments[0].is_empty() {
				prop_assert!(param.items().is_empty());
			} else {
				prop_assert_eq!(param.items().len(), segments.len());
				for (item, segment) in param.items().iter().zip(&segments) {
					match item {
						ArrayItem::Scalar(s) => prop_assert_eq!(s, segment),
						ArrayItem::List(parts) => prop_assert_eq!(parts.join(","), segment.clone()),
					}
				}
			}
		}
	}
}
