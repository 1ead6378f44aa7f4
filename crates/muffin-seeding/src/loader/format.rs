//! Definition file format.
//!
//! A definition file holds one record or an array of records:
//!
//! ```json
//! [
//!   {
//!     "model": "admin:User",
//!     "attributes": {
//!       "name": "name",
//!       "email": "safeEmail",
//!       "roles": "arrayparam|,|admin,staff",
//!       "active": true
//!     }
//!   }
//! ]
//! ```
//!
//! String attributes are kind descriptors; any other JSON value is a literal.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::definition::ModelId;
use crate::generator::Attributes;

/// One factory definition as stored in a file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DefinitionRecord {
	/// Model identifier, optionally grouped (`"admin:User"`).
	pub model: String,

	/// Attribute name to kind descriptor or literal.
	#[serde(default)]
	pub attributes: Map<String, JsonValue>,
}

impl DefinitionRecord {
	/// Creates a record.
	pub fn new(model: impl Into<String>, attributes: Map<String, JsonValue>) -> Self {
		Self {
			model: model.into(),
			attributes,
		}
	}

	/// The parsed model identifier.
	pub fn model_id(&self) -> ModelId {
		ModelId::parse(self.model.trim())
	}

	/// Converts the attribute map for registration.
	pub fn into_attributes(self) -> Attributes {
		Attributes::from_json_map(self.attributes)
	}
}

/// Supported definition file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub enum DefinitionFormat {
	/// JSON (default).
	#[default]
	Json,

	/// YAML (requires the `yaml` feature).
	Yaml,
}

impl DefinitionFormat {
	/// Determines the format from a file extension.
	///
	/// ```
	/// # use muffin_seeding::loader::DefinitionFormat;
	/// assert_eq!(DefinitionFormat::from_extension("json"), Some(DefinitionFormat::Json));
	/// assert_eq!(DefinitionFormat::from_extension("yml"), Some(DefinitionFormat::Yaml));
	/// assert_eq!(DefinitionFormat::from_extension("php"), None);
	/// ```
	pub fn from_extension(ext: &str) -> Option<Self> {
		match ext.to_lowercase().as_str() {
			"json" => Some(Self::Json),
			"yaml" | "yml" => Some(Self::Yaml),
			_ => None,
		}
	}

	/// Determines the format from a file path.
	pub fn from_path(path: &Path) -> Option<Self> {
		path.extension()
			.and_then(|ext| ext.to_str())
			.and_then(Self::from_extension)
	}

	/// Returns true if this build can parse the format.
	pub fn is_enabled(&self) -> bool {
		match self {
			Self::Json => true,
			Self::Yaml => cfg!(feature = "yaml"),
		}
	}
}

impl std::fmt::Display for DefinitionFormat {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Json => write!(f, "JSON"),
			Self::Yaml => write!(f, "YAML"),
		}
	}
}
