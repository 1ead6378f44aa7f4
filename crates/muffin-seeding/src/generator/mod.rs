//! Generator descriptors and the kind grammar.
//!
//! A kind descriptor is a compact string: the text before the first `|`
//! selects a strategy, the rest are its arguments.
//!
//! | Descriptor | Strategy |
//! |------------|----------|
//! | `factory\|admin:User` | build (or create) another model |
//! | `arrayparam\|,\|a,b;c` | literal list, see [`ArrayParam`] |
//! | `numberBetween\|1\|10` | provider method with positional arguments |
//!
//! Descriptors are parsed once into a [`GeneratorSpec`] when a definition is
//! registered, so malformed descriptors are reported by `define`.

mod arrayparam;
mod faker;

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

pub use arrayparam::{ArrayItem, ArrayParam};
pub use faker::{Faker, FakerLocale, ProviderFn, ProviderTable};

use crate::definition::ModelId;
use crate::error::{SeedingError, SeedingResult};
use crate::model::{Model, Value};

/// Strategy tag for model references.
pub const FACTORY_TAG: &str = "factory";

/// Strategy tag for array parameters.
pub const ARRAYPARAM_TAG: &str = "arrayparam";

/// A closure generator. It receives the object being built and the provider.
///
/// The engine's provider is locked while the closure runs, so the closure
/// must not call back into the same engine.
pub type Callback = Arc<dyn Fn(&dyn Model, &mut Faker) -> SeedingResult<Value> + Send + Sync>;

/// A parsed, reusable attribute generator.
#[derive(Clone)]
pub enum GeneratorSpec {
	/// Returned unchanged.
	Literal(Value),
	/// A provider method call.
	Provider {
		/// Method name.
		method: String,
		/// Positional arguments.
		args: Vec<String>,
	},
	/// Another model, built recursively.
	ModelRef(ModelId),
	/// A literal list.
	ArrayParam(ArrayParam),
	/// A closure over the object being built.
	Callback(Callback),
}

impl GeneratorSpec {
	/// Parses a kind descriptor.
	///
	/// # Errors
	///
	/// - [`SeedingError::MalformedDescriptor`] for an empty descriptor, a
	///   `factory|` reference without a model, or a bad `arrayparam`.
	/// - [`SeedingError::UnknownGenerator`] if the strategy tag is not a
	///   method of `provider`.
	pub fn parse(kind: &str, provider: &ProviderTable) -> SeedingResult<Self> {
		let (tag, rest) = match kind.split_once('|') {
			Some((tag, rest)) => (tag, Some(rest)),
			None => (kind, None),
		};

		match tag {
			"" => Err(SeedingError::malformed(kind, "missing strategy")),
			ARRAYPARAM_TAG => ArrayParam::parse(kind).map(Self::ArrayParam),
			FACTORY_TAG => match rest.map(str::trim) {
				Some(model) if !model.is_empty() => Ok(Self::ModelRef(ModelId::parse(model))),
				_ => Err(SeedingError::malformed(kind, "missing model identifier")),
			},
			method if provider.contains(method) => Ok(Self::Provider {
				method: method.to_string(),
				args: rest
					.map(|rest| rest.split('|').map(str::to_string).collect())
					.unwrap_or_default(),
			}),
			_ => Err(SeedingError::UnknownGenerator(kind.to_string())),
		}
	}
}

impl fmt::Debug for GeneratorSpec {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Self::Provider { method, args } => f
				.debug_struct("Provider")
				.field("method", method)
				.field("args", args)
				.finish(),
			Self::ModelRef(id) => f.debug_tuple("ModelRef").field(id).finish(),
			Self::ArrayParam(param) => f.debug_tuple("ArrayParam").field(param).finish(),
			Self::Callback(_) => f.write_str("Callback(..)"),
		}
	}
}

/// An unparsed attribute entry, as supplied by callers.
#[derive(Clone)]
pub enum Attribute {
	/// A kind descriptor, parsed on registration.
	Kind(String),
	/// A concrete value.
	Literal(Value),
	/// A closure generator.
	Callback(Callback),
}

impl Attribute {
	/// Parses this entry into a generator.
	pub fn to_spec(&self, provider: &ProviderTable) -> SeedingResult<GeneratorSpec> {
		match self {
			Self::Kind(kind) => GeneratorSpec::parse(kind, provider),
			Self::Literal(value) => Ok(GeneratorSpec::Literal(value.clone())),
			Self::Callback(callback) => Ok(GeneratorSpec::Callback(callback.clone())),
		}
	}
}

impl fmt::Debug for Attribute {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Kind(kind) => f.debug_tuple("Kind").field(kind).finish(),
			Self::Literal(value) => f.debug_tuple("Literal").field(value).finish(),
			Self::Callback(_) => f.write_str("Callback(..)"),
		}
	}
}

/// Ordered attribute entries: factory definitions and caller overrides.
///
/// # Example
///
/// ```
/// use muffin_seeding::Attributes;
/// use serde_json::json;
///
/// let definition = Attributes::new()
///     .kind("name", "word")
///     .kind("tags", "arrayparam|,|a,b;c")
///     .set("active", json!(true));
/// assert_eq!(definition.len(), 3);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Attributes {
	entries: IndexMap<String, Attribute>,
}

impl Attributes {
	/// Creates an empty set of attributes.
	pub fn new() -> Self {
		Self::default()
	}

	/// Adds a kind descriptor.
	pub fn kind(mut self, name: impl Into<String>, kind: impl Into<String>) -> Self {
		self.entries.insert(name.into(), Attribute::Kind(kind.into()));
		self
	}

	/// Adds a literal value. Strings are kept as-is, never parsed as kinds.
	pub fn set(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
		self.entries
			.insert(name.into(), Attribute::Literal(value.into()));
		self
	}

	/// Adds a closure generator.
	pub fn callback<F>(mut self, name: impl Into<String>, f: F) -> Self
	where
		F: Fn(&dyn Model, &mut Faker) -> SeedingResult<Value> + Send + Sync + 'static,
	{
		self.entries
			.insert(name.into(), Attribute::Callback(Arc::new(f)));
		self
	}

	/// Builds attributes from a JSON object: strings are kind descriptors,
	/// everything else is a literal.
	pub fn from_json_map(map: serde_json::Map<String, serde_json::Value>) -> Self {
		let entries = map
			.into_iter()
			.map(|(name, value)| {
				let attribute = match value {
					serde_json::Value::String(kind) => Attribute::Kind(kind),
					other => Attribute::Literal(Value::Data(other)),
				};
				(name, attribute)
			})
			.collect();
		Self { entries }
	}

	/// Returns an entry.
	pub fn get(&self, name: &str) -> Option<&Attribute> {
		self.entries.get(name)
	}

	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns true if there are no entries.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Iterates entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&str, &Attribute)> {
		self.entries.iter().map(|(name, attr)| (name.as_str(), attr))
	}

	/// Parses every entry.
	pub fn parse(&self, provider: &ProviderTable) -> SeedingResult<IndexMap<String, GeneratorSpec>> {
		self.entries
			.iter()
			.map(|(name, attr)| Ok((name.clone(), attr.to_spec(provider)?)))
			.collect()
	}
}
