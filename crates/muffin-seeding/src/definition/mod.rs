//! Factory definitions and model identifiers.

mod registry;

use std::fmt;

use indexmap::IndexMap;

pub use registry::{FactoryRegistry, ModelTypeRegistry};

use crate::error::SeedingResult;
use crate::generator::{Attributes, GeneratorSpec, ProviderTable};

/// A model identifier, optionally grouped: `"admin:User"` or `"User"`.
///
/// The group only selects which definition is used. The bare name selects
/// the model type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelId {
	full: String,
	split: Option<usize>,
}

impl ModelId {
	/// Parses an identifier, splitting on the first `:`.
	pub fn parse(id: impl Into<String>) -> Self {
		let full = id.into();
		let split = full.find(':');
		Self { full, split }
	}

	/// The full identifier, group included.
	pub fn as_str(&self) -> &str {
		&self.full
	}

	/// The group prefix, if any.
	pub fn group(&self) -> Option<&str> {
		self.split.map(|at| &self.full[..at])
	}

	/// The bare model name.
	pub fn name(&self) -> &str {
		match self.split {
			Some(at) => &self.full[at + 1..],
			None => &self.full,
		}
	}
}

impl fmt::Display for ModelId {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.full)
	}
}

impl From<&str> for ModelId {
	fn from(id: &str) -> Self {
		Self::parse(id)
	}
}

/// A registered factory definition: attribute name to parsed generator, in
/// definition order.
#[derive(Debug, Clone)]
pub struct FactoryDefinition {
	model_id: ModelId,
	specs: IndexMap<String, GeneratorSpec>,
}

impl FactoryDefinition {
	/// Parses every attribute of `attributes` against `provider`.
	pub fn parse(
		model_id: ModelId,
		attributes: &Attributes,
		provider: &ProviderTable,
	) -> SeedingResult<Self> {
		Ok(Self {
			model_id,
			specs: attributes.parse(provider)?,
		})
	}

	/// The identifier this definition is registered under.
	pub fn model_id(&self) -> &ModelId {
		&self.model_id
	}

	/// Parsed generators, in definition order.
	pub fn specs(&self) -> &IndexMap<String, GeneratorSpec> {
		&self.specs
	}
}
