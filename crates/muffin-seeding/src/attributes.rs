//! Attribute merging and resolution.
//!
//! Resolution is atomic: every value is computed against the bare object
//! first, and only then assigned. A failing generator leaves the object
//! untouched.

use indexmap::IndexMap;

use crate::error::SeedingResult;
use crate::generator::GeneratorSpec;
use crate::model::{Model, Value};

/// Merges caller overrides into a definition.
///
/// Definition order is kept. Overridden keys are replaced in place and
/// override-only keys are appended in override order.
pub fn merge(
	definition: &IndexMap<String, GeneratorSpec>,
	overrides: IndexMap<String, GeneratorSpec>,
) -> IndexMap<String, GeneratorSpec> {
	let mut merged = definition.clone();
	for (name, spec) in overrides {
		merged.insert(name, spec);
	}
	merged
}

/// Computes a value for every spec, in order, with `target` as context.
///
/// Stops at the first failing generator.
pub fn resolve_attributes<F>(
	target: &dyn Model,
	specs: &IndexMap<String, GeneratorSpec>,
	mut generate: F,
) -> SeedingResult<IndexMap<String, Value>>
where
	F: FnMut(&GeneratorSpec, &dyn Model) -> SeedingResult<Value>,
{
	let mut values = IndexMap::with_capacity(specs.len());
	for (name, spec) in specs {
		let value = generate(spec, target)?;
		values.insert(name.clone(), value);
	}
	Ok(values)
}

/// Assigns resolved values to `target`, in order.
pub fn assign(target: &mut dyn Model, values: IndexMap<String, Value>) -> SeedingResult<()> {
	for (name, value) in values {
		target.set_attribute(&name, value)?;
	}
	Ok(())
}
