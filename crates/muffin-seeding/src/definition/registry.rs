//! Registries for factory definitions and instantiable model types.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use super::FactoryDefinition;
use crate::error::{SeedingError, SeedingResult};
use crate::model::ModelType;

/// Factory definitions keyed by the full model identifier.
#[derive(Debug, Default)]
pub struct FactoryRegistry {
	definitions: RwLock<HashMap<String, Arc<FactoryDefinition>>>,
}

impl FactoryRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Stores a definition, replacing any previous one for the same id.
	pub fn define(&self, definition: FactoryDefinition) {
		let model_id = definition.model_id().as_str().to_string();
		let replaced = self
			.definitions
			.write()
			.insert(model_id.clone(), Arc::new(definition))
			.is_some();
		tracing::debug!(model_id = %model_id, replaced, "factory defined");
	}

	/// Gets the definition registered under exactly `model_id`.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::NoDefinedFactory`] on a miss. Grouped ids do
	/// not fall back to the bare model name.
	pub fn get(&self, model_id: &str) -> SeedingResult<Arc<FactoryDefinition>> {
		self.definitions
			.read()
			.get(model_id)
			.cloned()
			.ok_or_else(|| SeedingError::NoDefinedFactory(model_id.to_string()))
	}

	/// Checks if a definition is registered.
	pub fn has(&self, model_id: &str) -> bool {
		self.definitions.read().contains_key(model_id)
	}

	/// Returns all registered model ids, sorted.
	pub fn model_ids(&self) -> Vec<String> {
		let mut ids: Vec<String> = self.definitions.read().keys().cloned().collect();
		ids.sort();
		ids
	}

	/// Returns the number of definitions.
	pub fn len(&self) -> usize {
		self.definitions.read().len()
	}

	/// Returns true if no definitions are registered.
	pub fn is_empty(&self) -> bool {
		self.definitions.read().is_empty()
	}

	/// Removes every definition.
	pub fn clear(&self) {
		self.definitions.write().clear();
	}
}

/// Model types keyed by bare name.
#[derive(Debug, Default)]
pub struct ModelTypeRegistry {
	types: RwLock<HashMap<String, Arc<ModelType>>>,
}

impl ModelTypeRegistry {
	/// Creates an empty registry.
	pub fn new() -> Self {
		Self::default()
	}

	/// Registers a model type under its name, replacing any previous one.
	pub fn register(&self, model_type: ModelType) {
		let name = model_type.name().to_string();
		tracing::debug!(model = %name, "model type registered");
		self.types.write().insert(name, Arc::new(model_type));
	}

	/// Resolves a bare model name.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::ClassNotFound`] if nothing is registered.
	pub fn get(&self, name: &str) -> SeedingResult<Arc<ModelType>> {
		self.types
			.read()
			.get(name)
			.cloned()
			.ok_or_else(|| SeedingError::ClassNotFound(name.to_string()))
	}

	/// Checks if a type is registered.
	pub fn has(&self, name: &str) -> bool {
		self.types.read().contains_key(name)
	}

	/// Removes every type.
	pub fn clear(&self) {
		self.types.write().clear();
	}
}
