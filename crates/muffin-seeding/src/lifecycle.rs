//! Saved-object tracking and the save/delete conventions.

use std::collections::HashSet;

use parking_lot::{Mutex, RwLock};

use crate::definition::ModelTypeRegistry;
use crate::error::{SeedingError, SeedingResult};
use crate::model::{Instance, ModelType};

/// Default name of the save convention.
pub const DEFAULT_SAVE_METHOD: &str = "save";

/// Default name of the delete convention.
pub const DEFAULT_DELETE_METHOD: &str = "delete";

#[derive(Debug)]
struct Conventions {
	save: String,
	delete: String,
}

/// Tracked objects in tracking order, indexed by object address. The list
/// holds a handle to every indexed object, so no address is reused while it
/// is in the index.
#[derive(Debug, Default)]
struct Saved {
	order: Vec<Instance>,
	index: HashSet<usize>,
}

/// Records every object passed to the save convention, so that the whole
/// set can be deleted after a test.
#[derive(Debug)]
pub struct Tracker {
	saved: Mutex<Saved>,
	conventions: RwLock<Conventions>,
}

impl Default for Tracker {
	fn default() -> Self {
		Self::new(DEFAULT_SAVE_METHOD, DEFAULT_DELETE_METHOD)
	}
}

impl Tracker {
	/// Creates an empty tracker with the given convention names.
	pub fn new(save_method: impl Into<String>, delete_method: impl Into<String>) -> Self {
		Self {
			saved: Mutex::new(Saved::default()),
			conventions: RwLock::new(Conventions {
				save: save_method.into(),
				delete: delete_method.into(),
			}),
		}
	}

	/// Sets the method name looked up when saving.
	pub fn set_save_method(&self, method: impl Into<String>) {
		self.conventions.write().save = method.into();
	}

	/// Sets the method name looked up when deleting.
	pub fn set_delete_method(&self, method: impl Into<String>) {
		self.conventions.write().delete = method.into();
	}

	/// The current save method name.
	pub fn save_method(&self) -> String {
		self.conventions.read().save.clone()
	}

	/// The current delete method name.
	pub fn delete_method(&self) -> String {
		self.conventions.read().delete.clone()
	}

	/// Records an object. Tracking the same object twice is a no-op.
	pub fn track(&self, instance: &Instance) {
		let mut saved = self.saved.lock();
		if saved.index.insert(instance.addr()) {
			saved.order.push(instance.clone());
		}
	}

	/// Snapshot of the tracked objects, in tracking order.
	pub fn saved(&self) -> Vec<Instance> {
		self.saved.lock().order.clone()
	}

	/// Checks whether this exact object is tracked.
	pub fn is_saved(&self, instance: &Instance) -> bool {
		self.saved.lock().index.contains(&instance.addr())
	}

	/// Number of tracked objects.
	pub fn len(&self) -> usize {
		self.saved.lock().order.len()
	}

	/// Returns true if nothing is tracked.
	pub fn is_empty(&self) -> bool {
		self.saved.lock().order.is_empty()
	}

	/// Forgets every tracked object without deleting it.
	pub fn clear(&self) {
		*self.saved.lock() = Saved::default();
	}

	/// Runs the save convention on `instance`.
	///
	/// The caller tracks the object before calling this; it stays tracked
	/// whatever the outcome. The save fails when the method reports failure
	/// or when the object carries validation errors afterwards; those errors
	/// are attached to [`SeedingError::SaveFailed`].
	pub fn persist(&self, model_type: &ModelType, instance: &Instance) -> SeedingResult<()> {
		let method_name = self.save_method();
		let method = model_type.lookup(&method_name).ok_or_else(|| {
			SeedingError::SaveMethodNotFound {
				model: model_type.name().to_string(),
				method: method_name.clone(),
			}
		})?;

		let saved = instance
			.call(&method)
			.map_err(|source| SeedingError::ConventionFailed {
				model: model_type.name().to_string(),
				method: method_name.clone(),
				source,
			})?;

		let errors = instance.validation_errors();
		if !saved || !errors.is_empty() {
			return Err(SeedingError::SaveFailed {
				model: instance.model_id().to_string(),
				errors: (!errors.is_empty()).then_some(errors),
			});
		}

		tracing::debug!(model_id = %instance.model_id(), method = %method_name, "object saved");
		Ok(())
	}

	/// Deletes every tracked object and clears the set.
	///
	/// Every object is attempted even when earlier ones fail.
	///
	/// # Errors
	///
	/// Returns [`SeedingError::DeletingFailed`] carrying one error per object
	/// that could not be deleted.
	pub fn delete_saved(&self, types: &ModelTypeRegistry) -> SeedingResult<()> {
		let saved = std::mem::take(&mut *self.saved.lock()).order;
		let total = saved.len();
		let method_name = self.delete_method();

		let mut errors = Vec::new();
		for instance in saved {
			if let Err(error) = Self::delete_one(types, &instance, &method_name) {
				tracing::warn!(
					model_id = %instance.model_id(),
					error = %error,
					"failed to delete saved object"
				);
				errors.push(error);
			}
		}

		tracing::info!(total, failed = errors.len(), "deleted saved objects");

		if errors.is_empty() {
			Ok(())
		} else {
			Err(SeedingError::DeletingFailed(errors))
		}
	}

	fn delete_one(
		types: &ModelTypeRegistry,
		instance: &Instance,
		method_name: &str,
	) -> SeedingResult<()> {
		let model_type = types.get(instance.type_name())?;
		let method = model_type.lookup(method_name).ok_or_else(|| {
			SeedingError::DeleteMethodNotFound {
				model: model_type.name().to_string(),
				method: method_name.to_string(),
			}
		})?;

		let deleted = instance
			.call(&method)
			.map_err(|source| SeedingError::ConventionFailed {
				model: model_type.name().to_string(),
				method: method_name.to_string(),
				source,
			})?;

		if deleted {
			Ok(())
		} else {
			Err(SeedingError::DeleteFailed {
				model: model_type.name().to_string(),
			})
		}
	}
}
