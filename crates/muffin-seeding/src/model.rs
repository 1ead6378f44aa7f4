//! Model objects, attribute values and per-type lifecycle methods.
//!
//! A model is any `Default` type implementing [`Model`]. Model types are
//! registered by bare name through a [`ModelType`], which also carries the
//! named lifecycle methods (the save and delete conventions).

use std::any::{Any, type_name};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::Mutex;

use crate::error::SeedingResult;

/// Upcasting helper so trait objects can be downcast to their concrete type.
pub trait AsAny: Any {
	/// Returns `self` as `&dyn Any`.
	fn as_any(&self) -> &dyn Any;

	/// Returns `self` as `&mut dyn Any`.
	fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
	fn as_any(&self) -> &dyn Any {
		self
	}

	fn as_any_mut(&mut self) -> &mut dyn Any {
		self
	}
}

/// An object that factories can populate.
///
/// # Example
///
/// ```
/// use muffin_seeding::model::Model;
/// use muffin_seeding::{SeedingResult, Value};
///
/// #[derive(Debug, Default)]
/// struct Widget {
///     name: String,
/// }
///
/// impl Model for Widget {
///     fn set_attribute(&mut self, name: &str, value: Value) -> SeedingResult<()> {
///         if name == "name" {
///             self.name = value.as_str().unwrap_or_default().to_string();
///         }
///         Ok(())
///     }
/// }
/// ```
pub trait Model: AsAny + Send + fmt::Debug {
	/// Assigns one generated attribute.
	fn set_attribute(&mut self, name: &str, value: Value) -> SeedingResult<()>;

	/// Reads an attribute back, for closure generators that inspect the object.
	fn get_attribute(&self, _name: &str) -> Option<Value> {
		None
	}

	/// Validation errors collected by the object's own save logic.
	fn validation_errors(&self) -> Vec<String> {
		Vec::new()
	}
}

/// A generated attribute value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
	/// Plain data: strings, numbers, lists.
	Data(serde_json::Value),
	/// A related model object.
	Instance(Instance),
}

impl Value {
	/// Returns the string content of a [`Value::Data`] string.
	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Data(data) => data.as_str(),
			Self::Instance(_) => None,
		}
	}

	/// Returns the data of a [`Value::Data`].
	pub fn as_data(&self) -> Option<&serde_json::Value> {
		match self {
			Self::Data(data) => Some(data),
			Self::Instance(_) => None,
		}
	}

	/// Returns the related object of a [`Value::Instance`].
	pub fn as_instance(&self) -> Option<&Instance> {
		match self {
			Self::Instance(instance) => Some(instance),
			Self::Data(_) => None,
		}
	}

	/// Consumes the value, returning its data if it is [`Value::Data`].
	pub fn into_data(self) -> Option<serde_json::Value> {
		match self {
			Self::Data(data) => Some(data),
			Self::Instance(_) => None,
		}
	}
}

impl From<serde_json::Value> for Value {
	fn from(value: serde_json::Value) -> Self {
		Self::Data(value)
	}
}

impl From<&str> for Value {
	fn from(value: &str) -> Self {
		Self::Data(serde_json::Value::String(value.to_string()))
	}
}

impl From<String> for Value {
	fn from(value: String) -> Self {
		Self::Data(serde_json::Value::String(value))
	}
}

impl From<Instance> for Value {
	fn from(value: Instance) -> Self {
		Self::Instance(value)
	}
}

/// Shared handle to a live model object.
///
/// Equality is object identity: two handles are equal only when they point at
/// the same object.
#[derive(Clone)]
pub struct Instance {
	model_id: Arc<str>,
	type_name: Arc<str>,
	inner: Arc<Mutex<dyn Model>>,
}

impl Instance {
	pub(crate) fn new(model_id: &str, type_name: &str, inner: Arc<Mutex<dyn Model>>) -> Self {
		Self {
			model_id: Arc::from(model_id),
			type_name: Arc::from(type_name),
			inner,
		}
	}

	/// The model identifier this object was built from, group included.
	pub fn model_id(&self) -> &str {
		&self.model_id
	}

	/// The registered bare type name.
	pub fn type_name(&self) -> &str {
		&self.type_name
	}

	/// Returns true if both handles point at the same object.
	pub fn ptr_eq(&self, other: &Instance) -> bool {
		Arc::ptr_eq(&self.inner, &other.inner)
	}

	/// Address of the shared object, stable while any handle is alive.
	pub(crate) fn addr(&self) -> usize {
		Arc::as_ptr(&self.inner) as *const () as usize
	}

	/// Reads the object as its concrete type.
	///
	/// Returns `None` if the object is not a `T`.
	pub fn with<T: Model, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
		let guard = self.inner.lock();
		let model: &dyn Model = &*guard;
		model.as_any().downcast_ref::<T>().map(f)
	}

	/// Mutates the object as its concrete type.
	pub fn with_mut<T: Model, R>(&self, f: impl FnOnce(&mut T) -> R) -> Option<R> {
		let mut guard = self.inner.lock();
		let model: &mut dyn Model = &mut *guard;
		model.as_any_mut().downcast_mut::<T>().map(f)
	}

	/// Reads an attribute through [`Model::get_attribute`].
	pub fn attribute(&self, name: &str) -> Option<Value> {
		self.inner.lock().get_attribute(name)
	}

	/// Returns the object's validation errors.
	pub fn validation_errors(&self) -> Vec<String> {
		self.inner.lock().validation_errors()
	}

	pub(crate) fn call(&self, method: &LifecycleMethod) -> anyhow::Result<bool> {
		let mut guard = self.inner.lock();
		method(&mut *guard)
	}
}

impl PartialEq for Instance {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl fmt::Debug for Instance {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.inner.try_lock() {
			Some(model) => f
				.debug_struct("Instance")
				.field("model_id", &self.model_id)
				.field("object", &&*model)
				.finish(),
			None => f
				.debug_struct("Instance")
				.field("model_id", &self.model_id)
				.finish_non_exhaustive(),
		}
	}
}

/// A named lifecycle method, e.g. the save or delete convention.
///
/// Returns `Ok(true)` on success, `Ok(false)` when the operation reported
/// failure without raising.
pub type LifecycleMethod = Arc<dyn Fn(&mut dyn Model) -> anyhow::Result<bool> + Send + Sync>;

/// Save and delete conventions expressed as a trait.
///
/// Registering a type with [`ModelType::persistable`] wires both methods
/// under the default names `"save"` and `"delete"`.
pub trait Persistable {
	/// Persists the object.
	fn save(&mut self) -> anyhow::Result<bool>;

	/// Removes the persisted object.
	fn delete(&mut self) -> anyhow::Result<bool>;
}

/// Registration record for an instantiable model type.
pub struct ModelType {
	name: String,
	construct: Arc<dyn Fn() -> Arc<Mutex<dyn Model>> + Send + Sync>,
	methods: HashMap<String, LifecycleMethod>,
}

impl ModelType {
	/// Registers `T` under `name`, constructed with `T::default()`.
	pub fn new<T: Model + Default>(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			construct: Arc::new(|| {
				let model: Arc<Mutex<dyn Model>> = Arc::new(Mutex::new(T::default()));
				model
			}),
			methods: HashMap::new(),
		}
	}

	/// Registers `T` with `save` and `delete` methods from [`Persistable`].
	pub fn persistable<T: Model + Default + Persistable>(name: impl Into<String>) -> Self {
		Self::new::<T>(name)
			.method("save", |model: &mut T| model.save())
			.method("delete", |model: &mut T| model.delete())
	}

	/// Adds a named lifecycle method.
	///
	/// The name is matched against the configured save/delete method names
	/// at call time.
	pub fn method<T, F>(mut self, name: impl Into<String>, f: F) -> Self
	where
		T: Model,
		F: Fn(&mut T) -> anyhow::Result<bool> + Send + Sync + 'static,
	{
		let name = name.into();
		let method_name = name.clone();
		let method: LifecycleMethod = Arc::new(move |model: &mut dyn Model| {
			match model.as_any_mut().downcast_mut::<T>() {
				Some(model) => f(model),
				None => Err(anyhow::anyhow!(
					"method '{}' expects a {}",
					method_name,
					type_name::<T>()
				)),
			}
		});
		self.methods.insert(name, method);
		self
	}

	/// The bare type name.
	pub fn name(&self) -> &str {
		&self.name
	}

	/// Returns true if a method with this name is registered.
	pub fn has_method(&self, name: &str) -> bool {
		self.methods.contains_key(name)
	}

	pub(crate) fn lookup(&self, name: &str) -> Option<LifecycleMethod> {
		self.methods.get(name).cloned()
	}

	pub(crate) fn construct(&self) -> Arc<Mutex<dyn Model>> {
		(self.construct)()
	}
}

impl fmt::Debug for ModelType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let mut methods: Vec<&String> = self.methods.keys().collect();
		methods.sort();
		f.debug_struct("ModelType")
			.field("name", &self.name)
			.field("methods", &methods)
			.finish()
	}
}

/// A schemaless model that keeps every assigned attribute in order.
///
/// Useful for definitions loaded from files and for tests.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Record {
	/// Assigned attributes.
	pub attributes: IndexMap<String, Value>,
}

impl Record {
	/// Returns an assigned attribute.
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.attributes.get(name)
	}
}

impl Model for Record {
	fn set_attribute(&mut self, name: &str, value: Value) -> SeedingResult<()> {
		self.attributes.insert(name.to_string(), value);
		Ok(())
	}

	fn get_attribute(&self, name: &str) -> Option<Value> {
		self.attributes.get(name).cloned()
	}
}
