//! Process-wide engine exposed as free functions.
//!
//! Every function forwards to one lazily created [`Muffin`] with the default
//! configuration. Tests sharing it must run serially; prefer a local engine
//! when tests run in parallel.
//!
//! ```
//! use muffin_seeding::facade;
//! use muffin_seeding::{Attributes, ModelType, Record};
//!
//! facade::register_model(ModelType::new::<Record>("Tag"));
//! facade::define("Tag", Attributes::new().kind("label", "word")).unwrap();
//! let tag = facade::instance("Tag", Attributes::new()).unwrap();
//! assert!(tag.attribute("label").is_some());
//! ```

use std::path::Path;

use indexmap::IndexMap;
use once_cell::sync::Lazy;

use crate::error::SeedingResult;
use crate::generator::{Attributes, Faker};
use crate::loader::LoadSummary;
use crate::model::{Instance, ModelType, Value};
use crate::muffin::Muffin;

static MUFFIN: Lazy<Muffin> = Lazy::new(Muffin::new);

/// The shared engine.
pub fn muffin() -> &'static Muffin {
	&MUFFIN
}

/// See [`Muffin::register_model`].
pub fn register_model(model_type: ModelType) {
	MUFFIN.register_model(model_type);
}

/// See [`Muffin::define`].
pub fn define(model_id: &str, definition: Attributes) -> SeedingResult<()> {
	MUFFIN.define(model_id, definition).map(|_| ())
}

/// See [`Muffin::provider_method`].
pub fn provider_method<F>(name: impl Into<String>, method: F)
where
	F: Fn(&mut Faker, &[String]) -> SeedingResult<serde_json::Value> + Send + Sync + 'static,
{
	MUFFIN.provider_method(name, method);
}

/// See [`Muffin::instance`].
pub fn instance(model_id: &str, overrides: Attributes) -> SeedingResult<Instance> {
	MUFFIN.instance(model_id, overrides)
}

/// See [`Muffin::create`].
pub fn create(model_id: &str, overrides: Attributes) -> SeedingResult<Instance> {
	MUFFIN.create(model_id, overrides)
}

/// See [`Muffin::seed`].
pub fn seed(count: usize, model_id: &str, overrides: Attributes) -> SeedingResult<Vec<Instance>> {
	MUFFIN.seed(count, model_id, overrides)
}

/// See [`Muffin::attributes_for`].
pub fn attributes_for(model_id: &str, overrides: Attributes) -> SeedingResult<IndexMap<String, Value>> {
	MUFFIN.attributes_for(model_id, overrides)
}

/// See [`Muffin::generate_attr`].
pub fn generate_attr(kind: &str) -> SeedingResult<Value> {
	MUFFIN.generate_attr(kind)
}

/// See [`Muffin::saved`].
pub fn saved() -> Vec<Instance> {
	MUFFIN.saved()
}

/// See [`Muffin::is_saved`].
pub fn is_saved(instance: &Instance) -> bool {
	MUFFIN.is_saved(instance)
}

/// See [`Muffin::delete_saved`].
pub fn delete_saved() -> SeedingResult<()> {
	MUFFIN.delete_saved()
}

/// See [`Muffin::set_faker_locale`].
pub fn set_faker_locale(locale: &str) -> SeedingResult<()> {
	MUFFIN.set_faker_locale(locale)
}

/// See [`Muffin::set_save_method`].
pub fn set_save_method(method: impl Into<String>) {
	MUFFIN.set_save_method(method);
}

/// See [`Muffin::set_delete_method`].
pub fn set_delete_method(method: impl Into<String>) {
	MUFFIN.set_delete_method(method);
}

/// See [`Muffin::load_factories`].
pub fn load_factories<P: AsRef<Path>>(paths: &[P]) -> SeedingResult<LoadSummary> {
	MUFFIN.load_factories(paths)
}

/// See [`Muffin::reset`].
pub fn reset() {
	MUFFIN.reset();
}
