//! Factory definitions, attribute generation and tracked teardown for test
//! fixtures.
//!
//! Register a model type, define a factory for it with compact *kind*
//! descriptors, then build unsaved objects with `instance` or saved ones with
//! `create`/`seed`. Every saved object is tracked so `delete_saved` can tear
//! the whole set down after a test.
//!
//! # Features
//!
//! - `json` - JSON definition files (enabled by default)
//! - `yaml` - YAML definition files
//! - `full` - All features enabled
//!
//! # Kind descriptors
//!
//! - `name`, `email`, `numberBetween|1|10`, ... : provider methods
//! - `factory|admin:User` : another model, built recursively
//! - `arrayparam|,|a,b;c` : the list `[["a", "b"], "c"]`
//!
//! Any non-string value, or a string set with [`Attributes::set`], is
//! returned unchanged.
//!
//! # Quick Start
//!
//! ```
//! use muffin_seeding::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct User {
//!     name: String,
//!     saved: bool,
//! }
//!
//! impl Model for User {
//!     fn set_attribute(&mut self, name: &str, value: Value) -> SeedingResult<()> {
//!         match name {
//!             "name" => self.name = value.as_str().unwrap_or_default().to_string(),
//!             other => return Err(SeedingError::rejected("User", other, "unknown attribute")),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! impl Persistable for User {
//!     fn save(&mut self) -> anyhow::Result<bool> {
//!         self.saved = true;
//!         Ok(true)
//!     }
//!
//!     fn delete(&mut self) -> anyhow::Result<bool> {
//!         Ok(true)
//!     }
//! }
//!
//! let muffin = Muffin::new();
//! muffin.register_model(ModelType::persistable::<User>("User"));
//! muffin.define("User", Attributes::new().kind("name", "name")).unwrap();
//!
//! let users = muffin.seed(3, "User", Attributes::new()).unwrap();
//! assert_eq!(muffin.saved().len(), 3);
//! assert!(users.iter().all(|user| user.with(|u: &User| u.saved).unwrap()));
//!
//! muffin.delete_saved().unwrap();
//! assert!(muffin.saved().is_empty());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod attributes;
pub mod config;
pub mod definition;
pub mod error;
pub mod facade;
pub mod generator;
pub mod lifecycle;
pub mod loader;
pub mod model;
mod muffin;
pub mod prelude;

// Re-export commonly used types at crate root
pub use config::MuffinConfig;
pub use definition::{FactoryDefinition, ModelId};
pub use error::{SeedingError, SeedingResult};
pub use generator::{Attributes, Faker, FakerLocale, GeneratorSpec};
pub use loader::LoadSummary;
pub use model::{Instance, Model, ModelType, Persistable, Record, Value};
pub use muffin::Muffin;
