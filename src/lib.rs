//! # Factory Muffin
//!
//! Factory definitions and tracked test fixtures for Rust models.
//!
//! Register your model types, describe how each attribute is generated with
//! a compact *kind* descriptor, and let the engine build, save and finally
//! delete your test objects.
//!
//! ## Feature Flags
//!
//! - `json` (default) - JSON definition files
//! - `yaml` - YAML definition files
//! - `full` - All features enabled
//!
//! ## Quick Example
//!
//! ```rust
//! use muffin::prelude::*;
//!
//! #[derive(Debug, Default)]
//! struct Book {
//!     title: String,
//!     tags: Vec<String>,
//! }
//!
//! impl Model for Book {
//!     fn set_attribute(&mut self, name: &str, value: Value) -> SeedingResult<()> {
//!         match name {
//!             "title" => self.title = value.as_str().unwrap_or_default().to_string(),
//!             "tags" => {
//!                 self.tags = value
//!                     .as_data()
//!                     .and_then(|data| data.as_array())
//!                     .map(|tags| tags.iter().filter_map(|t| t.as_str()).map(String::from).collect())
//!                     .unwrap_or_default();
//!             }
//!             other => return Err(SeedingError::rejected("Book", other, "unknown attribute")),
//!         }
//!         Ok(())
//!     }
//! }
//!
//! let muffin = Muffin::new();
//! muffin.register_model(ModelType::new::<Book>("Book"));
//! muffin
//!     .define(
//!         "Book",
//!         Attributes::new()
//!             .kind("title", "sentence|3")
//!             .kind("tags", "arrayparam|,|fiction,classic"),
//!     )
//!     .unwrap();
//!
//! let book = muffin.instance("Book", Attributes::new()).unwrap();
//! let tags = book.with(|book: &Book| book.tags.clone()).unwrap();
//! assert_eq!(tags, vec!["fiction", "classic"]);
//! ```
//!
//! The process-wide engine in [`facade`] offers the same operations as free
//! functions.

#![warn(missing_docs)]

// Re-export the engine crate's modules
pub use muffin_seeding::{
	attributes, config, definition, error, facade, generator, lifecycle, loader, model,
};

// Re-export commonly used types at crate root
pub use muffin_seeding::{
	Attributes, FactoryDefinition, Faker, FakerLocale, GeneratorSpec, Instance, LoadSummary, Model,
	ModelId, ModelType, Muffin, MuffinConfig, Persistable, Record, SeedingError, SeedingResult,
	Value,
};

/// Convenience re-exports for common usage.
pub mod prelude {
	pub use muffin_seeding::prelude::*;
}
