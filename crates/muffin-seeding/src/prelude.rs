//! Convenience re-exports for common usage.
//!
//! ```
//! use muffin_seeding::prelude::*;
//!
//! let muffin = Muffin::new();
//! muffin.register_model(ModelType::new::<Record>("Post"));
//! ```

// Error types
pub use crate::error::{SeedingError, SeedingResult};

// Engine and configuration
pub use crate::config::MuffinConfig;
pub use crate::loader::LoadSummary;
pub use crate::muffin::Muffin;

// Definitions
pub use crate::definition::ModelId;
pub use crate::generator::{Attributes, Faker, FakerLocale};

// Models
pub use crate::model::{Instance, Model, ModelType, Persistable, Record, Value};
