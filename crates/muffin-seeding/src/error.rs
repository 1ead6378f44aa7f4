//! Error types for the seeding engine.
//!
//! Every failure path raises a typed [`SeedingError`] carrying the offending
//! model identifier or type name.

use thiserror::Error;

/// Errors that can occur while defining, generating, persisting or tearing down
/// factory objects.
#[derive(Debug, Error)]
pub enum SeedingError {
	/// No factory definition is registered under the exact model identifier.
	#[error("No factory definition found for model: {0}")]
	NoDefinedFactory(String),

	/// The bare model name does not resolve to a registered model type.
	#[error("Model type not found: {0}")]
	ClassNotFound(String),

	/// A kind descriptor does not follow the generator grammar.
	#[error("Malformed generator descriptor '{kind}': {reason}")]
	MalformedDescriptor {
		/// The offending descriptor.
		kind: String,
		/// Why it was rejected.
		reason: String,
	},

	/// A kind descriptor names neither a strategy nor a provider method.
	#[error("Unknown generator: {0}")]
	UnknownGenerator(String),

	/// The model type has no method registered under the configured save name.
	#[error("Model '{model}' has no save method named '{method}'")]
	SaveMethodNotFound {
		/// Model type name.
		model: String,
		/// Configured save method name.
		method: String,
	},

	/// The model type has no method registered under the configured delete name.
	#[error("Model '{model}' has no delete method named '{method}'")]
	DeleteMethodNotFound {
		/// Model type name.
		model: String,
		/// Configured delete method name.
		method: String,
	},

	/// The save method reported failure, or the object carries validation errors.
	#[error("{}", save_failed_message(.model, .errors))]
	SaveFailed {
		/// Model identifier passed to `create`.
		model: String,
		/// Validation errors reported by the object, if any.
		errors: Option<Vec<String>>,
	},

	/// The delete method reported failure for one object.
	#[error("We could not delete the model: {model}")]
	DeleteFailed {
		/// Model type name.
		model: String,
	},

	/// One or more objects could not be deleted during a teardown sweep.
	#[error("We encountered {} problem(s) while trying to delete the saved objects", .0.len())]
	DeletingFailed(Vec<SeedingError>),

	/// A save or delete callback returned an error.
	#[error("The {method} method of model '{model}' failed: {source}")]
	ConventionFailed {
		/// Model type name.
		model: String,
		/// Convention method name.
		method: String,
		/// Error raised by the callback.
		#[source]
		source: anyhow::Error,
	},

	/// A model rejected an attribute assignment.
	#[error("Model '{model}' rejected attribute '{attribute}': {message}")]
	AttributeRejected {
		/// Model type name.
		model: String,
		/// Attribute name.
		attribute: String,
		/// Rejection message.
		message: String,
	},

	/// Model references nested deeper than the configured limit.
	#[error("Model reference depth limit of {depth} exceeded while generating '{model}'")]
	RecursionLimit {
		/// Model identifier that would have exceeded the limit.
		model: String,
		/// Configured maximum depth.
		depth: usize,
	},

	/// The provider has no data set for the requested locale.
	#[error("Unsupported faker locale: {0}")]
	UnsupportedLocale(String),

	/// A definition path is not a readable directory.
	#[error("The directory was not found: {0}")]
	DirectoryNotFound(String),

	/// A definition file has no recognised extension.
	#[error("Unsupported file extension: {0}")]
	UnsupportedExtension(String),

	/// A definition file could not be parsed.
	#[error("Parse error: {0}")]
	ParseError(String),

	/// A definition record failed validation.
	#[error("Validation error: {field}: {message}")]
	ValidationError {
		/// Field that failed validation.
		field: String,
		/// Validation error message.
		message: String,
	},

	/// Configuration could not be read.
	#[error("Configuration error: {0}")]
	Config(String),

	/// I/O operation failed.
	#[error("IO error: {0}")]
	Io(#[from] std::io::Error),

	/// JSON deserialization error.
	#[error("JSON error: {0}")]
	Json(#[from] serde_json::Error),

	/// YAML deserialization error (when yaml feature is enabled).
	#[cfg(feature = "yaml")]
	#[error("YAML error: {0}")]
	Yaml(#[from] serde_yaml::Error),
}

fn save_failed_message(model: &str, errors: &Option<Vec<String>>) -> String {
	match errors {
		Some(errors) if !errors.is_empty() => format!(
			"We could not save the model: {} ({})",
			model,
			errors.join(", ")
		),
		_ => format!("We could not save the model: {}", model),
	}
}

impl SeedingError {
	pub(crate) fn malformed(kind: impl Into<String>, reason: impl Into<String>) -> Self {
		Self::MalformedDescriptor {
			kind: kind.into(),
			reason: reason.into(),
		}
	}

	/// Builds an [`SeedingError::AttributeRejected`] for a model's
	/// [`set_attribute`](crate::model::Model::set_attribute) implementation.
	pub fn rejected(
		model: impl Into<String>,
		attribute: impl Into<String>,
		message: impl Into<String>,
	) -> Self {
		Self::AttributeRejected {
			model: model.into(),
			attribute: attribute.into(),
			message: message.into(),
		}
	}

	/// Returns the per-object errors wrapped by a [`SeedingError::DeletingFailed`].
	pub fn causes(&self) -> &[SeedingError] {
		match self {
			Self::DeletingFailed(errors) => errors,
			_ => &[],
		}
	}
}

/// Result type alias for seeding operations.
pub type SeedingResult<T> = Result<T, SeedingError>;
