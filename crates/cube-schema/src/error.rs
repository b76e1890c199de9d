//! Schema registry errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("no schema registered under '{0}'")]
    NotFound(String),

    /// The instance does not conform; one message per violation.
    #[error("'{schema}' validation failed with {} error(s): {errors:?}", errors.len())]
    ValidationFailed { schema: String, errors: Vec<String> },

    #[error("schema '{schema}' does not compile: {reason}")]
    Compilation { schema: String, reason: String },
}
