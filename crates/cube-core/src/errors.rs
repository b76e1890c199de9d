//! Cross-cutting error types for AutoCube.
//!
//! Everything in this enum is a hard failure: malformed discovery output is a
//! contract violation by the discovery collaborator and aborts synthesis for
//! the affected source. Recoverable conditions are reported as
//! [`crate::Warning`] values instead.

use thiserror::Error;

/// Errors that can be raised while building core descriptions.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A column name or type tag was empty or blank.
    #[error("Invalid column definition: name '{name}' or type '{type_tag}' is empty")]
    InvalidColumn { name: String, type_tag: String },

    /// A type tag outside the supported vocabulary.
    #[error("Unknown column type '{0}'")]
    UnknownType(String),

    /// A store spec was finished without any column.
    #[error("Store '{0}' has no columns")]
    EmptyStore(String),

    /// Data failed validation (format, constraints).
    #[error("Validation error: {0}")]
    Validation(String),
}
