//! Soft warnings.
//!
//! Warnings are purely observational: they are logged when raised and
//! collected into the generated model, but never halt processing.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "warning", rename_all = "snake_case")]
pub enum Warning {
    /// The configured partition field does not name any column of the store.
    UnknownPartitionField { store: String, field: String },

    /// The configured charset is not recognised; `fallback` is used instead.
    UnknownCharset { requested: String, fallback: String },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownPartitionField { store, field } => write!(
                f,
                "configured partitioning field '{field}' does not exist in the format of store '{store}'; default partitioning will be used"
            ),
            Self::UnknownCharset {
                requested,
                fallback,
            } => write!(f, "unknown charset '{requested}'; falling back to {fallback}"),
        }
    }
}
