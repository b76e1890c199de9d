//! # cube-schema
//!
//! JSON Schemas for everything AutoCube produces, and validation of generated
//! output against them before it is handed to the query engine.
//!
//! The types derive `JsonSchema` in `cube-core`; this crate only collects
//! them under stable names.

mod error;
mod registry;

pub use error::SchemaError;
pub use registry::SchemaRegistry;
