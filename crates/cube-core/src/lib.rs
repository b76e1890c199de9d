//! # cube-core
//!
//! Core types, classification policy, and error types for AutoCube.
//!
//! This crate provides the foundational types shared across all AutoCube crates:
//! - Column type vocabulary and the discovered column list of a data source
//! - `SchemaPolicy`: the single home of every type/name classification rule
//! - Store specs and the physical record layout (fields, date parts, partitioning)
//! - Cube descriptions: dimensions, hierarchies, levels and measures
//! - Manager-level catalog/schema descriptions and the full generated model
//! - Formatter constants and soft warnings
//! - Cross-cutting error types

pub mod column;
pub mod cube;
pub mod discovered;
pub mod errors;
pub mod formats;
pub mod manager;
pub mod model;
pub mod policy;
pub mod store;
pub mod warning;

pub use column::{Column, ColumnType};
pub use cube::{
    AggregatedMeasure, AggregatesCache, AggregationFunction, Calculation, CubeDescription,
    DerivedMeasure, DimensionSpec, DimensionType, ExternalMeasureRef, HierarchySpec, LevelSpec,
    LevelType, MeasureSpec, NativeKind, NativeMeasure,
};
pub use discovered::DiscoveredSchema;
pub use errors::CoreError;
pub use manager::{CatalogDescription, ManagerDescription, SchemaDescription, SelectionDescription};
pub use model::{DatastoreSchema, GeneratedModel, SourceBinding};
pub use policy::SchemaPolicy;
pub use store::{
    AggregateMode, DatePart, DerivedField, FieldDescriptor, FieldValue, Partitioning,
    SourcePolicy, StoreDescription, StoreSpec, StoreSpecBuilder,
};
pub use warning::Warning;
