//! # cube-synth
//!
//! Derives a physical record layout and a complete cube description from a
//! discovered column list.
//!
//! - [`PartitioningSelector`]: partition field and count
//! - [`RecordSchemaSynthesizer`]: physical fields, date parts, indexing hints
//! - [`DimensionSynthesizer`]: one dimension per grouping column
//! - [`MeasureSynthesizer`]: native, numeric and distinct count measures
//! - [`CubeDescriptionRegistry`]: the single owner of every cube description
//! - [`Customization`]: late-bound additions for well-known stores
//! - [`Generator`]: configuration and discovery in, [`cube_core::GeneratedModel`] out

pub mod customization;
pub mod dimensions;
mod error;
pub mod generator;
pub mod measures;
pub mod partitioning;
pub mod record;
pub mod registry;

pub use customization::{CurrencyCustomization, Customization};
pub use dimensions::DimensionSynthesizer;
pub use error::SynthesisError;
pub use generator::{Generator, StoreOutcome, Synthesizer};
pub use measures::MeasureSynthesizer;
pub use partitioning::{PartitionChoice, PartitioningSelector};
pub use record::RecordSchemaSynthesizer;
pub use registry::{CubeDescriptionRegistry, CubeHandle};
