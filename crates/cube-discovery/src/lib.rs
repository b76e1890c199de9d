//! # cube-discovery
//!
//! Produces the [`DiscoveredSchema`] of each configured source.
//!
//! Sniffing a delimited file for its separator and column types happens
//! upstream; this crate reads the manifests that step leaves behind and
//! applies the file/directory selection rules:
//!
//! - a `file_name` source reads exactly that manifest
//! - a `dir_to_watch` source takes the first match, in path order, as the
//!   template for every file of the directory
//! - a reference group yields one schema per match

mod error;
mod manifest;

pub use error::DiscoveryError;
pub use manifest::{ColumnEntry, Manifest, ManifestDiscovery};

use cube_config::{RefSourceConfig, SourceConfig};
use cube_core::DiscoveredSchema;

/// The seam between configuration and synthesis.
pub trait SchemaDiscovery: Send + Sync {
    /// Discover the layout of one primary source.
    ///
    /// # Errors
    ///
    /// Missing or unreadable files, no match in a watched directory and
    /// malformed layouts are all fatal for the source.
    fn discover(
        &self,
        store: &str,
        source: &SourceConfig,
    ) -> Result<DiscoveredSchema, DiscoveryError>;

    /// Discover every file of a reference group. A group with no matching
    /// file yields an empty list.
    ///
    /// # Errors
    ///
    /// See [`SchemaDiscovery::discover`].
    fn discover_reference(
        &self,
        group: &str,
        source: &RefSourceConfig,
    ) -> Result<Vec<DiscoveredSchema>, DiscoveryError>;
}
