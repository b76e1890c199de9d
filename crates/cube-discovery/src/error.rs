use std::path::PathBuf;

use cube_config::ConfigError;
use cube_core::CoreError;

/// Discovery failures. Every variant is fatal for the affected source.
#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("walk error: {0}")]
    Walk(#[from] ignore::Error),

    #[error("invalid discovery manifest {path}: {source}")]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid column layout in {path}: {source}")]
    InvalidSchema {
        path: PathBuf,
        #[source]
        source: CoreError,
    },

    #[error("invalid path matcher '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("no file matching '{pattern}' in {dir}")]
    NoMatch { dir: PathBuf, pattern: String },

    #[error(transparent)]
    Config(#[from] ConfigError),
}
