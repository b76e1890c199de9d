use thiserror::Error;

/// Failures while loading or validating [`crate::AutoCubeConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load autocube configuration: {0}")]
    Figment(#[from] figment::Error),

    /// A source entry names no location to discover from.
    #[error("'{section}' has no location (set file_name or dir_to_watch)")]
    NotConfigured { section: String },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },
}
