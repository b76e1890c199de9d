use cube_core::CoreError;
use cube_discovery::DiscoveryError;

/// Hard failures. Each one aborts synthesis for the affected source.
#[derive(Debug, thiserror::Error)]
pub enum SynthesisError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("discovery failed for source '{store}': {source}")]
    Discovery {
        store: String,
        #[source]
        source: DiscoveryError,
    },

    /// Two outputs would share one store name.
    #[error("store '{store}' from reference group '{group}' is already defined")]
    DuplicateStore { store: String, group: String },

    #[error("synthesis worker for source '{0}' panicked")]
    Worker(String),
}
