//! # cube-config
//!
//! Layered configuration loading for AutoCube using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`AUTOCUBE_*` prefix, `__` as separator)
//! 2. An explicit file passed on the command line
//! 3. Project-level `./autocube.toml`
//! 4. User-level `~/.config/autocube/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `AUTOCUBE_GENERAL__CHARSET` -> `general.charset` and
//! `AUTOCUBE_SOURCES__TRADES__CACHE_SIZE` -> `sources.trades.cache_size`.
//!
//! # Usage
//!
//! ```no_run
//! use cube_config::AutoCubeConfig;
//!
//! let config = AutoCubeConfig::load_with_dotenv().expect("config");
//! for (store, source) in &config.sources {
//!     println!("{store}: {:?}", source.location(store));
//! }
//! ```

mod error;
mod general;
mod sources;

pub use error::ConfigError;
pub use general::{DEFAULT_CHARSET, FALLBACK_CHARSET, GeneralConfig};
pub use sources::{
    DEFAULT_PATH_MATCHER, RefSourceConfig, SourceConfig, SourceLocation, glob_pattern,
};

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

/// Store that receives the currency customization unless configured otherwise.
pub const DEFAULT_CURRENCY_STORE: &str = "risks";

fn default_currency_store() -> String {
    DEFAULT_CURRENCY_STORE.to_string()
}

/// Late-bound customization switches.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CustomizationConfig {
    /// Store the currency analysis dimension and measures are attached to.
    /// Empty disables the customization.
    #[serde(default = "default_currency_store")]
    pub currency_store: String,
}

impl Default for CustomizationConfig {
    fn default() -> Self {
        Self {
            currency_store: default_currency_store(),
        }
    }
}

impl CustomizationConfig {
    pub fn currency_store(&self) -> Option<&str> {
        Some(self.currency_store.trim()).filter(|store| !store.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AutoCubeConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    /// Primary sources keyed by store name.
    #[serde(default)]
    pub sources: BTreeMap<String, SourceConfig>,
    /// Reference data groups keyed by group name.
    #[serde(default)]
    pub ref_sources: BTreeMap<String, RefSourceConfig>,
    #[serde(default)]
    pub customizations: CustomizationConfig,
}

impl AutoCubeConfig {
    /// Load configuration from all sources (TOML files + environment variables).
    ///
    /// Does NOT call `dotenvy`; use [`Self::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Extraction failures and invalid source settings.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Like [`Self::load`], with an extra TOML file layered above the
    /// project file.
    ///
    /// # Errors
    ///
    /// Extraction failures and invalid source settings.
    pub fn load_from(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment_with(path).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration with `.env` file support.
    ///
    /// # Errors
    ///
    /// See [`Self::load`].
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        Self::load_dotenv_from_workspace();
        Self::load()
    }

    /// Build the figment provider chain.
    pub fn figment() -> Figment {
        Self::figment_with(None)
    }

    /// Build the figment provider chain with an optional explicit file.
    pub fn figment_with(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = PathBuf::from("autocube.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Explicit file
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 4: Environment variables (highest priority)
        figment.merge(Env::prefixed("AUTOCUBE_").split("__"))
    }

    /// Check every source section.
    ///
    /// # Errors
    ///
    /// [`ConfigError::NotConfigured`] for a source without location and
    /// [`ConfigError::InvalidValue`] for out-of-range values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.general.parallelism == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "general.parallelism".into(),
                reason: "parallelism must be at least 1".into(),
            });
        }
        for (name, source) in &self.sources {
            source.validate(name)?;
        }
        for (name, source) in &self.ref_sources {
            source.directory(name)?;
        }
        Ok(())
    }

    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("autocube").join("config.toml"))
    }

    /// Load `.env` from the workspace root, or the current directory.
    fn load_dotenv_from_workspace() {
        if let Ok(manifest_dir) = std::env::var("CARGO_MANIFEST_DIR") {
            let mut dir = PathBuf::from(manifest_dir);
            // crate -> crates/ -> workspace
            for _ in 0..3 {
                let env_path = dir.join(".env");
                if env_path.exists() {
                    let _ = dotenvy::from_path(&env_path);
                    return;
                }
                if !dir.pop() {
                    break;
                }
            }
        }

        let _ = dotenvy::dotenv();
    }
}
