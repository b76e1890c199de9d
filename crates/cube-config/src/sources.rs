//! Primary and reference data source settings.

use std::path::PathBuf;

use cube_core::{AggregateMode, SourcePolicy};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Matcher applied to file names under a watched directory.
pub const DEFAULT_PATH_MATCHER: &str = "**/*.json";

const GLOB_PREFIX: &str = "glob:";

fn default_path_matcher() -> String {
    DEFAULT_PATH_MATCHER.to_string()
}

/// Where the layout of a source is discovered from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    /// A single file.
    File(PathBuf),
    /// The first matching file of a directory stands in for all of them.
    Directory { dir: PathBuf, pattern: String },
}

/// One primary data source. The map key is the store name.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SourceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir_to_watch: Option<PathBuf>,

    /// Glob over paths relative to `dir_to_watch`. A `glob:` prefix is accepted.
    #[serde(default = "default_path_matcher")]
    pub path_matcher: String,

    /// Partition field override, matched case-insensitively.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_field: Option<String>,

    /// Query-result cache size.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_size: Option<u32>,

    #[serde(default)]
    pub aggregate_mode: AggregateMode,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            file_name: None,
            dir_to_watch: None,
            path_matcher: default_path_matcher(),
            partition_field: None,
            cache_size: None,
            aggregate_mode: AggregateMode::default(),
        }
    }
}

impl SourceConfig {
    /// A file path wins over a watched directory.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] when neither is set.
    pub fn location(&self, name: &str) -> Result<SourceLocation, ConfigError> {
        if let Some(file) = &self.file_name {
            return Ok(SourceLocation::File(file.clone()));
        }
        self.dir_to_watch
            .as_ref()
            .map(|dir| SourceLocation::Directory {
                dir: dir.clone(),
                pattern: glob_pattern(&self.path_matcher).to_string(),
            })
            .ok_or_else(|| ConfigError::NotConfigured {
                section: format!("sources.{name}"),
            })
    }

    /// The policy bundle handed to synthesis.
    pub fn policy(&self) -> SourcePolicy {
        SourcePolicy {
            partition_field: self.partition_field.clone(),
            cache_size: self.cache_size,
            aggregate_mode: self.aggregate_mode,
        }
    }

    pub(crate) fn validate(&self, name: &str) -> Result<(), ConfigError> {
        self.location(name)?;
        if self.cache_size == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: format!("sources.{name}.cache_size"),
                reason: "cache size must be a positive integer".into(),
            });
        }
        Ok(())
    }
}

/// A group of reference data files. Each match becomes its own store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RefSourceConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dir_to_watch: Option<PathBuf>,

    #[serde(default = "default_path_matcher")]
    pub path_matcher: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition_field: Option<String>,
}

impl Default for RefSourceConfig {
    fn default() -> Self {
        Self {
            dir_to_watch: None,
            path_matcher: default_path_matcher(),
            partition_field: None,
        }
    }
}

impl RefSourceConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::NotConfigured`] without a `dir_to_watch`.
    pub fn directory(&self, name: &str) -> Result<(PathBuf, String), ConfigError> {
        self.dir_to_watch
            .clone()
            .map(|dir| (dir, glob_pattern(&self.path_matcher).to_string()))
            .ok_or_else(|| ConfigError::NotConfigured {
                section: format!("ref_sources.{name}"),
            })
    }

    pub fn policy(&self) -> SourcePolicy {
        SourcePolicy {
            partition_field: self.partition_field.clone(),
            ..SourcePolicy::default()
        }
    }
}

/// Strip the optional `glob:` syntax prefix.
pub fn glob_pattern(matcher: &str) -> &str {
    let matcher = matcher.trim();
    matcher.strip_prefix(GLOB_PREFIX).unwrap_or(matcher)
}
