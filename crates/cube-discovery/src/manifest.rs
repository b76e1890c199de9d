//! Manifest-backed discovery.

use std::fs;
use std::path::{Path, PathBuf};

use cube_config::{RefSourceConfig, SourceConfig, SourceLocation};
use cube_core::DiscoveredSchema;
use globset::{Glob, GlobMatcher};
use ignore::WalkBuilder;
use serde::{Deserialize, Serialize};

use crate::{DiscoveryError, SchemaDiscovery};

const fn default_separator() -> char {
    ','
}

/// One column as written by the upstream sniffer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnEntry {
    pub name: String,
    #[serde(rename = "type")]
    pub type_tag: String,
}

/// Discovery manifest: separator plus ordered column list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manifest {
    #[serde(default = "default_separator")]
    pub separator: char,
    pub columns: Vec<ColumnEntry>,
}

/// Reads manifests from disk. Relative paths resolve against `base_dir`.
#[derive(Debug, Clone, Default)]
pub struct ManifestDiscovery {
    base_dir: Option<PathBuf>,
}

impl ManifestDiscovery {
    pub const fn new() -> Self {
        Self { base_dir: None }
    }

    #[must_use]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Read one manifest. The schema is named after the file stem.
    ///
    /// # Errors
    ///
    /// I/O, JSON and column contract failures.
    pub fn read(&self, path: &Path) -> Result<DiscoveredSchema, DiscoveryError> {
        let path = self.resolve(path);
        let raw = fs::read_to_string(&path).map_err(|source| DiscoveryError::Io {
            path: path.clone(),
            source,
        })?;
        let manifest: Manifest =
            serde_json::from_str(&raw).map_err(|source| DiscoveryError::Manifest {
                path: path.clone(),
                source,
            })?;

        let source_name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let schema = DiscoveredSchema::from_tags(
            source_name,
            manifest.separator,
            manifest
                .columns
                .iter()
                .map(|c| (c.name.as_str(), c.type_tag.as_str())),
        )
        .map_err(|source| DiscoveryError::InvalidSchema {
            path: path.clone(),
            source,
        })?;

        tracing::debug!(
            path = %path.display(),
            columns = schema.columns().len(),
            "discovered column layout"
        );
        Ok(schema.with_origin(path.display().to_string()))
    }

    /// Every file under `dir` whose relative path matches `pattern`, sorted.
    ///
    /// # Errors
    ///
    /// Invalid patterns and walk failures.
    pub fn matching_files(&self, dir: &Path, pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
        let dir = self.resolve(dir);
        let matcher = compile_matcher(pattern)?;

        let mut builder = WalkBuilder::new(&dir);
        builder.standard_filters(false).hidden(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }
            let relative = entry.path().strip_prefix(&dir).unwrap_or(entry.path());
            if matcher.is_match(relative) {
                files.push(entry.into_path());
            }
        }
        files.sort();
        Ok(files)
    }
}

fn compile_matcher(pattern: &str) -> Result<GlobMatcher, DiscoveryError> {
    Glob::new(pattern)
        .map(|g| g.compile_matcher())
        .map_err(|source| DiscoveryError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })
}

impl SchemaDiscovery for ManifestDiscovery {
    fn discover(
        &self,
        store: &str,
        source: &SourceConfig,
    ) -> Result<DiscoveredSchema, DiscoveryError> {
        match source.location(store)? {
            SourceLocation::File(path) => self.read(&path),
            SourceLocation::Directory { dir, pattern } => {
                let first = self
                    .matching_files(&dir, &pattern)?
                    .into_iter()
                    .next()
                    .ok_or_else(|| DiscoveryError::NoMatch {
                        dir: self.resolve(&dir),
                        pattern: pattern.clone(),
                    })?;
                tracing::info!(
                    store,
                    template = %first.display(),
                    "using first matching file as directory template"
                );
                self.read(&first)
            }
        }
    }

    fn discover_reference(
        &self,
        group: &str,
        source: &RefSourceConfig,
    ) -> Result<Vec<DiscoveredSchema>, DiscoveryError> {
        let (dir, pattern) = source.directory(group)?;
        let files = self.matching_files(&dir, &pattern)?;
        if files.is_empty() {
            tracing::warn!(
                group,
                dir = %self.resolve(&dir).display(),
                pattern = %pattern,
                "no reference files matched"
            );
        }
        files.iter().map(|file| self.read(file)).collect()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn manifest_separator_defaults_to_comma() {
        let manifest: Manifest =
            serde_json::from_str(r#"{"columns": [{"name": "a", "type": "int"}]}"#).unwrap();
        assert_eq!(manifest.separator, ',');
        assert_eq!(manifest.columns[0].type_tag, "int");
    }

    #[test]
    fn relative_paths_resolve_against_base_dir() {
        let discovery = ManifestDiscovery::new().with_base_dir("/srv/data");
        assert_eq!(
            discovery.resolve(Path::new("trades.json")),
            PathBuf::from("/srv/data/trades.json")
        );
        assert_eq!(
            discovery.resolve(Path::new("/abs/trades.json")),
            PathBuf::from("/abs/trades.json")
        );
    }

    #[test]
    fn invalid_pattern_is_reported() {
        let err = compile_matcher("[").unwrap_err();
        assert!(matches!(err, DiscoveryError::InvalidPattern { .. }));
    }
}
