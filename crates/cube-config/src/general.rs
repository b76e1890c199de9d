//! General settings: input charset and the parallelism hint.

use cube_core::Warning;
use serde::{Deserialize, Serialize};

/// Charset assumed for source files when none is configured.
pub const DEFAULT_CHARSET: &str = "ISO-8859-1";

/// Platform default used when the configured charset is unknown.
pub const FALLBACK_CHARSET: &str = "UTF-8";

/// Canonical charset names and their accepted aliases.
const KNOWN_CHARSETS: &[(&str, &[&str])] = &[
    ("UTF-8", &["utf8"]),
    ("UTF-16", &["utf16"]),
    ("UTF-16BE", &["utf-16be"]),
    ("UTF-16LE", &["utf-16le"]),
    ("US-ASCII", &["ascii"]),
    ("ISO-8859-1", &["latin1", "iso8859-1", "iso_8859_1"]),
    ("ISO-8859-15", &["latin9", "iso8859-15"]),
    ("windows-1252", &["cp1252"]),
];

fn default_charset() -> String {
    DEFAULT_CHARSET.to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Charset of the source files.
    #[serde(default = "default_charset")]
    pub charset: String,

    /// Available-parallelism hint for partitioning. Detected when unset.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            charset: default_charset(),
            parallelism: None,
        }
    }
}

impl GeneralConfig {
    /// Canonical name of the configured charset.
    ///
    /// An unknown name never fails: it resolves to [`FALLBACK_CHARSET`] and
    /// the returned warning says so.
    pub fn resolve_charset(&self) -> (String, Option<Warning>) {
        let requested = self.charset.trim();
        if let Some(canonical) = canonical_charset(requested) {
            return (canonical.to_string(), None);
        }
        tracing::warn!(
            charset = requested,
            fallback = FALLBACK_CHARSET,
            "unknown charset, using platform default"
        );
        (
            FALLBACK_CHARSET.to_string(),
            Some(Warning::UnknownCharset {
                requested: requested.to_string(),
                fallback: FALLBACK_CHARSET.to_string(),
            }),
        )
    }

    /// The configured hint, or the number of available cores.
    pub fn effective_parallelism(&self) -> usize {
        self.parallelism.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        })
    }
}

fn canonical_charset(name: &str) -> Option<&'static str> {
    KNOWN_CHARSETS
        .iter()
        .find(|(canonical, aliases)| {
            canonical.eq_ignore_ascii_case(name)
                || aliases.iter().any(|alias| alias.eq_ignore_ascii_case(name))
        })
        .map(|(canonical, _)| *canonical)
}
