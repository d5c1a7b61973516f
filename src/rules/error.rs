//! Rule loading errors

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while building a [`RuleCatalog`](super::RuleCatalog)
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("duplicate rule for key '{0}'")]
    DuplicateKey(String),

    #[error("invalid value pattern '{pattern}' for key '{key}': {source}")]
    InvalidPattern {
        key: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("failed to parse rule file {origin}: {source}")]
    RuleFile {
        origin: String,
        #[source]
        source: toml::de::Error,
    },
}

/// Errors raised while producing the external rule set.
///
/// Any of these aborts the run before a single line is classified.
#[derive(Debug, Error)]
pub enum RuleSourceError {
    #[error("rule cache {path} is corrupt: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    #[error("failed to fetch rules from {url}: {source}")]
    FetchFailed {
        url: String,
        #[source]
        source: io::Error,
    },

    #[error("malformed rule document from {url}: {source}")]
    ParseFailed {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}
