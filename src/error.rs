//! Error types for fetching, extraction, and configuration.
//!
//! Fetch and extraction failures never escape a source: they are logged
//! where they happen and turned into an empty post list. Only
//! [`ConfigError`] can abort a run.

use thiserror::Error;

/// A listing page or feed could not be retrieved.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Transport failure: DNS, TLS, connection reset, timeout.
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered 403, usually bot protection.
    #[error("access forbidden (HTTP 403) at {url}")]
    Forbidden { url: String },

    /// Any other status the caller does not accept.
    #[error("unexpected HTTP status {status} at {url}")]
    Status { url: String, status: u16 },

    /// The candidate URL does not parse.
    #[error("invalid URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl FetchError {
    /// Returns true when the failure is the 403 bot-protection case.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, FetchError::Forbidden { .. })
    }
}

/// A fetched document could not be turned into posts.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A selector rule is not valid CSS.
    #[error("invalid selector {selector:?}: {message}")]
    Selector { selector: String, message: String },

    /// The body is not a readable RSS or Atom feed.
    #[error("failed to parse feed: {0}")]
    Feed(String),
}

impl ExtractError {
    pub fn feed(err: impl std::fmt::Display) -> Self {
        ExtractError::Feed(err.to_string())
    }
}

/// The competitors configuration file exists but cannot be used.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON in config {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid YAML in config {path}: {source}")]
    Yaml {
        path: String,
        #[source]
        source: serde_yaml::Error,
    },
}
