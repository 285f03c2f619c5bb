//! Error types for each stage of the digest pipeline.
//!
//! Errors are split by concern so callers can match on what went wrong:
//! - [`FetchError`]: a page or feed could not be downloaded
//! - [`ConfigError`]: the YAML configuration is unreadable or invalid
//! - [`SourceError`]: the initial article list could not be loaded
//! - [`OutputError`]: the digest could not be written

use std::path::PathBuf;
use thiserror::Error;

/// Failure of a single HTTP GET, after response validation.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("request to {url} timed out")]
    Timeout { url: String },

    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("failed to read body of {url}: {source}")]
    Body {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl FetchError {
    /// Map a `reqwest` error raised while sending a request.
    pub fn from_reqwest(url: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout {
                url: url.to_string(),
            }
        } else if err.is_builder() {
            FetchError::InvalidUrl {
                url: url.to_string(),
                reason: err.to_string(),
            }
        } else {
            FetchError::Request {
                url: url.to_string(),
                source: err,
            }
        }
    }

    /// The HTTP status for [`FetchError::Status`], if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            FetchError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("config field `{field}` must be a positive integer")]
    NonPositive { field: &'static str },
}

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("failed to read articles from {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid JSON article list: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid YAML article list: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("malformed feed {url}: {reason}")]
    Feed { url: String, reason: String },

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("output path must be within {root}, got {path}")]
    OutsideProject { path: PathBuf, root: PathBuf },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to serialize digest: {0}")]
    Json(#[from] serde_json::Error),
}
