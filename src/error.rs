//! Error types for store_listing

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

/// Result type alias for store_listing operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for store_listing operations
#[derive(Error, Debug)]
pub enum Error {
    /// Upstream did not answer within the configured timeout
    #[error("Request to {url} timed out after {}s", .after.as_secs_f64())]
    Timeout { url: String, after: Duration },

    /// Upstream answered with a non-success status
    #[error("Upstream returned {status} for {url}")]
    UpstreamStatus { status: StatusCode, url: String },

    /// Connection or transport failure
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Page was retrieved but no listing name could be found on it
    #[error("No store listing found for '{0}'")]
    NotFound(String),

    /// Identifier was empty or whitespace
    #[error("Identifier cannot be empty")]
    EmptyIdentifier,

    /// Configured listing URL is not a valid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Configuration value rejected
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Non-success answer from the listing endpoint or an image host
    #[error("{message} (HTTP {status})")]
    Api { status: StatusCode, message: String },
}

/// Coarse classification used when mapping errors onto HTTP responses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Upstream could not be read
    Fetch,
    /// Upstream reachable but no listing could be identified
    NotFound,
    /// Caller supplied unusable input
    InvalidInput,
    /// Anything local: configuration, URL building
    Internal,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Timeout { .. } | Error::UpstreamStatus { .. } | Error::Http(_) => {
                ErrorKind::Fetch
            }
            Error::Api { status, .. } if *status == StatusCode::NOT_FOUND => ErrorKind::NotFound,
            Error::Api { .. } => ErrorKind::Fetch,
            Error::NotFound(_) => ErrorKind::NotFound,
            Error::EmptyIdentifier => ErrorKind::InvalidInput,
            Error::InvalidUrl(_) | Error::Config(_) | Error::Io(_) | Error::Toml(_) => {
                ErrorKind::Internal
            }
        }
    }

    /// HTTP status carried by the error, if the failure came from a response
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::UpstreamStatus { status, .. } | Error::Api { status, .. } => Some(*status),
            Error::Http(e) => e.status(),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            Error::Timeout { .. } => true,
            Error::Http(e) => e.is_timeout(),
            _ => false,
        }
    }
}
