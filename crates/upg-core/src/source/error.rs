use std::path::PathBuf;
use thiserror::Error;

use crate::navigation::NavigationError;

/// Errors that can occur while loading analysis data.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Document not found: {0}")]
    NotFound(String),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: u16 },

    #[error("Request to {0} timed out")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("IO error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode {what}: {source}")]
    Decode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode {what}: {source}")]
    Encode {
        what: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Navigation(#[from] NavigationError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid document name: {0:?}")]
    InvalidName(String),

    #[error("No path with index {0}")]
    UnknownPath(usize),

    #[error("{0} is not a function")]
    NotAFunction(String),
}

impl SourceError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        SourceError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn decode(what: impl Into<String>, source: serde_json::Error) -> Self {
        SourceError::Decode {
            what: what.into(),
            source,
        }
    }

    pub fn encode(what: impl Into<String>, source: serde_json::Error) -> Self {
        SourceError::Encode {
            what: what.into(),
            source,
        }
    }
}

impl From<reqwest::Error> for SourceError {
    fn from(err: reqwest::Error) -> Self {
        SourceError::Network(err.to_string())
    }
}
