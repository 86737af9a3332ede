//! Error types for multiclilib

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading state or building a report
#[derive(Error, Debug)]
pub enum MulticliError {
    /// The state snapshot could not be read
    #[error("state unavailable from '{path}': {source}")]
    StateUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The state snapshot is not valid JSON or has the wrong shape
    #[error("malformed state: {0}")]
    MalformedState(String),

    /// The command cannot run against this device or instance
    #[error("{0}")]
    Unsupported(String),

    /// The state is well-formed but internally inconsistent
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for MulticliError {
    fn from(err: serde_json::Error) -> Self {
        MulticliError::MalformedState(err.to_string())
    }
}
