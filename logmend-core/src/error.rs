//! Error types for logmend-core

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the logmend-core library
#[derive(Error, Debug)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Repository root does not exist or is not a directory
    #[error("repository root not found: {0}")]
    RepoNotFound(PathBuf),

    /// Log text could not be read at all
    #[error("log unreadable: {0}")]
    LogUnreadable(String),

    /// Analysis run not found in the store
    #[error("analysis run not found: {0}")]
    RunNotFound(String),
}

/// Result type alias for logmend-core
pub type Result<T> = std::result::Result<T, Error>;
