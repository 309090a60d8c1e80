//! Error type for internal failures
//!
//! Missing or malformed inputs and unreadable source files never reach this
//! type; they are absorbed where they occur. A `HarvestError` means the tool
//! itself could not complete a run.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration {path:?}: {message}")]
    Config { path: PathBuf, message: String },
}

impl HarvestError {
    /// Attach a path to an I/O error
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HarvestError::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, HarvestError>;
