//! Error types for guard-fs

use std::path::PathBuf;

/// Result type for guard-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while staging files
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path exists but is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("Path has no file name: {path}")]
    MissingFileName { path: PathBuf },

    #[error("Invalid name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn invalid_name(name: &str, reason: impl Into<String>) -> Self {
        Self::InvalidName {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}
