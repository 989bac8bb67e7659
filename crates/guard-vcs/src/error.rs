//! Error types for guard-vcs

use crate::BackendKind;

/// Result type for guard-vcs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while driving a version-control tool
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Filesystem error: {0}")]
    Fs(#[from] guard_fs::Error),

    #[error("Failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Command `{command}` failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Hook '{hook}' needs an event type to be registered with {backend}")]
    MissingHookEvent { backend: BackendKind, hook: String },

    #[error("Unknown backend '{0}'. Expected 'git' or 'hg'.")]
    UnknownBackend(String),
}
