use std::path::PathBuf;
use thiserror::Error;

/// Errors from sandbox setup and process execution.
///
/// A nonzero exit code is never an error; see [`crate::ExecutionResult`].
#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("Failed to create temporary directory: {0}")]
    CreateTempDir(#[source] std::io::Error),

    #[error("Failed to walk {}: {source}", root.display())]
    Walk {
        root: PathBuf,
        #[source]
        source: walkdir::Error,
    },

    #[error("Failed to copy {}: {source}", path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Empty command")]
    EmptyCommand,

    #[error("Program not found on PATH: {0}")]
    ProgramNotFound(String),

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed waiting for '{program}': {source}")]
    Wait {
        program: String,
        #[source]
        source: std::io::Error,
    },
}
