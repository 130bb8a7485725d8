use std::path::PathBuf;
use thiserror::Error;

use hookbox_sandbox::SandboxError;

/// Hard failures of a lint request.
///
/// Expected outcomes (missing configuration, failing hooks, unparseable
/// output) are reported inside the `LintResponse`, not here.
#[derive(Debug, Error)]
pub enum LintError {
    #[error("repo_path does not exist: {}", .0.display())]
    RepoNotFound(PathBuf),

    #[error("repo_path is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),

    #[error("Failed to write override config {}: {source}", path.display())]
    WriteOverride {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Sandbox(#[from] SandboxError),
}
