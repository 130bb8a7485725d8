//! Resolve RuntimePaths from a virtualenv directory.

use std::path::{Path, PathBuf};

use crate::runner::RuntimePaths;

/// Interpreter locations, in lookup order: POSIX layout, then Windows layout.
const INTERPRETER_CANDIDATES: &[&[&str]] = &[&["bin", "python"], &["Scripts", "python.exe"]];

/// Build RuntimePaths from an environment directory.
///
/// Returns [`RuntimePaths::system`] when `env_dir` is empty, does not exist,
/// or contains no interpreter in either conventional location.
pub fn build_runtime_paths(env_dir: &Path) -> RuntimePaths {
    if env_dir.as_os_str().is_empty() || !env_dir.exists() {
        return RuntimePaths::system();
    }
    match find_interpreter(env_dir) {
        Some(python) => RuntimePaths {
            python: Some(python),
            env_dir: env_dir.to_path_buf(),
        },
        None => {
            tracing::warn!(
                env_dir = %env_dir.display(),
                "Virtualenv has no bin/python or Scripts/python.exe; using PATH"
            );
            RuntimePaths::system()
        }
    }
}

/// Resolve `relative` under `root` (the sandbox working copy) and build RuntimePaths.
pub fn runtime_for_relative(root: &Path, relative: Option<&str>) -> RuntimePaths {
    match relative.filter(|r| !r.is_empty()) {
        Some(rel) => build_runtime_paths(&root.join(rel)),
        None => RuntimePaths::system(),
    }
}

fn find_interpreter(env_dir: &Path) -> Option<PathBuf> {
    INTERPRETER_CANDIDATES
        .iter()
        .map(|parts| parts.iter().fold(env_dir.to_path_buf(), |p, part| p.join(part)))
        .find(|candidate| candidate.exists())
}
