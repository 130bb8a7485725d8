//! Which hook configuration governs a run.
//!
//! Precedence: inline override text (written to a fresh file), then
//! `.pre-commit-config.yaml`, then `.pre-commit-config.yml`.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::LintError;

/// On-disk configuration names, in priority order.
pub const CONFIG_FILE_NAMES: &[&str] = &[".pre-commit-config.yaml", ".pre-commit-config.yml"];

/// File the inline override is written to, inside the working copy.
pub const OVERRIDE_FILE_NAME: &str = ".pre-commit-config.override.yaml";

/// Exit code reported when no configuration can be found.
pub const MISSING_CONFIG_EXIT_CODE: i32 = 2;

pub const MISSING_CONFIG_MESSAGE: &str =
    "Repository does not have a .pre-commit-config.yaml(.yml) file.";

/// The configuration file handed to pre-commit. Exactly one source is chosen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedConfig {
    /// Caller-supplied text, freshly written into the working copy.
    Override(PathBuf),
    /// Configuration that already exists in the repository.
    Repository(PathBuf),
}

impl ResolvedConfig {
    pub fn path(&self) -> &Path {
        match self {
            Self::Override(p) | Self::Repository(p) => p,
        }
    }

    pub fn source(&self) -> &'static str {
        match self {
            Self::Override(_) => "override",
            Self::Repository(_) => "repository",
        }
    }
}

/// Resolve the configuration for `root`. `Ok(None)` means "no configuration",
/// which the orchestrator turns into a failure response.
pub fn resolve(root: &Path, override_text: Option<&str>) -> Result<Option<ResolvedConfig>, LintError> {
    if let Some(text) = override_text {
        return write_override_config(root, text).map(|p| Some(ResolvedConfig::Override(p)));
    }
    Ok(find_repo_config(root).map(ResolvedConfig::Repository))
}

/// First existing canonical config file under `root`.
pub fn find_repo_config(root: &Path) -> Option<PathBuf> {
    CONFIG_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|p| p.exists())
}

/// Write `text` verbatim to the override file under `root`.
pub fn write_override_config(root: &Path, text: &str) -> Result<PathBuf, LintError> {
    let path = root.join(OVERRIDE_FILE_NAME);
    fs::write(&path, text).map_err(|source| LintError::WriteOverride {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}
