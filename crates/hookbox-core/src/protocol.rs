//! Request / response types for a single lint run.
//!
//! These are the only values that cross the boundary to whatever transport
//! exposes the runner (CLI, RPC, tool server). Field names are the wire names.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::PathBuf;

fn default_true() -> bool {
    true
}

// ─── Input ──────────────────────────────────────────────────────────────────

/// One lint request against a local repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintRequest {
    /// Path to the local repository to lint. `~` is expanded.
    pub repo_path: String,
    /// `.pre-commit-config.yaml` content to use instead of the repository's own.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_yaml: Option<String>,
    /// Check every file in the repository.
    #[serde(default = "default_true")]
    pub all_files: bool,
    /// Check only these files; overrides `all_files` when non-empty.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files_to_check: Option<Vec<String>>,
    /// Hook ids to run.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub select_hooks: Option<Vec<String>>,
    /// Ask pre-commit to print the diff when a hook modifies files.
    #[serde(default = "default_true")]
    pub show_diff: bool,
    /// Virtualenv directory, relative to the repository root.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relative_virtualenv_path: Option<String>,
}

impl LintRequest {
    /// Request with the defaults: all files, diff on failure, repository config.
    pub fn new(repo_path: impl Into<String>) -> Self {
        Self {
            repo_path: repo_path.into(),
            config_yaml: None,
            all_files: true,
            files_to_check: None,
            select_hooks: None,
            show_diff: true,
            relative_virtualenv_path: None,
        }
    }

    /// `repo_path` with a leading `~` replaced by the home directory.
    pub fn expanded_repo_path(&self) -> PathBuf {
        expand_home(&self.repo_path)
    }

    /// Inline override text, if any. Blank text counts as absent.
    pub fn override_config(&self) -> Option<&str> {
        self.config_yaml.as_deref().filter(|s| !s.is_empty())
    }

    /// Explicit file list, if any. An empty list counts as absent.
    pub fn explicit_files(&self) -> Option<&[String]> {
        self.files_to_check.as_deref().filter(|f| !f.is_empty())
    }

    /// The hook id to narrow to. Only a single selection narrows the run.
    pub fn single_hook(&self) -> Option<&str> {
        match self.select_hooks.as_deref() {
            Some([only]) => Some(only.as_str()),
            _ => None,
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

// ─── Output ─────────────────────────────────────────────────────────────────

/// Outcome of one hook.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookStatus {
    Passed,
    Failed,
    Skipped,
    #[default]
    Unknown,
}

impl HookStatus {
    /// Exact lowercase status names; anything else is `Unknown`.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "passed" => Self::Passed,
            "failed" => Self::Failed,
            "skipped" => Self::Skipped,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passed => "passed",
            Self::Failed => "failed",
            Self::Skipped => "skipped",
            Self::Unknown => "unknown",
        }
    }
}

/// Result of a single hook, from the structured payload or the text summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HookResult {
    pub id: Option<String>,
    /// Hook source repository; only the structured payload carries it.
    pub repo: Option<String>,
    pub rev: Option<String>,
    #[serde(default)]
    pub status: HookStatus,
    pub files: Option<Vec<String>>,
    /// The structured record this result was decoded from.
    pub raw: Option<Map<String, Value>>,
}

impl HookResult {
    /// Result known only by id and status (text summary lines).
    pub fn from_summary_line(id: impl Into<String>, status: HookStatus) -> Self {
        Self {
            id: Some(id.into()),
            status,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LintSummary {
    /// In order of first appearance in the tool output.
    #[serde(default)]
    pub hooks: Vec<HookResult>,
    #[serde(default)]
    pub duration_sec: f64,
}

/// Everything the caller gets back. `ok` mirrors `exit_code == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LintResponse {
    pub ok: bool,
    pub exit_code: i32,
    pub summary: LintSummary,
    pub stdout: String,
    pub stderr: String,
}

impl LintResponse {
    pub fn new(exit_code: i32, summary: LintSummary, stdout: String, stderr: String) -> Self {
        Self {
            ok: exit_code == 0,
            exit_code,
            summary,
            stdout,
            stderr,
        }
    }
}
