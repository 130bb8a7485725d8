//! Environment variable names.
//!
//! Primary names use the `HOOKBOX_*` prefix; aliases are checked in order
//! after the primary.

/// Observability and logging
pub mod observability {
    pub const HOOKBOX_QUIET: &str = "HOOKBOX_QUIET";
    pub const QUIET_ALIASES: &[&str] = &[];

    pub const HOOKBOX_LOG_LEVEL: &str = "HOOKBOX_LOG_LEVEL";
    pub const LOG_LEVEL_ALIASES: &[&str] = &[];

    pub const HOOKBOX_LOG_JSON: &str = "HOOKBOX_LOG_JSON";
    pub const LOG_JSON_ALIASES: &[&str] = &[];
}

/// Lint runner knobs
pub mod runner {
    /// Base directory for per-request sandboxes (default: OS temp dir)
    pub const HOOKBOX_TMPDIR: &str = "HOOKBOX_TMPDIR";
    pub const TMPDIR_ALIASES: &[&str] = &[];

    /// Wall-clock limit for the pre-commit process; unset or 0 disables it
    pub const HOOKBOX_TIMEOUT_SECS: &str = "HOOKBOX_TIMEOUT_SECS";
    pub const TIMEOUT_ALIASES: &[&str] = &[];
}

/// Variables injected into the pre-commit process environment
pub mod tool {
    /// pre-commit's private store (hook repos, environments)
    pub const PRE_COMMIT_HOME: &str = "PRE_COMMIT_HOME";
    pub const PYTHONUTF8: &str = "PYTHONUTF8";
    pub const TERM: &str = "TERM";
}

/// Identity used for the bootstrap commit when the host has none
pub mod git {
    pub const GIT_AUTHOR_NAME: &str = "GIT_AUTHOR_NAME";
    pub const GIT_AUTHOR_EMAIL: &str = "GIT_AUTHOR_EMAIL";
    pub const GIT_COMMITTER_NAME: &str = "GIT_COMMITTER_NAME";
    pub const GIT_COMMITTER_EMAIL: &str = "GIT_COMMITTER_EMAIL";
}
