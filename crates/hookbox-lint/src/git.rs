//! Git bootstrap: pre-commit needs a committed tree to diff against, so a
//! working copy without `.git` gets `init`, `add -A` and an empty-allowed
//! initial commit.

use std::path::Path;

use hookbox_core::config::env_keys::git as git_keys;
use hookbox_sandbox::runner::inherited_env;
use hookbox_sandbox::{CommandBackend, EnvMap, Invocation, RuntimePaths};
use tracing::Span;

use crate::error::LintError;

const GIT: &str = "git";
const BOOTSTRAP_NAME: &str = "hookbox";
const BOOTSTRAP_EMAIL: &str = "hookbox@localhost";

/// What [`GitBootstrapper::ensure_repo`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    /// `.git` was already there; nothing ran.
    AlreadyPresent,
    Initialized,
}

pub struct GitBootstrapper<'a, B: CommandBackend + ?Sized> {
    backend: &'a B,
    span: Span,
}

impl<'a, B: CommandBackend + ?Sized> GitBootstrapper<'a, B> {
    pub fn new(backend: &'a B, span: Span) -> Self {
        Self { backend, span }
    }

    /// Make `root` a git repository with at least one commit. Idempotent.
    ///
    /// Runs through the same backend and `runtime` as the lint command. A
    /// failing git step is logged and does not abort: pre-commit reports the
    /// consequence more precisely than we could.
    pub fn ensure_repo(&self, root: &Path, runtime: &RuntimePaths) -> Result<Bootstrap, LintError> {
        if root.join(".git").exists() {
            tracing::debug!(parent: &self.span, root = %root.display(), "Working copy already a git repo");
            return Ok(Bootstrap::AlreadyPresent);
        }

        tracing::info!(parent: &self.span, root = %root.display(), "Initializing git repo in working copy");
        let env = bootstrap_env();
        for args in [
            &["init"][..],
            &["add", "-A"][..],
            &["commit", "--allow-empty", "-m", "init"][..],
        ] {
            let argv: Vec<String> = std::iter::once(GIT)
                .chain(args.iter().copied())
                .map(String::from)
                .collect();
            let invocation = Invocation::new(argv, root, env.clone()).with_runtime(runtime.clone());
            let result = self.backend.execute(&invocation)?;
            if result.exit_code != 0 {
                tracing::warn!(
                    parent: &self.span,
                    step = args[0],
                    exit_code = result.exit_code,
                    stderr = %result.stderr.trim(),
                    "git bootstrap step failed"
                );
            }
        }
        Ok(Bootstrap::Initialized)
    }
}

/// Inherited environment, plus a fallback identity so `git commit` works on
/// hosts that have none configured.
fn bootstrap_env() -> EnvMap {
    let mut env = inherited_env();
    for (key, value) in [
        (git_keys::GIT_AUTHOR_NAME, BOOTSTRAP_NAME),
        (git_keys::GIT_AUTHOR_EMAIL, BOOTSTRAP_EMAIL),
        (git_keys::GIT_COMMITTER_NAME, BOOTSTRAP_NAME),
        (git_keys::GIT_COMMITTER_EMAIL, BOOTSTRAP_EMAIL),
    ] {
        env.entry(key.into()).or_insert_with(|| value.into());
    }
    env
}
