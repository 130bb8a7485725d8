//! The lint orchestrator: one request in, one response out.

use std::path::PathBuf;
use std::time::Instant;

use hookbox_core::config::RunnerConfig;
use hookbox_core::protocol::{LintRequest, LintResponse, LintSummary};
use hookbox_sandbox::env::builder::runtime_for_relative;
use hookbox_sandbox::{CommandBackend, Invocation, Sandbox};
use tracing::Span;

use crate::command::build_command;
use crate::error::LintError;
use crate::git::GitBootstrapper;
use crate::hook_config::{self, MISSING_CONFIG_EXIT_CODE, MISSING_CONFIG_MESSAGE};
use crate::parse::parse_output;

/// Runs pre-commit requests through `backend`, each in its own sandbox.
///
/// Holds no per-request state, so one runner can serve concurrent requests.
pub struct LintRunner<B: CommandBackend> {
    backend: B,
    config: RunnerConfig,
    span: Span,
}

impl<B: CommandBackend> LintRunner<B> {
    pub fn new(backend: B, config: RunnerConfig, span: Span) -> Self {
        Self {
            backend,
            config,
            span,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Lint `req.repo_path` without modifying it.
    ///
    /// A missing or non-directory repository path is a request-level error; a missing
    /// configuration or failing hooks come back as a response with
    /// `ok == false`. The sandbox is removed on every path.
    pub fn run(&self, req: &LintRequest) -> Result<LintResponse, LintError> {
        let start = Instant::now();
        let source = locate_repo(req)?;

        let sandbox = Sandbox::create(&source, self.config.tmp_dir.as_deref(), self.span.clone())?;
        let result = self.run_in(&sandbox, req, start);
        sandbox.teardown();

        match &result {
            Ok(resp) => tracing::info!(
                parent: &self.span,
                exit_code = resp.exit_code,
                hooks = resp.summary.hooks.len(),
                duration_sec = resp.summary.duration_sec,
                "Lint finished"
            ),
            Err(e) => tracing::warn!(parent: &self.span, error = %e, "Lint aborted"),
        }
        result
    }

    fn run_in(&self, sandbox: &Sandbox, req: &LintRequest, start: Instant) -> Result<LintResponse, LintError> {
        let workdir = sandbox.working_copy();
        let runtime = runtime_for_relative(workdir, req.relative_virtualenv_path.as_deref());
        if runtime.python.is_some() {
            tracing::debug!(parent: &self.span, env_dir = %runtime.env_dir.display(), "Using project virtualenv");
        }

        GitBootstrapper::new(&self.backend, self.span.clone()).ensure_repo(workdir, &runtime)?;

        let Some(cfg) = hook_config::resolve(workdir, req.override_config())? else {
            tracing::info!(parent: &self.span, "No pre-commit configuration in repository");
            return Ok(LintResponse::new(
                MISSING_CONFIG_EXIT_CODE,
                LintSummary {
                    hooks: Vec::new(),
                    duration_sec: start.elapsed().as_secs_f64(),
                },
                String::new(),
                MISSING_CONFIG_MESSAGE.to_string(),
            ));
        };
        tracing::debug!(parent: &self.span, config = %cfg.path().display(), source = cfg.source(), "Resolved hook config");

        if let Some(hooks) = req.select_hooks.as_deref().filter(|h| h.len() > 1) {
            tracing::warn!(
                parent: &self.span,
                selected = ?hooks,
                "Multiple hooks selected; pre-commit runs one hook or all, running all"
            );
        }

        let argv = build_command(cfg.path(), req);
        tracing::info!(parent: &self.span, backend = self.backend.name(), argv = ?argv, "Running pre-commit");
        let invocation = Invocation::new(argv, workdir, sandbox.tool_env())
            .with_runtime(runtime)
            .with_timeout(self.config.timeout);
        let output = self.backend.execute(&invocation)?;
        if output.timed_out {
            tracing::warn!(parent: &self.span, timeout = ?self.config.timeout, "pre-commit timed out");
        }

        let hooks = parse_output(&output.stdout);
        for hook in &hooks {
            tracing::debug!(
                parent: &self.span,
                hook = hook.id.as_deref().unwrap_or("?"),
                status = hook.status.as_str(),
                "Hook result"
            );
        }
        Ok(LintResponse::new(
            output.exit_code,
            LintSummary {
                hooks,
                duration_sec: start.elapsed().as_secs_f64(),
            },
            output.stdout,
            output.stderr,
        ))
    }
}

fn locate_repo(req: &LintRequest) -> Result<PathBuf, LintError> {
    let path = req.expanded_repo_path();
    match path.canonicalize() {
        Ok(p) if p.is_dir() => Ok(p),
        Ok(_) => Err(LintError::NotADirectory(path)),
        Err(_) => Err(LintError::RepoNotFound(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hookbox_core::config::env_keys::tool;
    use hookbox_core::protocol::HookStatus;
    use hookbox_sandbox::{ExecutionResult, SandboxError};
    use std::ffi::OsStr;
    use std::fs;
    use std::path::Path;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Records every invocation; answers pre-commit with a canned result.
    struct FakeBackend {
        calls: Mutex<Vec<Invocation>>,
        tool_result: ExecutionResult,
    }

    impl FakeBackend {
        fn answering(stdout: &str, exit_code: i32) -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                tool_result: ExecutionResult {
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                    exit_code,
                    timed_out: false,
                },
            }
        }

        fn tool_call(&self) -> Option<Invocation> {
            self.calls
                .lock()
                .unwrap()
                .iter()
                .find(|i| i.argv.first().map(String::as_str) == Some("pre-commit"))
                .cloned()
        }
    }

    impl CommandBackend for FakeBackend {
        fn name(&self) -> &str {
            "fake"
        }

        fn execute(&self, invocation: &Invocation) -> Result<ExecutionResult, SandboxError> {
            self.calls.lock().unwrap().push(invocation.clone());
            if invocation.argv[0] == "pre-commit" {
                // pre-commit may rewrite files; that must stay in the sandbox
                fs::write(invocation.cwd.join("a.py"), "reformatted\n").unwrap();
                Ok(self.tool_result.clone())
            } else {
                Ok(ExecutionResult::default())
            }
        }
    }

    /// Fails every invocation, as when `git` is not installed.
    struct FailingBackend;

    impl CommandBackend for FailingBackend {
        fn name(&self) -> &str {
            "failing"
        }

        fn execute(&self, invocation: &Invocation) -> Result<ExecutionResult, SandboxError> {
            Err(SandboxError::ProgramNotFound(invocation.argv[0].clone()))
        }
    }

    fn runner(backend: FakeBackend) -> LintRunner<FakeBackend> {
        LintRunner::new(backend, RunnerConfig::default(), Span::none())
    }

    fn repo_with_config() -> tempfile::TempDir {
        let repo = tempfile::tempdir().unwrap();
        fs::write(repo.path().join(".pre-commit-config.yaml"), "repos: []\n").unwrap();
        fs::write(repo.path().join("a.py"), "x=1\n").unwrap();
        repo
    }

    fn snapshot(root: &Path) -> Vec<(PathBuf, Vec<u8>)> {
        let mut files: Vec<_> = list_files(root)
            .into_iter()
            .map(|p| {
                let bytes = fs::read(&p).unwrap();
                (p.strip_prefix(root).unwrap().to_path_buf(), bytes)
            })
            .collect();
        files.sort();
        files
    }

    fn list_files(root: &Path) -> Vec<PathBuf> {
        let mut out = Vec::new();
        for entry in fs::read_dir(root).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                out.extend(list_files(&path));
            } else {
                out.push(path);
            }
        }
        out
    }

    #[test]
    fn test_missing_config_short_circuits() {
        let repo = tempfile::tempdir().unwrap();
        fs::write(repo.path().join("a.py"), "x=1\n").unwrap();
        let runner = runner(FakeBackend::answering("", 0));

        let resp = runner
            .run(&LintRequest::new(repo.path().to_string_lossy()))
            .unwrap();

        assert!(!resp.ok);
        assert_eq!(resp.exit_code, 2);
        assert_eq!(resp.stdout, "");
        assert_eq!(
            resp.stderr,
            "Repository does not have a .pre-commit-config.yaml(.yml) file."
        );
        assert!(resp.summary.hooks.is_empty());
        assert!(runner.backend().tool_call().is_none());
    }

    #[test]
    fn test_explicit_files_replace_all_files() {
        let repo = repo_with_config();
        let runner = runner(FakeBackend::answering("", 0));
        let mut req = LintRequest::new(repo.path().to_string_lossy());
        req.files_to_check = Some(vec!["a.py".into()]);

        runner.run(&req).unwrap();

        let argv = runner.backend().tool_call().unwrap().argv;
        let pos = argv.iter().position(|a| a == "--files").unwrap();
        assert_eq!(argv[pos + 1], "a.py");
        assert!(!argv.iter().any(|a| a == "--all-files"));
    }

    #[test]
    fn test_isolation_and_cleanup() {
        let repo = repo_with_config();
        let before = snapshot(repo.path());
        let runner = runner(FakeBackend::answering("black....Failed\n", 1));

        let resp = runner
            .run(&LintRequest::new(repo.path().to_string_lossy()))
            .unwrap();
        assert_eq!(resp.exit_code, 1);

        let call = runner.backend().tool_call().unwrap();
        let cache = PathBuf::from(call.env.get(OsStr::new(tool::PRE_COMMIT_HOME)).unwrap());
        assert_ne!(call.cwd, repo.path().canonicalize().unwrap());
        assert!(!call.cwd.exists());
        assert!(!cache.exists());
        assert_eq!(snapshot(repo.path()), before);
    }

    #[test]
    fn test_tool_env_and_timeout_are_passed() {
        let repo = repo_with_config();
        let config = RunnerConfig {
            tmp_dir: None,
            timeout: Some(Duration::from_secs(30)),
        };
        let runner = LintRunner::new(FakeBackend::answering("", 0), config, Span::none());

        runner
            .run(&LintRequest::new(repo.path().to_string_lossy()))
            .unwrap();

        let call = runner.backend().tool_call().unwrap();
        assert_eq!(call.timeout, Some(Duration::from_secs(30)));
        assert_eq!(call.env.get(OsStr::new(tool::PYTHONUTF8)).unwrap(), "1");
        assert_eq!(call.env.get(OsStr::new(tool::TERM)).unwrap(), "dumb");
    }

    #[test]
    fn test_ok_follows_exit_code_and_hooks_are_parsed() {
        let repo = repo_with_config();
        let stdout = "black....Passed\nruff.....Failed\n";
        let runner = runner(FakeBackend::answering(stdout, 1));

        let resp = runner
            .run(&LintRequest::new(repo.path().to_string_lossy()))
            .unwrap();

        assert!(!resp.ok);
        assert_eq!(resp.stdout, stdout);
        let statuses: Vec<_> = resp.summary.hooks.iter().map(|h| h.status).collect();
        assert_eq!(statuses, vec![HookStatus::Passed, HookStatus::Failed]);
        assert!(resp.summary.duration_sec >= 0.0);

        let passing = runner_ok(&repo);
        assert!(passing.ok);
        assert_eq!(passing.exit_code, 0);
    }

    fn runner_ok(repo: &tempfile::TempDir) -> LintResponse {
        runner(FakeBackend::answering("", 0))
            .run(&LintRequest::new(repo.path().to_string_lossy()))
            .unwrap()
    }

    #[test]
    fn test_override_config_is_used() {
        let repo = tempfile::tempdir().unwrap();
        let runner = runner(FakeBackend::answering("", 0));
        let mut req = LintRequest::new(repo.path().to_string_lossy());
        req.config_yaml = Some("repos: []\n".into());

        let resp = runner.run(&req).unwrap();

        assert!(resp.ok);
        let argv = runner.backend().tool_call().unwrap().argv;
        assert!(argv[3].ends_with(".pre-commit-config.override.yaml"));
        assert!(!repo.path().join(".pre-commit-config.override.yaml").exists());
    }

    #[test]
    fn test_git_bootstrap_runs_in_working_copy() {
        let repo = repo_with_config();
        let runner = runner(FakeBackend::answering("", 0));
        runner
            .run(&LintRequest::new(repo.path().to_string_lossy()))
            .unwrap();

        let calls = runner.backend().calls.lock().unwrap();
        let git_calls: Vec<_> = calls.iter().filter(|c| c.argv[0] == "git").collect();
        assert_eq!(git_calls.len(), 3);
        let tool = calls.iter().find(|c| c.argv[0] == "pre-commit").unwrap();
        assert!(git_calls.iter().all(|c| c.cwd == tool.cwd));
    }

    #[test]
    fn test_nonexistent_repo_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope");
        let runner = runner(FakeBackend::answering("", 0));

        let err = runner
            .run(&LintRequest::new(missing.to_string_lossy()))
            .unwrap_err();

        assert!(matches!(err, LintError::RepoNotFound(p) if p == missing));
        assert!(runner.backend().calls.lock().unwrap().is_empty());
    }

    #[test]
    fn test_sandboxes_go_under_tmp_dir() {
        let repo = repo_with_config();
        let base = tempfile::tempdir().unwrap();
        let config = RunnerConfig {
            tmp_dir: Some(base.path().to_path_buf()),
            timeout: None,
        };
        let runner = LintRunner::new(FakeBackend::answering("", 0), config, Span::none());

        runner
            .run(&LintRequest::new(repo.path().to_string_lossy()))
            .unwrap();

        let call = runner.backend().tool_call().unwrap();
        assert!(call.cwd.starts_with(base.path()));
        assert_eq!(fs::read_dir(base.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_backend_error_still_tears_down() {
        let repo = repo_with_config();
        let base = tempfile::tempdir().unwrap();
        let config = RunnerConfig {
            tmp_dir: Some(base.path().to_path_buf()),
            timeout: None,
        };
        let runner = LintRunner::new(FailingBackend, config, Span::none());

        let err = runner
            .run(&LintRequest::new(repo.path().to_string_lossy()))
            .unwrap_err();

        assert!(matches!(err, LintError::Sandbox(SandboxError::ProgramNotFound(p)) if p == "git"));
        assert_eq!(fs::read_dir(base.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_file_repo_path_is_not_a_directory() {
        let tmp = tempfile::tempdir().unwrap();
        let file = tmp.path().join("a.py");
        fs::write(&file, "x=1\n").unwrap();
        let runner = runner(FakeBackend::answering("", 0));

        let err = runner
            .run(&LintRequest::new(file.to_string_lossy()))
            .unwrap_err();

        assert!(err.to_string().contains("not a directory"));
        assert!(matches!(err, LintError::NotADirectory(p) if p == file));
        assert!(runner.backend().calls.lock().unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_hook_writing_through_absolute_symlink_leaves_caller_untouched() {
        let repo = repo_with_config();
        fs::write(repo.path().join("real.py"), "original\n").unwrap();
        let canonical = repo.path().canonicalize().unwrap();
        // the fake tool rewrites a.py; make that an absolute link into the caller's tree
        fs::remove_file(repo.path().join("a.py")).unwrap();
        std::os::unix::fs::symlink(canonical.join("real.py"), repo.path().join("a.py")).unwrap();
        let runner = runner(FakeBackend::answering("", 0));

        runner
            .run(&LintRequest::new(repo.path().to_string_lossy()))
            .unwrap();

        assert_eq!(
            fs::read_to_string(repo.path().join("real.py")).unwrap(),
            "original\n"
        );
        assert_eq!(
            fs::read_link(repo.path().join("a.py")).unwrap(),
            canonical.join("real.py")
        );
    }
}
