use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use crate::common::wait_with_timeout;
use crate::error::SandboxError;

/// Full environment handed to a child process (the child sees nothing else).
pub type EnvMap = BTreeMap<OsString, OsString>;

/// The invoking process's environment, byte-for-byte.
pub fn inherited_env() -> EnvMap {
    std::env::vars_os().collect()
}

/// Captured result of one process run. A nonzero `exit_code` is a normal result.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    /// The process was killed because it exceeded its time limit.
    pub timed_out: bool,
}

/// Interpreter resolved from an optional project-local virtualenv.
///
/// Callers construct this via `env::builder`; `python: None` means no
/// substitution happens and commands run as given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuntimePaths {
    /// Path to the virtualenv's Python interpreter
    pub python: Option<PathBuf>,
    /// Virtualenv directory. Empty `PathBuf` means no isolated environment.
    pub env_dir: PathBuf,
}

impl RuntimePaths {
    /// No virtualenv: commands resolve through `PATH`.
    pub fn system() -> Self {
        Self::default()
    }
}

/// One command to run: argv, working directory, environment, interpreter.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub argv: Vec<String>,
    pub cwd: PathBuf,
    pub env: EnvMap,
    pub runtime: RuntimePaths,
    /// Kill the process after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl Invocation {
    pub fn new(argv: Vec<String>, cwd: impl Into<PathBuf>, env: EnvMap) -> Self {
        Self {
            argv,
            cwd: cwd.into(),
            env,
            runtime: RuntimePaths::system(),
            timeout: None,
        }
    }

    pub fn with_runtime(mut self, runtime: RuntimePaths) -> Self {
        self.runtime = runtime;
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Run `invocation` as a child process and capture its output.
///
/// The argv is first passed through [`RuntimePaths::resolve_argv`], so a
/// configured virtualenv interpreter replaces `pre-commit` / `python -m`.
pub(crate) fn execute_process(invocation: &Invocation) -> Result<ExecutionResult, SandboxError> {
    let argv = invocation.runtime.resolve_argv(&invocation.argv);
    let (program, args) = argv.split_first().ok_or(SandboxError::EmptyCommand)?;

    tracing::debug!(
        program = %program,
        args = ?args,
        cwd = %invocation.cwd.display(),
        venv = %invocation.runtime.env_dir.display(),
        "Spawning process"
    );

    let start = Instant::now();
    let mut child = Command::new(program)
        .args(args)
        .current_dir(&invocation.cwd)
        .env_clear()
        .envs(&invocation.env)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| spawn_error(program, source))?;

    let outcome = wait_with_timeout(&mut child, invocation.timeout).map_err(|source| {
        SandboxError::Wait {
            program: program.clone(),
            source,
        }
    })?;

    let exit_code = outcome.exit_code();
    let mut stderr = outcome.stderr;
    if outcome.timed_out {
        let secs = invocation.timeout.map(|t| t.as_secs_f64()).unwrap_or_default();
        tracing::warn!(program = %program, timeout_secs = secs, "Process killed after timeout");
        if !stderr.is_empty() && !stderr.ends_with('\n') {
            stderr.push('\n');
        }
        stderr.push_str(&format!("{} timed out after {:.1}s", program, secs));
    }

    tracing::debug!(
        program = %program,
        exit_code,
        elapsed_ms = start.elapsed().as_millis() as u64,
        stdout_bytes = outcome.stdout.len(),
        "Process finished"
    );

    Ok(ExecutionResult {
        stdout: outcome.stdout,
        stderr,
        exit_code,
        timed_out: outcome.timed_out,
    })
}

/// A missing program and a bad working directory both surface as `NotFound`
/// from `spawn`; `which` tells them apart.
fn spawn_error(program: &str, source: std::io::Error) -> SandboxError {
    if source.kind() == std::io::ErrorKind::NotFound && which::which(program).is_err() {
        SandboxError::ProgramNotFound(program.to_string())
    } else {
        SandboxError::Spawn {
            program: program.to_string(),
            source,
        }
    }
}
