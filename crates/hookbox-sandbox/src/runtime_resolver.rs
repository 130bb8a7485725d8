//! Interpreter substitution: run pre-commit through a virtualenv's Python.
//!
//! With a virtualenv configured, `pre-commit` runs as `<venv python> -m
//! pre_commit` rather than whatever is first on `PATH`.

use crate::runner::RuntimePaths;

/// Bare console-script name of the lint-hook framework.
pub const TOOL_COMMAND: &str = "pre-commit";
/// Module name used with `python -m`.
pub const TOOL_MODULE: &str = "pre_commit";

const PYTHON: &str = "python";
const MODULE_FLAG: &str = "-m";

impl RuntimePaths {
    /// Rewrite `argv` to target the virtualenv interpreter, if one was found.
    ///
    /// - `pre-commit ARGS` → `<venv python> -m pre_commit ARGS`
    /// - `python -m pre_commit ARGS` → `<venv python> -m pre_commit ARGS`
    /// - `python -m MODULE ARGS` → `<venv python> -m MODULE ARGS`
    ///
    /// Anything else (e.g. `git ...`) is returned unchanged.
    pub fn resolve_argv(&self, argv: &[String]) -> Vec<String> {
        let Some(python) = self.python.as_ref() else {
            return argv.to_vec();
        };
        let python = python.to_string_lossy().into_owned();
        let head: Vec<&str> = argv.iter().take(3).map(String::as_str).collect();

        match head.as_slice() {
            [TOOL_COMMAND, ..] => [python, MODULE_FLAG.to_string(), TOOL_MODULE.to_string()]
                .into_iter()
                .chain(argv[1..].iter().cloned())
                .collect(),
            [PYTHON, MODULE_FLAG, TOOL_MODULE] => [python, MODULE_FLAG.to_string(), TOOL_MODULE.to_string()]
                .into_iter()
                .chain(argv[3..].iter().cloned())
                .collect(),
            [PYTHON, MODULE_FLAG, ..] => std::iter::once(python)
                .chain(argv[1..].iter().cloned())
                .collect(),
            _ => argv.to_vec(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn venv() -> RuntimePaths {
        RuntimePaths {
            python: Some(PathBuf::from("/w/.venv/bin/python")),
            env_dir: PathBuf::from("/w/.venv"),
        }
    }

    fn argv(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_bare_tool_command() {
        assert_eq!(
            venv().resolve_argv(&argv(&["pre-commit", "run", "--all-files"])),
            argv(&["/w/.venv/bin/python", "-m", "pre_commit", "run", "--all-files"])
        );
    }

    #[test]
    fn test_module_qualified_tool() {
        assert_eq!(
            venv().resolve_argv(&argv(&["python", "-m", "pre_commit", "run"])),
            argv(&["/w/.venv/bin/python", "-m", "pre_commit", "run"])
        );
    }

    #[test]
    fn test_generic_python_module() {
        assert_eq!(
            venv().resolve_argv(&argv(&["python", "-m", "pip", "list"])),
            argv(&["/w/.venv/bin/python", "-m", "pip", "list"])
        );
    }

    #[test]
    fn test_other_commands_untouched() {
        let git = argv(&["git", "commit", "--allow-empty", "-m", "init"]);
        assert_eq!(venv().resolve_argv(&git), git);
        let python_script = argv(&["python", "script.py"]);
        assert_eq!(venv().resolve_argv(&python_script), python_script);
        assert_eq!(venv().resolve_argv(&[]), Vec::<String>::new());
    }

    #[test]
    fn test_system_runtime_never_rewrites() {
        let cmd = argv(&["pre-commit", "run"]);
        assert_eq!(RuntimePaths::system().resolve_argv(&cmd), cmd);
    }
}
