//! `hookbox lint`: turn CLI flags (or a JSON request) into a lint run.

use std::io::Read;

use anyhow::{Context, Result};
use hookbox_core::config::RunnerConfig;
use hookbox_core::protocol::{LintRequest, LintResponse};
use hookbox_lint::{LintError, LintRunner};
use hookbox_sandbox::NativeBackend;

use crate::cli::LintArgs;

/// Exit code when the response is `ok`.
pub const EXIT_OK: i32 = 0;
/// Exit code when pre-commit ran (or could not) and reported failure.
pub const EXIT_LINT_FAILED: i32 = 1;
/// Exit code when the request itself is unusable (missing or non-directory repository).
pub const EXIT_PRECONDITION: i32 = 2;

/// Run the lint and print the response. Returns the process exit code.
pub fn cmd_lint(args: LintArgs) -> Result<i32> {
    let request = build_request(&args)?;
    let config = RunnerConfig::from_env().with_cli_overrides(args.tmp_dir.clone(), args.timeout);

    let span = tracing::info_span!("lint", repo = %request.repo_path);
    let runner = LintRunner::new(NativeBackend::new(span.clone()), config, span);

    let response = match runner.run(&request) {
        Ok(resp) => resp,
        Err(e @ (LintError::RepoNotFound(_) | LintError::NotADirectory(_))) => {
            eprintln!("Error: {}", e);
            return Ok(EXIT_PRECONDITION);
        }
        Err(e) => return Err(e).context("lint run failed"),
    };

    println!("{}", render(&response, args.pretty)?);
    Ok(exit_code_for(&response))
}

pub fn exit_code_for(response: &LintResponse) -> i32 {
    if response.ok {
        EXIT_OK
    } else {
        EXIT_LINT_FAILED
    }
}

fn render(response: &LintResponse, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(response)?
    } else {
        serde_json::to_string(response)?
    };
    Ok(text)
}

/// The request from `--request`, or assembled from individual flags.
pub fn build_request(args: &LintArgs) -> Result<LintRequest> {
    if let Some(source) = &args.request {
        let text = read_source(source)?;
        return serde_json::from_str(&text).with_context(|| format!("Invalid lint request JSON in {}", source));
    }

    let repo_path = args
        .repo_path
        .clone()
        .context("REPO_PATH is required without --request")?;
    let mut request = LintRequest::new(repo_path);
    if let Some(path) = &args.config_file {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        request.config_yaml = Some(text);
    }
    request.all_files = !args.no_all_files;
    request.show_diff = !args.no_show_diff;
    request.files_to_check = (!args.files.is_empty()).then(|| args.files.clone());
    request.select_hooks = (!args.hooks.is_empty()).then(|| args.hooks.clone());
    request.relative_virtualenv_path = args.venv.clone();
    Ok(request)
}

fn read_source(source: &str) -> Result<String> {
    if source == "-" {
        let mut s = String::new();
        std::io::stdin()
            .read_to_string(&mut s)
            .context("Failed to read request from stdin")?;
        Ok(s)
    } else {
        std::fs::read_to_string(source).with_context(|| format!("Failed to read request file {}", source))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use hookbox_core::protocol::LintSummary;

    fn lint_args(argv: &[&str]) -> LintArgs {
        let full: Vec<&str> = ["hookbox", "lint"].iter().chain(argv).copied().collect();
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Lint(args) => args,
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_defaults_match_request_defaults() {
        let req = build_request(&lint_args(&["/repo"])).unwrap();
        assert_eq!(req, LintRequest::new("/repo"));
    }

    #[test]
    fn test_flags_map_onto_request() {
        let req = build_request(&lint_args(&[
            "/repo", "--files", "a.py", "--hook", "ruff", "--hook", "black", "--no-all-files",
            "--venv", ".venv",
        ]))
        .unwrap();
        assert_eq!(req.files_to_check, Some(vec!["a.py".to_string()]));
        assert_eq!(
            req.select_hooks,
            Some(vec!["ruff".to_string(), "black".to_string()])
        );
        assert!(!req.all_files);
        assert!(req.show_diff);
        assert_eq!(req.relative_virtualenv_path.as_deref(), Some(".venv"));
    }

    #[test]
    fn test_config_file_becomes_override_text() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = dir.path().join("cfg.yaml");
        std::fs::write(&cfg, "repos: []\n").unwrap();
        let req = build_request(&lint_args(&["/repo", "--config-file", cfg.to_str().unwrap()])).unwrap();
        assert_eq!(req.config_yaml.as_deref(), Some("repos: []\n"));
    }

    #[test]
    fn test_request_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("req.json");
        std::fs::write(&file, r#"{"repo_path": "/r", "show_diff": false}"#).unwrap();
        let req = build_request(&lint_args(&["--request", file.to_str().unwrap()])).unwrap();
        assert_eq!(req.repo_path, "/r");
        assert!(!req.show_diff);
        assert!(req.all_files);
    }

    #[test]
    fn test_bad_request_json_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("req.json");
        std::fs::write(&file, "{}").unwrap();
        assert!(build_request(&lint_args(&["--request", file.to_str().unwrap()])).is_err());
    }

    #[test]
    fn test_missing_repo_exits_with_precondition_code() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope");
        let code = cmd_lint(lint_args(&[missing.to_str().unwrap()])).unwrap();
        assert_eq!(code, EXIT_PRECONDITION);
    }

    #[test]
    fn test_exit_code_follows_ok() {
        let ok = LintResponse::new(0, LintSummary::default(), String::new(), String::new());
        let failed = LintResponse::new(2, LintSummary::default(), String::new(), String::new());
        assert_eq!(exit_code_for(&ok), EXIT_OK);
        assert_eq!(exit_code_for(&failed), EXIT_LINT_FAILED);
    }

    #[test]
    fn test_file_repo_path_exits_with_precondition_code() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("a.py");
        std::fs::write(&file, "x=1\n").unwrap();
        let code = cmd_lint(lint_args(&[file.to_str().unwrap()])).unwrap();
        assert_eq!(code, EXIT_PRECONDITION);
    }
}
