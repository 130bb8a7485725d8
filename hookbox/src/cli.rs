use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// hookbox - run pre-commit hooks on a throwaway copy of a repository
#[derive(Parser, Debug)]
#[command(name = "hookbox")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Lint a local repository and print the JSON response
    Lint(LintArgs),

    /// Print example lint requests (JSON) accepted by `lint --request`
    Schema,
}

#[derive(Args, Debug)]
pub struct LintArgs {
    /// Path to the local repository (`~` is expanded)
    #[arg(value_name = "REPO_PATH", required_unless_present = "request")]
    pub repo_path: Option<String>,

    /// Read the whole request as JSON from FILE, or stdin with "-"
    #[arg(long, value_name = "FILE", conflicts_with_all = [
        "repo_path", "config_file", "files", "hooks", "no_all_files", "no_show_diff", "venv",
    ])]
    pub request: Option<String>,

    /// Use this pre-commit config instead of the repository's own
    #[arg(long, value_name = "FILE")]
    pub config_file: Option<PathBuf>,

    /// Check only these files (replaces --all-files)
    #[arg(long, value_name = "FILE", num_args = 1..)]
    pub files: Vec<String>,

    /// Hook id to run; repeatable, but pre-commit narrows only to a single hook
    #[arg(long = "hook", value_name = "ID")]
    pub hooks: Vec<String>,

    /// Do not pass --all-files when no file list is given
    #[arg(long, default_value = "false")]
    pub no_all_files: bool,

    /// Do not ask pre-commit for a diff on failure
    #[arg(long, default_value = "false")]
    pub no_show_diff: bool,

    /// Virtualenv directory relative to the repository root
    #[arg(long, value_name = "REL")]
    pub venv: Option<String>,

    /// Kill pre-commit after SECS seconds, 0 for no limit (default: from env or none)
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Create sandboxes under DIR (default: from env or the OS temp dir)
    #[arg(long, value_name = "DIR")]
    pub tmp_dir: Option<PathBuf>,

    /// Pretty-print the JSON response
    #[arg(long, default_value = "false")]
    pub pretty: bool,
}
