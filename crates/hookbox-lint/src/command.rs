//! pre-commit argv construction.

use std::path::Path;

use hookbox_core::protocol::LintRequest;
use hookbox_sandbox::runtime_resolver::TOOL_COMMAND;

pub const SHOW_DIFF_FLAG: &str = "--show-diff-on-failure";
pub const ALL_FILES_FLAG: &str = "--all-files";
pub const FILES_FLAG: &str = "--files";

/// Build `pre-commit run --config <cfg> ...` for `req`.
///
/// Only a single selected hook narrows the run; with several selected, all
/// hooks run (the runner logs the ignored selection). A non-empty file list
/// always replaces `--all-files`.
pub fn build_command(cfg_path: &Path, req: &LintRequest) -> Vec<String> {
    let mut cmd = vec![
        TOOL_COMMAND.to_string(),
        "run".to_string(),
        "--config".to_string(),
        cfg_path.to_string_lossy().into_owned(),
    ];
    if req.show_diff {
        cmd.push(SHOW_DIFF_FLAG.to_string());
    }
    if let Some(hook) = req.single_hook() {
        cmd.push(hook.to_string());
    }
    match req.explicit_files() {
        Some(files) => {
            cmd.push(FILES_FLAG.to_string());
            cmd.extend(files.iter().cloned());
        }
        None if req.all_files => cmd.push(ALL_FILES_FLAG.to_string()),
        None => {}
    }
    cmd
}
