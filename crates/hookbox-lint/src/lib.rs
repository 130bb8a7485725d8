//! Run pre-commit against a snapshot of a repository without touching it.
//!
//! - `git`: make the working copy a committed git repository
//! - `hook_config`: pick the hook configuration (override or on-disk)
//! - `command`: build the pre-commit argv
//! - `parse`: structured payload first, text summary as fallback
//! - `runner`: the orchestrator tying it together

pub mod command;
pub mod error;
pub mod git;
pub mod hook_config;
pub mod parse;
pub mod runner;

pub use error::LintError;
pub use runner::LintRunner;
