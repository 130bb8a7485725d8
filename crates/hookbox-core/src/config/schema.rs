//! Typed configuration structs, loaded from the environment.

use super::env_keys::{observability as obv_keys, runner as runner_keys};
use super::loader::{env_bool, env_optional, env_or};
use std::path::PathBuf;
use std::time::Duration;

/// Observability: quiet, log_level, log_json
#[derive(Debug, Clone)]
pub struct ObservabilityConfig {
    pub quiet: bool,
    pub log_level: String,
    pub log_json: bool,
}

impl ObservabilityConfig {
    pub fn from_env() -> &'static Self {
        use std::sync::OnceLock;
        static CACHE: OnceLock<ObservabilityConfig> = OnceLock::new();
        CACHE.get_or_init(|| {
            super::loader::load_dotenv();
            Self {
                quiet: env_bool(obv_keys::HOOKBOX_QUIET, obv_keys::QUIET_ALIASES, false),
                log_level: env_or(
                    obv_keys::HOOKBOX_LOG_LEVEL,
                    obv_keys::LOG_LEVEL_ALIASES,
                    || "hookbox=info".to_string(),
                ),
                log_json: env_bool(obv_keys::HOOKBOX_LOG_JSON, obv_keys::LOG_JSON_ALIASES, false),
            }
        })
    }
}

/// Settings for the lint runner that are not part of an individual request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunnerConfig {
    /// Where per-request sandboxes are created. `None` means the OS temp dir.
    pub tmp_dir: Option<PathBuf>,
    /// Wall-clock limit for the pre-commit process. `None` means wait forever.
    pub timeout: Option<Duration>,
}

impl RunnerConfig {
    pub fn from_env() -> Self {
        super::loader::load_dotenv();
        let tmp_dir = env_optional(runner_keys::HOOKBOX_TMPDIR, runner_keys::TMPDIR_ALIASES)
            .map(PathBuf::from);
        let timeout = match env_optional(
            runner_keys::HOOKBOX_TIMEOUT_SECS,
            runner_keys::TIMEOUT_ALIASES,
        ) {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) => timeout_from_secs(secs),
                Err(_) => {
                    tracing::warn!(
                        value = %raw,
                        "Invalid HOOKBOX_TIMEOUT_SECS, running without a timeout"
                    );
                    None
                }
            },
            None => None,
        };
        Self { tmp_dir, timeout }
    }

    /// Override with CLI parameters
    pub fn with_cli_overrides(mut self, tmp_dir: Option<PathBuf>, timeout_secs: Option<u64>) -> Self {
        if let Some(dir) = tmp_dir {
            self.tmp_dir = Some(dir);
        }
        if let Some(secs) = timeout_secs {
            self.timeout = timeout_from_secs(secs);
        }
        self
    }
}

/// `0` disables the timeout.
fn timeout_from_secs(secs: u64) -> Option<Duration> {
    (secs > 0).then(|| Duration::from_secs(secs))
}
