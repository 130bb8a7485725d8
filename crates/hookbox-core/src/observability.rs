//! Observability: tracing init.
//!
//! Uses `config::ObservabilityConfig` for HOOKBOX_QUIET, HOOKBOX_LOG_LEVEL and
//! HOOKBOX_LOG_JSON. Logs always go to stderr: stdout belongs to the lint
//! response.

use tracing_subscriber::{prelude::*, EnvFilter};

use crate::config::ObservabilityConfig;

/// Initialize tracing. Call once at process startup; later calls are no-ops.
/// When HOOKBOX_QUIET=1, only WARN and above are logged.
pub fn init_tracing() {
    let cfg = ObservabilityConfig::from_env();
    let level = filter_directive(cfg);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

fn filter_directive(cfg: &ObservabilityConfig) -> String {
    if cfg.quiet {
        "hookbox=warn".to_string()
    } else {
        cfg.log_level.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_forces_warn() {
        let cfg = ObservabilityConfig {
            quiet: true,
            log_level: "hookbox=debug".to_string(),
            log_json: false,
        };
        assert_eq!(filter_directive(&cfg), "hookbox=warn");
    }

    #[test]
    fn test_log_level_passthrough() {
        let cfg = ObservabilityConfig {
            quiet: false,
            log_level: "hookbox_lint=trace".to_string(),
            log_json: true,
        };
        assert_eq!(filter_directive(&cfg), "hookbox_lint=trace");
    }
}
