//! Global `tracing` subscriber setup.
//!
//! Logs go to stderr so stdout stays clean for results. The filter comes from
//! `BASKET_LOG` when set, otherwise from `LogConfig::level`.

use std::sync::OnceLock;

use tracing_subscriber::EnvFilter;

use crate::config::{LogConfig, LogFormat};

/// Environment variable holding an `EnvFilter` directive.
pub const LOG_ENV_VAR: &str = "BASKET_LOG";

static INITIALIZED: OnceLock<bool> = OnceLock::new();

/// Install the global subscriber. Safe to call more than once; only the first
/// call has any effect. Returns whether this process owns the subscriber
/// (false if another one was already installed, e.g. by a test harness).
pub fn init_tracing(config: &LogConfig) -> bool {
    *INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV_VAR).unwrap_or_else(|_| {
            EnvFilter::try_new(config.effective_level()).unwrap_or_else(|_| EnvFilter::new("info"))
        });

        let builder = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(true);

        let result = match config.effective_format() {
            LogFormat::Pretty => builder.pretty().try_init(),
            LogFormat::Compact => builder.compact().try_init(),
            LogFormat::Json => builder.json().try_init(),
        };
        result.is_ok()
    })
}
