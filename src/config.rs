//! Crate configuration loading from environment variables.
//!
//! All values are loaded from `TASKWATCH_*` environment variables with
//! sensible defaults. Invalid values fall back to defaults without crashing.
//!
//! # Environment Variables
//!
//! | Variable | Default | Description |
//! |---|---|---|
//! | `TASKWATCH_LOG_LEVEL` | info | Env-filter directive for logging |
//! | `TASKWATCH_LOG_FORMAT` | json | Log format: `json` or `pretty` |
//! | `TASKWATCH_DEBUG_PERIOD_MS` | 5000 | Periodic debug output period (ms) |

use std::time::Duration;

use crate::telemetry::{LogConfig, LogFormat};

/// Default period for the tracker's periodic debug output.
pub const DEFAULT_DEBUG_OUTPUT_PERIOD: Duration = Duration::from_millis(5000);

/// Floor for the periodic debug output period.
const MIN_DEBUG_PERIOD_MS: u64 = 10;

/// All crate configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvConfig {
    pub log: LogConfig,
    pub debug_output_period: Duration,
}

/// Parse a `u64` env var, returning `default` on missing or invalid.
fn parse_u64(key: &str, default: u64) -> u64 {
    match std::env::var(key) {
        Ok(val) => val.parse::<u64>().unwrap_or(default),
        Err(_) => default,
    }
}

/// Load logging configuration from environment.
fn load_log_config() -> LogConfig {
    let level = std::env::var("TASKWATCH_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    let format = match std::env::var("TASKWATCH_LOG_FORMAT").as_deref() {
        Ok("pretty") => LogFormat::Pretty,
        _ => LogFormat::Json,
    };
    LogConfig {
        format,
        level,
        output_path: None,
    }
}

/// Load all configuration from environment variables.
///
/// Missing or invalid values fall back to safe defaults without panicking.
pub fn load() -> EnvConfig {
    let period_ms = parse_u64(
        "TASKWATCH_DEBUG_PERIOD_MS",
        DEFAULT_DEBUG_OUTPUT_PERIOD.as_millis() as u64,
    );
    let period_ms = period_ms.max(MIN_DEBUG_PERIOD_MS);

    EnvConfig {
        log: load_log_config(),
        debug_output_period: Duration::from_millis(period_ms),
    }
}
