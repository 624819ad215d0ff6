//! Telemetry: structured logging setup and metrics facade helpers.
//!
//! Logging goes through the `tracing` facade with per-component targets;
//! hosts that want the crate to install a subscriber use [`init_logging`].
//! Counters go through the `metrics` facade and are no-ops until the host
//! installs a recorder.

mod logging;
mod metrics;

pub use logging::{init_logging, LogConfig, LogError, LogFormat};
pub use metrics::{
    record_scope_completion, record_snapshot_emission, record_timer_failure, record_timer_fire,
};
