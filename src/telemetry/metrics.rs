//! Counters recorded through the `metrics` facade.

use metrics::{counter, gauge};

/// Record one completed scope invocation.
pub fn record_scope_completion(task: &str, failed: bool) {
    counter!(
        "taskwatch_scope_completed_total",
        "task" => task.to_string(),
        "failed" => if failed { "true" } else { "false" }
    )
    .increment(1);
}

/// Record one successful timer callback firing.
pub fn record_timer_fire(name: &str) {
    counter!("taskwatch_timer_fired_total", "timer" => name.to_string()).increment(1);
}

/// Record one failed (errored or panicked) timer callback.
pub fn record_timer_failure(name: &str) {
    counter!("taskwatch_timer_failed_total", "timer" => name.to_string()).increment(1);
}

/// Record one periodic snapshot emission and the number of tracked paths.
pub fn record_snapshot_emission(task_count: usize) {
    counter!("taskwatch_snapshot_emitted_total").increment(1);
    gauge!("taskwatch_tracked_tasks").set(task_count as f64);
}
