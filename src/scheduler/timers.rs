//! The scheduler: one-shot and non-overlapping interval execution.

use std::collections::HashMap;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use futures::FutureExt;
use parking_lot::Mutex;

use crate::telemetry;

use super::handle::{TimerHandle, TimerKind, TimerRegistry, TimerState};

const TARGET: &str = "taskwatch::scheduler";

/// Boxed error type produced by timer callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Type-erased callback stored per timer so intervals can re-invoke it.
type TimerCallback = Arc<dyn Fn() -> BoxFuture<'static, Result<(), BoxError>> + Send + Sync>;

/// Named, cancellable deferred and repeating callback execution.
///
/// Each instance owns its timers in a private registry; multiple independent
/// schedulers may coexist (one per tracker, one per process-level owner).
/// Callback errors and panics are logged and counted, never propagated:
/// the only way a caller observes a failure is through effects the callback
/// itself produces.
pub struct TimerScheduler {
    timers: TimerRegistry,
}

impl TimerScheduler {
    pub fn new() -> Self {
        Self {
            timers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Schedule `callback` to run once after `delay`.
    ///
    /// The registry entry is removed before the callback is invoked, so a
    /// handle whose callback is in flight is already inactive. `close()` on
    /// the returned handle cancels the firing if it has not happened yet.
    pub fn timer<F, Fut>(&self, name: &str, delay: Duration, callback: F) -> TimerHandle
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let state = self.register(name, TimerKind::OneShot);
        tracing::info!(
            target: TARGET,
            name,
            id = %state.id,
            delay_ms = delay.as_millis() as u64,
            "timer scheduled"
        );

        let callback = box_callback(callback);
        let timers = Arc::clone(&self.timers);
        let task_state = Arc::clone(&state);
        tokio::spawn(async move {
            tokio::select! {
                biased;
                () = task_state.cancel.cancelled() => return,
                () = tokio::time::sleep(delay) => {}
            }
            // Remove-then-invoke: the entry is gone before the callback runs.
            timers.lock().remove(&task_state.id);
            if !task_state.is_enabled() {
                return;
            }
            run_callback(&task_state.name, &callback).await;
        });

        TimerHandle::new(state, Arc::clone(&self.timers))
    }

    /// Schedule `callback` to run repeatedly, `period` after each completion.
    ///
    /// Non-overlapping by construction: the next sleep starts only once the
    /// previous invocation, including its async tail, has fully completed.
    /// Slow callbacks therefore cannot pile up. The enabled flag is checked
    /// both before sleeping and before executing, so `close()` stops any
    /// further firing even while a callback is mid-flight.
    pub fn interval<F, Fut>(&self, name: &str, period: Duration, callback: F) -> TimerHandle
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
    {
        let state = self.register(name, TimerKind::Interval);
        tracing::info!(
            target: TARGET,
            name,
            id = %state.id,
            period_ms = period.as_millis() as u64,
            "interval scheduled"
        );

        let callback = box_callback(callback);
        let task_state = Arc::clone(&state);
        tokio::spawn(async move {
            loop {
                if !task_state.is_enabled() {
                    return;
                }
                tokio::select! {
                    biased;
                    () = task_state.cancel.cancelled() => return,
                    () = tokio::time::sleep(period) => {}
                }
                if !task_state.is_enabled() {
                    return;
                }
                run_callback(&task_state.name, &callback).await;
            }
        });

        TimerHandle::new(state, Arc::clone(&self.timers))
    }

    /// Number of timers currently registered.
    pub fn active_count(&self) -> usize {
        self.timers.lock().len()
    }

    /// Cancel every outstanding one-shot and interval. Idempotent.
    pub fn close(&self) {
        let entries: Vec<Arc<TimerState>> = {
            let mut timers = self.timers.lock();
            timers.drain().map(|(_, state)| state).collect()
        };
        if entries.is_empty() {
            return;
        }
        tracing::info!(target: TARGET, count = entries.len(), "scheduler closed");
        for state in entries {
            state.disable();
        }
    }

    fn register(&self, name: &str, kind: TimerKind) -> Arc<TimerState> {
        let state = Arc::new(TimerState::new(name, kind));
        self.timers.lock().insert(state.id, Arc::clone(&state));
        state
    }
}

impl Default for TimerScheduler {
    fn default() -> Self {
        Self::new()
    }
}

fn box_callback<F, Fut>(callback: F) -> TimerCallback
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), BoxError>> + Send + 'static,
{
    Arc::new(move || callback().boxed())
}

/// Invoke one callback, containing both `Err` results and panics.
async fn run_callback(name: &str, callback: &TimerCallback) {
    let invocation = AssertUnwindSafe(async { callback().await }).catch_unwind();
    match invocation.await {
        Ok(Ok(())) => {
            telemetry::record_timer_fire(name);
        }
        Ok(Err(error)) => {
            telemetry::record_timer_failure(name);
            tracing::error!(target: TARGET, name, error = %error, "timer callback failed");
        }
        Err(_) => {
            telemetry::record_timer_failure(name);
            tracing::error!(target: TARGET, name, "timer callback panicked");
        }
    }
}
