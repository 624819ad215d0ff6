//! Scope instrumentation, aggregation, and periodic reporting.

use std::future::Future;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use crate::scheduler::{TimerHandle, TimerScheduler};
use crate::telemetry;

use super::path::TaskPath;
use super::record::ScopeRecord;
use super::store::{AggregateStore, TaskInfo, TaskSnapshot, TrackerError};

const TARGET: &str = "taskwatch::tracker";

/// Name under which the periodic debug output job is scheduled.
const DEBUG_OUTPUT_TIMER: &str = "tracker-debug-output";

/// Listener invoked with each periodic snapshot.
pub type SnapshotListener = Arc<dyn Fn(&[TaskSnapshot]) + Send + Sync>;

/// State shared between the tracker and the scopes it hands out.
struct TrackerShared {
    store: AggregateStore,
    listeners: Mutex<Vec<SnapshotListener>>,
}

impl TrackerShared {
    /// Periodic job body: render, extract, fan out to listeners.
    fn report(&self) {
        self.debug_output();

        let snapshot = self.store.extract();
        telemetry::record_snapshot_emission(snapshot.len());

        let listeners: Vec<SnapshotListener> = self.listeners.lock().clone();
        for listener in listeners {
            // One listener must not starve the rest.
            if catch_unwind(AssertUnwindSafe(|| listener(&snapshot))).is_err() {
                tracing::warn!(target: TARGET, "snapshot listener panicked");
            }
        }
    }

    /// Render the current aggregate state to the log.
    fn debug_output(&self) {
        let snapshots = self.store.extract();
        if snapshots.is_empty() {
            tracing::info!(target: TARGET, "no completed tasks");
            return;
        }
        for snapshot in &snapshots {
            let failures = snapshot.results.iter().filter(|run| run.failed).count();
            if let Some(last) = snapshot.results.last() {
                tracing::info!(
                    target: TARGET,
                    task = %snapshot.name,
                    runs = snapshot.results.len(),
                    failures,
                    last_ms = last.duration.as_millis() as u64,
                    last_failed = last.failed,
                    "task status"
                );
            }
        }
    }
}

/// Tracks named, timed, hierarchical units of asynchronous work.
///
/// A scope wraps a work future; on completion the scope's duration and
/// failure flag are filed under its hierarchical path, success or not.
/// Results accumulate per path across repeated and concurrent invocations
/// and can be read back with [`ProcessingTracker::task_info`] and
/// [`ProcessingTracker::extract`], or pushed to listeners by the periodic
/// debug output job.
pub struct ProcessingTracker {
    shared: Arc<TrackerShared>,
    scheduler: Arc<TimerScheduler>,
    periodic: Mutex<Option<TimerHandle>>,
}

impl ProcessingTracker {
    pub fn new(scheduler: Arc<TimerScheduler>) -> Self {
        Self {
            shared: Arc::new(TrackerShared {
                store: AggregateStore::new(),
                listeners: Mutex::new(Vec::new()),
            }),
            scheduler,
            periodic: Mutex::new(None),
        }
    }

    /// Run `work` inside a new top-level scope named `name`.
    ///
    /// The work function receives a [`TrackerScope`] bound to the new path
    /// and may open nested scopes through it. Bookkeeping always completes:
    /// on failure the duration and failed flag are recorded before the
    /// original error is returned to the caller.
    pub async fn scope<T, E, F, Fut>(&self, name: &str, work: F) -> Result<T, E>
    where
        F: FnOnce(TrackerScope) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        run_scope(&self.shared, TaskPath::root().child(name), work).await
    }

    /// Most recent completion for a `/`-joined path.
    pub fn task_info(&self, path: &str) -> Result<TaskInfo, TrackerError> {
        self.shared.store.task_info(path)
    }

    /// Point-in-time snapshot of all accumulated task histories.
    pub fn extract(&self) -> Vec<TaskSnapshot> {
        self.shared.store.extract()
    }

    /// Subscribe to the snapshots emitted by the periodic debug output job.
    ///
    /// Every registered listener is invoked on each firing; listeners are
    /// isolated from each other's panics.
    pub fn register_listener<F>(&self, listener: F)
    where
        F: Fn(&[TaskSnapshot]) + Send + Sync + 'static,
    {
        self.shared.listeners.lock().push(Arc::new(listener));
    }

    /// Start the periodic debug output job.
    ///
    /// If a job is already active it is replaced, so re-enabling is
    /// idempotent in effect and may change the period. The configured
    /// default period is available from [`crate::config::load`].
    pub fn enable_periodic_debug_output(&self, period: Duration) {
        let mut slot = self.periodic.lock();
        if let Some(previous) = slot.take() {
            previous.close();
        }
        let shared = Arc::clone(&self.shared);
        *slot = Some(self.scheduler.interval(DEBUG_OUTPUT_TIMER, period, move || {
            let shared = Arc::clone(&shared);
            async move {
                shared.report();
                Ok(())
            }
        }));
    }

    /// Stop the periodic debug output job if active. Idempotent.
    pub fn disable_periodic_debug_output(&self) {
        if let Some(handle) = self.periodic.lock().take() {
            handle.close();
        }
    }

    /// Render the current aggregate state to the log.
    ///
    /// Read-only; stored data is unaffected.
    pub fn debug_output(&self) {
        self.shared.debug_output();
    }

    /// Disable periodic output and release the scheduler's timers.
    ///
    /// Idempotent. Accumulated history stays readable; no further scopes
    /// should be opened after close.
    pub fn close(&self) {
        self.disable_periodic_debug_output();
        self.scheduler.close();
    }
}

/// Child handle bound to a path, passed to work functions so they can open
/// nested scopes.
#[derive(Clone)]
pub struct TrackerScope {
    shared: Arc<TrackerShared>,
    path: TaskPath,
}

impl TrackerScope {
    /// Run `work` inside a nested scope under this scope's path.
    pub async fn scope<T, E, F, Fut>(&self, name: &str, work: F) -> Result<T, E>
    where
        F: FnOnce(TrackerScope) -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        run_scope(&self.shared, self.path.child(name), work).await
    }

    /// The `/`-joined path this scope is bound to.
    pub fn path(&self) -> String {
        self.path.joined()
    }
}

async fn run_scope<T, E, F, Fut>(
    shared: &Arc<TrackerShared>,
    path: TaskPath,
    work: F,
) -> Result<T, E>
where
    F: FnOnce(TrackerScope) -> Fut,
    Fut: Future<Output = Result<T, E>>,
{
    let record = ScopeRecord::open(path.clone());
    let child = TrackerScope {
        shared: Arc::clone(shared),
        path,
    };

    let result = work(child).await;

    let failed = result.is_err();
    let (path, run) = record.close(failed);
    tracing::debug!(
        target: TARGET,
        task = %path,
        duration_ms = run.duration.as_millis() as u64,
        failed,
        "scope closed"
    );
    telemetry::record_scope_completion(&path.joined(), failed);
    shared.store.append(path, run);

    result
}
