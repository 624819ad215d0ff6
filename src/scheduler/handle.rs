//! Timer handles and shared per-timer state.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

const TARGET: &str = "taskwatch::scheduler";

/// Timer flavor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerKind {
    /// Fires once, then the registry entry is gone.
    OneShot,
    /// Fires repeatedly until closed; firings never overlap.
    Interval,
}

/// Registry of live timers, shared between a scheduler and its handles.
pub(super) type TimerRegistry = Arc<Mutex<HashMap<Uuid, Arc<TimerState>>>>;

/// State shared between a registry entry, its spawned task, and its handle.
#[derive(Debug)]
pub(super) struct TimerState {
    pub(super) id: Uuid,
    pub(super) name: String,
    pub(super) kind: TimerKind,
    enabled: AtomicBool,
    pub(super) cancel: CancellationToken,
}

impl TimerState {
    pub(super) fn new(name: &str, kind: TimerKind) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            kind,
            enabled: AtomicBool::new(true),
            cancel: CancellationToken::new(),
        }
    }

    /// Whether firing and rescheduling are still permitted.
    pub(super) fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Acquire)
    }

    /// Disable the timer and cancel its pending sleep. Idempotent.
    ///
    /// Cannot interrupt a callback already in progress; the spawned task
    /// re-checks the flag before the next scheduling step.
    pub(super) fn disable(&self) {
        self.enabled.store(false, Ordering::Release);
        self.cancel.cancel();
    }
}

/// Cancellation handle for a scheduled timer or interval.
///
/// Dropping the handle does not cancel the timer; call [`TimerHandle::close`].
pub struct TimerHandle {
    state: Arc<TimerState>,
    registry: TimerRegistry,
}

impl TimerHandle {
    pub(super) fn new(state: Arc<TimerState>, registry: TimerRegistry) -> Self {
        Self { state, registry }
    }

    /// Generated identifier of the underlying timer.
    pub fn id(&self) -> Uuid {
        self.state.id
    }

    /// Human-readable name given at scheduling time.
    pub fn name(&self) -> &str {
        &self.state.name
    }

    /// One-shot or interval.
    pub fn kind(&self) -> TimerKind {
        self.state.kind
    }

    /// Whether the timer is still registered and enabled.
    ///
    /// A one-shot whose callback is currently running is already inactive:
    /// its registry entry is removed before the callback is invoked.
    pub fn is_active(&self) -> bool {
        self.state.is_enabled() && self.registry.lock().contains_key(&self.state.id)
    }

    /// Cancel the pending firing and deregister the timer.
    ///
    /// Safe to call multiple times and after a one-shot has fired naturally.
    pub fn close(&self) {
        tracing::info!(
            target: TARGET,
            name = %self.state.name,
            id = %self.state.id,
            "timer handle closed"
        );
        self.registry.lock().remove(&self.state.id);
        self.state.disable();
    }
}

impl std::fmt::Debug for TimerHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerHandle")
            .field("id", &self.state.id)
            .field("name", &self.state.name)
            .field("kind", &self.state.kind)
            .field("active", &self.is_active())
            .finish()
    }
}
