//! Named, cancellable timer scheduling.
//!
//! Owns all deferred and repeating callback execution for its owner.
//! Callback failures are caught and logged rather than escaping to crash the
//! process, and every scheduled unit can be cancelled safely regardless of
//! its current lifecycle phase.

mod handle;
mod timers;

pub use handle::{TimerHandle, TimerKind};
pub use timers::{BoxError, TimerScheduler};
