//! taskwatch
//!
//! Instrumentation for asynchronous work inside a long-running service
//! process: named, timed, hierarchical scopes with success/failure tracking,
//! and safe, cancellable one-shot and repeating timers that drive periodic
//! snapshot reporting.
//!
//! # Components
//!
//! - [`StopWatch`]: freeze-once elapsed-time primitive
//! - [`TimerScheduler`]: named, cancellable one-shot and interval callbacks.
//!   Callback errors and panics are contained and logged, never fatal, and
//!   interval firings never overlap.
//! - [`ProcessingTracker`]: wraps units of async work in named, timed,
//!   nestable scopes; accumulates per-path invocation history; supports
//!   extraction, snapshot listeners, and periodic debug output.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use taskwatch::{ProcessingTracker, TimerScheduler};
//!
//! # async fn demo() -> Result<(), std::io::Error> {
//! let scheduler = Arc::new(TimerScheduler::new());
//! let tracker = ProcessingTracker::new(scheduler);
//!
//! let answer = tracker
//!     .scope("fetch", |scope| async move {
//!         scope
//!             .scope("parse", |_| async { Ok::<_, std::io::Error>(42) })
//!             .await
//!     })
//!     .await?;
//! assert_eq!(answer, 42);
//!
//! let info = tracker.task_info("fetch/parse").expect("recorded");
//! assert!(!info.failed);
//! tracker.close();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod scheduler;
pub mod stopwatch;
pub mod telemetry;
pub mod tracker;

pub use scheduler::{BoxError, TimerHandle, TimerKind, TimerScheduler};
pub use stopwatch::StopWatch;
pub use tracker::{
    ProcessingTracker, TaskInfo, TaskPath, TaskRun, TaskSnapshot, TrackerError, TrackerScope,
};
