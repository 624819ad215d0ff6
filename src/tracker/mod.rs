//! Hierarchical processing tracking.
//!
//! Wraps units of asynchronous work in named, timed scopes, accumulates
//! completed results per hierarchical path, and periodically reports the
//! aggregate state through the timer scheduler.

mod path;
mod processing;
mod record;
mod store;

pub use path::{TaskPath, PATH_SEPARATOR};
pub use processing::{ProcessingTracker, SnapshotListener, TrackerScope};
pub use record::TaskRun;
pub use store::{TaskInfo, TaskSnapshot, TrackerError};
