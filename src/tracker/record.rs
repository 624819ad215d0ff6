//! Per-invocation scope records and their results.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::stopwatch::StopWatch;

use super::path::TaskPath;

/// Result of one completed scope invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskRun {
    pub duration: Duration,
    pub failed: bool,
}

/// One open scope: a named, timed unit of work.
///
/// Records are transient. A record is closed exactly once; its result is
/// appended to the aggregate store and the record itself is discarded.
#[derive(Debug)]
pub(super) struct ScopeRecord {
    path: TaskPath,
    watch: StopWatch,
}

impl ScopeRecord {
    /// Open a record and start its stopwatch.
    pub(super) fn open(path: TaskPath) -> Self {
        Self {
            path,
            watch: StopWatch::new(),
        }
    }

    /// Close the record, freezing its duration.
    ///
    /// Consumes the record so it cannot be closed twice.
    pub(super) fn close(mut self, failed: bool) -> (TaskPath, TaskRun) {
        let duration = self.watch.stop();
        (self.path, TaskRun { duration, failed })
    }
}
