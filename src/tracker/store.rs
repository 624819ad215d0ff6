//! Path-keyed aggregate history of completed scope results.

use std::collections::HashMap;
use std::time::Duration;

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::path::TaskPath;
use super::record::TaskRun;

/// Most recent completion for one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskInfo {
    pub failed: bool,
    pub duration: Duration,
}

/// Extraction element: one path with its full invocation history,
/// in completion order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSnapshot {
    pub name: String,
    pub results: Vec<TaskRun>,
}

/// Errors surfaced by tracker lookups.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// No invocation under the given path has completed yet.
    #[error("no completed task under path: {path}")]
    TaskNotFound { path: String },
}

/// Append-only, path-keyed store of completed invocation results.
///
/// History accumulates for the lifetime of the tracker; closing the tracker
/// stops periodic emission but never clears the store.
#[derive(Debug, Default)]
pub(super) struct AggregateStore {
    tasks: Mutex<HashMap<TaskPath, Vec<TaskRun>>>,
}

impl AggregateStore {
    pub(super) fn new() -> Self {
        Self::default()
    }

    /// Append one completed run under its path.
    pub(super) fn append(&self, path: TaskPath, run: TaskRun) {
        self.tasks.lock().entry(path).or_default().push(run);
    }

    /// Most recent run for the `/`-joined path.
    pub(super) fn task_info(&self, path: &str) -> Result<TaskInfo, TrackerError> {
        let key = TaskPath::from_joined(path);
        self.tasks
            .lock()
            .get(&key)
            .and_then(|runs| runs.last())
            .map(|run| TaskInfo {
                failed: run.failed,
                duration: run.duration,
            })
            .ok_or_else(|| TrackerError::TaskNotFound {
                path: path.to_string(),
            })
    }

    /// Point-in-time snapshot of the full history, ordered by name.
    pub(super) fn extract(&self) -> Vec<TaskSnapshot> {
        let tasks = self.tasks.lock();
        let mut snapshots: Vec<TaskSnapshot> = tasks
            .iter()
            .map(|(path, runs)| TaskSnapshot {
                name: path.joined(),
                results: runs.clone(),
            })
            .collect();
        drop(tasks);
        snapshots.sort_by(|a, b| a.name.cmp(&b.name));
        snapshots
    }
}
