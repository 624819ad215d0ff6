//! Elapsed-time measurement for scope timing.

use std::time::{Duration, Instant};

/// Measures elapsed time from creation until stopped.
///
/// The watch starts at construction. The first `stop()` freezes the elapsed
/// duration; after that neither `stop()` nor `duration()` ever changes.
#[derive(Debug, Clone)]
pub struct StopWatch {
    start: Instant,
    frozen: Option<Duration>,
}

impl StopWatch {
    /// Start measuring immediately.
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
            frozen: None,
        }
    }

    /// Stop the watch and return the elapsed time.
    ///
    /// Repeated calls return the value frozen by the first call.
    pub fn stop(&mut self) -> Duration {
        match self.frozen {
            Some(frozen) => frozen,
            None => {
                let elapsed = self.start.elapsed();
                self.frozen = Some(elapsed);
                elapsed
            }
        }
    }

    /// Elapsed time: live while running, frozen after `stop()`.
    pub fn duration(&self) -> Duration {
        self.frozen.unwrap_or_else(|| self.start.elapsed())
    }

    /// Whether the watch has not been stopped yet.
    pub fn is_running(&self) -> bool {
        self.frozen.is_none()
    }
}

impl Default for StopWatch {
    fn default() -> Self {
        Self::new()
    }
}
