//! Progress reporting
//!
//! The pipeline reports progress through a [`ProgressSink`]. Sinks are
//! infallible; progress must never abort an export.

use tracing::info;

/// Receives progress updates from an export run
pub trait ProgressSink {
    /// Resets the progress to zero of `total` steps
    fn reset(&mut self, total: usize);

    /// Changes the number of steps without resetting the progress
    fn set_total(&mut self, total: usize);

    /// Advances the progress by one step
    fn advance(&mut self);

    /// Reports the name of the item currently being processed
    fn set_status(&mut self, status: &str);
}

/// Discards all progress updates
#[derive(Debug, Default)]
pub struct NullProgress;

impl ProgressSink for NullProgress {
    fn reset(&mut self, _total: usize) {}
    fn set_total(&mut self, _total: usize) {}
    fn advance(&mut self) {}
    fn set_status(&mut self, _status: &str) {}
}

/// Logs progress through the tracing subscriber
#[derive(Debug, Default)]
pub struct LogProgress {
    total: usize,
    done: usize,
}

impl LogProgress {
    /// Creates a sink that logs each processed item
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProgressSink for LogProgress {
    fn reset(&mut self, total: usize) {
        self.total = total;
        self.done = 0;
    }

    fn set_total(&mut self, total: usize) {
        self.total = total;
    }

    fn advance(&mut self) {
        self.done += 1;
        info!(done = self.done, total = self.total, "progress");
    }

    fn set_status(&mut self, status: &str) {
        info!(item = status, "processing");
    }
}
