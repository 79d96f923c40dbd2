//! Export run summary

use std::path::PathBuf;
use std::time::Duration;

/// Outcome of one export run
#[derive(Debug, Clone, Default)]
pub struct ExportSummary {
    exported_paths: Vec<PathBuf>,
    skipped: usize,
    elapsed: Duration,
}

impl ExportSummary {
    pub(crate) fn new(exported_paths: Vec<PathBuf>, skipped: usize, elapsed: Duration) -> Self {
        Self {
            exported_paths,
            skipped,
            elapsed,
        }
    }

    /// Paths written during the run, in export order
    pub fn exported_paths(&self) -> &[PathBuf] {
        &self.exported_paths
    }

    /// Number of files written
    pub fn exported_count(&self) -> usize {
        self.exported_paths.len()
    }

    /// Number of items skipped due to overwrite resolution
    pub fn skipped_count(&self) -> usize {
        self.skipped
    }

    /// Wall-clock duration of the run
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

impl std::fmt::Display for ExportSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "exported {} file(s), skipped {}, in {:.2}s",
            self.exported_paths.len(),
            self.skipped,
            self.elapsed.as_secs_f64()
        )
    }
}
