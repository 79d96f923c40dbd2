//! Run modes and per-item export status

use serde::{Deserialize, Serialize};

/// How the export backend may interact with the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// The backend may raise dialogs
    Interactive,
    /// The backend must not raise dialogs
    #[default]
    NonInteractive,
    /// The backend reuses the settings of the previous export of the same
    /// file format
    WithLastVals,
}

/// State of the current item within the export retry machine.
///
/// Transitions are driven by the backend result:
/// success moves to [`ExportStatus::ExportSuccessful`]; a calling error in a
/// non-interactive mode moves to [`ExportStatus::ForceInteractive`] (retry
/// once interactively); any other failure under a non-default file extension
/// moves to [`ExportStatus::UseDefaultFileExtension`] (retry once with the
/// default extension). Failures under the default extension and
/// cancellations abort the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportStatus {
    NotExportedYet,
    ExportSuccessful,
    ForceInteractive,
    UseDefaultFileExtension,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_mode_deserializes_snake_case() {
        let mode: RunMode = serde_json::from_str(r#""with_last_vals""#).unwrap();
        assert_eq!(mode, RunMode::WithLastVals);
        assert_eq!(RunMode::default(), RunMode::NonInteractive);
    }
}
