//! Export pipeline
//!
//! This module contains the export orchestrator and its supporting pieces:
//! per-run file extension bookkeeping, overwrite resolution, the retry
//! state machine and the run summary.

pub mod extensions;
pub mod orchestrator;
pub mod overwrite;
pub mod status;
pub mod summary;

pub use extensions::ExtensionRegistry;
pub use orchestrator::{Exporter, ExporterBuilder};
pub use overwrite::{NoninteractiveOverwriteChooser, OverwriteChooser, OverwriteMode};
pub use status::{ExportStatus, RunMode};
pub use summary::ExportSummary;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Invoker group running the enabled procedures on every processed layer
pub const GROUP_PROCEDURES: &str = "default_procedures";
/// Invoker group assembling the global constraints before iteration
pub const GROUP_CONSTRAINTS: &str = "default_constraints";
/// Hook group running right after the working image copy is created
pub const HOOK_AFTER_CREATE_IMAGE_COPY: &str = "after_create_image_copy";
/// Hook group running right after a layer copy is inserted
pub const HOOK_AFTER_INSERT_LAYER: &str = "after_insert_layer";
/// Hook group running after a layer has been processed and exported
pub const HOOK_AFTER_PROCESS_LAYER: &str = "after_process_layer";

/// One stage of the per-item pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Layer copying and procedures
    Contents,
    /// Renaming, extension handling and uniquification
    Naming,
    /// Writing files and directories
    Export,
}

/// The set of pipeline phases a run performs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseSet {
    contents: bool,
    naming: bool,
    export: bool,
}

impl PhaseSet {
    /// Full export: all phases
    pub const ALL: PhaseSet = PhaseSet {
        contents: true,
        naming: true,
        export: true,
    };

    /// Name preview: compute output names without touching image contents
    /// or the filesystem
    pub const NAMING_ONLY: PhaseSet = PhaseSet {
        contents: false,
        naming: true,
        export: false,
    };

    /// Whether the set includes the given phase
    pub fn contains(self, phase: Phase) -> bool {
        match phase {
            Phase::Contents => self.contents,
            Phase::Naming => self.naming,
            Phase::Export => self.export,
        }
    }
}

impl Default for PhaseSet {
    fn default() -> Self {
        Self::ALL
    }
}

/// Settings of one export run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOptions {
    /// Directory the output tree is written under
    pub output_directory: PathBuf,
    /// Default file extension, without a leading dot
    pub file_extension: String,
    /// Filename pattern applied to every exported layer
    pub filename_pattern: String,
    /// What to do with already existing output files
    pub overwrite_mode: OverwriteMode,
    /// Export all layers directly into the output directory, ignoring
    /// group structure
    pub flatten_folders: bool,
    /// Use a layer's own file extension when its name carries a valid one
    pub infer_file_extensions: bool,
    /// Run mode used for the first export of each file format
    pub initial_run_mode: RunMode,
    /// Keep the working image copy alive after the run
    pub keep_image_copy: bool,
    /// Pipeline phases to perform
    #[serde(skip, default)]
    pub phases: PhaseSet,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            output_directory: PathBuf::from("."),
            file_extension: "png".to_string(),
            filename_pattern: "[name]".to_string(),
            overwrite_mode: OverwriteMode::Replace,
            flatten_folders: false,
            infer_file_extensions: false,
            initial_run_mode: RunMode::NonInteractive,
            keep_image_copy: false,
            phases: PhaseSet::ALL,
        }
    }
}

/// Cloneable handle requesting cancellation of a running export.
///
/// The exporter checks the handle before every item; a stopped run ends
/// with a cancellation error after releasing its image copies.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    /// Creates a handle in the running state
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation
    pub fn request_stop(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}
