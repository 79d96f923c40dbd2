//! Overwrite resolution
//!
//! When an output path already exists, an [`OverwriteChooser`] decides what
//! happens. The chooser is only consulted for paths that exist; fresh paths
//! are always written.

use crate::core::tree::names;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What to do with an output path that already exists
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverwriteMode {
    /// Overwrite the existing file
    #[default]
    Replace,
    /// Leave the existing file alone and skip the item
    Skip,
    /// Export under a uniquified name next to the existing file
    Rename,
    /// Abort the whole run
    Cancel,
}

/// Decides the fate of colliding output paths
pub trait OverwriteChooser {
    /// Called once per existing output path
    fn choose(&mut self, path: &Path) -> OverwriteMode;
}

/// Chooser answering every collision with one fixed mode
#[derive(Debug, Clone, Copy)]
pub struct NoninteractiveOverwriteChooser {
    mode: OverwriteMode,
}

impl NoninteractiveOverwriteChooser {
    /// Creates a chooser that always answers `mode`
    pub fn new(mode: OverwriteMode) -> Self {
        Self { mode }
    }
}

impl OverwriteChooser for NoninteractiveOverwriteChooser {
    fn choose(&mut self, _path: &Path) -> OverwriteMode {
        self.mode
    }
}

/// Resolves one output path against the filesystem.
///
/// Nonexistent paths resolve to [`OverwriteMode::Replace`] without
/// consulting the chooser. [`OverwriteMode::Rename`] returns a sibling path
/// with a `" (n)"` suffix inserted before the extension.
pub fn resolve(path: &Path, chooser: &mut dyn OverwriteChooser) -> (OverwriteMode, PathBuf) {
    if !path.exists() {
        return (OverwriteMode::Replace, path.to_path_buf());
    }

    let mode = chooser.choose(path);
    if mode != OverwriteMode::Rename {
        return (mode, path.to_path_buf());
    }

    let parent = path.parent().map(Path::to_path_buf).unwrap_or_default();
    let filename = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let unique = names::uniquify_filename(&filename, |candidate| parent.join(candidate).exists());
    (mode, parent.join(unique))
}
