//! Image host and export backend traits
//!
//! An [`ImageHost`] owns images and layers and performs the structural
//! operations the pipeline needs (duplicating images, copying layers,
//! merging, resizing). An [`ExportBackend`] writes one layer of one image to
//! a file path and reports failures as [`BackendError`] values.
//!
//! Backend errors carry only a message string. Cancellation and misuse are
//! detected by substring, matching the error contract of the host
//! applications these backends wrap. Hosts whose error messages embed those
//! substrings in unrelated errors will be misclassified; there is no richer
//! signal available across host versions.

use crate::core::export::RunMode;
use crate::domain::{ImageRef, LayerRef, Result};
use std::any::Any;
use std::path::Path;

/// Error reported by an export backend
#[derive(Debug, Clone)]
pub struct BackendError {
    message: String,
}

impl BackendError {
    /// Creates a backend error from a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// The raw backend message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether the message indicates the user cancelled the export dialog
    pub fn is_cancellation(&self) -> bool {
        let lower = self.message.to_lowercase();
        lower.contains("cancelled") || lower.contains("canceled")
    }

    /// Whether the message indicates the backend was invoked with arguments
    /// it does not accept in the current run mode
    pub fn is_calling_error(&self) -> bool {
        self.message.to_lowercase().contains("calling error")
    }
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for BackendError {}

/// Structural image operations required by the export pipeline
pub trait ImageHost {
    /// Upcast for backend-specific downcasting
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for backend-specific downcasting
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Creates an empty copy of `image`: same canvas and metadata, no layers
    fn duplicate_without_contents(&mut self, image: ImageRef) -> Result<ImageRef>;

    /// Copies a layer of `src_image` into `dst_image`, returning the copy
    fn copy_layer_into(
        &mut self,
        src_image: ImageRef,
        layer: LayerRef,
        dst_image: ImageRef,
    ) -> Result<LayerRef>;

    /// Merges all visible layers of `image` into one, returning the result
    fn merge_visible(&mut self, image: ImageRef) -> Result<LayerRef>;

    /// Resizes `layer` to the canvas of `image`
    fn resize_to_image(&mut self, image: ImageRef, layer: LayerRef) -> Result<()>;

    /// Marks `layer` as the active layer of `image`
    fn set_active_layer(&mut self, image: ImageRef, layer: LayerRef) -> Result<()>;

    /// Removes `layer` from `image`
    fn remove_layer(&mut self, image: ImageRef, layer: LayerRef) -> Result<()>;

    /// Renames `layer` of `image`
    fn rename_layer(&mut self, image: ImageRef, layer: LayerRef, name: &str) -> Result<()>;

    /// Copies document metadata from `src_image` to `dst_image`
    fn copy_metadata(&mut self, src_image: ImageRef, dst_image: ImageRef) -> Result<()>;

    /// Deletes `image` and everything it owns
    fn delete_image(&mut self, image: ImageRef) -> Result<()>;
}

/// Writes one layer to a file path
pub trait ExportBackend {
    /// Exports `layer` of `image` to `path`.
    ///
    /// `run_mode` tells interactive backends whether they may raise dialogs.
    fn export(
        &mut self,
        run_mode: RunMode,
        host: &mut dyn ImageHost,
        image: ImageRef,
        layer: LayerRef,
        path: &Path,
    ) -> std::result::Result<(), BackendError>;
}
