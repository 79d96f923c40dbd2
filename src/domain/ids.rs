//! Domain identifier types
//!
//! This module provides newtype wrappers for the handles the pipeline passes
//! around. Item identifiers belong to the item tree; image and layer
//! references are opaque handles issued by the image host.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Item identifier newtype wrapper
///
/// Identifies one exportable item (a leaf layer or a layer group) within an
/// item tree. Identifiers are stable for the lifetime of the tree.
///
/// # Examples
///
/// ```
/// use layerport::domain::ids::ItemId;
///
/// let id = ItemId::new(3);
/// assert_eq!(id.value(), 3);
/// assert_eq!(id.to_string(), "item-3");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(u64);

impl ItemId {
    /// Creates a new ItemId from a raw value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item-{}", self.0)
    }
}

/// Opaque handle to an image owned by the image host
///
/// The pipeline never inspects image contents; it only passes handles back
/// to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageRef(u64);

impl ImageRef {
    /// Creates a new image handle from a raw value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw handle value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "image-{}", self.0)
    }
}

/// Opaque handle to a layer within a host image
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LayerRef(u64);

impl LayerRef {
    /// Creates a new layer handle from a raw value
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw handle value
    pub fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for LayerRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "layer-{}", self.0)
    }
}
