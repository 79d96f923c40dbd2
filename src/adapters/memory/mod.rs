//! In-memory image host and filesystem export backend
//!
//! [`MemoryHost`] keeps images and layers as plain byte buffers. It backs
//! projects loaded from JSON manifests and doubles as the host used
//! throughout the test suite. [`FileBackend`] exports a layer by writing its
//! bytes to the target path.

use crate::adapters::host::{BackendError, ExportBackend, ImageHost};
use crate::core::export::RunMode;
use crate::domain::{ImageRef, LayerRef, LayerportError, Result};
use std::any::Any;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

#[derive(Debug, Clone, Default)]
struct LayerData {
    name: String,
    bytes: Vec<u8>,
    visible: bool,
}

#[derive(Debug, Clone, Default)]
struct ImageData {
    layers: Vec<LayerRef>,
    data: HashMap<LayerRef, LayerData>,
    metadata: BTreeMap<String, String>,
    active_layer: Option<LayerRef>,
}

/// Image host storing layers as in-memory byte buffers
#[derive(Debug, Default)]
pub struct MemoryHost {
    images: HashMap<ImageRef, ImageData>,
    next_image: u64,
    next_layer: u64,
}

impl MemoryHost {
    /// Creates an empty host
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new empty image
    pub fn new_image(&mut self) -> ImageRef {
        self.next_image += 1;
        let image = ImageRef::new(self.next_image);
        self.images.insert(image, ImageData::default());
        image
    }

    /// Adds a layer with the given contents to an image
    pub fn add_layer(
        &mut self,
        image: ImageRef,
        name: impl Into<String>,
        bytes: Vec<u8>,
        visible: bool,
    ) -> Result<LayerRef> {
        self.next_layer += 1;
        let layer = LayerRef::new(self.next_layer);
        let data = self.image_mut(image)?;
        data.layers.push(layer);
        data.data.insert(
            layer,
            LayerData {
                name: name.into(),
                bytes,
                visible,
            },
        );
        Ok(layer)
    }

    /// Sets a metadata entry on an image
    pub fn set_metadata(
        &mut self,
        image: ImageRef,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        self.image_mut(image)?
            .metadata
            .insert(key.into(), value.into());
        Ok(())
    }

    /// Contents of a layer
    pub fn layer_bytes(&self, image: ImageRef, layer: LayerRef) -> Result<&[u8]> {
        Ok(&self.layer_data(image, layer)?.bytes)
    }

    /// Current name of a layer
    pub fn layer_name(&self, image: ImageRef, layer: LayerRef) -> Result<&str> {
        Ok(&self.layer_data(image, layer)?.name)
    }

    /// Number of images currently held by the host
    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Returns `true` when the image exists
    pub fn image_exists(&self, image: ImageRef) -> bool {
        self.images.contains_key(&image)
    }

    /// Number of layers in an image
    pub fn layer_count(&self, image: ImageRef) -> Result<usize> {
        Ok(self.image(image)?.layers.len())
    }

    fn image(&self, image: ImageRef) -> Result<&ImageData> {
        self.images
            .get(&image)
            .ok_or_else(|| LayerportError::Host(format!("no such image: {image}")))
    }

    fn image_mut(&mut self, image: ImageRef) -> Result<&mut ImageData> {
        self.images
            .get_mut(&image)
            .ok_or_else(|| LayerportError::Host(format!("no such image: {image}")))
    }

    fn layer_data(&self, image: ImageRef, layer: LayerRef) -> Result<&LayerData> {
        self.image(image)?
            .data
            .get(&layer)
            .ok_or_else(|| LayerportError::Host(format!("no such layer: {layer}")))
    }
}

impl ImageHost for MemoryHost {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn duplicate_without_contents(&mut self, image: ImageRef) -> Result<ImageRef> {
        let metadata = self.image(image)?.metadata.clone();
        let copy = self.new_image();
        self.image_mut(copy)?.metadata = metadata;
        Ok(copy)
    }

    fn copy_layer_into(
        &mut self,
        src_image: ImageRef,
        layer: LayerRef,
        dst_image: ImageRef,
    ) -> Result<LayerRef> {
        let data = self.layer_data(src_image, layer)?.clone();
        self.add_layer(dst_image, data.name, data.bytes, data.visible)
    }

    fn merge_visible(&mut self, image: ImageRef) -> Result<LayerRef> {
        let data = self.image(image)?;
        let visible: Vec<LayerRef> = data
            .layers
            .iter()
            .copied()
            .filter(|l| data.data.get(l).is_some_and(|d| d.visible))
            .collect();

        let mut merged = Vec::new();
        for layer in &visible {
            merged.extend_from_slice(&self.layer_data(image, *layer)?.bytes);
        }
        for layer in visible {
            self.remove_layer(image, layer)?;
        }
        self.add_layer(image, "merged", merged, true)
    }

    fn resize_to_image(&mut self, image: ImageRef, layer: LayerRef) -> Result<()> {
        // The in-memory host has no canvas geometry; existence is checked
        // so misuse still surfaces.
        self.layer_data(image, layer)?;
        Ok(())
    }

    fn set_active_layer(&mut self, image: ImageRef, layer: LayerRef) -> Result<()> {
        self.layer_data(image, layer)?;
        self.image_mut(image)?.active_layer = Some(layer);
        Ok(())
    }

    fn remove_layer(&mut self, image: ImageRef, layer: LayerRef) -> Result<()> {
        let data = self.image_mut(image)?;
        let pos = data
            .layers
            .iter()
            .position(|l| *l == layer)
            .ok_or_else(|| LayerportError::Host(format!("no such layer: {layer}")))?;
        data.layers.remove(pos);
        data.data.remove(&layer);
        if data.active_layer == Some(layer) {
            data.active_layer = None;
        }
        Ok(())
    }

    fn rename_layer(&mut self, image: ImageRef, layer: LayerRef, name: &str) -> Result<()> {
        let data = self.image_mut(image)?;
        let layer_data = data
            .data
            .get_mut(&layer)
            .ok_or_else(|| LayerportError::Host(format!("no such layer: {layer}")))?;
        layer_data.name = name.to_string();
        Ok(())
    }

    fn copy_metadata(&mut self, src_image: ImageRef, dst_image: ImageRef) -> Result<()> {
        let metadata = self.image(src_image)?.metadata.clone();
        self.image_mut(dst_image)?.metadata.extend(metadata);
        Ok(())
    }

    fn delete_image(&mut self, image: ImageRef) -> Result<()> {
        self.images
            .remove(&image)
            .ok_or_else(|| LayerportError::Host(format!("no such image: {image}")))?;
        Ok(())
    }
}

/// Export backend writing layer bytes to the filesystem
#[derive(Debug, Default)]
pub struct FileBackend;

impl FileBackend {
    /// Creates the backend
    pub fn new() -> Self {
        Self
    }
}

impl ExportBackend for FileBackend {
    fn export(
        &mut self,
        _run_mode: RunMode,
        host: &mut dyn ImageHost,
        image: ImageRef,
        layer: LayerRef,
        path: &Path,
    ) -> std::result::Result<(), BackendError> {
        let memory = host
            .as_any()
            .downcast_ref::<MemoryHost>()
            .ok_or_else(|| BackendError::new("file backend requires an in-memory host"))?;
        let bytes = memory
            .layer_bytes(image, layer)
            .map_err(|e| BackendError::new(e.to_string()))?;
        std::fs::write(path, bytes).map_err(|e| BackendError::new(e.to_string()))
    }
}
