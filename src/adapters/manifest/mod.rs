//! Project manifests
//!
//! A project manifest is a JSON document describing a layered image: its
//! name, document metadata and a nested layer list. Loading a manifest
//! produces an in-memory host populated with the layer contents plus the
//! item tree the pipeline iterates.

use crate::adapters::memory::MemoryHost;
use crate::core::tree::{ItemNode, ItemTree};
use crate::domain::{ImageRef, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

fn default_true() -> bool {
    true
}

/// One layer or layer group in a manifest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerNode {
    /// Layer name
    pub name: String,
    /// Visibility flag; hidden layers can be filtered out with the
    /// `visible` constraint
    #[serde(default = "default_true")]
    pub visible: bool,
    /// User-assigned tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Layer contents; written verbatim by the file backend
    #[serde(default)]
    pub content: Option<String>,
    /// Child layers; present (possibly empty) for groups, absent for leaves
    #[serde(default)]
    pub layers: Option<Vec<LayerNode>>,
}

/// A layered project as described by a JSON manifest
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectManifest {
    /// Document name, available to filename patterns
    pub name: String,
    /// Document metadata, copied onto image duplicates
    #[serde(default)]
    pub metadata: BTreeMap<String, String>,
    /// Top-level layers
    #[serde(default)]
    pub layers: Vec<LayerNode>,
}

/// Reads and parses a manifest file
pub fn load_manifest(path: &Path) -> Result<ProjectManifest> {
    let text = std::fs::read_to_string(path)?;
    let manifest: ProjectManifest = serde_json::from_str(&text)?;
    Ok(manifest)
}

/// Materializes a manifest into an in-memory host and an item tree
pub fn build_project(manifest: &ProjectManifest) -> Result<(MemoryHost, ImageRef, ItemTree)> {
    let mut host = MemoryHost::new();
    let image = host.new_image();
    for (key, value) in &manifest.metadata {
        host.set_metadata(image, key, value)?;
    }

    fn build_nodes(
        host: &mut MemoryHost,
        image: ImageRef,
        layers: &[LayerNode],
    ) -> Result<Vec<ItemNode>> {
        let mut nodes = Vec::with_capacity(layers.len());
        for layer in layers {
            let bytes = layer
                .content
                .as_deref()
                .unwrap_or_default()
                .as_bytes()
                .to_vec();
            let handle = host.add_layer(image, &layer.name, bytes, layer.visible)?;

            let children = match &layer.layers {
                Some(child_layers) => Some(build_nodes(host, image, child_layers)?),
                None => None,
            };
            let mut node = match children {
                Some(children) => ItemNode::group(&layer.name, handle, children),
                None => ItemNode::leaf(&layer.name, handle),
            };
            node = node.visible(layer.visible).with_tags(layer.tags.clone());
            nodes.push(node);
        }
        Ok(nodes)
    }

    let nodes = build_nodes(&mut host, image, &manifest.layers)?;
    Ok((host, image, ItemTree::from_nodes(nodes)))
}
