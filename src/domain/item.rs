//! Exportable item model
//!
//! An [`Item`] is one node of the layer tree: a leaf layer, an empty layer
//! group, or a non-empty layer group. The kind is fixed at creation; the
//! display name is only mutated during the naming phase of an export; the
//! parent/child links are only mutated by the two bulk tree operations
//! (strip hierarchy / restore hierarchy).

use crate::domain::ids::{ItemId, LayerRef};
use serde::{Deserialize, Serialize};

/// The kind of an exportable item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    /// A leaf layer, exported as one file
    Leaf,
    /// A layer group with no children, exported as one directory
    EmptyGroup,
    /// A layer group with children
    NonemptyGroup,
}

impl ItemKind {
    /// Returns `true` for either group kind
    pub fn is_group(self) -> bool {
        matches!(self, ItemKind::EmptyGroup | ItemKind::NonemptyGroup)
    }
}

/// One exportable unit in the item tree
#[derive(Debug, Clone)]
pub struct Item {
    id: ItemId,
    kind: ItemKind,
    /// Display/output name. Mutable during the naming phase.
    pub(crate) name: String,
    orig_name: String,
    /// Name snapshot taken when naming starts, restored by `reset_name`.
    pub(crate) saved_name: Option<String>,
    /// Ancestor chain, topmost group first. May be reset or cleared in bulk.
    pub(crate) parents: Vec<ItemId>,
    /// Child items in tree order. `None` for leaves.
    pub(crate) children: Option<Vec<ItemId>>,
    orig_parents: Vec<ItemId>,
    orig_children: Option<Vec<ItemId>>,
    layer: LayerRef,
    visible: bool,
    tags: Vec<String>,
}

impl Item {
    /// Creates a new item. The kind is derived from `children`:
    /// `None` is a leaf, `Some` with no elements is an empty group.
    pub fn new(
        id: ItemId,
        name: impl Into<String>,
        parents: Vec<ItemId>,
        children: Option<Vec<ItemId>>,
        layer: LayerRef,
        visible: bool,
        tags: Vec<String>,
    ) -> Self {
        let kind = match &children {
            None => ItemKind::Leaf,
            Some(c) if c.is_empty() => ItemKind::EmptyGroup,
            Some(_) => ItemKind::NonemptyGroup,
        };
        let name = name.into();
        Self {
            id,
            kind,
            orig_name: name.clone(),
            name,
            saved_name: None,
            orig_parents: parents.clone(),
            parents,
            orig_children: children.clone(),
            children,
            layer,
            visible,
            tags,
        }
    }

    /// Stable identifier of the item
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Kind of the item; immutable after creation
    pub fn kind(&self) -> ItemKind {
        self.kind
    }

    /// Current display/output name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The name the item had when the tree was built
    pub fn orig_name(&self) -> &str {
        &self.orig_name
    }

    /// Current ancestor chain, topmost first
    pub fn parents(&self) -> &[ItemId] {
        &self.parents
    }

    /// Current children; `None` for leaves
    pub fn children(&self) -> Option<&[ItemId]> {
        self.children.as_deref()
    }

    /// Host layer handle backing this item
    pub fn layer(&self) -> LayerRef {
        self.layer
    }

    /// Whether the underlying layer is visible
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// User-assigned tags
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Returns `true` if the item carries the given tag
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Restores the original parent/child links
    pub(crate) fn restore_hierarchy(&mut self) {
        self.parents = self.orig_parents.clone();
        self.children = self.orig_children.clone();
    }

    /// Clears the parent chain and, for groups, the child list
    pub(crate) fn strip_hierarchy(&mut self) {
        self.parents.clear();
        self.children = match self.kind {
            ItemKind::Leaf => None,
            _ => Some(Vec::new()),
        };
    }

    /// File extension of the original name, if any
    pub fn orig_file_extension(&self) -> Option<&str> {
        crate::core::tree::names::file_extension(&self.orig_name)
    }
}
