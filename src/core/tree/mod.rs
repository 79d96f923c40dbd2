//! Item tree
//!
//! The [`ItemTree`] owns the exportable items of one source image in stable
//! depth-first pre-order, together with the composable [`ItemFilter`] used
//! for global constraints and a per-run name history used for sibling-level
//! name uniquification.
//!
//! Filtering never mutates the collection; it only changes what
//! [`ItemTree::iterate`] yields. Tree structure is only mutated through the
//! two bulk operations [`ItemTree::strip_hierarchy`] and
//! [`ItemTree::restore_hierarchy`].

pub mod filter;
pub mod names;

pub use filter::{ItemFilter, MatchMode};

use crate::domain::{Item, ItemId, LayerportError, LayerRef, Result};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// Input node used to build an [`ItemTree`]
///
/// Produced by the manifest adapter (or by tests) before the tree assigns
/// item identifiers.
#[derive(Debug, Clone)]
pub struct ItemNode {
    /// Layer name as found in the source document
    pub name: String,
    /// Host layer handle backing the node
    pub layer: LayerRef,
    /// Layer visibility flag
    pub visible: bool,
    /// User-assigned tags
    pub tags: Vec<String>,
    /// Child nodes; `None` marks a leaf, `Some(vec![])` an empty group
    pub children: Option<Vec<ItemNode>>,
}

impl ItemNode {
    /// Creates a leaf node
    pub fn leaf(name: impl Into<String>, layer: LayerRef) -> Self {
        Self {
            name: name.into(),
            layer,
            visible: true,
            tags: Vec::new(),
            children: None,
        }
    }

    /// Creates a group node
    pub fn group(name: impl Into<String>, layer: LayerRef, children: Vec<ItemNode>) -> Self {
        Self {
            name: name.into(),
            layer,
            visible: true,
            tags: Vec::new(),
            children: Some(children),
        }
    }

    /// Sets the visibility flag
    pub fn visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Adds tags to the node
    pub fn with_tags(mut self, tags: Vec<String>) -> Self {
        self.tags = tags;
        self
    }
}

/// Hierarchical collection of exportable items
pub struct ItemTree {
    items: Vec<Item>,
    index: HashMap<ItemId, usize>,
    filter: ItemFilter,
    // Names already emitted per tree level during the current run.
    name_history: HashMap<Vec<ItemId>, HashSet<String>>,
}

impl ItemTree {
    /// Builds a tree from nested nodes, assigning stable identifiers in
    /// depth-first pre-order.
    pub fn from_nodes(nodes: Vec<ItemNode>) -> Self {
        struct Raw {
            name: String,
            layer: LayerRef,
            visible: bool,
            tags: Vec<String>,
            parents: Vec<ItemId>,
            children: Option<Vec<ItemId>>,
        }

        fn flatten(
            nodes: Vec<ItemNode>,
            parents: &[ItemId],
            next: &mut u64,
            out: &mut Vec<Raw>,
        ) -> Vec<ItemId> {
            let mut ids = Vec::with_capacity(nodes.len());
            for node in nodes {
                let id = ItemId::new(*next);
                *next += 1;
                ids.push(id);

                let slot = out.len();
                out.push(Raw {
                    name: node.name,
                    layer: node.layer,
                    visible: node.visible,
                    tags: node.tags,
                    parents: parents.to_vec(),
                    children: None,
                });

                if let Some(children) = node.children {
                    let mut child_parents = parents.to_vec();
                    child_parents.push(id);
                    let child_ids = flatten(children, &child_parents, next, out);
                    out[slot].children = Some(child_ids);
                }
            }
            ids
        }

        let mut raw = Vec::new();
        let mut next = 1;
        flatten(nodes, &[], &mut next, &mut raw);

        let mut items = Vec::with_capacity(raw.len());
        let mut index = HashMap::with_capacity(raw.len());
        for (pos, r) in raw.into_iter().enumerate() {
            let id = ItemId::new(pos as u64 + 1);
            index.insert(id, pos);
            items.push(Item::new(
                id, r.name, r.parents, r.children, r.layer, r.visible, r.tags,
            ));
        }

        Self {
            items,
            index,
            filter: ItemFilter::default(),
            name_history: HashMap::new(),
        }
    }

    /// Number of items in the tree
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` when the tree has no items
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Looks up an item by identifier
    pub fn item(&self, id: ItemId) -> Result<&Item> {
        self.index
            .get(&id)
            .map(|&pos| &self.items[pos])
            .ok_or_else(|| LayerportError::NotFound(id.to_string()))
    }

    fn item_mut(&mut self, id: ItemId) -> Result<&mut Item> {
        let pos = *self
            .index
            .get(&id)
            .ok_or_else(|| LayerportError::NotFound(id.to_string()))?;
        Ok(&mut self.items[pos])
    }

    /// Produces items in stable depth-first pre-order.
    ///
    /// With `filtered = true` items failing the filter predicate are
    /// excluded; the underlying collection is never mutated.
    pub fn iterate(&self, filtered: bool) -> impl Iterator<Item = &Item> + '_ {
        self.items
            .iter()
            .filter(move |item| !filtered || self.filter.is_match(item))
    }

    /// The global filter predicate
    pub fn filter(&self) -> &ItemFilter {
        &self.filter
    }

    /// Mutable access to the global filter predicate
    pub fn filter_mut(&mut self) -> &mut ItemFilter {
        &mut self.filter
    }

    /// Removes all filter rules and sub-filters
    pub fn reset_filter(&mut self) {
        self.filter.reset();
    }

    /// Clears parent chains and group child lists on every item
    /// ("ignore folder structure").
    pub fn strip_hierarchy(&mut self) {
        for item in &mut self.items {
            item.strip_hierarchy();
        }
    }

    /// Restores the original parent chains and child lists on every item
    pub fn restore_hierarchy(&mut self) {
        for item in &mut self.items {
            item.restore_hierarchy();
        }
    }

    /// Replaces the item's display name, snapshotting the previous name the
    /// first time it is changed during a naming phase.
    pub fn set_name(&mut self, id: ItemId, name: impl Into<String>) -> Result<()> {
        let item = self.item_mut(id)?;
        if item.saved_name.is_none() {
            item.saved_name = Some(item.name.clone());
        }
        item.name = name.into();
        Ok(())
    }

    /// Cleans the item's name of characters illegal for the output backend
    pub fn validate_name(&mut self, id: ItemId) -> Result<()> {
        let item = self.item_mut(id)?;
        item.name = names::validate_filename(&item.name);
        Ok(())
    }

    /// Makes the item's name unique against names already emitted at the
    /// same tree level during this run.
    ///
    /// `position` is the byte offset at which the numeric suffix is
    /// inserted (typically just before the file extension); `None` appends.
    pub fn uniquify_name(&mut self, id: ItemId, position: Option<usize>) -> Result<()> {
        let pos = *self
            .index
            .get(&id)
            .ok_or_else(|| LayerportError::NotFound(id.to_string()))?;
        let level = self.items[pos].parents().to_vec();
        let taken = self.name_history.entry(level).or_default();

        let item = &mut self.items[pos];
        let unique = names::uniquify(
            &item.name,
            |candidate| taken.contains(candidate),
            |n| format!(" ({n})"),
            position,
        );
        taken.insert(unique.clone());
        item.name = unique;
        Ok(())
    }

    /// Restores the name the item had before the naming phase touched it
    pub fn reset_name(&mut self, id: ItemId) -> Result<()> {
        let item = self.item_mut(id)?;
        if let Some(saved) = item.saved_name.take() {
            item.name = saved;
        }
        Ok(())
    }

    /// Forgets all emitted names and naming snapshots. Called once at the
    /// start of every export run.
    pub fn reset_name_history(&mut self) {
        self.name_history.clear();
        for item in &mut self.items {
            if let Some(saved) = item.saved_name.take() {
                item.name = saved;
            }
        }
    }

    /// Output path of the item: `output_dir / parent… / name`
    pub fn filepath(&self, id: ItemId, output_dir: &Path) -> Result<PathBuf> {
        let item = self.item(id)?;
        let mut path = output_dir.to_path_buf();
        for parent in item.parents() {
            path.push(self.item(*parent)?.name());
        }
        path.push(item.name());
        Ok(path)
    }
}

impl std::fmt::Debug for ItemTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemTree")
            .field("items", &self.items.len())
            .field("filter", &self.filter)
            .finish()
    }
}
