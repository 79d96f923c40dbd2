//! Callable execution engine
//!
//! The [`Invoker`] holds ordered groups of callables and runs them against a
//! mutable [`CallContext`]. Callables are registered into one or more named
//! groups; running a set of groups executes their callables in registration
//! order. For-each callables run after every regular callable of the groups
//! they share. A nested invoker registered as a callable runs its own
//! matching groups in place.
//!
//! Errors abort the run immediately and propagate to the caller.

use crate::adapters::host::ImageHost;
use crate::core::tree::ItemFilter;
use crate::domain::{ImageRef, Item, LayerRef, LayerportError, Result};
use std::sync::Arc;

/// Mutable state handed to every callable
pub struct CallContext<'a> {
    /// Image host the run operates on
    pub host: &'a mut dyn ImageHost,
    /// Image the current phase works with
    pub image: ImageRef,
    /// Layer currently being processed, when in a per-item phase
    pub layer: Option<LayerRef>,
    /// Item currently being processed, when in a per-item phase
    pub item: Option<&'a Item>,
    /// Whether the current item matches the global constraints
    pub matches_global: bool,
    /// Filter being assembled, when in the constraint phase
    pub filter: Option<&'a mut ItemFilter>,
}

impl<'a> CallContext<'a> {
    /// The item being processed; an error outside per-item phases
    pub fn item(&self) -> Result<&Item> {
        self.item
            .ok_or_else(|| LayerportError::Execution("no item in call context".to_string()))
    }

    /// The layer being processed; an error outside per-item phases
    pub fn layer(&self) -> Result<LayerRef> {
        self.layer
            .ok_or_else(|| LayerportError::Execution("no layer in call context".to_string()))
    }

    /// The filter under assembly; an error outside the constraint phase
    pub fn filter_mut(&mut self) -> Result<&mut ItemFilter> {
        self.filter
            .as_deref_mut()
            .ok_or_else(|| LayerportError::Execution("no filter in call context".to_string()))
    }
}

/// A callable runnable by the invoker
pub type CallableFn = Arc<dyn for<'a> Fn(&mut CallContext<'a>) -> Result<()>>;

/// Handle to a registered callable, used for removal and reordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallableId(usize);

enum Entry {
    Func(CallableFn),
    Nested(Invoker),
}

struct Registered {
    id: CallableId,
    entry: Entry,
    groups: Vec<String>,
    foreach: bool,
}

impl Registered {
    fn in_group(&self, group: &str) -> bool {
        self.groups.iter().any(|g| g == group)
    }
}

/// Ordered, grouped collection of callables
pub struct Invoker {
    name: String,
    entries: Vec<Registered>,
    next_id: usize,
}

impl Invoker {
    /// Creates an empty invoker
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
            next_id: 0,
        }
    }

    /// Name of the invoker, used in log output
    pub fn name(&self) -> &str {
        &self.name
    }

    fn register(&mut self, entry: Entry, groups: &[&str], foreach: bool) -> CallableId {
        let id = CallableId(self.next_id);
        self.next_id += 1;
        self.entries.push(Registered {
            id,
            entry,
            groups: groups.iter().map(|g| g.to_string()).collect(),
            foreach,
        });
        id
    }

    /// Registers a callable in the given groups
    pub fn add(&mut self, callable: CallableFn, groups: &[&str]) -> CallableId {
        self.register(Entry::Func(callable), groups, false)
    }

    /// Registers a callable that runs after every regular callable of the
    /// groups it is registered in
    pub fn add_foreach(&mut self, callable: CallableFn, groups: &[&str]) -> CallableId {
        self.register(Entry::Func(callable), groups, true)
    }

    /// Registers a nested invoker; running a group runs the nested
    /// invoker's matching callables in place
    pub fn add_invoker(&mut self, invoker: Invoker, groups: &[&str]) -> CallableId {
        self.register(Entry::Nested(invoker), groups, false)
    }

    /// Removes a registered callable
    pub fn remove(&mut self, id: CallableId) -> Result<()> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| LayerportError::NotFound(format!("callable {}", id.0)))?;
        self.entries.remove(pos);
        Ok(())
    }

    /// Moves a registered callable to `position` in the registration order.
    ///
    /// Negative positions count from the end, `-1` being the last slot.
    pub fn reorder(&mut self, id: CallableId, position: isize) -> Result<()> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| LayerportError::NotFound(format!("callable {}", id.0)))?;
        let entry = self.entries.remove(pos);

        let len = self.entries.len() as isize;
        let target = if position < 0 {
            (len + position + 1).max(0)
        } else {
            position.min(len)
        } as usize;
        self.entries.insert(target, entry);
        Ok(())
    }

    /// All group names with at least one callable, in first-seen order
    pub fn list_groups(&self) -> Vec<String> {
        let mut groups = Vec::new();
        for entry in &self.entries {
            for group in &entry.groups {
                if !groups.contains(group) {
                    groups.push(group.clone());
                }
            }
        }
        groups
    }

    /// Number of registered callables
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` when no callables are registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Runs all callables of the given groups in registration order
    pub fn run(&self, groups: &[&str], ctx: &mut CallContext<'_>) -> Result<()> {
        for group in groups {
            self.run_group(group, ctx)?;
        }
        Ok(())
    }

    fn run_group(&self, group: &str, ctx: &mut CallContext<'_>) -> Result<()> {
        for entry in self.entries.iter().filter(|e| e.in_group(group)) {
            if entry.foreach {
                continue;
            }
            match &entry.entry {
                Entry::Func(f) => f(ctx)?,
                Entry::Nested(inner) => inner.run_group(group, ctx)?,
            }
            for after in self.entries.iter().filter(|e| e.foreach && e.in_group(group)) {
                if let Entry::Func(f) = &after.entry {
                    f(ctx)?;
                }
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for Invoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Invoker")
            .field("name", &self.name)
            .field("entries", &self.entries.len())
            .field("groups", &self.list_groups())
            .finish()
    }
}
