//! Composable item filter
//!
//! An [`ItemFilter`] is an ordered set of named boolean rules plus named
//! sub-filters, combined with a [`MatchMode`]. Filtering never mutates the
//! item collection; the tree consults the filter when iterating.

use crate::domain::Item;
use serde::{Deserialize, Serialize};

/// How the rules of a filter are combined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchMode {
    /// Every rule and sub-filter must match (logical AND)
    #[default]
    All,
    /// At least one rule or sub-filter must match (logical OR)
    Any,
}

type RuleFn = Box<dyn Fn(&Item) -> bool>;

struct NamedRule {
    name: String,
    rule: RuleFn,
}

/// A composable boolean rule set over items
pub struct ItemFilter {
    mode: MatchMode,
    rules: Vec<NamedRule>,
    subfilters: Vec<(String, ItemFilter)>,
}

impl ItemFilter {
    /// Creates an empty filter with the given match mode
    pub fn new(mode: MatchMode) -> Self {
        Self {
            mode,
            rules: Vec::new(),
            subfilters: Vec::new(),
        }
    }

    /// The match mode of this filter
    pub fn mode(&self) -> MatchMode {
        self.mode
    }

    /// Returns `true` when the filter holds no rules or sub-filters
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty() && self.subfilters.is_empty()
    }

    /// Adds a named rule
    pub fn add_rule<F>(&mut self, name: impl Into<String>, rule: F)
    where
        F: Fn(&Item) -> bool + 'static,
    {
        self.rules.push(NamedRule {
            name: name.into(),
            rule: Box::new(rule),
        });
    }

    /// Removes all rules registered under `name`; returns how many were removed
    pub fn remove_rule(&mut self, name: &str) -> usize {
        let before = self.rules.len();
        self.rules.retain(|r| r.name != name);
        before - self.rules.len()
    }

    /// Adds a named sub-filter
    pub fn add_subfilter(&mut self, name: impl Into<String>, filter: ItemFilter) {
        self.subfilters.push((name.into(), filter));
    }

    /// Returns `true` when a sub-filter with the given name exists
    pub fn has_subfilter(&self, name: &str) -> bool {
        self.subfilters.iter().any(|(n, _)| n == name)
    }

    /// Indexed access to a sub-filter by name
    pub fn subfilter(&self, name: &str) -> Option<&ItemFilter> {
        self.subfilters
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
    }

    /// Mutable access to a sub-filter by name
    pub fn subfilter_mut(&mut self, name: &str) -> Option<&mut ItemFilter> {
        self.subfilters
            .iter_mut()
            .find(|(n, _)| n == name)
            .map(|(_, f)| f)
    }

    /// Removes all rules and sub-filters
    pub fn reset(&mut self) {
        self.rules.clear();
        self.subfilters.clear();
    }

    /// Evaluates the filter against one item.
    ///
    /// An empty filter matches everything, also under `MatchMode::Any`.
    pub fn is_match(&self, item: &Item) -> bool {
        if self.is_empty() {
            return true;
        }

        let rules = self.rules.iter().map(|r| (r.rule)(item));
        let subs = self.subfilters.iter().map(|(_, f)| f.is_match(item));

        match self.mode {
            MatchMode::All => rules.chain(subs).all(|m| m),
            MatchMode::Any => rules.chain(subs).any(|m| m),
        }
    }
}

impl Default for ItemFilter {
    fn default() -> Self {
        Self::new(MatchMode::All)
    }
}

impl std::fmt::Debug for ItemFilter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ItemFilter")
            .field("mode", &self.mode)
            .field("rules", &self.rules.iter().map(|r| &r.name).collect::<Vec<_>>())
            .field(
                "subfilters",
                &self.subfilters.iter().map(|(n, _)| n).collect::<Vec<_>>(),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ItemId, LayerRef};

    fn item(name: &str, visible: bool) -> Item {
        Item::new(
            ItemId::new(1),
            name,
            vec![],
            None,
            LayerRef::new(1),
            visible,
            vec![],
        )
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = ItemFilter::default();
        assert!(filter.is_match(&item("a", true)));

        let any = ItemFilter::new(MatchMode::Any);
        assert!(any.is_match(&item("a", true)));
    }

    #[test]
    fn test_match_all() {
        let mut filter = ItemFilter::new(MatchMode::All);
        filter.add_rule("visible", |i: &Item| i.is_visible());
        filter.add_rule("short_name", |i: &Item| i.name().len() < 4);

        assert!(filter.is_match(&item("ab", true)));
        assert!(!filter.is_match(&item("ab", false)));
        assert!(!filter.is_match(&item("too long", true)));
    }

    #[test]
    fn test_match_any() {
        let mut filter = ItemFilter::new(MatchMode::Any);
        filter.add_rule("visible", |i: &Item| i.is_visible());
        filter.add_rule("named_x", |i: &Item| i.name() == "x");

        assert!(filter.is_match(&item("x", false)));
        assert!(filter.is_match(&item("y", true)));
        assert!(!filter.is_match(&item("y", false)));
    }

    #[test]
    fn test_subfilter_composition() {
        let mut filter = ItemFilter::new(MatchMode::All);
        filter.add_rule("visible", |i: &Item| i.is_visible());

        let mut sub = ItemFilter::new(MatchMode::Any);
        sub.add_rule("a", |i: &Item| i.name().starts_with('a'));
        sub.add_rule("b", |i: &Item| i.name().starts_with('b'));
        filter.add_subfilter("starts_ab", sub);

        assert!(filter.has_subfilter("starts_ab"));
        assert!(!filter.has_subfilter("missing"));
        assert!(filter.subfilter("starts_ab").is_some());

        assert!(filter.is_match(&item("apple", true)));
        assert!(filter.is_match(&item("berry", true)));
        assert!(!filter.is_match(&item("cherry", true)));
        assert!(!filter.is_match(&item("apple", false)));
    }

    #[test]
    fn test_remove_rule_and_reset() {
        let mut filter = ItemFilter::new(MatchMode::All);
        filter.add_rule("never", |_: &Item| false);
        assert!(!filter.is_match(&item("a", true)));

        assert_eq!(filter.remove_rule("never"), 1);
        assert!(filter.is_match(&item("a", true)));

        filter.add_rule("never", |_: &Item| false);
        filter.add_subfilter("sub", ItemFilter::default());
        filter.reset();
        assert!(filter.is_empty());
    }
}
