//! File extension bookkeeping
//!
//! Tracks, per run, which file extensions have already produced a
//! successful export (so later exports can reuse the previous settings) and
//! which have turned out to be unusable (so the pipeline falls back to the
//! default extension instead of failing the same way on every item).
//!
//! Aliases of the same format share one slot: invalidating `jpg` also
//! invalidates `jpeg`. Extensions not known in advance get a fresh valid
//! slot on first use; any extension is assumed exportable until a failure
//! proves otherwise.

use std::collections::HashMap;

// Alias groups sharing one bookkeeping slot.
const KNOWN_FORMATS: &[&[&str]] = &[
    &["png"],
    &["jpg", "jpeg", "jpe"],
    &["tif", "tiff"],
    &["bmp"],
    &["gif"],
    &["webp"],
    &["tga"],
    &["xcf"],
];

#[derive(Debug, Clone, Copy)]
struct Slot {
    valid: bool,
    exported: usize,
}

/// Per-run validity and usage tracking of file extensions
#[derive(Debug)]
pub struct ExtensionRegistry {
    slots: Vec<Slot>,
    index: HashMap<String, usize>,
}

impl ExtensionRegistry {
    /// Creates a registry seeded with the common raster formats
    pub fn with_known_formats() -> Self {
        let mut registry = Self {
            slots: Vec::new(),
            index: HashMap::new(),
        };
        for aliases in KNOWN_FORMATS {
            let slot = registry.slots.len();
            registry.slots.push(Slot {
                valid: true,
                exported: 0,
            });
            for alias in *aliases {
                registry.index.insert(alias.to_string(), slot);
            }
        }
        registry
    }

    fn slot(&mut self, ext: &str) -> usize {
        let key = ext.to_lowercase();
        if let Some(&slot) = self.index.get(&key) {
            return slot;
        }
        let slot = self.slots.len();
        self.slots.push(Slot {
            valid: true,
            exported: 0,
        });
        self.index.insert(key, slot);
        slot
    }

    /// Whether `ext` is still considered exportable. Unknown extensions are
    /// valid until proven otherwise.
    pub fn is_valid(&self, ext: &str) -> bool {
        self.index
            .get(&ext.to_lowercase())
            .map(|&slot| self.slots[slot].valid)
            .unwrap_or(true)
    }

    /// Marks `ext` (and its aliases) as unusable for the rest of the run
    pub fn invalidate(&mut self, ext: &str) {
        let slot = self.slot(ext);
        self.slots[slot].valid = false;
    }

    /// Records one successful export under `ext`
    pub fn record_export(&mut self, ext: &str) {
        let slot = self.slot(ext);
        self.slots[slot].exported += 1;
    }

    /// How many files were exported under `ext` (or an alias) this run
    pub fn export_count(&self, ext: &str) -> usize {
        self.index
            .get(&ext.to_lowercase())
            .map(|&slot| self.slots[slot].exported)
            .unwrap_or(0)
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::with_known_formats()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension_is_valid() {
        let registry = ExtensionRegistry::with_known_formats();
        assert!(registry.is_valid("ora"));
        assert_eq!(registry.export_count("ora"), 0);
    }

    #[test]
    fn test_aliases_share_a_slot() {
        let mut registry = ExtensionRegistry::with_known_formats();
        registry.invalidate("jpg");
        assert!(!registry.is_valid("jpeg"));
        assert!(!registry.is_valid("JPE"));
        assert!(registry.is_valid("png"));

        registry.record_export("tif");
        assert_eq!(registry.export_count("tiff"), 1);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let mut registry = ExtensionRegistry::with_known_formats();
        registry.record_export("PNG");
        assert_eq!(registry.export_count("png"), 1);
    }

    #[test]
    fn test_invalidate_unknown_extension() {
        let mut registry = ExtensionRegistry::with_known_formats();
        registry.invalidate("ora");
        assert!(!registry.is_valid("ora"));
    }
}
