//! Resident entry store and size accounting.
//!
//! The store is plain data: a `path -> entries` map plus an aggregate byte
//! counter. It is not itself thread-safe; [`PixmapCache`] serializes every
//! mutation behind a mutex.
//!
//! Invariant: `size_bytes` always equals the sum of `size_bytes()` over
//! all resident entries. Every insert adds exactly once, every removal
//! subtracts exactly once, and replacing an entry subtracts the old size
//! before adding the new one.
//!
//! [`PixmapCache`]: crate::cache::PixmapCache

use crate::cache::entry::CacheEntry;
use crate::dimensions::Dimensions;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// In-memory store of resident entries, keyed by absolute path.
///
/// Each path holds one entry per requested dimensions, mirroring how a
/// gallery requests several sizes of the same file (tile, preview, zoom).
#[derive(Debug, Default)]
pub(crate) struct PixmapStore {
    entries: HashMap<PathBuf, Vec<CacheEntry>>,
    size_bytes: usize,
}

impl PixmapStore {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Look up the entry for `(path, dimensions)`.
    ///
    /// Pure lookup: never loads, never mutates.
    pub(crate) fn get(&self, path: &Path, dimensions: Dimensions) -> Option<CacheEntry> {
        self.entries
            .get(path)?
            .iter()
            .find(|entry| entry.dimensions() == dimensions)
            .cloned()
    }

    /// All resident entries for a path, one per cached dimensions.
    pub(crate) fn entries_for(&self, path: &Path) -> Vec<CacheEntry> {
        self.entries.get(path).cloned().unwrap_or_default()
    }

    /// Insert an entry, replacing any existing entry for the same
    /// dimensions.
    ///
    /// Replace, not duplicate-add: the prior entry's size is subtracted
    /// before the new one is counted, so a racing double-load cannot
    /// inflate the aggregate.
    pub(crate) fn insert(&mut self, path: &Path, entry: CacheEntry) {
        let slot = self.entries.entry(path.to_path_buf()).or_default();
        self.size_bytes += entry.size_bytes();
        if let Some(existing) = slot
            .iter_mut()
            .find(|existing| existing.dimensions() == entry.dimensions())
        {
            self.size_bytes -= existing.size_bytes();
            *existing = entry;
        } else {
            slot.push(entry);
        }
    }

    /// Remove all entries for a path. Returns whether anything was removed.
    pub(crate) fn delete(&mut self, path: &Path) -> bool {
        match self.entries.remove(path) {
            Some(removed) => {
                for entry in &removed {
                    self.size_bytes -= entry.size_bytes();
                }
                true
            }
            None => false,
        }
    }

    /// Remove the single entry for `(path, dimensions)`.
    pub(crate) fn delete_at(&mut self, path: &Path, dimensions: Dimensions) -> bool {
        let Some(slot) = self.entries.get_mut(path) else {
            return false;
        };
        let Some(index) = slot
            .iter()
            .position(|entry| entry.dimensions() == dimensions)
        else {
            return false;
        };
        let removed = slot.remove(index);
        self.size_bytes -= removed.size_bytes();
        if slot.is_empty() {
            self.entries.remove(path);
        }
        true
    }

    /// Re-key all entries from `old` to `new` without touching pixel data.
    ///
    /// Entries stay resident, so the aggregate size is unchanged unless
    /// the destination already held an entry for the same dimensions, in
    /// which case that entry is replaced and its size subtracted.
    pub(crate) fn rename(&mut self, old: &Path, new: &Path) -> bool {
        let Some(moved) = self.entries.remove(old) else {
            return false;
        };
        let slot = self.entries.entry(new.to_path_buf()).or_default();
        for entry in moved {
            if let Some(existing) = slot
                .iter_mut()
                .find(|existing| existing.dimensions() == entry.dimensions())
            {
                self.size_bytes -= existing.size_bytes();
                *existing = entry;
            } else {
                slot.push(entry);
            }
        }
        true
    }

    /// Drop every resident entry.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.size_bytes = 0;
    }

    /// Aggregate resident size in bytes.
    pub(crate) fn size_bytes(&self) -> usize {
        self.size_bytes
    }

    /// Number of resident entries across all paths.
    pub(crate) fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }
}
