//! Process-wide append-only registries.
//!
//! # Responsibility
//! - Own the ordered sequence of every instance of one entity type.
//! - Hand out consistent snapshots to relationship queries.
//!
//! # Invariants
//! - Entries are only ever appended; insertion order is preserved.
//! - Duplicates are identity-based: the same handle pushed twice appears twice.
//! - Readers never hold the lock while scanning (copy-on-read).
//!
//! Uses `parking_lot::RwLock` so a panic while holding the lock cannot
//! poison the registry for the rest of the process.

use parking_lot::RwLock;

/// Ordered, append-only collection guarded by one lock.
pub struct Registry<T> {
    entries: RwLock<Vec<T>>,
}

impl<T: Clone> Registry<T> {
    /// Creates an empty registry; process-wide ones live in a `Lazy` static.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(Vec::new()),
        }
    }

    /// Appends one entry and returns the registry length after the push.
    pub fn push(&self, entry: T) -> usize {
        let mut entries = self.entries.write();
        entries.push(entry);
        entries.len()
    }

    /// Returns a copy of all entries in insertion order.
    pub fn snapshot(&self) -> Vec<T> {
        self.entries.read().clone()
    }

    /// Returns the snapshot entries accepted by `predicate`, in order.
    pub fn select(&self, predicate: impl FnMut(&T) -> bool) -> Vec<T> {
        let mut entries = self.snapshot();
        entries.retain(predicate);
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T: Clone> Default for Registry<T> {
    fn default() -> Self {
        Self::new()
    }
}
