//! Tree statistics.
//!
//! Lightweight counters tracking how many entries the tree holds and how
//! often nodes have split.

use core::sync::atomic::{AtomicUsize, Ordering};

/// Statistics for a B+Tree.
#[derive(Debug)]
pub struct TreeStats {
    /// Total number of key/value entries in the tree.
    total_entries: AtomicUsize,
    /// Number of leaf splits performed so far.
    leaf_splits: AtomicUsize,
    /// Number of internal-node splits performed so far.
    internal_splits: AtomicUsize,
}

impl TreeStats {
    /// Creates a new empty stats instance.
    pub fn new() -> Self {
        Self {
            total_entries: AtomicUsize::new(0),
            leaf_splits: AtomicUsize::new(0),
            internal_splits: AtomicUsize::new(0),
        }
    }

    /// Returns the total number of entries.
    pub fn total_entries(&self) -> usize {
        self.total_entries.load(Ordering::Relaxed)
    }

    /// Returns the number of leaf splits performed.
    pub fn leaf_splits(&self) -> usize {
        self.leaf_splits.load(Ordering::Relaxed)
    }

    /// Returns the number of internal-node splits performed.
    pub fn internal_splits(&self) -> usize {
        self.internal_splits.load(Ordering::Relaxed)
    }

    /// Increments the entry count by the given amount.
    pub fn add_entries(&self, count: usize) {
        self.total_entries.fetch_add(count, Ordering::Relaxed);
    }

    /// Records one leaf split.
    pub fn record_leaf_split(&self) {
        self.leaf_splits.fetch_add(1, Ordering::Relaxed);
    }

    /// Records one internal-node split.
    pub fn record_internal_split(&self) {
        self.internal_splits.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for TreeStats {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for TreeStats {
    fn clone(&self) -> Self {
        Self {
            total_entries: AtomicUsize::new(self.total_entries.load(Ordering::Relaxed)),
            leaf_splits: AtomicUsize::new(self.leaf_splits.load(Ordering::Relaxed)),
            internal_splits: AtomicUsize::new(self.internal_splits.load(Ordering::Relaxed)),
        }
    }
}
