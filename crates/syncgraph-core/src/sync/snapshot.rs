//! Immutable set snapshots and the lazily-filled slot that holds them.

use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;
use std::sync::Arc;

use arc_swap::ArcSwapOption;
use indexmap::IndexSet;
use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::FxBuildHasher;

use crate::error::{Error, Result};

pub(crate) type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

const UNMODIFIABLE: &str = "this set is unmodifiable";

pub(crate) fn unmodifiable() -> Error {
    Error::UnsupportedOperation(UNMODIFIABLE.to_string())
}

/// Immutable, insertion-ordered set shared by reference counting.
///
/// Returned by adjacency queries and by vertex/edge set views. Cloning is
/// O(1). The contents never change once built; the mutators exist only to
/// report [`Error::UnsupportedOperation`].
///
/// # Example
///
/// ```rust
/// use syncgraph_core::Snapshot;
///
/// let snapshot: Snapshot<u32> = [3, 1, 2].into_iter().collect();
/// assert_eq!(snapshot.to_vec(), vec![3, 1, 2]);
/// assert!(snapshot.insert(4).is_err());
/// assert_eq!(snapshot.len(), 3);
/// ```
pub struct Snapshot<T> {
    items: Arc<FxIndexSet<T>>,
}

impl<T> Snapshot<T> {
    fn from_shared(items: Arc<FxIndexSet<T>>) -> Self {
        Self { items }
    }

    /// Returns the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the snapshot holds no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Iterates over the elements in insertion order.
    pub fn iter(&self) -> indexmap::set::Iter<'_, T> {
        self.items.iter()
    }

    /// Returns the element at `index` in iteration order.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get_index(index)
    }

    /// Returns true if both snapshots share the same storage.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.items, &other.items)
    }

    /// Always fails: snapshots are read-only.
    pub fn insert(&self, _item: T) -> Result<bool> {
        Err(unmodifiable())
    }

    /// Always fails: snapshots are read-only.
    pub fn remove(&self, _item: &T) -> Result<bool> {
        Err(unmodifiable())
    }

    /// Always fails: snapshots are read-only.
    pub fn clear(&self) -> Result<()> {
        Err(unmodifiable())
    }

    /// Always fails: snapshots are read-only.
    pub fn retain<F: FnMut(&T) -> bool>(&self, _keep: F) -> Result<()> {
        Err(unmodifiable())
    }
}

impl<T: Hash + Eq> Snapshot<T> {
    /// Returns true if the snapshot contains `item`.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.items.contains(item)
    }
}

impl<T: Clone> Snapshot<T> {
    /// Copies the elements into a vector, preserving order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        self.items.iter().cloned().collect()
    }
}

impl<T: Sync> Snapshot<T> {
    /// Parallel iterator over the elements.
    pub fn par_iter(&self) -> impl ParallelIterator<Item = &T> + '_ {
        self.items.par_iter()
    }
}

impl<T> Clone for Snapshot<T> {
    fn clone(&self) -> Self {
        Self {
            items: Arc::clone(&self.items),
        }
    }
}

impl<T: Hash + Eq> FromIterator<T> for Snapshot<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_shared(Arc::new(iter.into_iter().collect()))
    }
}

/// Set equality: order is ignored.
impl<T: Hash + Eq> PartialEq for Snapshot<T> {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other) || *self.items == *other.items
    }
}

impl<T: Hash + Eq> Eq for Snapshot<T> {}

impl<T: fmt::Debug> fmt::Debug for Snapshot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.items.iter()).finish()
    }
}

impl<'a, T> IntoIterator for &'a Snapshot<T> {
    type Item = &'a T;
    type IntoIter = indexmap::set::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T: Clone> IntoIterator for Snapshot<T> {
    type Item = T;
    type IntoIter = SnapshotIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        let back = self.items.len();
        SnapshotIter {
            items: self.items,
            front: 0,
            back,
        }
    }
}

/// Owning iterator over a [`Snapshot`], yielding cloned elements.
///
/// Holds the snapshot alive on its own, so it is unaffected by graph
/// mutations that happen while it is being consumed.
pub struct SnapshotIter<T> {
    items: Arc<FxIndexSet<T>>,
    front: usize,
    back: usize,
}

impl<T: Clone> Iterator for SnapshotIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.front >= self.back {
            return None;
        }
        let item = self.items.get_index(self.front).cloned();
        self.front += 1;
        item
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }
}

impl<T: Clone> DoubleEndedIterator for SnapshotIter<T> {
    fn next_back(&mut self) -> Option<T> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.items.get_index(self.back).cloned()
    }
}

impl<T: Clone> ExactSizeIterator for SnapshotIter<T> {}

impl<T: Clone> FusedIterator for SnapshotIter<T> {}

/// Lazily-built snapshot slot with double-checked construction.
///
/// Callers hold the graph's shared read lock while calling
/// [`get_or_build`](Self::get_or_build) and the exclusive write lock while
/// calling [`invalidate`](Self::invalidate), so a snapshot is never built
/// from a graph that is being mutated.
pub(crate) struct SnapshotCell<T> {
    slot: ArcSwapOption<FxIndexSet<T>>,
    build_lock: Mutex<()>,
}

impl<T> SnapshotCell<T> {
    pub(crate) fn new() -> Self {
        Self {
            slot: ArcSwapOption::empty(),
            build_lock: Mutex::new(()),
        }
    }

    /// Returns the stored snapshot, building it exactly once if absent.
    pub(crate) fn get_or_build<F>(&self, build: F) -> Snapshot<T>
    where
        F: FnOnce() -> FxIndexSet<T>,
    {
        if let Some(items) = self.slot.load_full() {
            return Snapshot::from_shared(items);
        }
        let _guard = self.build_lock.lock();
        // Another reader may have built it while we waited.
        if let Some(items) = self.slot.load_full() {
            return Snapshot::from_shared(items);
        }
        let items = Arc::new(build());
        self.slot.store(Some(Arc::clone(&items)));
        Snapshot::from_shared(items)
    }

    /// Drops the stored snapshot; the next iteration rebuilds it.
    pub(crate) fn invalidate(&self) {
        self.slot.store(None);
    }

    #[cfg(test)]
    pub(crate) fn is_built(&self) -> bool {
        self.slot.load().is_some()
    }
}
