//! Read-only vertex and edge set views.
//!
//! Size, membership and bulk export read the live graph under the shared
//! lock. Iteration walks an immutable snapshot that is built on first use and
//! reused until a mutation changes set membership, so an iterator never
//! observes a half-applied write and is never invalidated by one.

use std::fmt;

use rayon::prelude::*;

use crate::error::Result;
use crate::graph::Graph;

use super::snapshot::{unmodifiable, FxIndexSet, Snapshot, SnapshotCell, SnapshotIter};
use super::SynchronizedGraph;

/// Live accessors a view uses against the underlying graph.
pub(crate) struct SetAccess<G, T> {
    pub(crate) len: fn(&G) -> usize,
    pub(crate) contains: fn(&G, &T) -> bool,
    pub(crate) for_each: fn(&G, &mut dyn FnMut(&T)),
}

/// Unmodifiable, set-like view over the vertices or edges of a
/// [`SynchronizedGraph`].
///
/// # Example
///
/// ```rust
/// use syncgraph_core::graph::SimpleGraph;
/// use syncgraph_core::SynchronizedGraph;
///
/// let graph = SynchronizedGraph::new(SimpleGraph::<u32>::directed());
/// graph.add_vertex(1);
/// graph.add_vertex(2);
///
/// let vertices = graph.vertex_set();
/// assert_eq!(vertices.len(), 2);
/// assert!(vertices.insert(3).is_err());
///
/// // Iteration is over a frozen copy; mutating meanwhile is safe.
/// for v in &vertices {
///     graph.add_vertex(v + 10);
/// }
/// assert_eq!(vertices.len(), 4);
/// ```
pub struct SetView<'g, G: Graph, T> {
    graph: &'g SynchronizedGraph<G>,
    cell: &'g SnapshotCell<T>,
    access: SetAccess<G, T>,
}

/// View over the vertex set.
pub type VertexSetView<'g, G> = SetView<'g, G, <G as Graph>::Vertex>;

/// View over the edge set.
pub type EdgeSetView<'g, G> = SetView<'g, G, <G as Graph>::Edge>;

impl<'g, G, T> SetView<'g, G, T>
where
    G: Graph,
    T: Clone + Eq + std::hash::Hash + Send + Sync,
{
    pub(crate) fn new(
        graph: &'g SynchronizedGraph<G>,
        cell: &'g SnapshotCell<T>,
        access: SetAccess<G, T>,
    ) -> Self {
        Self {
            graph,
            cell,
            access,
        }
    }

    /// Returns the live number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.read(|inner| (self.access.len)(&inner.graph))
    }

    /// Returns true if the set is currently empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if `item` is currently in the set.
    #[must_use]
    pub fn contains(&self, item: &T) -> bool {
        self.graph
            .read(|inner| (self.access.contains)(&inner.graph, item))
    }

    /// Returns true if every item is currently in the set.
    ///
    /// All items are checked under a single read-lock hold.
    pub fn contains_all<'a, I>(&self, items: I) -> bool
    where
        I: IntoIterator<Item = &'a T>,
        T: 'a,
    {
        self.graph.read(|inner| {
            items
                .into_iter()
                .all(|item| (self.access.contains)(&inner.graph, item))
        })
    }

    /// Copies the live set into a vector.
    #[must_use]
    pub fn to_vec(&self) -> Vec<T> {
        let mut out = Vec::new();
        self.for_each(|item| out.push(item.clone()));
        out
    }

    /// Visits the live set under the read lock.
    ///
    /// `f` may query the same graph, but must not call its mutating
    /// operations: the write lock cannot be taken while this read lock is held.
    pub fn for_each<F: FnMut(&T)>(&self, mut f: F) {
        self.graph
            .read(|inner| (self.access.for_each)(&inner.graph, &mut f));
    }

    /// Returns the current immutable snapshot, building it if needed.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot<T> {
        self.graph.read(|inner| {
            self.cell.get_or_build(|| {
                let mut items = FxIndexSet::default();
                (self.access.for_each)(&inner.graph, &mut |item: &T| {
                    items.insert(item.clone());
                });
                items
            })
        })
    }

    /// Iterates over the snapshot.
    #[must_use]
    pub fn iter(&self) -> SnapshotIter<T> {
        self.snapshot().into_iter()
    }

    /// Visits the snapshot in parallel.
    pub fn par_for_each<F>(&self, f: F)
    where
        F: Fn(&T) + Send + Sync,
    {
        self.snapshot().par_iter().for_each(f);
    }

    /// Always fails: the view is read-only.
    pub fn insert(&self, _item: T) -> Result<bool> {
        Err(unmodifiable())
    }

    /// Always fails: the view is read-only.
    pub fn remove(&self, _item: &T) -> Result<bool> {
        Err(unmodifiable())
    }

    /// Always fails: the view is read-only.
    pub fn clear(&self) -> Result<()> {
        Err(unmodifiable())
    }

    /// Always fails: the view is read-only.
    pub fn retain<F: FnMut(&T) -> bool>(&self, _keep: F) -> Result<()> {
        Err(unmodifiable())
    }
}

impl<G, T> IntoIterator for &SetView<'_, G, T>
where
    G: Graph,
    T: Clone + Eq + std::hash::Hash + Send + Sync,
{
    type Item = T;
    type IntoIter = SnapshotIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<G, T> fmt::Display for SetView<'_, G, T>
where
    G: Graph,
    T: Clone + Eq + std::hash::Hash + Send + Sync + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut result = write!(f, "[");
        let mut first = true;
        self.for_each(|item| {
            if result.is_ok() {
                result = if first {
                    write!(f, "{item}")
                } else {
                    write!(f, ", {item}")
                };
            }
            first = false;
        });
        result?;
        write!(f, "]")
    }
}

impl<G, T> fmt::Debug for SetView<'_, G, T>
where
    G: Graph,
    T: Clone + Eq + std::hash::Hash + Send + Sync + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.to_vec()).finish()
    }
}
