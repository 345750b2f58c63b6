//! Reader-writer synchronized graph decorator.
//!
//! [`SynchronizedGraph`] wraps any [`Graph`] behind a single
//! `parking_lot::RwLock`. Queries share the read lock; structural writes take
//! the write lock for their whole duration. Adjacency queries and the
//! mutations that invalidate them are routed through the active cache
//! strategy, and the vertex/edge set views iterate lazily-built snapshots.
//!
//! # Concurrency model
//!
//! - Many concurrent readers, or exactly one writer, never both.
//! - Every operation either completes fully or fails before mutating state.
//! - Handles taken from an earlier snapshot may refer to elements another
//!   thread has since removed; using them then fails with a not-found error.
//!   No per-element locking closes that window.
//!
//! # Example
//!
//! ```rust
//! use syncgraph_core::graph::SimpleGraph;
//! use syncgraph_core::Builder;
//!
//! let graph = Builder::new()
//!     .cache_enable()
//!     .build(SimpleGraph::directed());
//!
//! graph.add_vertex("A");
//! graph.add_vertex("B");
//! let edge = graph.add_edge(&"A", &"B").unwrap().unwrap();
//!
//! let outgoing = graph.outgoing_edges_of(&"A").unwrap();
//! assert!(outgoing.contains(&edge));
//! assert!(graph.is_cache_enabled());
//! ```

mod builder;
mod cache;
mod snapshot;
mod stats;
mod view;

#[cfg(test)]
mod testing;
#[cfg(test)]
mod view_tests;

use std::fmt;
use std::hash::{Hash, Hasher};

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::config::SyncGraphConfig;
use crate::error::Result;
use crate::graph::{Graph, GraphType};

use cache::CacheMode;
use snapshot::SnapshotCell;
use view::SetAccess;

pub use builder::Builder;
pub use snapshot::{Snapshot, SnapshotIter};
pub use stats::CacheStatsSnapshot;
pub use view::{EdgeSetView, SetView, VertexSetView};

/// State guarded by the lock: the graph and the strategy that fronts it.
struct Inner<G: Graph> {
    graph: G,
    cache: CacheMode<G>,
}

/// Thread-safe decorator around a mutable graph.
///
/// Share it across threads with `Arc<SynchronizedGraph<G>>`; every method
/// takes `&self`.
pub struct SynchronizedGraph<G: Graph> {
    inner: RwLock<Inner<G>>,
    fair: bool,
    vertex_snapshot: SnapshotCell<G::Vertex>,
    edge_snapshot: SnapshotCell<G::Edge>,
}

impl<G: Graph> SynchronizedGraph<G> {
    /// Wraps a graph with caching disabled and a non-fair lock.
    #[must_use]
    pub fn new(graph: G) -> Self {
        Self::with_options(graph, false, false)
    }

    /// Wraps a graph using loaded configuration.
    #[must_use]
    pub fn from_config(graph: G, config: &SyncGraphConfig) -> Self {
        Builder::from_config(config).build(graph)
    }

    pub(crate) fn with_options(graph: G, cache_enabled: bool, fair: bool) -> Self {
        // Some graphs build per-vertex bookkeeping lazily; force it now so no
        // reader ever races its construction.
        for vertex in graph.vertices() {
            let _ = graph.in_degree_of(vertex);
            let _ = graph.out_degree_of(vertex);
        }
        tracing::debug!(
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            cache_enabled,
            fair,
            "Created synchronized graph"
        );
        Self {
            inner: RwLock::new(Inner {
                graph,
                cache: CacheMode::new(cache_enabled),
            }),
            fair,
            vertex_snapshot: SnapshotCell::new(),
            edge_snapshot: SnapshotCell::new(),
        }
    }

    /// Runs `f` under the shared lock.
    ///
    /// Recursive acquisition: a read nested inside another read on the same
    /// thread must not queue behind a waiting writer.
    fn read<R>(&self, f: impl FnOnce(&Inner<G>) -> R) -> R {
        let guard = self.inner.read_recursive();
        let out = f(&guard);
        if self.fair {
            RwLockReadGuard::unlock_fair(guard);
        } else {
            drop(guard);
        }
        out
    }

    /// Runs `f` under the exclusive lock.
    fn write<R>(&self, f: impl FnOnce(&mut Inner<G>) -> R) -> R {
        let mut guard = self.inner.write();
        let out = f(&mut guard);
        if self.fair {
            RwLockWriteGuard::unlock_fair(guard);
        } else {
            drop(guard);
        }
        out
    }

    // ── Writes ─────────────────────────────────────────────────────────

    /// Adds a vertex. Returns false if it was already present.
    pub fn add_vertex(&self, vertex: G::Vertex) -> bool {
        self.write(|inner| {
            if !inner.graph.add_vertex(vertex.clone()) {
                return false;
            }
            self.vertex_snapshot.invalidate();
            // Materialize lazily-built bookkeeping before readers can see it.
            let _ = inner.graph.in_degree_of(&vertex);
            let _ = inner.graph.out_degree_of(&vertex);
            true
        })
    }

    /// Creates a new edge between two existing vertices.
    ///
    /// Returns `Ok(None)` if the underlying graph declined to add it.
    pub fn add_edge(&self, source: &G::Vertex, target: &G::Vertex) -> Result<Option<G::Edge>> {
        self.write(|inner| {
            let edge = inner
                .cache
                .strategy()
                .add_edge(&mut inner.graph, source, target)?;
            if edge.is_some() {
                self.edge_snapshot.invalidate();
            }
            Ok(edge)
        })
    }

    /// Inserts a caller-supplied edge. Returns false if it was not added.
    pub fn add_edge_with(
        &self,
        source: &G::Vertex,
        target: &G::Vertex,
        edge: G::Edge,
    ) -> Result<bool> {
        self.write(|inner| {
            let added = inner
                .cache
                .strategy()
                .add_edge_with(&mut inner.graph, source, target, edge)?;
            if added {
                self.edge_snapshot.invalidate();
            }
            Ok(added)
        })
    }

    /// Removes a vertex and all edges touching it.
    pub fn remove_vertex(&self, vertex: &G::Vertex) -> bool {
        self.write(|inner| {
            let removed = inner
                .cache
                .strategy()
                .remove_vertex(&mut inner.graph, vertex);
            if removed {
                self.edge_snapshot.invalidate();
                self.vertex_snapshot.invalidate();
            }
            removed
        })
    }

    /// Removes an edge. Returns false if it was not present.
    pub fn remove_edge(&self, edge: &G::Edge) -> bool {
        self.write(|inner| {
            let removed = inner.cache.strategy().remove_edge(&mut inner.graph, edge);
            if removed {
                self.edge_snapshot.invalidate();
            }
            removed
        })
    }

    /// Removes one edge from `source` to `target` and returns it.
    pub fn remove_edge_between(
        &self,
        source: &G::Vertex,
        target: &G::Vertex,
    ) -> Option<G::Edge> {
        self.write(|inner| {
            let edge = inner
                .cache
                .strategy()
                .remove_edge_between(&mut inner.graph, source, target);
            if edge.is_some() {
                self.edge_snapshot.invalidate();
            }
            edge
        })
    }

    /// Removes every listed edge under one write-lock hold.
    ///
    /// Returns true if at least one edge was removed.
    pub fn remove_all_edges(&self, edges: &[G::Edge]) -> bool {
        self.write(|inner| {
            let strategy = inner.cache.strategy();
            let mut changed = false;
            for edge in edges {
                changed |= strategy.remove_edge(&mut inner.graph, edge);
            }
            if changed {
                self.edge_snapshot.invalidate();
            }
            changed
        })
    }

    /// Removes every edge connecting `source` to `target` and returns them.
    ///
    /// # Errors
    ///
    /// Returns `Error::VertexNotFound` if either endpoint is absent.
    pub fn remove_all_edges_between(
        &self,
        source: &G::Vertex,
        target: &G::Vertex,
    ) -> Result<Vec<G::Edge>> {
        self.write(|inner| {
            let strategy = inner.cache.strategy();
            let candidates = inner.graph.all_edges_between(source, target)?;
            let mut removed = Vec::with_capacity(candidates.len());
            for edge in candidates {
                if strategy.remove_edge(&mut inner.graph, &edge) {
                    removed.push(edge);
                }
            }
            if !removed.is_empty() {
                self.edge_snapshot.invalidate();
            }
            Ok(removed)
        })
    }

    /// Removes every listed vertex under one write-lock hold.
    ///
    /// Returns true if at least one vertex was removed.
    pub fn remove_all_vertices(&self, vertices: &[G::Vertex]) -> bool {
        self.write(|inner| {
            let strategy = inner.cache.strategy();
            let mut changed = false;
            for vertex in vertices {
                changed |= strategy.remove_vertex(&mut inner.graph, vertex);
            }
            if changed {
                self.edge_snapshot.invalidate();
                self.vertex_snapshot.invalidate();
            }
            changed
        })
    }

    /// Changes the weight of an edge.
    pub fn set_edge_weight(&self, edge: &G::Edge, weight: f64) -> Result<()> {
        self.write(|inner| inner.graph.set_edge_weight(edge, weight))
    }

    /// Switches adjacency caching on or off.
    ///
    /// Any memoized state is discarded; switching to the current mode is a
    /// no-op.
    pub fn set_cache(&self, enabled: bool) -> &Self {
        self.write(|inner| {
            if inner.cache.strategy().is_enabled() == enabled {
                return;
            }
            inner.cache = CacheMode::new(enabled);
            tracing::debug!(cache_enabled = enabled, "Switched adjacency cache mode");
        });
        self
    }

    // ── Reads ──────────────────────────────────────────────────────────

    /// Returns true if adjacency caching is active.
    #[must_use]
    pub fn is_cache_enabled(&self) -> bool {
        self.read(|inner| inner.cache.strategy().is_enabled())
    }

    /// Returns true if the lock hands off fairly. Fixed at construction.
    #[must_use]
    pub fn is_fair(&self) -> bool {
        self.fair
    }

    /// Returns cache counters, or `None` while caching is disabled.
    #[must_use]
    pub fn cache_stats(&self) -> Option<CacheStatsSnapshot> {
        self.read(|inner| inner.cache.strategy().stats())
    }

    /// Returns the structural properties of the underlying graph.
    #[must_use]
    pub fn graph_type(&self) -> GraphType {
        self.read(|inner| inner.graph.graph_type())
    }

    /// Returns true if the vertex is part of the graph.
    #[must_use]
    pub fn contains_vertex(&self, vertex: &G::Vertex) -> bool {
        self.read(|inner| inner.graph.contains_vertex(vertex))
    }

    /// Returns true if the edge is part of the graph.
    #[must_use]
    pub fn contains_edge(&self, edge: &G::Edge) -> bool {
        self.read(|inner| inner.graph.contains_edge(edge))
    }

    /// Returns true if an edge connects `source` to `target`.
    #[must_use]
    pub fn contains_edge_between(&self, source: &G::Vertex, target: &G::Vertex) -> bool {
        self.read(|inner| inner.graph.contains_edge_between(source, target))
    }

    /// Returns the number of edges touching a vertex.
    pub fn degree_of(&self, vertex: &G::Vertex) -> Result<usize> {
        self.read(|inner| inner.graph.degree_of(vertex))
    }

    /// Returns the number of edges entering a vertex.
    pub fn in_degree_of(&self, vertex: &G::Vertex) -> Result<usize> {
        self.read(|inner| inner.graph.in_degree_of(vertex))
    }

    /// Returns the number of edges leaving a vertex.
    pub fn out_degree_of(&self, vertex: &G::Vertex) -> Result<usize> {
        self.read(|inner| inner.graph.out_degree_of(vertex))
    }

    /// Returns every edge touching a vertex as an immutable snapshot.
    pub fn edges_of(&self, vertex: &G::Vertex) -> Result<Snapshot<G::Edge>> {
        self.read(|inner| inner.cache.strategy().edges_of(&inner.graph, vertex))
    }

    /// Returns the edges entering a vertex as an immutable snapshot.
    pub fn incoming_edges_of(&self, vertex: &G::Vertex) -> Result<Snapshot<G::Edge>> {
        self.read(|inner| {
            inner
                .cache
                .strategy()
                .incoming_edges_of(&inner.graph, vertex)
        })
    }

    /// Returns the edges leaving a vertex as an immutable snapshot.
    pub fn outgoing_edges_of(&self, vertex: &G::Vertex) -> Result<Snapshot<G::Edge>> {
        self.read(|inner| {
            inner
                .cache
                .strategy()
                .outgoing_edges_of(&inner.graph, vertex)
        })
    }

    /// Returns one edge connecting `source` to `target`, if any.
    #[must_use]
    pub fn edge_between(&self, source: &G::Vertex, target: &G::Vertex) -> Option<G::Edge> {
        self.read(|inner| inner.graph.edge_between(source, target))
    }

    /// Returns every edge connecting `source` to `target`.
    pub fn all_edges_between(
        &self,
        source: &G::Vertex,
        target: &G::Vertex,
    ) -> Result<Vec<G::Edge>> {
        self.read(|inner| inner.graph.all_edges_between(source, target))
    }

    /// Returns the source vertex of an edge.
    pub fn edge_source(&self, edge: &G::Edge) -> Result<G::Vertex> {
        self.read(|inner| inner.graph.edge_source(edge))
    }

    /// Returns the target vertex of an edge.
    pub fn edge_target(&self, edge: &G::Edge) -> Result<G::Vertex> {
        self.read(|inner| inner.graph.edge_target(edge))
    }

    /// Returns the weight of an edge.
    pub fn edge_weight(&self, edge: &G::Edge) -> Result<f64> {
        self.read(|inner| inner.graph.edge_weight(edge))
    }

    /// Read-only view of the vertex set.
    #[must_use]
    pub fn vertex_set(&self) -> VertexSetView<'_, G> {
        SetView::new(
            self,
            &self.vertex_snapshot,
            SetAccess {
                len: G::vertex_count,
                contains: G::contains_vertex,
                for_each: |graph, f| graph.vertices().for_each(f),
            },
        )
    }

    /// Read-only view of the edge set.
    #[must_use]
    pub fn edge_set(&self) -> EdgeSetView<'_, G> {
        SetView::new(
            self,
            &self.edge_snapshot,
            SetAccess {
                len: G::edge_count,
                contains: G::contains_edge,
                for_each: |graph, f| graph.edges().for_each(f),
            },
        )
    }

    /// Runs `f` against the underlying graph under one read-lock hold.
    ///
    /// Useful for algorithms that need several queries to observe the same
    /// state. `f` may call other read operations on this graph but must not
    /// call its write operations.
    pub fn with_graph<R>(&self, f: impl FnOnce(&G) -> R) -> R {
        self.read(|inner| f(&inner.graph))
    }

    /// Unwraps the decorator and returns the underlying graph.
    #[must_use]
    pub fn into_inner(self) -> G {
        self.inner.into_inner().graph
    }
}

impl<G: Graph> From<G> for SynchronizedGraph<G> {
    fn from(graph: G) -> Self {
        Self::new(graph)
    }
}

impl<G: Graph + Default> Default for SynchronizedGraph<G> {
    fn default() -> Self {
        Self::new(G::default())
    }
}

/// Equal exactly when the underlying graphs are equal.
impl<G: Graph + PartialEq> PartialEq for SynchronizedGraph<G> {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        // Lock in address order so concurrent `a == b` and `b == a` cannot deadlock.
        let (first, second) = if std::ptr::from_ref(self) < std::ptr::from_ref(other) {
            (self, other)
        } else {
            (other, self)
        };
        first.read(|a| second.read(|b| a.graph == b.graph))
    }
}

impl<G: Graph + Eq> Eq for SynchronizedGraph<G> {}

impl<G: Graph + Hash> Hash for SynchronizedGraph<G> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.read(|inner| inner.graph.hash(state));
    }
}

impl<G: Graph + fmt::Display> fmt::Display for SynchronizedGraph<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|inner| fmt::Display::fmt(&inner.graph, f))
    }
}

impl<G: Graph> fmt::Debug for SynchronizedGraph<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|inner| {
            f.debug_struct("SynchronizedGraph")
                .field("vertices", &inner.graph.vertex_count())
                .field("edges", &inner.graph.edge_count())
                .field("cache_enabled", &inner.cache.strategy().is_enabled())
                .field("fair", &self.fair)
                .finish()
        })
    }
}
