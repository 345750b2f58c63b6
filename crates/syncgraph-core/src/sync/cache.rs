//! Adjacency cache strategies.
//!
//! Edge additions/removals and vertex removals go through the active strategy
//! so the mutation and its cache invalidation happen under one write-lock
//! hold. Two strategies exist:
//!
//! - [`NoCache`]: every adjacency query copies straight from the graph.
//! - [`AdjacencyCache`]: incident/incoming/outgoing edge sets are memoized per
//!   vertex and dropped when an edge touching that vertex changes.
//!
//! Swapping strategies happens only under the write lock and discards all
//! memoized state.

use dashmap::DashMap;
use rustc_hash::FxBuildHasher;

use crate::error::Result;
use crate::graph::Graph;

use super::snapshot::Snapshot;
use super::stats::{CacheStats, CacheStatsSnapshot};

/// Routing policy for adjacency queries and topology-changing mutations.
///
/// Query methods are called under the shared read lock, mutation methods
/// under the exclusive write lock.
pub(crate) trait CacheStrategy<G: Graph>: Send + Sync {
    fn is_enabled(&self) -> bool;

    fn add_edge(
        &self,
        graph: &mut G,
        source: &G::Vertex,
        target: &G::Vertex,
    ) -> Result<Option<G::Edge>>;

    fn add_edge_with(
        &self,
        graph: &mut G,
        source: &G::Vertex,
        target: &G::Vertex,
        edge: G::Edge,
    ) -> Result<bool>;

    fn remove_edge(&self, graph: &mut G, edge: &G::Edge) -> bool;

    fn remove_edge_between(
        &self,
        graph: &mut G,
        source: &G::Vertex,
        target: &G::Vertex,
    ) -> Option<G::Edge>;

    fn remove_vertex(&self, graph: &mut G, vertex: &G::Vertex) -> bool;

    fn edges_of(&self, graph: &G, vertex: &G::Vertex) -> Result<Snapshot<G::Edge>>;

    fn incoming_edges_of(&self, graph: &G, vertex: &G::Vertex) -> Result<Snapshot<G::Edge>>;

    fn outgoing_edges_of(&self, graph: &G, vertex: &G::Vertex) -> Result<Snapshot<G::Edge>>;

    fn stats(&self) -> Option<CacheStatsSnapshot> {
        None
    }
}

/// Passthrough strategy: no retained state, nothing to invalidate.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct NoCache;

impl<G: Graph> CacheStrategy<G> for NoCache {
    fn is_enabled(&self) -> bool {
        false
    }

    fn add_edge(
        &self,
        graph: &mut G,
        source: &G::Vertex,
        target: &G::Vertex,
    ) -> Result<Option<G::Edge>> {
        graph.add_edge(source, target)
    }

    fn add_edge_with(
        &self,
        graph: &mut G,
        source: &G::Vertex,
        target: &G::Vertex,
        edge: G::Edge,
    ) -> Result<bool> {
        graph.add_edge_with(source, target, edge)
    }

    fn remove_edge(&self, graph: &mut G, edge: &G::Edge) -> bool {
        graph.remove_edge(edge)
    }

    fn remove_edge_between(
        &self,
        graph: &mut G,
        source: &G::Vertex,
        target: &G::Vertex,
    ) -> Option<G::Edge> {
        graph.remove_edge_between(source, target)
    }

    fn remove_vertex(&self, graph: &mut G, vertex: &G::Vertex) -> bool {
        graph.remove_vertex(vertex)
    }

    fn edges_of(&self, graph: &G, vertex: &G::Vertex) -> Result<Snapshot<G::Edge>> {
        Ok(graph.edges_of(vertex)?.into_iter().collect())
    }

    fn incoming_edges_of(&self, graph: &G, vertex: &G::Vertex) -> Result<Snapshot<G::Edge>> {
        Ok(graph.incoming_edges_of(vertex)?.into_iter().collect())
    }

    fn outgoing_edges_of(&self, graph: &G, vertex: &G::Vertex) -> Result<Snapshot<G::Edge>> {
        Ok(graph.outgoing_edges_of(vertex)?.into_iter().collect())
    }
}

type AdjacencyMap<G> = DashMap<<G as Graph>::Vertex, Snapshot<<G as Graph>::Edge>, FxBuildHasher>;

/// Memoizing strategy with one vertex-keyed map per adjacency relation.
///
/// Invariant: an entry present for `(vertex, relation)` equals the live query
/// result; any entry that might be stale has been removed. The maps are
/// concurrent so readers sharing the outer read lock can populate them.
pub(crate) struct AdjacencyCache<G: Graph> {
    edges_of: AdjacencyMap<G>,
    incoming: AdjacencyMap<G>,
    outgoing: AdjacencyMap<G>,
    stats: CacheStats,
}

impl<G: Graph> AdjacencyCache<G> {
    pub(crate) fn new() -> Self {
        Self {
            edges_of: DashMap::with_hasher(FxBuildHasher),
            incoming: DashMap::with_hasher(FxBuildHasher),
            outgoing: DashMap::with_hasher(FxBuildHasher),
            stats: CacheStats::default(),
        }
    }

    fn lookup<F>(
        &self,
        map: &AdjacencyMap<G>,
        vertex: &G::Vertex,
        compute: F,
    ) -> Result<Snapshot<G::Edge>>
    where
        F: FnOnce() -> Result<Vec<G::Edge>>,
    {
        let cached = map.get(vertex).map(|entry| entry.value().clone());
        if let Some(snapshot) = cached {
            self.stats.record_hit();
            return Ok(snapshot);
        }
        self.stats.record_miss();
        tracing::trace!(vertex = ?vertex, "Adjacency cache miss");
        let snapshot: Snapshot<G::Edge> = compute()?.into_iter().collect();
        map.insert(vertex.clone(), snapshot.clone());
        Ok(snapshot)
    }

    /// Drops every entry an edge between `source` and `target` can affect.
    fn edge_modified(&self, graph: &G, source: &G::Vertex, target: &G::Vertex) {
        let mut dropped = [
            self.outgoing.remove(source).is_some(),
            self.incoming.remove(target).is_some(),
            self.edges_of.remove(source).is_some(),
            self.edges_of.remove(target).is_some(),
        ]
        .into_iter()
        .filter(|removed| *removed)
        .count();

        // Direction is symmetric, both endpoints' in/out views changed.
        if !graph.graph_type().is_directed() {
            dropped += usize::from(self.outgoing.remove(target).is_some());
            dropped += usize::from(self.incoming.remove(source).is_some());
        }

        tracing::trace!(
            source = ?source,
            target = ?target,
            dropped,
            "Invalidated adjacency cache entries"
        );
        self.stats.record_invalidations(dropped as u64);
    }

    fn clear(&self) {
        self.edges_of.clear();
        self.incoming.clear();
        self.outgoing.clear();
    }

    #[cfg(test)]
    pub(crate) fn cached_entries(&self) -> usize {
        self.edges_of.len() + self.incoming.len() + self.outgoing.len()
    }
}

impl<G: Graph> CacheStrategy<G> for AdjacencyCache<G> {
    fn is_enabled(&self) -> bool {
        true
    }

    fn add_edge(
        &self,
        graph: &mut G,
        source: &G::Vertex,
        target: &G::Vertex,
    ) -> Result<Option<G::Edge>> {
        let edge = graph.add_edge(source, target)?;
        if edge.is_some() {
            self.edge_modified(graph, source, target);
        }
        Ok(edge)
    }

    fn add_edge_with(
        &self,
        graph: &mut G,
        source: &G::Vertex,
        target: &G::Vertex,
        edge: G::Edge,
    ) -> Result<bool> {
        let added = graph.add_edge_with(source, target, edge)?;
        if added {
            self.edge_modified(graph, source, target);
        }
        Ok(added)
    }

    fn remove_edge(&self, graph: &mut G, edge: &G::Edge) -> bool {
        let (Ok(source), Ok(target)) = (graph.edge_source(edge), graph.edge_target(edge)) else {
            return false;
        };
        if !graph.remove_edge(edge) {
            return false;
        }
        self.edge_modified(graph, &source, &target);
        true
    }

    fn remove_edge_between(
        &self,
        graph: &mut G,
        source: &G::Vertex,
        target: &G::Vertex,
    ) -> Option<G::Edge> {
        let edge = graph.remove_edge_between(source, target)?;
        self.edge_modified(graph, source, target);
        Some(edge)
    }

    fn remove_vertex(&self, graph: &mut G, vertex: &G::Vertex) -> bool {
        if !graph.remove_vertex(vertex) {
            return false;
        }
        // Other vertices' entries may hold edges of the removed vertex.
        self.clear();
        self.stats.record_full_clear();
        tracing::debug!(vertex = ?vertex, "Vertex removed, adjacency cache cleared");
        true
    }

    fn edges_of(&self, graph: &G, vertex: &G::Vertex) -> Result<Snapshot<G::Edge>> {
        self.lookup(&self.edges_of, vertex, || graph.edges_of(vertex))
    }

    fn incoming_edges_of(&self, graph: &G, vertex: &G::Vertex) -> Result<Snapshot<G::Edge>> {
        self.lookup(&self.incoming, vertex, || graph.incoming_edges_of(vertex))
    }

    fn outgoing_edges_of(&self, graph: &G, vertex: &G::Vertex) -> Result<Snapshot<G::Edge>> {
        self.lookup(&self.outgoing, vertex, || graph.outgoing_edges_of(vertex))
    }

    fn stats(&self) -> Option<CacheStatsSnapshot> {
        Some(self.stats.snapshot())
    }
}

/// The strategy currently installed in a synchronized graph.
pub(crate) enum CacheMode<G: Graph> {
    Disabled(NoCache),
    Enabled(AdjacencyCache<G>),
}

impl<G: Graph> CacheMode<G> {
    pub(crate) fn new(enabled: bool) -> Self {
        if enabled {
            Self::Enabled(AdjacencyCache::new())
        } else {
            Self::Disabled(NoCache)
        }
    }

    pub(crate) fn strategy(&self) -> &dyn CacheStrategy<G> {
        match self {
            Self::Disabled(strategy) => strategy,
            Self::Enabled(strategy) => strategy,
        }
    }
}
