//! In-memory reference graph with bidirectional adjacency indexing.

use std::fmt;
use std::hash::{Hash, Hasher};

use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxBuildHasher, FxHasher};

use crate::error::{Error, Result};

use super::types::{EdgeId, GraphType, DEFAULT_EDGE_WEIGHT};
use super::Graph;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Per-vertex edge index.
#[derive(Debug, Clone, Default)]
struct Adjacency {
    /// Edges whose source is this vertex.
    outgoing: FxIndexSet<EdgeId>,
    /// Edges whose target is this vertex.
    incoming: FxIndexSet<EdgeId>,
}

#[derive(Debug, Clone, PartialEq)]
struct EdgeRecord<V> {
    source: V,
    target: V,
    weight: f64,
}

/// In-memory graph over arbitrary vertex values.
///
/// Vertices and edges keep insertion order. Every edge is indexed from both
/// endpoints, so adjacency queries cost O(degree). Edges are identified by
/// [`EdgeId`] values drawn from a monotonically increasing counter.
///
/// Undirected graphs store each edge once, oriented as it was added; incoming
/// and outgoing queries then both return every incident edge.
#[derive(Debug, Clone)]
pub struct SimpleGraph<V> {
    graph_type: GraphType,
    vertices: FxIndexMap<V, Adjacency>,
    edges: FxIndexMap<EdgeId, EdgeRecord<V>>,
    next_edge_id: u64,
}

impl<V> SimpleGraph<V>
where
    V: Clone + Eq + Hash + fmt::Debug,
{
    /// Creates an empty graph of the given type.
    #[must_use]
    pub fn new(graph_type: GraphType) -> Self {
        Self {
            graph_type,
            vertices: FxIndexMap::default(),
            edges: FxIndexMap::default(),
            next_edge_id: 0,
        }
    }

    /// Creates an empty directed graph.
    #[must_use]
    pub fn directed() -> Self {
        Self::new(GraphType::directed())
    }

    /// Creates an empty undirected graph.
    #[must_use]
    pub fn undirected() -> Self {
        Self::new(GraphType::undirected())
    }

    fn adjacency(&self, vertex: &V) -> Result<&Adjacency> {
        self.vertices
            .get(vertex)
            .ok_or_else(|| Error::vertex_not_found(vertex))
    }

    fn record(&self, edge: &EdgeId) -> Result<&EdgeRecord<V>> {
        self.edges.get(edge).ok_or_else(|| Error::edge_not_found(edge))
    }

    fn check_endpoints(&self, source: &V, target: &V) -> Result<()> {
        if !self.vertices.contains_key(source) {
            return Err(Error::vertex_not_found(source));
        }
        if !self.vertices.contains_key(target) {
            return Err(Error::vertex_not_found(target));
        }
        if source == target && !self.graph_type.allows_self_loops() {
            return Err(Error::InvalidArgument(format!(
                "self-loops are not allowed: {source:?}"
            )));
        }
        Ok(())
    }

    /// True if `id` joins `source` and `target` in a direction the graph honours.
    fn joins(&self, id: &EdgeId, source: &V, target: &V) -> bool {
        self.edges.get(id).is_some_and(|r| {
            (r.source == *source && r.target == *target)
                || (!self.graph_type.is_directed() && r.source == *target && r.target == *source)
        })
    }

    fn link(&mut self, id: EdgeId, source: &V, target: &V) {
        if let Some(adj) = self.vertices.get_mut(source) {
            adj.outgoing.insert(id);
        }
        if let Some(adj) = self.vertices.get_mut(target) {
            adj.incoming.insert(id);
        }
        self.edges.insert(
            id,
            EdgeRecord {
                source: source.clone(),
                target: target.clone(),
                weight: DEFAULT_EDGE_WEIGHT,
            },
        );
    }

    fn unlink(&mut self, id: &EdgeId) -> Option<EdgeRecord<V>> {
        let record = self.edges.shift_remove(id)?;
        if let Some(adj) = self.vertices.get_mut(&record.source) {
            adj.outgoing.shift_remove(id);
        }
        if let Some(adj) = self.vertices.get_mut(&record.target) {
            adj.incoming.shift_remove(id);
        }
        Some(record)
    }

    /// Hands out the next unused generated id.
    ///
    /// `u64::MAX` is never generated, so the counter cannot overflow.
    fn allocate_edge_id(&mut self) -> Result<EdgeId> {
        while self.next_edge_id < u64::MAX {
            let id = EdgeId::new(self.next_edge_id);
            self.next_edge_id += 1;
            if !self.edges.contains_key(&id) {
                return Ok(id);
            }
        }
        Err(Error::InvalidArgument("edge id space exhausted".to_string()))
    }

    fn incident(adj: &Adjacency) -> Vec<EdgeId> {
        adj.outgoing
            .iter()
            .chain(adj.incoming.iter())
            .copied()
            .collect::<FxIndexSet<_>>()
            .into_iter()
            .collect()
    }
}

impl<V> Default for SimpleGraph<V>
where
    V: Clone + Eq + Hash + fmt::Debug,
{
    fn default() -> Self {
        Self::directed()
    }
}

impl<V> Graph for SimpleGraph<V>
where
    V: Clone + Eq + Hash + fmt::Debug + Send + Sync,
{
    type Vertex = V;
    type Edge = EdgeId;

    fn graph_type(&self) -> GraphType {
        self.graph_type
    }

    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    fn edge_count(&self) -> usize {
        self.edges.len()
    }

    fn vertices(&self) -> impl Iterator<Item = &V> {
        self.vertices.keys()
    }

    fn edges(&self) -> impl Iterator<Item = &EdgeId> {
        self.edges.keys()
    }

    fn contains_vertex(&self, vertex: &V) -> bool {
        self.vertices.contains_key(vertex)
    }

    fn contains_edge(&self, edge: &EdgeId) -> bool {
        self.edges.contains_key(edge)
    }

    fn edge_between(&self, source: &V, target: &V) -> Option<EdgeId> {
        let adj = self.vertices.get(source)?;
        let reverse = (!self.graph_type.is_directed()).then(|| adj.incoming.iter());
        adj.outgoing
            .iter()
            .chain(reverse.into_iter().flatten())
            .copied()
            .find(|id| self.joins(id, source, target))
    }

    fn all_edges_between(&self, source: &V, target: &V) -> Result<Vec<EdgeId>> {
        let adj = self.adjacency(source)?;
        self.adjacency(target)?;
        let mut found: FxIndexSet<EdgeId> = adj
            .outgoing
            .iter()
            .copied()
            .filter(|id| self.joins(id, source, target))
            .collect();
        if !self.graph_type.is_directed() {
            found.extend(
                adj.incoming
                    .iter()
                    .copied()
                    .filter(|id| self.joins(id, source, target)),
            );
        }
        Ok(found.into_iter().collect())
    }

    fn edge_source(&self, edge: &EdgeId) -> Result<V> {
        Ok(self.record(edge)?.source.clone())
    }

    fn edge_target(&self, edge: &EdgeId) -> Result<V> {
        Ok(self.record(edge)?.target.clone())
    }

    fn edge_weight(&self, edge: &EdgeId) -> Result<f64> {
        let record = self.record(edge)?;
        if self.graph_type.is_weighted() {
            Ok(record.weight)
        } else {
            Ok(DEFAULT_EDGE_WEIGHT)
        }
    }

    fn degree_of(&self, vertex: &V) -> Result<usize> {
        let adj = self.adjacency(vertex)?;
        Ok(adj.outgoing.len() + adj.incoming.len())
    }

    fn in_degree_of(&self, vertex: &V) -> Result<usize> {
        if self.graph_type.is_directed() {
            Ok(self.adjacency(vertex)?.incoming.len())
        } else {
            self.degree_of(vertex)
        }
    }

    fn out_degree_of(&self, vertex: &V) -> Result<usize> {
        if self.graph_type.is_directed() {
            Ok(self.adjacency(vertex)?.outgoing.len())
        } else {
            self.degree_of(vertex)
        }
    }

    fn edges_of(&self, vertex: &V) -> Result<Vec<EdgeId>> {
        Ok(Self::incident(self.adjacency(vertex)?))
    }

    fn incoming_edges_of(&self, vertex: &V) -> Result<Vec<EdgeId>> {
        let adj = self.adjacency(vertex)?;
        if self.graph_type.is_directed() {
            Ok(adj.incoming.iter().copied().collect())
        } else {
            Ok(Self::incident(adj))
        }
    }

    fn outgoing_edges_of(&self, vertex: &V) -> Result<Vec<EdgeId>> {
        let adj = self.adjacency(vertex)?;
        if self.graph_type.is_directed() {
            Ok(adj.outgoing.iter().copied().collect())
        } else {
            Ok(Self::incident(adj))
        }
    }

    fn add_vertex(&mut self, vertex: V) -> bool {
        if self.vertices.contains_key(&vertex) {
            return false;
        }
        self.vertices.insert(vertex, Adjacency::default());
        true
    }

    fn add_edge(&mut self, source: &V, target: &V) -> Result<Option<EdgeId>> {
        self.check_endpoints(source, target)?;
        if !self.graph_type.allows_multiple_edges() && self.contains_edge_between(source, target)
        {
            return Ok(None);
        }
        let id = self.allocate_edge_id()?;
        self.link(id, source, target);
        Ok(Some(id))
    }

    fn add_edge_with(&mut self, source: &V, target: &V, edge: EdgeId) -> Result<bool> {
        self.check_endpoints(source, target)?;
        if self.edges.contains_key(&edge) {
            return Ok(false);
        }
        if !self.graph_type.allows_multiple_edges() && self.contains_edge_between(source, target)
        {
            return Ok(false);
        }
        // Keep generated IDs clear of caller-supplied ones.
        self.next_edge_id = self.next_edge_id.max(edge.get().saturating_add(1));
        self.link(edge, source, target);
        Ok(true)
    }

    fn set_edge_weight(&mut self, edge: &EdgeId, weight: f64) -> Result<()> {
        let weighted = self.graph_type.is_weighted();
        let record = self
            .edges
            .get_mut(edge)
            .ok_or_else(|| Error::edge_not_found(edge))?;
        if !weighted {
            return Err(Error::UnsupportedOperation(
                "graph is not weighted".to_string(),
            ));
        }
        record.weight = weight;
        Ok(())
    }

    fn remove_vertex(&mut self, vertex: &V) -> bool {
        let Some(adj) = self.vertices.get(vertex) else {
            return false;
        };
        for id in Self::incident(adj) {
            self.unlink(&id);
        }
        self.vertices.shift_remove(vertex);
        true
    }

    fn remove_edge(&mut self, edge: &EdgeId) -> bool {
        self.unlink(edge).is_some()
    }

    fn remove_edge_between(&mut self, source: &V, target: &V) -> Option<EdgeId> {
        let id = self.edge_between(source, target)?;
        self.unlink(&id);
        Some(id)
    }
}

impl<V: Eq + Hash> PartialEq for SimpleGraph<V> {
    fn eq(&self, other: &Self) -> bool {
        self.graph_type == other.graph_type
            && self.vertices.len() == other.vertices.len()
            && self
                .vertices
                .keys()
                .all(|v| other.vertices.contains_key(v))
            && self.edges == other.edges
    }
}

/// Order-independent: equal graphs hash equally whatever their insertion order.
impl<V: Hash> Hash for SimpleGraph<V> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        fn fx<T: Hash + ?Sized>(value: &T) -> u64 {
            let mut hasher = FxHasher::default();
            value.hash(&mut hasher);
            hasher.finish()
        }

        let vertices = self
            .vertices
            .keys()
            .fold(0u64, |acc, v| acc.wrapping_add(fx(v)));
        let edges = self.edges.iter().fold(0u64, |acc, (id, r)| {
            // Adding +0.0 folds -0.0 into +0.0, which compares equal.
            let weight = r.weight + 0.0;
            acc.wrapping_add(fx(&(id, &r.source, &r.target, weight.to_bits())))
        });

        self.graph_type.hash(state);
        state.write_u64(vertices);
        state.write_u64(edges);
    }
}

impl<V: fmt::Display> fmt::Display for SimpleGraph<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = if self.graph_type.is_directed() {
            ('(', ')')
        } else {
            ('{', '}')
        };
        write!(f, "([")?;
        for (i, vertex) in self.vertices.keys().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{vertex}")?;
        }
        write!(f, "], [")?;
        for (i, record) in self.edges.values().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{open}{},{}{close}", record.source, record.target)?;
        }
        write!(f, "])")
    }
}
