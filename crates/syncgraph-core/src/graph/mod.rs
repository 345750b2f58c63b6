//! Graph collaborator interface and the in-memory reference graph.
//!
//! [`SynchronizedGraph`](crate::SynchronizedGraph) does not store anything
//! itself: it wraps any type implementing [`Graph`] and serializes access to
//! it. [`SimpleGraph`] is the bundled implementation.
//!
//! # Example
//!
//! ```rust
//! use syncgraph_core::graph::{Graph, SimpleGraph};
//!
//! let mut graph = SimpleGraph::directed();
//! graph.add_vertex("A");
//! graph.add_vertex("B");
//! let edge = graph.add_edge(&"A", &"B").unwrap().unwrap();
//!
//! assert_eq!(graph.edge_source(&edge).unwrap(), "A");
//! assert_eq!(graph.out_degree_of(&"A").unwrap(), 1);
//! ```

mod simple;
mod types;


use std::fmt::Debug;
use std::hash::Hash;

use crate::error::Result;

pub use simple::SimpleGraph;
pub use types::{EdgeId, GraphType, DEFAULT_EDGE_WEIGHT};

/// Operations a graph must provide to be wrapped by a synchronized graph.
///
/// Queries take `&self` and are run under the shared read lock; mutations take
/// `&mut self` and are run under the exclusive write lock. Implementations
/// need no internal synchronization of their own.
///
/// [`add_edge`](Graph::add_edge) is the edge-creation hook. If the
/// implementation generates edges from state shared outside the graph, making
/// that state thread-safe is the implementor's responsibility.
pub trait Graph {
    /// Vertex handle.
    type Vertex: Clone + Eq + Hash + Debug + Send + Sync;
    /// Edge handle.
    type Edge: Clone + Eq + Hash + Debug + Send + Sync;

    /// Returns the structural properties of the graph.
    fn graph_type(&self) -> GraphType;

    // ── Membership ─────────────────────────────────────────────────────

    /// Returns the number of vertices.
    fn vertex_count(&self) -> usize;

    /// Returns the number of edges.
    fn edge_count(&self) -> usize;

    /// Iterates over all vertices in a stable order.
    fn vertices(&self) -> impl Iterator<Item = &Self::Vertex>;

    /// Iterates over all edges in a stable order.
    fn edges(&self) -> impl Iterator<Item = &Self::Edge>;

    /// Returns true if the vertex is part of the graph.
    fn contains_vertex(&self, vertex: &Self::Vertex) -> bool;

    /// Returns true if the edge is part of the graph.
    fn contains_edge(&self, edge: &Self::Edge) -> bool;

    /// Returns true if at least one edge connects `source` to `target`.
    fn contains_edge_between(&self, source: &Self::Vertex, target: &Self::Vertex) -> bool {
        self.edge_between(source, target).is_some()
    }

    // ── Edge lookup ────────────────────────────────────────────────────

    /// Returns one edge connecting `source` to `target`, if any.
    fn edge_between(&self, source: &Self::Vertex, target: &Self::Vertex) -> Option<Self::Edge>;

    /// Returns every edge connecting `source` to `target`.
    ///
    /// # Errors
    ///
    /// Returns `Error::VertexNotFound` if either endpoint is absent.
    fn all_edges_between(
        &self,
        source: &Self::Vertex,
        target: &Self::Vertex,
    ) -> Result<Vec<Self::Edge>>;

    /// Returns the source vertex of an edge.
    fn edge_source(&self, edge: &Self::Edge) -> Result<Self::Vertex>;

    /// Returns the target vertex of an edge.
    fn edge_target(&self, edge: &Self::Edge) -> Result<Self::Vertex>;

    /// Returns the weight of an edge ([`DEFAULT_EDGE_WEIGHT`] when unweighted).
    fn edge_weight(&self, edge: &Self::Edge) -> Result<f64>;

    // ── Degree and adjacency ───────────────────────────────────────────

    /// Returns the number of edges touching a vertex (self-loops count twice).
    fn degree_of(&self, vertex: &Self::Vertex) -> Result<usize>;

    /// Returns the number of edges entering a vertex.
    fn in_degree_of(&self, vertex: &Self::Vertex) -> Result<usize>;

    /// Returns the number of edges leaving a vertex.
    fn out_degree_of(&self, vertex: &Self::Vertex) -> Result<usize>;

    /// Returns every edge touching a vertex.
    fn edges_of(&self, vertex: &Self::Vertex) -> Result<Vec<Self::Edge>>;

    /// Returns the edges entering a vertex.
    fn incoming_edges_of(&self, vertex: &Self::Vertex) -> Result<Vec<Self::Edge>>;

    /// Returns the edges leaving a vertex.
    fn outgoing_edges_of(&self, vertex: &Self::Vertex) -> Result<Vec<Self::Edge>>;

    // ── Mutation ───────────────────────────────────────────────────────

    /// Adds a vertex. Returns false if it was already present.
    fn add_vertex(&mut self, vertex: Self::Vertex) -> bool;

    /// Creates a new edge between two existing vertices.
    ///
    /// Returns `Ok(None)` when the graph refuses the edge without it being an
    /// error (e.g. a parallel edge in a graph without multi-edges).
    fn add_edge(
        &mut self,
        source: &Self::Vertex,
        target: &Self::Vertex,
    ) -> Result<Option<Self::Edge>>;

    /// Inserts a caller-supplied edge. Returns false if it was not added.
    fn add_edge_with(
        &mut self,
        source: &Self::Vertex,
        target: &Self::Vertex,
        edge: Self::Edge,
    ) -> Result<bool>;

    /// Changes the weight of an edge.
    fn set_edge_weight(&mut self, edge: &Self::Edge, weight: f64) -> Result<()>;

    /// Removes a vertex and every edge touching it.
    fn remove_vertex(&mut self, vertex: &Self::Vertex) -> bool;

    /// Removes an edge. Returns false if it was not present.
    fn remove_edge(&mut self, edge: &Self::Edge) -> bool;

    /// Removes one edge connecting `source` to `target` and returns it.
    fn remove_edge_between(
        &mut self,
        source: &Self::Vertex,
        target: &Self::Vertex,
    ) -> Option<Self::Edge>;
}
