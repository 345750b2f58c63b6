//! Test-only graph wrapper that counts adjacency derivations.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Result;
use crate::graph::{EdgeId, Graph, GraphType, SimpleGraph};

pub(crate) struct CountingGraph {
    inner: SimpleGraph<&'static str>,
    adjacency_queries: AtomicUsize,
}

impl CountingGraph {
    pub(crate) fn new(inner: SimpleGraph<&'static str>) -> Self {
        Self {
            inner,
            adjacency_queries: AtomicUsize::new(0),
        }
    }

    pub(crate) fn directed(vertices: &[&'static str]) -> Self {
        let mut inner = SimpleGraph::directed();
        for &v in vertices {
            inner.add_vertex(v);
        }
        Self::new(inner)
    }

    fn count(&self) {
        self.adjacency_queries.fetch_add(1, Ordering::SeqCst);
    }

    pub(crate) fn queries(&self) -> usize {
        self.adjacency_queries.load(Ordering::SeqCst)
    }
}

impl Graph for CountingGraph {
    type Vertex = &'static str;
    type Edge = EdgeId;

    fn graph_type(&self) -> GraphType {
        self.inner.graph_type()
    }
    fn vertex_count(&self) -> usize {
        self.inner.vertex_count()
    }
    fn edge_count(&self) -> usize {
        self.inner.edge_count()
    }
    fn vertices(&self) -> impl Iterator<Item = &&'static str> {
        self.inner.vertices()
    }
    fn edges(&self) -> impl Iterator<Item = &EdgeId> {
        self.inner.edges()
    }
    fn contains_vertex(&self, vertex: &&'static str) -> bool {
        self.inner.contains_vertex(vertex)
    }
    fn contains_edge(&self, edge: &EdgeId) -> bool {
        self.inner.contains_edge(edge)
    }
    fn edge_between(&self, source: &&'static str, target: &&'static str) -> Option<EdgeId> {
        self.inner.edge_between(source, target)
    }
    fn all_edges_between(
        &self,
        source: &&'static str,
        target: &&'static str,
    ) -> Result<Vec<EdgeId>> {
        self.inner.all_edges_between(source, target)
    }
    fn edge_source(&self, edge: &EdgeId) -> Result<&'static str> {
        self.inner.edge_source(edge)
    }
    fn edge_target(&self, edge: &EdgeId) -> Result<&'static str> {
        self.inner.edge_target(edge)
    }
    fn edge_weight(&self, edge: &EdgeId) -> Result<f64> {
        self.inner.edge_weight(edge)
    }
    fn degree_of(&self, vertex: &&'static str) -> Result<usize> {
        self.inner.degree_of(vertex)
    }
    fn in_degree_of(&self, vertex: &&'static str) -> Result<usize> {
        self.inner.in_degree_of(vertex)
    }
    fn out_degree_of(&self, vertex: &&'static str) -> Result<usize> {
        self.inner.out_degree_of(vertex)
    }
    fn edges_of(&self, vertex: &&'static str) -> Result<Vec<EdgeId>> {
        self.count();
        self.inner.edges_of(vertex)
    }
    fn incoming_edges_of(&self, vertex: &&'static str) -> Result<Vec<EdgeId>> {
        self.count();
        self.inner.incoming_edges_of(vertex)
    }
    fn outgoing_edges_of(&self, vertex: &&'static str) -> Result<Vec<EdgeId>> {
        self.count();
        self.inner.outgoing_edges_of(vertex)
    }
    fn add_vertex(&mut self, vertex: &'static str) -> bool {
        self.inner.add_vertex(vertex)
    }
    fn add_edge(&mut self, source: &&'static str, target: &&'static str) -> Result<Option<EdgeId>> {
        self.inner.add_edge(source, target)
    }
    fn add_edge_with(
        &mut self,
        source: &&'static str,
        target: &&'static str,
        edge: EdgeId,
    ) -> Result<bool> {
        self.inner.add_edge_with(source, target, edge)
    }
    fn set_edge_weight(&mut self, edge: &EdgeId, weight: f64) -> Result<()> {
        self.inner.set_edge_weight(edge, weight)
    }
    fn remove_vertex(&mut self, vertex: &&'static str) -> bool {
        self.inner.remove_vertex(vertex)
    }
    fn remove_edge(&mut self, edge: &EdgeId) -> bool {
        self.inner.remove_edge(edge)
    }
    fn remove_edge_between(
        &mut self,
        source: &&'static str,
        target: &&'static str,
    ) -> Option<EdgeId> {
        self.inner.remove_edge_between(source, target)
    }
}
