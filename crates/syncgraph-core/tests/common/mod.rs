//! Shared test utilities for integration tests.
//!
//! [`ProbeGraph`] wraps a [`SimpleGraph`] and records, through a shared
//! [`Probe`], how many readers and writers are inside the graph at once.

#![allow(dead_code)] // Reason: each test binary uses a different subset.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use syncgraph_core::{EdgeId, Graph, GraphType, Result, SimpleGraph};

/// How long a rendezvous reader waits for its peers before giving up.
const RENDEZVOUS_TIMEOUT: Duration = Duration::from_secs(5);

/// Occupancy counters shared between a test and its [`ProbeGraph`].
#[derive(Debug, Default)]
pub struct Probe {
    readers: AtomicUsize,
    writers: AtomicUsize,
    max_readers: AtomicUsize,
    max_writers: AtomicUsize,
    overlap: AtomicBool,
    rendezvous: AtomicUsize,
    adjacency_queries: AtomicUsize,
}

impl Probe {
    /// Peak number of threads seen inside a read at once.
    pub fn max_readers(&self) -> usize {
        self.max_readers.load(Ordering::SeqCst)
    }

    /// Peak number of threads seen inside a write at once.
    pub fn max_writers(&self) -> usize {
        self.max_writers.load(Ordering::SeqCst)
    }

    /// True if a reader and a writer were ever inside at the same time.
    pub fn saw_overlap(&self) -> bool {
        self.overlap.load(Ordering::SeqCst)
    }

    /// Number of incident/incoming/outgoing derivations performed.
    pub fn adjacency_queries(&self) -> usize {
        self.adjacency_queries.load(Ordering::SeqCst)
    }

    /// Makes `contains_vertex` wait until `readers` threads are inside.
    pub fn set_rendezvous(&self, readers: usize) {
        self.rendezvous.store(readers, Ordering::SeqCst);
    }

    fn enter_read(&self) {
        let now = self.readers.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_readers.fetch_max(now, Ordering::SeqCst);
        if self.writers.load(Ordering::SeqCst) > 0 {
            self.overlap.store(true, Ordering::SeqCst);
        }
    }

    fn wait_for_peers(&self) {
        let target = self.rendezvous.load(Ordering::SeqCst);
        if target == 0 {
            return;
        }
        let deadline = Instant::now() + RENDEZVOUS_TIMEOUT;
        while self.readers.load(Ordering::SeqCst) < target && Instant::now() < deadline {
            thread::yield_now();
        }
    }

    fn exit_read(&self) {
        self.readers.fetch_sub(1, Ordering::SeqCst);
    }

    fn enter_write(&self) {
        let now = self.writers.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_writers.fetch_max(now, Ordering::SeqCst);
        if self.readers.load(Ordering::SeqCst) > 0 {
            self.overlap.store(true, Ordering::SeqCst);
        }
        // Widen the window so a missing lock shows up as overlap.
        thread::yield_now();
    }

    fn exit_write(&self) {
        self.writers.fetch_sub(1, Ordering::SeqCst);
    }

    fn read<R>(&self, f: impl FnOnce() -> R) -> R {
        self.enter_read();
        let out = f();
        self.exit_read();
        out
    }

    fn write<R>(&self, f: impl FnOnce() -> R) -> R {
        self.enter_write();
        let out = f();
        self.exit_write();
        out
    }
}

/// Instrumented graph over `u32` vertices.
pub struct ProbeGraph {
    inner: SimpleGraph<u32>,
    probe: Arc<Probe>,
}

impl ProbeGraph {
    pub fn new(graph_type: GraphType) -> (Self, Arc<Probe>) {
        let probe = Arc::new(Probe::default());
        let graph = Self {
            inner: SimpleGraph::new(graph_type),
            probe: Arc::clone(&probe),
        };
        (graph, probe)
    }

    pub fn directed() -> (Self, Arc<Probe>) {
        Self::new(GraphType::directed())
    }
}

impl Graph for ProbeGraph {
    type Vertex = u32;
    type Edge = EdgeId;

    fn graph_type(&self) -> GraphType {
        self.inner.graph_type()
    }

    fn vertex_count(&self) -> usize {
        self.probe.read(|| self.inner.vertex_count())
    }

    fn edge_count(&self) -> usize {
        self.probe.read(|| self.inner.edge_count())
    }

    fn vertices(&self) -> impl Iterator<Item = &u32> {
        self.inner.vertices()
    }

    fn edges(&self) -> impl Iterator<Item = &EdgeId> {
        self.inner.edges()
    }

    fn contains_vertex(&self, vertex: &u32) -> bool {
        self.probe.read(|| {
            self.probe.wait_for_peers();
            self.inner.contains_vertex(vertex)
        })
    }

    fn contains_edge(&self, edge: &EdgeId) -> bool {
        self.probe.read(|| self.inner.contains_edge(edge))
    }

    fn edge_between(&self, source: &u32, target: &u32) -> Option<EdgeId> {
        self.probe.read(|| self.inner.edge_between(source, target))
    }

    fn all_edges_between(&self, source: &u32, target: &u32) -> Result<Vec<EdgeId>> {
        self.probe.read(|| self.inner.all_edges_between(source, target))
    }

    fn edge_source(&self, edge: &EdgeId) -> Result<u32> {
        self.inner.edge_source(edge)
    }

    fn edge_target(&self, edge: &EdgeId) -> Result<u32> {
        self.inner.edge_target(edge)
    }

    fn edge_weight(&self, edge: &EdgeId) -> Result<f64> {
        self.probe.read(|| self.inner.edge_weight(edge))
    }

    fn degree_of(&self, vertex: &u32) -> Result<usize> {
        self.probe.read(|| self.inner.degree_of(vertex))
    }

    fn in_degree_of(&self, vertex: &u32) -> Result<usize> {
        self.inner.in_degree_of(vertex)
    }

    fn out_degree_of(&self, vertex: &u32) -> Result<usize> {
        self.inner.out_degree_of(vertex)
    }

    fn edges_of(&self, vertex: &u32) -> Result<Vec<EdgeId>> {
        self.probe.adjacency_queries.fetch_add(1, Ordering::SeqCst);
        self.probe.read(|| self.inner.edges_of(vertex))
    }

    fn incoming_edges_of(&self, vertex: &u32) -> Result<Vec<EdgeId>> {
        self.probe.adjacency_queries.fetch_add(1, Ordering::SeqCst);
        self.probe.read(|| self.inner.incoming_edges_of(vertex))
    }

    fn outgoing_edges_of(&self, vertex: &u32) -> Result<Vec<EdgeId>> {
        self.probe.adjacency_queries.fetch_add(1, Ordering::SeqCst);
        self.probe.read(|| self.inner.outgoing_edges_of(vertex))
    }

    fn add_vertex(&mut self, vertex: u32) -> bool {
        let probe = Arc::clone(&self.probe);
        probe.write(|| self.inner.add_vertex(vertex))
    }

    fn add_edge(&mut self, source: &u32, target: &u32) -> Result<Option<EdgeId>> {
        let probe = Arc::clone(&self.probe);
        probe.write(|| self.inner.add_edge(source, target))
    }

    fn add_edge_with(&mut self, source: &u32, target: &u32, edge: EdgeId) -> Result<bool> {
        let probe = Arc::clone(&self.probe);
        probe.write(|| self.inner.add_edge_with(source, target, edge))
    }

    fn set_edge_weight(&mut self, edge: &EdgeId, weight: f64) -> Result<()> {
        let probe = Arc::clone(&self.probe);
        probe.write(|| self.inner.set_edge_weight(edge, weight))
    }

    fn remove_vertex(&mut self, vertex: &u32) -> bool {
        let probe = Arc::clone(&self.probe);
        probe.write(|| self.inner.remove_vertex(vertex))
    }

    fn remove_edge(&mut self, edge: &EdgeId) -> bool {
        let probe = Arc::clone(&self.probe);
        probe.write(|| self.inner.remove_edge(edge))
    }

    fn remove_edge_between(&mut self, source: &u32, target: &u32) -> Option<EdgeId> {
        let probe = Arc::clone(&self.probe);
        probe.write(|| self.inner.remove_edge_between(source, target))
    }
}
