//! # SyncGraph Core
//!
//! Concurrency-safe access to an existing mutable graph.
//!
//! [`SynchronizedGraph`] wraps any [`graph::Graph`] implementation behind a
//! single reader-writer lock: many threads query at once, structural writers
//! are serialized. It adds two things on top of plain locking:
//!
//! - **Snapshot views**: [`SynchronizedGraph::vertex_set`] and
//!   [`SynchronizedGraph::edge_set`] answer size/membership live, but iterate
//!   an immutable copy that is built lazily and dropped only when membership
//!   changes. Iteration never tears and never fails because of a concurrent
//!   write.
//! - **Adjacency caching**: optionally memoizes incident, incoming and
//!   outgoing edge sets per vertex, invalidating exactly the entries an edge
//!   change can affect and everything on vertex removal.
//!
//! The crate does not implement graph algorithms or persistence.
//!
//! ## Quick Start
//!
//! ```rust
//! use std::sync::Arc;
//! use std::thread;
//!
//! use syncgraph_core::graph::SimpleGraph;
//! use syncgraph_core::{Builder, SynchronizedGraph};
//!
//! let graph = Arc::new(
//!     Builder::new()
//!         .cache_enable()
//!         .build(SimpleGraph::<u32>::directed()),
//! );
//! graph.add_vertex(0);
//!
//! let handles: Vec<_> = (1..=4)
//!     .map(|i| {
//!         let graph = Arc::clone(&graph);
//!         thread::spawn(move || {
//!             graph.add_vertex(i);
//!             graph.add_edge(&0, &i).unwrap();
//!         })
//!     })
//!     .collect();
//! for handle in handles {
//!     handle.join().unwrap();
//! }
//!
//! assert_eq!(graph.out_degree_of(&0).unwrap(), 4);
//! assert_eq!(graph.outgoing_edges_of(&0).unwrap().len(), 4);
//! ```

#![warn(missing_docs)]
#![cfg_attr(
    test,
    allow(
        clippy::doc_markdown,
        clippy::uninlined_format_args,
        clippy::float_cmp,
        clippy::manual_assert
    )
)]

pub mod config;
pub mod error;
pub mod graph;
pub mod sync;

pub use config::{ConfigError, SyncGraphConfig};
pub use error::{Error, Result};
pub use graph::{EdgeId, Graph, GraphType, SimpleGraph};
pub use sync::{
    Builder, CacheStatsSnapshot, EdgeSetView, SetView, Snapshot, SnapshotIter, SynchronizedGraph,
    VertexSetView,
};
