//! Value types shared by graph implementations.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Weight reported for edges of unweighted graphs.
pub const DEFAULT_EDGE_WEIGHT: f64 = 1.0;

/// Structural properties of a graph.
///
/// # Example
///
/// ```rust
/// use syncgraph_core::graph::GraphType;
///
/// let kind = GraphType::undirected().with_weights(true);
/// assert!(!kind.is_directed());
/// assert!(kind.is_weighted());
/// assert!(kind.allows_self_loops());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GraphType {
    directed: bool,
    weighted: bool,
    allow_self_loops: bool,
    allow_multiple_edges: bool,
}

impl GraphType {
    /// Directed, unweighted, self-loops allowed, no parallel edges.
    #[must_use]
    pub const fn directed() -> Self {
        Self {
            directed: true,
            weighted: false,
            allow_self_loops: true,
            allow_multiple_edges: false,
        }
    }

    /// Undirected, unweighted, self-loops allowed, no parallel edges.
    #[must_use]
    pub const fn undirected() -> Self {
        Self {
            directed: false,
            ..Self::directed()
        }
    }

    /// Enables or disables edge weights (builder pattern).
    #[must_use]
    pub const fn with_weights(mut self, weighted: bool) -> Self {
        self.weighted = weighted;
        self
    }

    /// Allows or forbids self-loops (builder pattern).
    #[must_use]
    pub const fn with_self_loops(mut self, allowed: bool) -> Self {
        self.allow_self_loops = allowed;
        self
    }

    /// Allows or forbids parallel edges (builder pattern).
    #[must_use]
    pub const fn with_multiple_edges(mut self, allowed: bool) -> Self {
        self.allow_multiple_edges = allowed;
        self
    }

    /// Returns true if edges have a direction.
    #[must_use]
    pub const fn is_directed(&self) -> bool {
        self.directed
    }

    /// Returns true if edge weights can be changed.
    #[must_use]
    pub const fn is_weighted(&self) -> bool {
        self.weighted
    }

    /// Returns true if an edge may connect a vertex to itself.
    #[must_use]
    pub const fn allows_self_loops(&self) -> bool {
        self.allow_self_loops
    }

    /// Returns true if several edges may connect the same pair of vertices.
    #[must_use]
    pub const fn allows_multiple_edges(&self) -> bool {
        self.allow_multiple_edges
    }
}

impl Default for GraphType {
    fn default() -> Self {
        Self::directed()
    }
}

/// Edge handle generated by [`SimpleGraph`](super::SimpleGraph).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeId(u64);

impl EdgeId {
    /// Wraps a raw edge ID.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw edge ID.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}
