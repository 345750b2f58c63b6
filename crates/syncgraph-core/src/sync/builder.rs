//! Construction options for [`SynchronizedGraph`].

use std::sync::Arc;

use crate::config::SyncGraphConfig;
use crate::error::{Error, Result};
use crate::graph::Graph;

use super::SynchronizedGraph;

/// Selects cache mode and lock fairness before wrapping a graph.
///
/// Both options default to off.
///
/// # Example
///
/// ```rust
/// use syncgraph_core::graph::SimpleGraph;
/// use syncgraph_core::Builder;
///
/// let graph = Builder::new()
///     .cache_enable()
///     .set_fair()
///     .build(SimpleGraph::<u64>::undirected());
///
/// assert!(graph.is_cache_enabled());
/// assert!(graph.is_fair());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Builder {
    cache_enabled: bool,
    fair: bool,
}

impl Builder {
    /// Creates a builder with caching disabled and a non-fair lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a builder mirroring an existing graph's current options.
    #[must_use]
    pub fn from_graph<G: Graph>(graph: &SynchronizedGraph<G>) -> Self {
        Self {
            cache_enabled: graph.is_cache_enabled(),
            fair: graph.is_fair(),
        }
    }

    /// Creates a builder from loaded configuration.
    #[must_use]
    pub fn from_config(config: &SyncGraphConfig) -> Self {
        Self {
            cache_enabled: config.cache_enabled,
            fair: config.fair,
        }
    }

    /// Enables adjacency caching.
    #[must_use]
    pub fn cache_enable(mut self) -> Self {
        self.cache_enabled = true;
        self
    }

    /// Disables adjacency caching.
    #[must_use]
    pub fn cache_disable(mut self) -> Self {
        self.cache_enabled = false;
        self
    }

    /// Selects fair lock hand-off.
    #[must_use]
    pub fn set_fair(mut self) -> Self {
        self.fair = true;
        self
    }

    /// Selects non-fair lock hand-off.
    #[must_use]
    pub fn set_nonfair(mut self) -> Self {
        self.fair = false;
        self
    }

    /// Returns true if caching will be enabled.
    #[must_use]
    pub fn is_cache_enabled(&self) -> bool {
        self.cache_enabled
    }

    /// Returns true if the lock will be fair.
    #[must_use]
    pub fn is_fair(&self) -> bool {
        self.fair
    }

    /// Wraps `graph`.
    #[must_use]
    pub fn build<G: Graph>(self, graph: G) -> SynchronizedGraph<G> {
        SynchronizedGraph::with_options(graph, self.cache_enabled, self.fair)
    }

    /// Wraps a graph that may not have been provided.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConstruction` if `graph` is `None`.
    pub fn build_optional<G: Graph>(self, graph: Option<G>) -> Result<SynchronizedGraph<G>> {
        graph.map(|g| self.build(g)).ok_or_else(|| {
            Error::InvalidConstruction("backing graph must be provided".to_string())
        })
    }

    /// Wraps a graph handed over through an `Arc`.
    ///
    /// The synchronized graph must be the only path to mutation, so the
    /// `Arc` has to be its sole owner.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidConstruction` if other clones of the `Arc` exist.
    pub fn try_build_shared<G: Graph>(self, graph: Arc<G>) -> Result<SynchronizedGraph<G>> {
        let graph = Arc::try_unwrap(graph).map_err(|shared| {
            Error::InvalidConstruction(format!(
                "backing graph is shared by {} owners; it must be owned exclusively",
                Arc::strong_count(&shared)
            ))
        })?;
        Ok(self.build(graph))
    }
}

impl From<SyncGraphConfig> for Builder {
    fn from(config: SyncGraphConfig) -> Self {
        Self::from_config(&config)
    }
}
