//! Error types for SyncGraph.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors surfaced by the synchronized graph and its collaborators.
#[derive(Error, Debug)]
pub enum Error {
    /// The referenced vertex is not part of the graph.
    ///
    /// Also raised when another thread removed the vertex after the caller
    /// obtained it from an earlier snapshot.
    #[error("Vertex not found: {0}")]
    VertexNotFound(String),

    /// The referenced edge is not part of the graph.
    #[error("Edge not found: {0}")]
    EdgeNotFound(String),

    /// Mutation attempted on a read-only view or snapshot.
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),

    /// The decorator could not be constructed around the given graph.
    #[error("Invalid construction: {0}")]
    InvalidConstruction(String),

    /// The underlying graph rejected an argument.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl Error {
    /// Builds a [`Error::VertexNotFound`] from any debuggable vertex handle.
    pub(crate) fn vertex_not_found<V: std::fmt::Debug>(vertex: &V) -> Self {
        Self::VertexNotFound(format!("{vertex:?}"))
    }

    /// Builds an [`Error::EdgeNotFound`] from any debuggable edge handle.
    pub(crate) fn edge_not_found<E: std::fmt::Debug>(edge: &E) -> Self {
        Self::EdgeNotFound(format!("{edge:?}"))
    }

    /// Returns true for errors that reference a missing vertex or edge.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::VertexNotFound(_) | Self::EdgeNotFound(_))
    }
}

/// Result type alias for SyncGraph operations.
pub type Result<T> = std::result::Result<T, Error>;
