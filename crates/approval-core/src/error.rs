//! Core error types for approval-core.
//!
//! Uses `thiserror` for structured, matchable error variants covering the
//! failure modes of the graph model and the structural editor. Every
//! operation that returns one of these leaves the graph unchanged.

use crate::id::NodeId;
use thiserror::Error;

/// Errors produced by graph and editor operations.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoreError {
    /// The operation referenced a node that is not in the graph.
    #[error("node not found: {id}")]
    NotFound { id: NodeId },

    /// The operation would remove or branch a reserved terminal node.
    #[error("reserved node cannot be {action}: {id}")]
    ReservedNode { id: NodeId, action: &'static str },

    /// An edge would dangle, loop onto itself, or duplicate another edge.
    #[error("invalid edge: {reason}")]
    InvalidEdge { reason: String },

    /// The graph does not have the shape an edit relies on.
    #[error("structural error: {reason}")]
    StructuralError { reason: String },
}

impl CoreError {
    /// Returns `true` for errors the caller may treat as a no-op.
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound { .. })
    }
}
