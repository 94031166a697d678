//! Storage error types for approval-storage.
//!
//! [`StorageError`] covers the failure modes of the document gateway and the
//! document stores: malformed text, references that do not resolve,
//! structurally inconsistent graphs, and I/O.

use approval_core::{CoreError, NodeId};
use thiserror::Error;

/// Errors produced by import/export and document stores.
#[derive(Debug, Error)]
pub enum StorageError {
    /// The document text is not well-formed JSON of the expected shape.
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// An edge endpoint names a node the document does not contain.
    #[error("edge {edge} references unknown node {id}")]
    DanglingReference { edge: usize, id: NodeId },

    /// A node's `dep` list names a node the document does not contain.
    #[error("node {node} dependency {index} references unknown node {id}")]
    DanglingDependency {
        node: NodeId,
        index: usize,
        id: NodeId,
    },

    /// The document's ids or `nextId` leave the id counter no room to
    /// advance.
    #[error("id counter cannot advance past {0}")]
    CounterOverflow(u64),

    /// Two nodes in the document share an id.
    #[error("duplicate node id: {id}")]
    DuplicateNode { id: NodeId },

    /// The document lacks `startNode` or `endNode`.
    #[error("document is missing reserved node {id}")]
    MissingReserved { id: NodeId },

    /// The document describes a graph the engine cannot hold.
    #[error("invalid graph: {0}")]
    Structure(#[from] CoreError),

    /// Reading or writing a stored document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// No stored document has the given name.
    #[error("document not found: {0}")]
    DocumentNotFound(String),

    /// The name cannot be used as a document name.
    #[error("invalid document name: '{0}'")]
    InvalidName(String),
}
