//! The [`DocumentStore`] trait: named persistence for approval documents.
//!
//! Backends store serialized documents by name. The graph-level helpers
//! (`save_graph`, `load_graph`) are provided methods built on the raw text
//! primitives, so every backend gets the same export/import behavior.

use approval_core::{ApprovalGraph, LayoutConfig};

use crate::convert;
use crate::error::StorageError;

/// Storage contract for approval documents.
///
/// Synchronous: the engine is single-threaded and every call completes
/// before returning.
pub trait DocumentStore {
    // -------------------------------------------------------------------
    // Raw document text
    // -------------------------------------------------------------------

    /// Stores `json` under `name`, replacing any previous document.
    fn save(&mut self, name: &str, json: &str) -> Result<(), StorageError>;

    /// Returns the text stored under `name`.
    ///
    /// Fails with [`StorageError::DocumentNotFound`] if there is none.
    fn load(&self, name: &str) -> Result<String, StorageError>;

    fn delete(&mut self, name: &str) -> Result<(), StorageError>;

    /// Lists stored document names in ascending order.
    fn list(&self) -> Result<Vec<String>, StorageError>;

    // -------------------------------------------------------------------
    // Graph-level helpers
    // -------------------------------------------------------------------

    fn exists(&self, name: &str) -> Result<bool, StorageError> {
        match self.load(name) {
            Ok(_) => Ok(true),
            Err(StorageError::DocumentNotFound(_)) => Ok(false),
            Err(err) => Err(err),
        }
    }

    /// Exports `graph` and stores it under `name`.
    fn save_graph(&mut self, name: &str, graph: &ApprovalGraph) -> Result<(), StorageError> {
        let json = convert::export(graph).to_json_pretty()?;
        self.save(name, &json)?;
        tracing::info!(
            document = name,
            nodes = graph.node_count(),
            "saved document"
        );
        Ok(())
    }

    /// Loads and imports the document stored under `name`.
    fn load_graph(&self, name: &str, config: LayoutConfig) -> Result<ApprovalGraph, StorageError> {
        let json = self.load(name)?;
        let graph = convert::from_json(&json, config)?;
        tracing::info!(
            document = name,
            nodes = graph.node_count(),
            "loaded document"
        );
        Ok(graph)
    }
}
