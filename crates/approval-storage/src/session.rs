//! A document session: one graph, exclusively owned, plus the gateway.
//!
//! [`Session`] is the engine surface a front end talks to. Edits delegate to
//! the graph; [`Session::import`] builds the replacement graph completely
//! before swapping it in, so a failed import leaves the session as it was.

use approval_core::{ApprovalGraph, Canvas, CoreError, Edge, LayoutConfig, Node, NodeId};

use crate::convert;
use crate::document::Document;
use crate::error::StorageError;

/// One open document.
#[derive(Debug, Clone)]
pub struct Session {
    graph: ApprovalGraph,
}

impl Session {
    /// Opens a session on the canonical two-node graph.
    pub fn new(config: LayoutConfig) -> Self {
        Session {
            graph: ApprovalGraph::new(config),
        }
    }

    /// Opens a session on an existing graph.
    pub fn with_graph(graph: ApprovalGraph) -> Self {
        Session { graph }
    }

    pub fn graph(&self) -> &ApprovalGraph {
        &self.graph
    }

    pub fn config(&self) -> &LayoutConfig {
        self.graph.config()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.nodes()
    }

    pub fn edges(&self) -> &[Edge] {
        self.graph.edges()
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.graph.node(id)
    }

    pub fn canvas(&self) -> Canvas {
        self.graph.canvas()
    }

    // -----------------------------------------------------------------------
    // Edits
    // -----------------------------------------------------------------------

    pub fn insert_serial(&mut self, after: &NodeId, before_end: bool) -> Result<Node, CoreError> {
        self.graph.insert_serial(after, before_end)
    }

    pub fn insert_parallel(&mut self, beside: &NodeId) -> Result<Node, CoreError> {
        self.graph.insert_parallel(beside)
    }

    pub fn delete_node(&mut self, id: &NodeId) -> Result<Node, CoreError> {
        self.graph.delete_node(id)
    }

    pub fn delete_edge(&mut self, edge: &Edge) -> bool {
        self.graph.delete_edge(edge)
    }

    pub fn rename_node(&mut self, id: &NodeId, title: impl Into<String>) -> Result<(), CoreError> {
        self.graph.rename_node(id, title)
    }

    pub fn reset(&mut self) {
        self.graph.reset();
    }

    // -----------------------------------------------------------------------
    // Gateway
    // -----------------------------------------------------------------------

    pub fn export(&self) -> Document {
        convert::export(&self.graph)
    }

    pub fn export_json(&self) -> Result<String, StorageError> {
        convert::to_json(&self.graph)
    }

    /// Replaces the graph with the one described by `document`.
    ///
    /// The session's layout configuration carries over.
    pub fn import(&mut self, document: Document) -> Result<(), StorageError> {
        let graph = convert::import(document, self.graph.config().clone())?;
        self.graph = graph;
        Ok(())
    }

    pub fn import_json(&mut self, text: &str) -> Result<(), StorageError> {
        let document = Document::from_json(text)?;
        self.import(document)
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(LayoutConfig::default())
    }
}
