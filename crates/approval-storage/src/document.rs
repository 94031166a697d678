//! The portable document: the only persisted or exchanged artifact.
//!
//! ```json
//! {
//!   "nodes": [{"id": "startNode", "title": "start", "x": 100.0, "y": 100.0, "dep": []}],
//!   "edges": [{"source": "startNode", "target": "node1"}],
//!   "svgWidth": 900.0,
//!   "svgHeight": 400.0,
//!   "nextId": 2
//! }
//! ```
//!
//! Edge endpoints are written as ids. Older documents embedded whole node
//! objects as endpoints; those are still read, keyed by their `id`.

use serde::{Deserialize, Serialize};

use approval_core::NodeId;

/// A serialized approval flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub nodes: Vec<DocumentNode>,
    /// `None` only for documents that carry dependency lists alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edges: Option<Vec<DocumentEdge>>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "width")]
    pub svg_width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none", alias = "height")]
    pub svg_height: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_id: Option<u64>,
}

/// A node as written in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentNode {
    pub id: NodeId,
    #[serde(default)]
    pub title: String,
    pub x: f64,
    pub y: f64,
    /// Derived dependency list (sources of edges into this node).
    #[serde(default)]
    pub dep: Vec<NodeId>,
}

/// An edge as written in a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentEdge {
    pub source: Endpoint,
    pub target: Endpoint,
}

/// An edge endpoint: an id, or a legacy embedded node object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    Id(NodeId),
    Embedded(EmbeddedNode),
}

/// The part of an embedded node object the gateway needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedNode {
    pub id: NodeId,
}

impl Endpoint {
    pub fn id(&self) -> &NodeId {
        match self {
            Endpoint::Id(id) => id,
            Endpoint::Embedded(node) => &node.id,
        }
    }
}

impl From<NodeId> for Endpoint {
    fn from(id: NodeId) -> Self {
        Endpoint::Id(id)
    }
}

impl Document {
    /// Parses document text.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Compact JSON, as exported.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
