//! Node types: the start/end terminals and the approver boxes between them.
//!
//! A node's `x` encodes its stage (serial position) and `y` its row
//! (parallel slot). Both are canvas coordinates of the node's center.

use serde::{Deserialize, Serialize};

use crate::id::NodeId;

/// Title given to freshly inserted approvers.
pub const DEFAULT_TITLE: &str = "new approver";

/// Title of the start node.
pub const START_TITLE: &str = "start";

/// Title of the end node.
pub const END_TITLE: &str = "end";

/// What role a node plays in the flow, derived from its id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    Start,
    End,
    Approver,
}

/// A node in the approval flow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    /// User-editable label.
    pub title: String,
    /// Horizontal position; encodes the stage.
    pub x: f64,
    /// Vertical position; encodes the parallel row.
    pub y: f64,
}

impl Node {
    pub fn new(id: NodeId, title: impl Into<String>, x: f64, y: f64) -> Self {
        Node {
            id,
            title: title.into(),
            x,
            y,
        }
    }

    pub fn kind(&self) -> NodeKind {
        if self.id.is_start() {
            NodeKind::Start
        } else if self.id.is_end() {
            NodeKind::End
        } else {
            NodeKind::Approver
        }
    }

    /// Returns the node's center as an `(x, y)` pair.
    pub fn position(&self) -> (f64, f64) {
        (self.x, self.y)
    }
}
