//! Dependency edges between nodes.
//!
//! An [`Edge`] says that `target` runs after `source`. Endpoints are ids, so
//! an edge never holds a reference into node storage and serializes as a
//! flat pair.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::NodeId;

/// A directed dependency edge.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: NodeId,
    pub target: NodeId,
}

/// Which side of a node an edge attaches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// The edge ends at the node (`target == node`).
    Incoming,
    /// The edge starts at the node (`source == node`).
    Outgoing,
}

impl Edge {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Edge {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Returns `true` if either endpoint is `id`.
    pub fn touches(&self, id: &NodeId) -> bool {
        &self.source == id || &self.target == id
    }

    /// Classifies the edge relative to `id`, or `None` if it does not touch it.
    pub fn direction(&self, id: &NodeId) -> Option<Direction> {
        if &self.target == id {
            Some(Direction::Incoming)
        } else if &self.source == id {
            Some(Direction::Outgoing)
        } else {
            None
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.source == self.target
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.source, self.target)
    }
}
