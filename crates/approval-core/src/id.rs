//! Node identifiers for the approval flow graph.
//!
//! Ids are strings on the wire. Two ids are reserved for the terminal nodes
//! (`startNode`, `endNode`); every other id is allocated from the graph's
//! counter as `node<N>`.

use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Id of the single start node.
pub const START_ID: &str = "startNode";

/// Id of the single end node.
pub const END_ID: &str = "endNode";

/// Prefix for allocated approver ids.
pub const NODE_ID_TAG: &str = "node";

/// Stable node identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    /// Wraps an arbitrary id string.
    pub fn new(id: impl Into<String>) -> Self {
        NodeId(id.into())
    }

    /// The reserved start node id.
    pub fn start() -> Self {
        NodeId(START_ID.to_string())
    }

    /// The reserved end node id.
    pub fn end() -> Self {
        NodeId(END_ID.to_string())
    }

    /// Builds the id for counter value `n` (`node<n>`).
    pub fn numbered(n: u64) -> Self {
        NodeId(format!("{NODE_ID_TAG}{n}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_start(&self) -> bool {
        self.0 == START_ID
    }

    pub fn is_end(&self) -> bool {
        self.0 == END_ID
    }

    /// Returns `true` for `startNode` and `endNode`.
    pub fn is_reserved(&self) -> bool {
        self.is_start() || self.is_end()
    }

    /// Counter value encoded in a `node<N>` id, if this is one.
    pub fn sequence_number(&self) -> Option<u64> {
        self.0
            .strip_prefix(NODE_ID_TAG)
            .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
            .and_then(|digits| digits.parse().ok())
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        NodeId(id.to_string())
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        NodeId(id)
    }
}
