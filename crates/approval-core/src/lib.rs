//! Graph-editing engine for approval workflows.
//!
//! An approval flow is a directed graph from a single `startNode` to a single
//! `endNode` through approver nodes arranged in series or in parallel. This
//! crate owns the in-memory model and every structural edit on it; rendering
//! and input handling live elsewhere and only call into [`ApprovalGraph`].
//!
//! # Modules
//!
//! - [`id`], [`node`], [`edge`]: the data model
//! - [`graph`]: [`ApprovalGraph`], the node/edge store and its primitives
//! - [`layout`]: incremental coordinate adjustment
//! - [`editor`]: serial/parallel insertion, deletion with reconnection
//! - [`audit`]: invariant checker
//! - [`config`]: layout dimensions and canvas extent
//! - [`error`]: [`CoreError`]

pub mod audit;
pub mod config;
pub mod edge;
pub mod editor;
pub mod error;
pub mod graph;
pub mod id;
pub mod layout;
pub mod node;

pub use audit::{audit, Violation};
pub use config::{Canvas, CompactionPolicy, LayoutConfig};
pub use edge::Edge;
pub use error::CoreError;
pub use graph::ApprovalGraph;
pub use id::NodeId;
pub use node::{Node, NodeKind};
