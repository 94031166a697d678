//! Document gateway and persistence for approval flows.
//!
//! Converts [`approval_core::ApprovalGraph`] to and from the portable JSON
//! [`Document`], wraps a graph in an editing [`Session`], and stores
//! documents by name through the [`DocumentStore`] trait.
//!
//! # Modules
//!
//! - [`error`]: StorageError enum with all failure modes
//! - [`document`]: the serde document format
//! - [`convert`]: graph export/import
//! - [`session`]: one open document with atomic import
//! - [`traits`]: DocumentStore trait definition
//! - [`memory`]: InMemoryStore implementation
//! - [`directory`]: DirectoryStore implementation (one JSON file per document)

pub mod convert;
pub mod directory;
pub mod document;
pub mod error;
pub mod memory;
pub mod session;
pub mod traits;

// Re-export key types for ergonomic use.
pub use convert::{export, from_json, import, to_json};
pub use directory::DirectoryStore;
pub use document::{Document, DocumentEdge, DocumentNode, Endpoint};
pub use error::StorageError;
pub use memory::InMemoryStore;
pub use session::Session;
pub use traits::DocumentStore;
