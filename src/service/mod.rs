//! Service layer for the Agent Hub MCP server.
//!
//! The document store and the activity log are the two collaborators the
//! protocol core reads and writes. Both sit behind traits so the server can be
//! wired to other backends or to test doubles.

pub mod activity;
pub mod documents;

pub use activity::{ActivityEntry, ActivityLog, InMemoryActivityLog};
pub use documents::{Document, DocumentStore, InMemoryDocumentStore};
