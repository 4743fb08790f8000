//! Model Context Protocol (MCP) implementation.
//!
//! JSON-RPC message handling, method dispatch, the duplex session loop and
//! the tool/resource/prompt catalogs.
//!
//! # Architecture
//!
//! - `protocol` - Core MCP types and message definitions
//! - `server` - Method dispatcher shared by every transport
//! - `transport` - Duplex session loop over any frame stream and sink
//! - `connections` - Open duplex connection tracking
//! - `handler` - Tool handler trait and registry
//! - `resources` - Documents exposed as `document://` resources
//! - `prompts` - Prompt catalog and rendering

pub mod connections;
pub mod handler;
pub mod prompts;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod transport;

pub use connections::{ConnectionGuard, ConnectionManager};
pub use handler::{McpHandler, ToolHandler};
pub use protocol::*;
pub use server::McpServer;
pub use transport::{run_session, Frame};
