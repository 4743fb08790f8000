//! Agent Hub MCP Server
//!
//! A Model Context Protocol (MCP) server that exposes the Agent Hub's
//! enterprise document store to AI clients: keyword search, AI summaries and
//! answers, usage analytics and auto tagging, plus documents as resources and
//! a small prompt catalog.
//!
//! # Architecture
//!
//! 1. **SDK Layer** (`sdk`) - Completion provider trait and the Ollama client
//! 2. **Service Layer** (`service`) - Document store and activity log
//! 3. **MCP Layer** (`mcp`) - Protocol types, dispatcher, duplex sessions
//! 4. **Tools Layer** (`tools`) - The five MCP tools
//! 5. **HTTP Layer** (`http`) - WebSocket and single-shot endpoints (axum)
//!
//! Both transports share one [`mcp::McpServer`], so a message gets the same
//! answer whichever way it arrives.

pub mod config;
pub mod error;
pub mod http;
pub mod mcp;
pub mod metrics;
pub mod sdk;
pub mod service;
pub mod tools;

use std::sync::Arc;
use tracing::info;

use crate::config::Config;
use crate::mcp::server::McpServer;
use crate::sdk::{CompletionProvider, OllamaClient};
use crate::service::{ActivityLog, DocumentStore, InMemoryActivityLog, InMemoryDocumentStore};

pub use error::{Error, Result};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Wire up the document store, activity log and Ollama client described by
/// `config` into a ready server.
pub async fn build_server(config: &Config) -> Result<McpServer> {
    let documents: Arc<dyn DocumentStore> = match &config.documents {
        Some(path) => Arc::new(InMemoryDocumentStore::load(path).await?),
        None => {
            info!("No document file configured, using the sample corpus");
            Arc::new(InMemoryDocumentStore::with_sample_documents())
        }
    };

    let activity: Arc<dyn ActivityLog> = match &config.activity_log {
        Some(path) => Arc::new(InMemoryActivityLog::open(path).await?),
        None => Arc::new(InMemoryActivityLog::new()),
    };

    let provider: Arc<dyn CompletionProvider> = Arc::new(OllamaClient::from_config(config)?);
    info!("Completion provider: {} ({})", config.ollama_url, config.model);

    Ok(McpServer::new(documents, activity, provider))
}
