//! Agent Hub MCP Server
//!
//! Serves the MCP protocol over WebSocket (`/mcp`) and single-shot HTTP
//! (`/mcp/http`).

use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use agent_hub_mcp::config::{Args, Config};
use agent_hub_mcp::error::{Error, Result};
use agent_hub_mcp::{build_server, http, VERSION};

fn init_logging(config: &Config) -> Result<()> {
    let filter = if config.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    let result = if config.json_logs {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| Error::Internal(format!("Failed to set tracing subscriber: {}", e)))
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Build configuration from args
    let config: Config = args.into();
    init_logging(&config)?;

    info!("Agent Hub MCP Server v{}", VERSION);

    let server = Arc::new(build_server(&config).await?);
    info!("Registered {} MCP tools", server.tool_count());

    http::start_server(config, server).await
}
