//! HTTP server: WebSocket duplex endpoint, single-shot JSON-RPC endpoint and
//! the operational routes around them.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use futures::{future, SinkExt, StreamExt};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::mcp::protocol::{JsonRpcMessage, RequestId};
use crate::mcp::server::McpServer;
use crate::mcp::transport::{run_session, Frame};

/// Id used for requests issued through `/mcp/test-tool`.
pub const TEST_REQUEST_ID: &str = "test-request";

/// HTTP server state.
#[derive(Clone)]
pub struct AppState {
    server: Arc<McpServer>,
    config: Arc<Config>,
}

impl AppState {
    pub fn new(server: Arc<McpServer>, config: Config) -> Self {
        Self {
            server,
            config: Arc::new(config),
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/mcp", get(websocket))
        .route("/mcp/http", post(single_shot))
        .route("/mcp/status", get(status))
        .route("/mcp/test-tool", post(test_tool))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics))
        .layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
pub async fn start_server(config: Config, server: Arc<McpServer>) -> Result<()> {
    let addr = config.bind_address();
    let app = router(AppState::new(server, config));

    info!("Starting MCP server on {}", addr);
    info!("WebSocket endpoint: ws://{}/mcp", addr);
    info!("HTTP endpoint: http://{}/mcp/http", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// WebSocket upgrade endpoint.
async fn websocket(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.server))
}

async fn handle_socket(socket: WebSocket, server: Arc<McpServer>) {
    let (sink, stream) = socket.split();

    let inbound = stream.map(|msg| {
        msg.map(Frame::from)
            .map_err(|e| Error::Transport(e.to_string()))
    });
    let outbound = sink
        .with(|text: String| future::ready(Ok::<_, axum::Error>(Message::Text(text.into()))))
        .sink_map_err(|e| Error::Transport(e.to_string()));

    if let Err(e) = run_session(&server, inbound, outbound).await {
        warn!("WebSocket session ended with error: {}", e);
    }
}

/// Single-shot JSON-RPC endpoint. Notifications are accepted without a body.
async fn single_shot(State(state): State<AppState>, Json(value): Json<Value>) -> Response {
    match state.server.handle_value(value).await {
        Some(response) => (StatusCode::OK, Json(response)).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Run a tool through the full `tools/call` path.
async fn test_tool(State(state): State<AppState>, Json(params): Json<Value>) -> Response {
    let msg = JsonRpcMessage::request(
        RequestId::String(TEST_REQUEST_ID.to_string()),
        "tools/call",
        Some(params),
    );
    match state.server.handle_message(msg).await {
        Some(response) => Json(response).into_response(),
        None => StatusCode::ACCEPTED.into_response(),
    }
}

/// Health check endpoint.
async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

/// Server status endpoint.
async fn status(State(state): State<AppState>) -> impl IntoResponse {
    let host = &state.config.host;
    let port = state.config.port;
    let server = &state.server;
    let connected = server.connections().count();

    Json(json!({
        "status": "running",
        "host": host,
        "port": port,
        "server": server.info(),
        "capabilities": server.capabilities(),
        "tools": server.tool_count(),
        "connected_clients": connected,
        "metrics": server.metrics().snapshot(connected),
        "endpoints": {
            "websocket": format!("ws://{}:{}/mcp", host, port),
            "http": format!("http://{}:{}/mcp/http", host, port),
            "health": format!("http://{}:{}/health", host, port),
        }
    }))
}

/// Prometheus metrics endpoint.
async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let server = &state.server;
    let body = server
        .metrics()
        .snapshot(server.connections().count())
        .to_prometheus();

    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        body,
    )
}
