//! MCP server implementation.
//!
//! [`McpServer`] is the method dispatcher shared by every transport. It owns
//! no transport state; the duplex and single-shot endpoints both feed it
//! parsed messages and write back whatever it returns.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::error::{Error, Result};
use crate::mcp::connections::ConnectionManager;
use crate::mcp::handler::McpHandler;
use crate::mcp::prompts::PromptRegistry;
use crate::mcp::protocol::*;
use crate::mcp::resources::ResourceRegistry;
use crate::metrics::Metrics;
use crate::sdk::{CompletionProvider, GenerateOptions};
use crate::service::{ActivityLog, DocumentStore};
use crate::tools::{register_all_tools, ToolContext};

/// Name reported in `initialize`.
pub const SERVER_NAME: &str = "MNC Agent Hub MCP Server";

/// Version reported in `initialize`.
pub const SERVER_VERSION: &str = "1.0.0";

/// Description reported in `initialize`.
pub const SERVER_DESCRIPTION: &str = "Enterprise document management AI integration";

/// Default `maxTokens` for `completion/complete`.
pub const DEFAULT_COMPLETION_TOKENS: u32 = 1000;

/// Methods the server understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Initialize,
    Ping,
    ListTools,
    CallTool,
    ListResources,
    ReadResource,
    ListPrompts,
    GetPrompt,
    Complete,
}

impl Method {
    pub const ALL: [Method; 9] = [
        Method::Initialize,
        Method::Ping,
        Method::ListTools,
        Method::CallTool,
        Method::ListResources,
        Method::ReadResource,
        Method::ListPrompts,
        Method::GetPrompt,
        Method::Complete,
    ];

    /// Wire name of the method.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Initialize => "initialize",
            Method::Ping => "ping",
            Method::ListTools => "tools/list",
            Method::CallTool => "tools/call",
            Method::ListResources => "resources/list",
            Method::ReadResource => "resources/read",
            Method::ListPrompts => "prompts/list",
            Method::GetPrompt => "prompts/get",
            Method::Complete => "completion/complete",
        }
    }
}

impl FromStr for Method {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Method::ALL
            .iter()
            .copied()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| Error::MethodNotFound(s.to_string()))
    }
}

/// Parse method params, treating absent or null params as an empty object.
fn parse_params<T: DeserializeOwned>(params: Option<Value>) -> Result<T> {
    let params = match params {
        None | Some(Value::Null) => json!({}),
        Some(v) => v,
    };
    serde_json::from_value(params).map_err(|e| Error::InvalidParams(e.to_string()))
}

/// MCP server.
pub struct McpServer {
    handler: Arc<McpHandler>,
    prompts: Arc<PromptRegistry>,
    resources: Arc<ResourceRegistry>,
    provider: Arc<dyn CompletionProvider>,
    connections: ConnectionManager,
    metrics: Arc<Metrics>,
    info: ServerInfo,
    capabilities: ServerCapabilities,
}

impl McpServer {
    /// Create a server over the given collaborators, with all five tools
    /// registered.
    pub fn new(
        documents: Arc<dyn DocumentStore>,
        activity: Arc<dyn ActivityLog>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Self {
        let metrics = Metrics::new();

        let mut handler = McpHandler::new();
        register_all_tools(
            &mut handler,
            ToolContext {
                documents: documents.clone(),
                activity,
                provider: provider.clone(),
                metrics: metrics.clone(),
            },
        );

        Self {
            handler: Arc::new(handler),
            prompts: Arc::new(PromptRegistry::new(documents.clone())),
            resources: Arc::new(ResourceRegistry::new(documents)),
            provider,
            connections: ConnectionManager::new(),
            metrics,
            info: ServerInfo {
                name: SERVER_NAME.to_string(),
                version: SERVER_VERSION.to_string(),
                description: Some(SERVER_DESCRIPTION.to_string()),
            },
            capabilities: ServerCapabilities::default(),
        }
    }

    pub fn info(&self) -> &ServerInfo {
        &self.info
    }

    pub fn capabilities(&self) -> &ServerCapabilities {
        &self.capabilities
    }

    /// Open duplex connections.
    pub fn connections(&self) -> &ConnectionManager {
        &self.connections
    }

    pub fn metrics(&self) -> &Arc<Metrics> {
        &self.metrics
    }

    /// Number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.handler.tool_count()
    }

    /// Handle one inbound message. Notifications are dispatched for their
    /// side effects and never produce a response.
    pub async fn handle_message(&self, msg: JsonRpcMessage) -> Option<JsonRpcResponse> {
        if msg.is_notification() {
            self.handle_notification(msg).await;
            return None;
        }

        self.metrics.inc_requests();
        let method = msg.method.as_deref().unwrap_or("null");
        debug!("Handling request: {} (id: {:?})", method, msg.id);

        let result = match method.parse::<Method>() {
            Ok(method) => self.dispatch(method, msg.params).await,
            Err(e) => Err(e),
        };

        Some(match result {
            Ok(value) => {
                self.metrics.inc_success();
                JsonRpcResponse::success(msg.id, value)
            }
            Err(e) => {
                self.metrics.inc_failed();
                if e.is_provider_failure() {
                    warn!("Request {} hit an unavailable provider: {}", method, e);
                } else if e.rpc_code() == error_codes::INTERNAL_ERROR {
                    error!("Request {} failed: {}", method, e);
                } else {
                    debug!("Request {} rejected: {}", method, e);
                }
                JsonRpcResponse::failure(msg.id, JsonRpcError::from(&e))
            }
        })
    }

    /// Handle any JSON value as an inbound message. Mistyped envelope fields
    /// are answered with an error response carrying a null id.
    pub async fn handle_value(&self, value: Value) -> Option<JsonRpcResponse> {
        match JsonRpcMessage::from_value(value) {
            Ok(msg) => self.handle_message(msg).await,
            Err(e) => {
                self.metrics.inc_requests();
                self.metrics.inc_failed();
                debug!("Rejected message envelope: {}", e);
                Some(JsonRpcResponse::failure(None, JsonRpcError::from(&e)))
            }
        }
    }

    /// Parse a raw text message and handle it, returning the serialized
    /// response if there is one. Only text that is not JSON at all fails.
    pub async fn handle_text(&self, text: &str) -> Result<Option<String>> {
        let value: Value = serde_json::from_str(text)?;
        match self.handle_value(value).await {
            Some(response) => Ok(Some(serde_json::to_string(&response)?)),
            None => Ok(None),
        }
    }

    async fn handle_notification(&self, msg: JsonRpcMessage) {
        self.metrics.inc_notifications();
        let Some(method) = msg.method else {
            debug!("Ignoring message with neither id nor method");
            return;
        };

        if method.starts_with("notifications/") {
            info!("Client notification: {}", method);
            return;
        }

        match method.parse::<Method>() {
            Ok(m) => {
                if let Err(e) = self.dispatch(m, msg.params).await {
                    debug!("Notification {} failed: {}", method, e);
                }
            }
            Err(_) => debug!("Unknown notification: {}", method),
        }
    }

    async fn dispatch(&self, method: Method, params: Option<Value>) -> Result<Value> {
        match method {
            Method::Initialize => self.handle_initialize(),
            Method::Ping => Ok(json!({ "status": "pong" })),
            Method::ListTools => self.handle_list_tools(),
            Method::CallTool => self.handle_call_tool(params).await,
            Method::ListResources => Ok(serde_json::to_value(self.resources.list().await)?),
            Method::ReadResource => self.handle_read_resource(params).await,
            Method::ListPrompts => Ok(serde_json::to_value(self.prompts.list())?),
            Method::GetPrompt => self.handle_get_prompt(params).await,
            Method::Complete => self.handle_completion(params).await,
        }
    }

    fn handle_initialize(&self) -> Result<Value> {
        let result = InitializeResult {
            protocol_version: MCP_VERSION.to_string(),
            capabilities: self.capabilities.clone(),
            server_info: self.info.clone(),
        };
        Ok(serde_json::to_value(result)?)
    }

    fn handle_list_tools(&self) -> Result<Value> {
        let result = ListToolsResult {
            tools: self.handler.list_tools(),
        };
        Ok(serde_json::to_value(result)?)
    }

    /// Handle call tool request. Unknown tools and unknown documents keep
    /// their own codes; every other tool failure becomes an internal error.
    async fn handle_call_tool(&self, params: Option<Value>) -> Result<Value> {
        let params: CallToolParams = parse_params(params)?;
        self.metrics.inc_tool_calls();

        let handler = self
            .handler
            .get_tool(&params.name)
            .ok_or_else(|| Error::ToolNotFound(params.name.clone()))?;

        let value = handler
            .execute(params.arguments)
            .await
            .map_err(|e| match e {
                Error::ToolNotFound(_)
                | Error::DocumentNotFound(_)
                | Error::ToolExecutionFailed(_) => e,
                other => {
                    warn!("Tool {} failed: {}", params.name, other);
                    Error::ToolExecutionFailed(other.to_string())
                }
            })?;

        Ok(serde_json::to_value(ToolResult::from_json(&value)?)?)
    }

    async fn handle_read_resource(&self, params: Option<Value>) -> Result<Value> {
        #[derive(Deserialize)]
        struct ReadParams {
            #[serde(default)]
            uri: String,
        }

        let params: ReadParams = parse_params(params)?;
        Ok(serde_json::to_value(self.resources.read(&params.uri).await?)?)
    }

    async fn handle_get_prompt(&self, params: Option<Value>) -> Result<Value> {
        #[derive(Deserialize)]
        struct GetPromptParams {
            #[serde(default)]
            name: String,
            #[serde(default)]
            arguments: HashMap<String, Value>,
        }

        let params: GetPromptParams = parse_params(params)?;
        let result = self.prompts.get(&params.name, &params.arguments).await?;
        Ok(serde_json::to_value(result)?)
    }

    async fn handle_completion(&self, params: Option<Value>) -> Result<Value> {
        #[derive(Deserialize)]
        struct CompletionParams {
            #[serde(default)]
            prompt: String,
            #[serde(default = "default_max_tokens", rename = "maxTokens")]
            max_tokens: u32,
        }

        fn default_max_tokens() -> u32 {
            DEFAULT_COMPLETION_TOKENS
        }

        let params: CompletionParams = parse_params(params)?;
        let options = GenerateOptions::with_max_tokens(params.max_tokens);

        match self.provider.generate(&params.prompt, &options).await {
            Ok(text) => Ok(json!({
                "completion": { "type": "text", "text": text }
            })),
            Err(e) => {
                warn!("Completion failed: {}", e);
                self.metrics.inc_provider_failures();
                Err(Error::CompletionUnavailable)
            }
        }
    }
}
