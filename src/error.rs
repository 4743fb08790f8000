//! Error types for the Agent Hub MCP server.

use thiserror::Error;

use crate::mcp::protocol::error_codes;

/// Result type alias for Agent Hub MCP operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the Agent Hub MCP server.
#[derive(Error, Debug)]
pub enum Error {
    // ===== Protocol Errors =====
    #[error("Method not found: {0}")]
    MethodNotFound(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),

    #[error("Unknown tool: {0}")]
    ToolNotFound(String),

    #[error("Missing required argument: {0}")]
    InvalidToolArguments(String),

    #[error("Tool execution failed: {0}")]
    ToolExecutionFailed(String),

    // ===== Lookup Errors =====
    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Resource not found: {0}")]
    ResourceNotFound(String),

    #[error("Prompt not found: {0}")]
    PromptNotFound(String),

    // ===== Provider Errors =====
    #[error("Completion service unavailable")]
    CompletionUnavailable,

    #[error("API error: {status} {status_text} - {message}")]
    Api {
        status: u16,
        status_text: String,
        message: String,
    },

    #[error("Timeout: operation timed out after {seconds} seconds")]
    Timeout { seconds: u64 },

    // ===== Transport Errors =====
    #[error("Transport error: {0}")]
    Transport(String),

    // ===== I/O Errors =====
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    // ===== Internal Errors =====
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an API error from HTTP response details.
    pub fn api(status: u16, status_text: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            status_text: status_text.into(),
            message: message.into(),
        }
    }

    /// JSON-RPC error code reported to the caller for this error.
    pub fn rpc_code(&self) -> i32 {
        match self {
            Self::MethodNotFound(_) => error_codes::METHOD_NOT_FOUND,
            Self::InvalidParams(_)
            | Self::ToolNotFound(_)
            | Self::DocumentNotFound(_)
            | Self::ResourceNotFound(_)
            | Self::PromptNotFound(_) => error_codes::INVALID_PARAMS,
            _ => error_codes::INTERNAL_ERROR,
        }
    }

    /// Whether the error comes from the completion provider rather than the caller.
    pub fn is_provider_failure(&self) -> bool {
        matches!(
            self,
            Self::Api { .. } | Self::Timeout { .. } | Self::Http(_) | Self::CompletionUnavailable
        )
    }
}
