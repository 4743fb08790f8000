//! Tool handler trait and the tool registry.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::mcp::protocol::Tool;

/// Arguments of a `tools/call` request.
pub type ToolArgs = HashMap<String, Value>;

/// Handler for MCP tool calls.
#[async_trait]
pub trait ToolHandler: Send + Sync {
    /// Get the tool definition.
    fn definition(&self) -> Tool;

    /// Execute the tool, returning its structured result. The server wraps
    /// the value into the wire-level text content block.
    async fn execute(&self, arguments: ToolArgs) -> Result<Value>;
}

/// Registry of tool handlers. Listing preserves registration order.
pub struct McpHandler {
    tools: Vec<Arc<dyn ToolHandler>>,
    by_name: HashMap<String, usize>,
}

impl McpHandler {
    /// Create a new handler registry.
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            by_name: HashMap::new(),
        }
    }

    /// Register a tool handler. A later registration under the same name
    /// replaces the earlier one in place.
    pub fn register<T: ToolHandler + 'static>(&mut self, handler: T) {
        self.register_arc(Arc::new(handler));
    }

    /// Register a tool handler (Arc version).
    pub fn register_arc(&mut self, handler: Arc<dyn ToolHandler>) {
        let name = handler.definition().name;
        match self.by_name.get(&name) {
            Some(&idx) => self.tools[idx] = handler,
            None => {
                self.by_name.insert(name, self.tools.len());
                self.tools.push(handler);
            }
        }
    }

    /// Get all registered tools.
    pub fn list_tools(&self) -> Vec<Tool> {
        self.tools.iter().map(|h| h.definition()).collect()
    }

    /// Get a tool by name.
    pub fn get_tool(&self, name: &str) -> Option<Arc<dyn ToolHandler>> {
        self.by_name.get(name).map(|&idx| self.tools[idx].clone())
    }

    /// Get the number of registered tools.
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }
}

impl Default for McpHandler {
    fn default() -> Self {
        Self::new()
    }
}

/// Helper to extract a required string argument.
pub fn get_string_arg(args: &ToolArgs, name: &str) -> Result<String> {
    args.get(name)
        .and_then(|v| v.as_str())
        .map(String::from)
        .ok_or_else(|| Error::InvalidToolArguments(name.to_string()))
}

/// Helper to extract an optional string argument.
pub fn get_optional_string_arg(args: &ToolArgs, name: &str) -> Option<String> {
    args.get(name).and_then(|v| v.as_str()).map(String::from)
}

/// Helper to extract an optional non-negative integer argument.
pub fn get_usize_arg(args: &ToolArgs, name: &str, default: usize) -> usize {
    match args.get(name).and_then(|v| v.as_i64()) {
        Some(n) if n < 0 => 0,
        Some(n) => n as usize,
        None => default,
    }
}

/// Helper to extract a string array argument.
pub fn get_string_array_arg(args: &ToolArgs, name: &str) -> Vec<String> {
    args.get(name)
        .and_then(|v| v.as_array())
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str().map(String::from))
                .collect()
        })
        .unwrap_or_default()
}
