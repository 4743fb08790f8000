//! MCP tool implementations.
//!
//! The five tools exposed through `tools/call`, by category:
//!
//! - `documents` - search, summarize and question answering (3 tools)
//! - `analytics` - system, employee, document and query reports (1 tool)
//! - `tagging` - keyword-based auto tagging (1 tool)

pub mod analytics;
pub mod documents;
pub mod tagging;

use std::sync::Arc;

use crate::mcp::handler::McpHandler;
use crate::metrics::Metrics;
use crate::sdk::CompletionProvider;
use crate::service::{ActivityLog, DocumentStore};

/// Collaborators shared by every tool.
#[derive(Clone)]
pub struct ToolContext {
    pub documents: Arc<dyn DocumentStore>,
    pub activity: Arc<dyn ActivityLog>,
    pub provider: Arc<dyn CompletionProvider>,
    pub metrics: Arc<Metrics>,
}

/// Register all tools with the handler.
pub fn register_all_tools(handler: &mut McpHandler, ctx: ToolContext) {
    // Document tools (3)
    handler.register(documents::SearchDocumentsTool::new(ctx.clone()));
    handler.register(documents::SummarizeDocumentTool::new(ctx.clone()));
    handler.register(documents::AnswerQuestionTool::new(ctx.clone()));

    // Analytics (1)
    handler.register(analytics::GetAnalyticsTool::new(ctx));

    // Tagging (1)
    handler.register(tagging::AutoTagDocumentTool::new());
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::error::{Error, Result};
    use crate::sdk::GenerateOptions;
    use crate::service::{InMemoryActivityLog, InMemoryDocumentStore};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Provider that records prompts and replies with a canned answer, or
    /// fails when no reply is configured.
    #[derive(Default)]
    pub struct RecordingProvider {
        reply: Option<String>,
        prompts: Mutex<Vec<String>>,
    }

    impl RecordingProvider {
        pub fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Some(reply.to_string()),
                prompts: Mutex::new(Vec::new()),
            })
        }

        pub fn failing() -> Arc<Self> {
            Arc::new(Self::default())
        }

        pub fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl CompletionProvider for RecordingProvider {
        async fn generate(&self, prompt: &str, _options: &GenerateOptions) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.reply
                .clone()
                .ok_or_else(|| Error::api(503, "Service Unavailable", "model offline"))
        }
    }

    /// Context over the sample documents and an empty in-memory log.
    pub fn context(provider: Arc<RecordingProvider>) -> ToolContext {
        ToolContext {
            documents: Arc::new(InMemoryDocumentStore::with_sample_documents()),
            activity: Arc::new(InMemoryActivityLog::new()),
            provider,
            metrics: Metrics::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::{context, RecordingProvider};
    use super::*;

    #[test]
    fn test_registers_five_tools_in_order() {
        let mut handler = McpHandler::new();
        register_all_tools(&mut handler, context(RecordingProvider::failing()));

        let names: Vec<String> = handler.list_tools().into_iter().map(|t| t.name).collect();
        assert_eq!(
            names,
            vec![
                "search_documents",
                "summarize_document",
                "answer_question",
                "get_analytics",
                "auto_tag_document"
            ]
        );
    }

    #[test]
    fn test_every_schema_is_an_object_with_required_fields() {
        let mut handler = McpHandler::new();
        register_all_tools(&mut handler, context(RecordingProvider::failing()));

        for tool in handler.list_tools() {
            assert_eq!(tool.input_schema["type"], "object", "{}", tool.name);
            assert!(tool.input_schema["required"].is_array(), "{}", tool.name);
            assert!(!tool.description.is_empty());
        }
    }
}
