//! MCP Prompt Templates
//!
//! Three prompts are advertised. Only `document_summary` renders; the other
//! two are catalog entries for clients that build their own text.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::service::{Document, DocumentStore};

/// Default value of the `length` argument of `document_summary`.
pub const DEFAULT_SUMMARY_LENGTH: &str = "medium";

/// A prompt argument definition.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptArgument {
    pub name: String,
    pub description: String,
    pub required: bool,
}

/// A prompt template.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Prompt {
    pub name: String,
    pub description: String,
    #[serde(default)]
    pub arguments: Vec<PromptArgument>,
}

/// A prompt message (the actual content).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: String,
    pub content: PromptContent,
}

/// Prompt content types.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PromptContent {
    Text { text: String },
}

/// Result of prompts/list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListPromptsResult {
    pub prompts: Vec<Prompt>,
}

/// Result of prompts/get.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetPromptResult {
    pub description: String,
    pub messages: Vec<PromptMessage>,
}

fn arg(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        description: description.to_string(),
        required,
    }
}

/// Prompt registry.
pub struct PromptRegistry {
    prompts: Vec<Prompt>,
    documents: Arc<dyn DocumentStore>,
}

impl PromptRegistry {
    /// Create a new registry with the built-in catalog.
    pub fn new(documents: Arc<dyn DocumentStore>) -> Self {
        let prompts = vec![
            Prompt {
                name: "document_summary".to_string(),
                description: "Generate a comprehensive summary of a company document".to_string(),
                arguments: vec![
                    arg("doc_id", "Document ID to summarize", true),
                    arg("length", "Summary length (short/medium/long)", false),
                ],
            },
            Prompt {
                name: "search_assistant".to_string(),
                description: "Help employees find relevant documents and information".to_string(),
                arguments: vec![
                    arg("query", "What the employee is looking for", true),
                    arg("context", "Additional context about the request", false),
                ],
            },
            Prompt {
                name: "compliance_check".to_string(),
                description: "Check document compliance with company policies".to_string(),
                arguments: vec![
                    arg("doc_content", "Document content to check", true),
                    arg("policy_type", "Type of policy to check against", false),
                ],
            },
        ];

        Self { prompts, documents }
    }

    /// The advertised catalog.
    pub fn list(&self) -> ListPromptsResult {
        ListPromptsResult {
            prompts: self.prompts.clone(),
        }
    }

    /// Render a prompt.
    pub async fn get(&self, name: &str, arguments: &HashMap<String, Value>) -> Result<GetPromptResult> {
        match name {
            "document_summary" => {
                let doc_id = arguments.get("doc_id").and_then(|v| v.as_str()).unwrap_or("");
                let length = arguments
                    .get("length")
                    .and_then(|v| v.as_str())
                    .unwrap_or(DEFAULT_SUMMARY_LENGTH);

                let doc = self.documents.get(doc_id).await?;
                Ok(GetPromptResult {
                    description: format!("Summary prompt for document {}", doc_id),
                    messages: vec![PromptMessage {
                        role: "user".to_string(),
                        content: PromptContent::Text {
                            text: render_document_summary(&doc, length),
                        },
                    }],
                })
            }
            _ => Err(Error::PromptNotFound(name.to_string())),
        }
    }
}

fn render_document_summary(doc: &Document, length: &str) -> String {
    let or = |value: &str, fallback: &'static str| -> String {
        if value.is_empty() {
            fallback.to_string()
        } else {
            value.to_string()
        }
    };

    format!(
        "Please provide a {} summary of this document:\n\n\
         Title: {}\n\
         Category: {}\n\n\
         Content:\n{}\n\n\
         Please focus on the key points and actionable information.",
        length,
        or(&doc.title, "Untitled"),
        or(&doc.category, "General"),
        doc.text
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::service::InMemoryDocumentStore;
    use serde_json::json;

    fn registry() -> PromptRegistry {
        PromptRegistry::new(Arc::new(InMemoryDocumentStore::with_sample_documents()))
    }

    fn args(value: Value) -> HashMap<String, Value> {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_catalog_has_three_prompts() {
        let names: Vec<String> = registry().list().prompts.into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["document_summary", "search_assistant", "compliance_check"]);
    }

    #[tokio::test]
    async fn test_document_summary_renders_template() {
        let result = registry()
            .get("document_summary", &args(json!({"doc_id": "doc_003", "length": "short"})))
            .await
            .unwrap();

        assert_eq!(result.description, "Summary prompt for document doc_003");
        assert_eq!(result.messages.len(), 1);
        assert_eq!(result.messages[0].role, "user");

        let PromptContent::Text { text } = &result.messages[0].content;
        assert!(text.starts_with("Please provide a short summary of this document:\n\nTitle: Remote Work Guidelines\nCategory: guideline\n\nContent:\nRemote work"));
        assert!(text.ends_with("\n\nPlease focus on the key points and actionable information."));
    }

    #[tokio::test]
    async fn test_document_summary_defaults_length() {
        let result = registry()
            .get("document_summary", &args(json!({"doc_id": "doc_001"})))
            .await
            .unwrap();

        let json = serde_json::to_value(&result).unwrap();
        let text = json["messages"][0]["content"]["text"].as_str().unwrap();
        assert!(text.starts_with("Please provide a medium summary"));
        assert_eq!(json["messages"][0]["content"]["type"], "text");
    }

    #[tokio::test]
    async fn test_unrendered_prompts_are_not_found() {
        let registry = registry();
        for name in ["search_assistant", "compliance_check", "nope"] {
            let err = registry.get(name, &HashMap::new()).await.unwrap_err();
            assert_eq!(err.rpc_code(), -32602);
            assert_eq!(err.to_string(), format!("Prompt not found: {}", name));
        }
    }

    #[tokio::test]
    async fn test_document_summary_unknown_document() {
        let err = registry()
            .get("document_summary", &args(json!({"doc_id": "doc_404"})))
            .await
            .unwrap_err();
        assert_eq!(err.rpc_code(), -32602);
    }
}
