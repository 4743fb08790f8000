//! Keyword-based auto tagging.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::error::Result;
use crate::mcp::handler::{get_optional_string_arg, get_string_arg, ToolArgs, ToolHandler};
use crate::mcp::protocol::Tool;

/// Tag emitted when no keyword group matches.
pub const FALLBACK_TAG: &str = "general";

/// Keyword groups, in emission order.
pub const TAG_KEYWORDS: [(&str, &[&str]); 8] = [
    ("policy", &["policy", "procedure", "rule", "regulation"]),
    ("hr", &["employee", "staff", "human", "resource", "personnel"]),
    ("security", &["security", "privacy", "confidential", "password", "access"]),
    ("compliance", &["compliance", "audit", "legal", "requirement"]),
    ("process", &["process", "workflow", "procedure", "step"]),
    ("guideline", &["guideline", "guide", "standard", "best practice"]),
    ("technical", &["technical", "system", "software", "hardware"]),
    ("training", &["training", "education", "learning", "development"]),
];

/// Suggest tags for a piece of text. Matching is substring based, so "rules"
/// hits "rule".
pub fn suggest_tags(title: &str, content: &str, category: &str) -> Vec<String> {
    let text = format!("{} {} {}", title, content, category).to_lowercase();

    let mut tags: Vec<String> = TAG_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| text.contains(k)))
        .map(|(tag, _)| tag.to_string())
        .collect();

    if tags.is_empty() {
        tags.push(FALLBACK_TAG.to_string());
    }
    tags
}

/// Auto tagging tool.
#[derive(Default)]
pub struct AutoTagDocumentTool;

impl AutoTagDocumentTool {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ToolHandler for AutoTagDocumentTool {
    fn definition(&self) -> Tool {
        Tool {
            name: "auto_tag_document".to_string(),
            description: "Automatically generate tags for a document using AI analysis"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "content": {"type": "string", "description": "Document content to analyze"},
                    "title": {"type": "string", "description": "Document title"},
                    "category": {"type": "string", "description": "Document category"}
                },
                "required": ["content"]
            }),
        }
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let content = get_string_arg(&args, "content")?;
        let title = get_optional_string_arg(&args, "title").unwrap_or_default();
        let category = get_optional_string_arg(&args, "category").unwrap_or_default();

        let tags = suggest_tags(&title, &content, &category);
        let confidence = tags.len() as f64 / TAG_KEYWORDS.len() as f64;

        Ok(json!({
            "analysis": format!("Generated {} tags based on content analysis", tags.len()),
            "suggested_tags": tags,
            "confidence": confidence,
        }))
    }
}
