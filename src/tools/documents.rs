//! Document tools: keyword search, AI summaries and question answering.

use async_trait::async_trait;
use regex::Regex;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::warn;

use crate::error::Result;
use crate::mcp::handler::{
    get_string_arg, get_string_array_arg, get_usize_arg, ToolArgs, ToolHandler,
};
use crate::mcp::protocol::Tool;
use crate::sdk::GenerateOptions;
use crate::service::activity::{ActivityEntry, QUERY_TYPE_QUESTION, QUERY_TYPE_SEARCH};
use crate::service::Document;
use crate::tools::ToolContext;

/// Default number of search hits returned.
pub const DEFAULT_MAX_RESULTS: usize = 10;

/// Default summary length in sentences.
pub const DEFAULT_MAX_SENTENCES: usize = 3;

/// Summary reported when the provider cannot be reached.
pub const SUMMARY_UNAVAILABLE: &str = "AI service unavailable";

/// Answer reported when the provider cannot be reached.
pub const ANSWER_UNAVAILABLE: &str = "AI service is currently unavailable. Please try again later.";

const JSON_OBJECT_PATTERN: &str = r"(?s)(\{.*\})";

// ===== search_documents =====

/// One ranked search hit.
#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
    pub score: usize,
    pub tags: Vec<String>,
    pub category: String,
}

/// Score every document against `query` and return the ranked hits.
///
/// The score is the number of (non-overlapping) occurrences of each query
/// term in the lower-cased title, body and tags. Documents scoring zero are
/// dropped; ties keep store order.
pub fn rank_documents(documents: &[Document], query: &str, max_results: usize) -> Vec<SearchHit> {
    let query = query.to_lowercase();
    let terms: Vec<&str> = query.split_whitespace().collect();

    let mut hits: Vec<SearchHit> = documents
        .iter()
        .filter_map(|doc| {
            let haystack =
                format!("{} {} {}", doc.title, doc.text, doc.tags.join(" ")).to_lowercase();
            let score: usize = terms.iter().map(|t| haystack.matches(t).count()).sum();
            (score > 0).then(|| SearchHit {
                id: doc.id.clone(),
                title: doc.title.clone(),
                score,
                tags: doc.tags.clone(),
                category: doc.category.clone(),
            })
        })
        .collect();

    hits.sort_by(|a, b| b.score.cmp(&a.score));
    hits.truncate(max_results);
    hits
}

/// Keyword search over the document store.
pub struct SearchDocumentsTool {
    ctx: ToolContext,
}

impl SearchDocumentsTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl ToolHandler for SearchDocumentsTool {
    fn definition(&self) -> Tool {
        Tool {
            name: "search_documents".to_string(),
            description: "Search through company documents using AI-powered relevance scoring"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "query": {"type": "string", "description": "Search query"},
                    "employee_id": {"type": "string", "description": "Employee making the request"},
                    "max_results": {"type": "integer", "default": DEFAULT_MAX_RESULTS}
                },
                "required": ["query", "employee_id"]
            }),
        }
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let query = get_string_arg(&args, "query")?;
        let employee_id = get_string_arg(&args, "employee_id")?;
        let max_results = get_usize_arg(&args, "max_results", DEFAULT_MAX_RESULTS);

        self.ctx
            .activity
            .append(ActivityEntry::new(&employee_id, &query, QUERY_TYPE_SEARCH, None))
            .await?;

        let documents = self.ctx.documents.all().await;
        let results = rank_documents(&documents, &query, max_results);

        Ok(json!({
            "query": query,
            "total_found": results.len(),
            "results": results,
        }))
    }
}

// ===== summarize_document =====

/// Summary extracted from a provider reply.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryPayload {
    pub summary: String,
    pub action_items: Vec<String>,
}

/// Best-effort extraction of `{"summary", "action_items"}` from model output.
///
/// The outermost `{...}` span of the reply is parsed. Anything unparsable
/// becomes the summary verbatim with no action items.
pub fn parse_summary(raw: &str) -> SummaryPayload {
    let candidate = Regex::new(JSON_OBJECT_PATTERN)
        .ok()
        .and_then(|re| re.captures(raw))
        .and_then(|caps| caps.get(1))
        .and_then(|m| serde_json::from_str::<Value>(m.as_str()).ok());

    match candidate {
        Some(Value::Object(map)) => {
            let summary = match map.get("summary") {
                Some(Value::String(s)) => s.clone(),
                Some(Value::Null) | None => String::new(),
                Some(other) => other.to_string(),
            };
            let action_items = map
                .get("action_items")
                .and_then(|v| v.as_array())
                .map(|items| {
                    items
                        .iter()
                        .map(|item| match item {
                            Value::String(s) => s.clone(),
                            other => other.to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default();
            SummaryPayload {
                summary,
                action_items,
            }
        }
        _ => SummaryPayload {
            summary: raw.to_string(),
            action_items: Vec::new(),
        },
    }
}

fn summary_prompt(content: &str, max_sentences: usize) -> String {
    format!(
        "You MUST respond ONLY with valid JSON with two fields: \n\
         {{\"summary\": \"<concise summary>\", \"action_items\": [\"item1\",\"item2\"]}}. \n\
         Summary should be concise and up to {} sentences. Document:\n\n{}",
        max_sentences, content
    )
}

/// AI summary of a single document.
pub struct SummarizeDocumentTool {
    ctx: ToolContext,
}

impl SummarizeDocumentTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    async fn summarize(&self, content: &str, max_sentences: usize) -> SummaryPayload {
        let prompt = summary_prompt(content, max_sentences);
        match self
            .ctx
            .provider
            .generate(&prompt, &GenerateOptions::default())
            .await
        {
            Ok(raw) => parse_summary(&raw),
            Err(e) => {
                warn!("Summary generation failed: {}", e);
                self.ctx.metrics.inc_provider_failures();
                SummaryPayload {
                    summary: SUMMARY_UNAVAILABLE.to_string(),
                    action_items: Vec::new(),
                }
            }
        }
    }
}

#[async_trait]
impl ToolHandler for SummarizeDocumentTool {
    fn definition(&self) -> Tool {
        Tool {
            name: "summarize_document".to_string(),
            description: "Generate AI-powered summary of a specific document".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "doc_id": {"type": "string", "description": "Document ID to summarize"},
                    "max_sentences": {
                        "type": "integer",
                        "default": DEFAULT_MAX_SENTENCES,
                        "minimum": 1,
                        "maximum": 10
                    }
                },
                "required": ["doc_id"]
            }),
        }
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let doc_id = get_string_arg(&args, "doc_id")?;
        let max_sentences = get_usize_arg(&args, "max_sentences", DEFAULT_MAX_SENTENCES);

        let doc = self.ctx.documents.get(&doc_id).await?;
        let payload = self.summarize(&doc.text, max_sentences).await;

        Ok(json!({
            "document_id": doc_id,
            "document_title": doc.title,
            "summary": payload.summary,
            "key_points": payload.action_items,
            "max_sentences": max_sentences,
        }))
    }
}

// ===== answer_question =====

/// Context-aware question answering over the document store.
pub struct AnswerQuestionTool {
    ctx: ToolContext,
}

impl AnswerQuestionTool {
    pub fn new(ctx: ToolContext) -> Self {
        Self { ctx }
    }

    /// Concatenate the requested documents (all of them when `requested` is
    /// empty). Unknown ids are skipped. Returns the context and the ids used.
    async fn build_context(&self, requested: &[String]) -> (String, Vec<String>) {
        let candidates: Vec<Document> = if requested.is_empty() {
            self.ctx.documents.all().await
        } else {
            let mut found = Vec::with_capacity(requested.len());
            for id in requested {
                if let Ok(doc) = self.ctx.documents.get(id).await {
                    found.push(doc);
                }
            }
            found
        };

        let mut context = String::new();
        let mut used = Vec::with_capacity(candidates.len());
        for doc in candidates {
            context.push_str(&format!("Document {}: {}\n{}\n\n", doc.id, doc.title, doc.text));
            used.push(doc.id);
        }
        (context, used)
    }
}

#[async_trait]
impl ToolHandler for AnswerQuestionTool {
    fn definition(&self) -> Tool {
        Tool {
            name: "answer_question".to_string(),
            description: "Answer questions about company documents using context-aware AI"
                .to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "question": {"type": "string", "description": "Question to answer"},
                    "employee_id": {"type": "string", "description": "Employee asking the question"},
                    "context_docs": {
                        "type": "array",
                        "items": {"type": "string"},
                        "description": "Optional specific document IDs for context"
                    }
                },
                "required": ["question", "employee_id"]
            }),
        }
    }

    async fn execute(&self, args: ToolArgs) -> Result<Value> {
        let question = get_string_arg(&args, "question")?;
        let employee_id = get_string_arg(&args, "employee_id")?;
        let context_docs = get_string_array_arg(&args, "context_docs");

        self.ctx
            .activity
            .append(ActivityEntry::new(
                &employee_id,
                &question,
                QUERY_TYPE_QUESTION,
                None,
            ))
            .await?;

        let (context, used_docs) = self.build_context(&context_docs).await;
        let prompt = format!(
            "Answer this question based on the company documents: {}\n\nDocuments:\n{}",
            question, context
        );

        let answer = match self
            .ctx
            .provider
            .generate(&prompt, &GenerateOptions::default())
            .await
        {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                warn!("Answer generation returned no text");
                self.ctx.metrics.inc_provider_failures();
                ANSWER_UNAVAILABLE.to_string()
            }
            Err(e) => {
                warn!("Answer generation failed: {}", e);
                self.ctx.metrics.inc_provider_failures();
                ANSWER_UNAVAILABLE.to_string()
            }
        };

        Ok(json!({
            "question": question,
            "answer": answer,
            "context_documents": used_docs,
            "employee_id": employee_id,
        }))
    }
}
