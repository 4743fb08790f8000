//! Completion provider SDK.
//!
//! The MCP tools never talk to a model directly; they go through the
//! [`CompletionProvider`] trait so tests and alternative backends can be
//! swapped in.
//!
//! - `ollama` - HTTP client for an Ollama server
//! - `types` - Ollama request/response types and call options

pub mod ollama;
pub mod types;

use async_trait::async_trait;

use crate::error::Result;

pub use ollama::OllamaClient;
pub use types::GenerateOptions;

/// Something that turns a prompt into generated text.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate text for `prompt`. Failures, timeouts and non-success
    /// statuses are all reported as errors.
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String>;
}
