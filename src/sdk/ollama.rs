//! HTTP client for the Ollama text-generation service.

use async_trait::async_trait;
use reqwest::{Client, Response};
use std::time::Duration;
use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::sdk::types::*;
use crate::sdk::CompletionProvider;
use crate::VERSION;

/// User agent string for provider requests.
fn user_agent() -> String {
    format!("agent-hub-mcp/{} (rust)", VERSION)
}

/// Client for an Ollama server.
#[derive(Debug, Clone)]
pub struct OllamaClient {
    client: Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaClient {
    /// Create a new client. Every call is bounded by `timeout_secs`.
    pub fn new(base_url: impl Into<String>, model: impl Into<String>, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent())
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            timeout_secs,
        })
    }

    /// Create a client from server configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.ollama_url.clone(),
            config.model.clone(),
            config.provider_timeout,
        )
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Handle the provider response, extracting errors.
    async fn handle_response(&self, response: Response) -> Result<GenerateResponse> {
        let status = response.status();

        if !status.is_success() {
            let status_text = status.canonical_reason().unwrap_or("Unknown");
            let body = response.text().await.unwrap_or_default();
            return Err(Error::api(status.as_u16(), status_text, body));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Internal(format!("Failed to parse response: {}", e)))
    }

    fn map_send_error(&self, error: reqwest::Error) -> Error {
        if error.is_timeout() {
            Error::Timeout {
                seconds: self.timeout_secs,
            }
        } else {
            Error::Http(error)
        }
    }
}

#[async_trait]
impl CompletionProvider for OllamaClient {
    async fn generate(&self, prompt: &str, options: &GenerateOptions) -> Result<String> {
        let url = format!("{}/api/generate", self.base_url.trim_end_matches('/'));
        let request = GenerateRequest {
            model: self.model.clone(),
            prompt: prompt.to_string(),
            stream: false,
            options: options.max_tokens.map(|n| ModelOptions {
                num_predict: Some(n),
            }),
        };

        debug!(model = %self.model, prompt_len = prompt.len(), "Calling Ollama generate");

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let body = self.handle_response(response).await?;
        Ok(body.response)
    }
}
