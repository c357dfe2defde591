//! Pluggable completion backend
//!
//! Defines the `CompletionBackend` trait used by the enrichment handler
//! and `ChatCompletionBackend`, which talks to an OpenAI-compatible
//! `/chat/completions` endpoint (Groq by default).

use crate::config::ModelConfig;
use crate::error::{Error, Result};
use async_trait::async_trait;
use serde::Deserialize;

const SYSTEM_PROMPT: &str = "You are a helpful assistant that generates tags and a summary for a given message. \
The tags must include at least one tag related to the urgency of the message. \
The urgency tags must be either 'urgent' or 'low_urgency'. \
Respond in the following format:\n\nTags: tag1, tag2, tag3\nSummary: A brief summary of the message.";

/// A two-part chat prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

impl Prompt {
    /// Build the tagging prompt for a user message
    pub fn for_message(message: &str) -> Self {
        Self {
            system: SYSTEM_PROMPT.to_string(),
            user: format!(
                "Generate 2-3 tags (including at least one urgency-related tag: 'urgent' or 'low_urgency') \
                 and a brief summary for the following message: '{}'",
                message
            ),
        }
    }
}

/// Text completion interface.
///
/// Implementations return the model's raw text; parsing happens elsewhere.
#[async_trait]
pub trait CompletionBackend: Send + Sync {
    /// Complete the prompt and return the generated text
    async fn complete(&self, prompt: &Prompt) -> Result<String>;

    /// Human-readable name for this backend (used in logs)
    fn name(&self) -> &str;
}

/// OpenAI-compatible chat-completion backend
pub struct ChatCompletionBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    max_tokens: u32,
    api_key: String,
}

impl ChatCompletionBackend {
    /// Create a backend from model config and a resolved API key
    pub fn new(config: &ModelConfig, api_key: impl Into<String>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            max_tokens: config.max_tokens,
            api_key: api_key.into(),
        })
    }

    /// Create a backend, reading the API key from the configured env var
    pub fn from_env(config: &ModelConfig) -> Result<Self> {
        let api_key = config.resolve_api_key()?;
        Self::new(config, api_key)
    }

    fn request_body(&self, prompt: &Prompt) -> serde_json::Value {
        serde_json::json!({
            "model": self.model,
            "messages": [
                { "role": "system", "content": prompt.system },
                { "role": "user", "content": prompt.user }
            ],
            "max_tokens": self.max_tokens,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionBackend for ChatCompletionBackend {
    async fn complete(&self, prompt: &Prompt) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);

        tracing::debug!(model = %self.model, "Sending completion request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&self.request_body(prompt))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();
            return Err(Error::GenerationFailed(format!(
                "Completion API error ({}): {}",
                status, error_text
            )));
        }

        let body: ChatCompletionResponse = response.json().await?;
        let content = body
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| {
                Error::GenerationFailed("Completion response has no content".to_string())
            })?;

        Ok(content.trim().to_string())
    }

    fn name(&self) -> &str {
        "chat-completions"
    }
}
