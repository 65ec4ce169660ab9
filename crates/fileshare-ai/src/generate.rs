//! Client for an OpenAI-compatible chat-completions backend.

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::debug;

use crate::error::AiError;

/// Where and how to reach the text-generation backend.
///
/// Read from the environment so the demo works against OpenAI, OpenRouter,
/// Ollama or any compatible endpoint without a config file.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
}

impl GenerationConfig {
    pub fn from_env() -> Self {
        Self {
            base_url: std::env::var("FILESHARE_AI_BASE_URL")
                .unwrap_or_else(|_| "https://api.openai.com/v1".to_string()),
            api_key: std::env::var("FILESHARE_AI_API_KEY").unwrap_or_default(),
            model: std::env::var("FILESHARE_AI_MODEL")
                .unwrap_or_else(|_| "gpt-4o-mini".to_string()),
        }
    }
}

/// A single prompt-in, text-out completion call.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, AiError>;
}

/// `TextGenerator` over the OpenAI chat-completions wire format.
///
/// No request timeout: the flow imposes none, a hung backend hangs the
/// pending summarization and nothing else.
#[derive(Debug, Clone)]
pub struct OpenAiGenerator {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl OpenAiGenerator {
    pub fn new(config: GenerationConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }
}

#[async_trait]
impl TextGenerator for OpenAiGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, AiError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let body = json!({
            "model": self.config.model,
            "messages": [{"role": "user", "content": prompt}],
        });

        debug!(model = %self.config.model, prompt_chars = prompt.len(), "Requesting completion");

        let mut request = self.client.post(&url).json(&body);
        if !self.config.api_key.is_empty() {
            request = request.bearer_auth(&self.config.api_key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(AiError::BackendStatus(response.status()));
        }

        let payload: Value = response.json().await?;
        payload["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .ok_or(AiError::MalformedResponse)
    }
}
