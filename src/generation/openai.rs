//! OpenAI-compatible chat completions client.

use crate::error::ApiError;
use crate::generation::{note_prompt, ContentGenerator, GenerationConfig, EMPTY_COMPLETION_TEXT};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

pub struct OpenAiCompatibleGenerator {
    client: Client,
    config: GenerationConfig,
    api_key: String,
}

impl OpenAiCompatibleGenerator {
    /// Build a generator, reading the API key from `config.api_key_env`.
    pub fn from_config(config: GenerationConfig) -> Result<Self, ApiError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                ApiError::ProviderNotConfigured(format!(
                    "Missing API key (set {})",
                    config.api_key_env
                ))
            })?;
        Self::with_api_key(config, api_key)
    }

    pub fn with_api_key(config: GenerationConfig, api_key: String) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                ApiError::ProviderNotConfigured(format!("Failed to create HTTP client: {}", e))
            })?;
        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

/// Extract the completion text, falling back to [`EMPTY_COMPLETION_TEXT`].
fn completion_text(response: ChatResponse) -> String {
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .unwrap_or_else(|| EMPTY_COMPLETION_TEXT.to_string())
}

#[async_trait]
impl ContentGenerator for OpenAiCompatibleGenerator {
    async fn generate(&self, topic: &str) -> Result<String, ApiError> {
        let prompt = note_prompt(topic);
        let request = ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage {
                role: "user",
                content: &prompt,
            }],
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
        };

        debug!(model = %self.config.model, "Requesting note content");
        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ApiError::GenerationFailed(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(%status, "Content generation rejected");
            return Err(ApiError::GenerationFailed(format!(
                "Service returned {}: {}",
                status, body
            )));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| ApiError::GenerationFailed(format!("Invalid response body: {}", e)))?;
        Ok(completion_text(parsed))
    }
}
