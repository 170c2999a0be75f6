//! Content Generation
//!
//! Produces note text from a topic through an external text-generation
//! service. This is the only asynchronous boundary in the organizer: callers
//! await the generated text (with their own timeout and cancellation) and only
//! then hand it to [`crate::item::ItemRepository::create`].

pub mod openai;

use crate::error::ApiError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use openai::OpenAiCompatibleGenerator;

/// Text returned when the service answers with an empty completion.
pub const EMPTY_COMPLETION_TEXT: &str = "No content generated.";

/// Source of generated note content.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Generate note text about `topic`.
    async fn generate(&self, topic: &str) -> Result<String, ApiError>;
}

/// Content generation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with each request
    #[serde(default = "default_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Upper bound on one generation call, enforced by the caller
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_api_key_env() -> String {
    "ORGANISA_API_KEY".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f32 {
    0.7
}

fn default_timeout_secs() -> u64 {
    60
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Prompt asking for a short note about `topic`.
pub fn note_prompt(topic: &str) -> String {
    format!(
        "Write a short, useful and well-structured note about the following topic: \"{}\". \
         Use Markdown formatting.",
        topic.trim()
    )
}
