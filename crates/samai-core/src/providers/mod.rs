//! Generative-text capability: one trait, one implementation per backend shape.
//!
//! The engine only ever sees [`GenerativeBackend`]; OpenAI-style and Gemini-style request and
//! response structures stay private to their modules.

mod gemini;
mod mock;
mod openai;

pub use gemini::{GeminiBackend, DEFAULT_GEMINI_API_URL};
pub use mock::MockBackend;
pub use openai::{OpenAiChatBackend, DEFAULT_OPENAI_API_URL};

use crate::error::BackendError;
use serde::{Deserialize, Serialize};

/// Speaker of a replayed turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplingParams {
    pub temperature: f32,
    pub top_p: f32,
    pub max_tokens: u32,
}

/// A fully composed prompt: system instruction plus ordered turns ending with the user's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub model: String,
    pub system_prompt: String,
    pub turns: Vec<ChatTurn>,
    pub sampling: SamplingParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generation {
    pub text: String,
    #[serde(default)]
    pub tokens_used: Option<u32>,
}

/// A backend binding to one generative-text service.
#[async_trait::async_trait]
pub trait GenerativeBackend: Send + Sync {
    /// Short name for logs (e.g. "openai", "gemini", "mock").
    fn name(&self) -> &str;

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, BackendError>;
}
