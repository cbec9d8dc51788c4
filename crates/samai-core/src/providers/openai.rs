//! OpenAI-compatible chat completions (OpenAI or OpenRouter).

use super::{Generation, GenerationRequest, GenerativeBackend, TurnRole};
use crate::error::BackendError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    top_p: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    usage: Option<TokenUsage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Deserialize)]
struct ChatMessageResponse {
    #[serde(default)]
    content: Option<String>,
}

#[derive(Deserialize)]
struct TokenUsage {
    #[serde(default)]
    total_tokens: u32,
}

/// Chat-completions client. The request timeout is left to the dispatch boundary.
pub struct OpenAiChatBackend {
    api_key: String,
    api_url: String,
    client: reqwest::Client,
}

impl OpenAiChatBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: api_key.into().trim().to_string(),
            api_url: DEFAULT_OPENAI_API_URL.to_string(),
            client,
        }
    }

    /// Point at another OpenAI-compatible endpoint (e.g. OpenRouter).
    pub fn with_api_url(mut self, url: &str) -> Self {
        self.api_url = url.to_string();
        self
    }
}

fn build_messages(request: &GenerationRequest) -> Vec<ChatMessage<'_>> {
    let mut messages = Vec::with_capacity(request.turns.len() + 1);
    if !request.system_prompt.is_empty() {
        messages.push(ChatMessage {
            role: "system",
            content: &request.system_prompt,
        });
    }
    messages.extend(request.turns.iter().map(|t| ChatMessage {
        role: match t.role {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        },
        content: &t.content,
    }));
    messages
}

fn parse_response(body: &str) -> Result<Generation, BackendError> {
    let parsed: ChatResponse =
        serde_json::from_str(body).map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
    let text = parsed
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| BackendError::MalformedResponse("no choices in completion".to_string()))?;
    Ok(Generation {
        text,
        tokens_used: parsed.usage.map(|u| u.total_tokens),
    })
}

#[async_trait::async_trait]
impl GenerativeBackend for OpenAiChatBackend {
    fn name(&self) -> &str {
        "openai"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, BackendError> {
        if self.api_key.is_empty() {
            return Err(BackendError::MissingCredentials("OpenAI API key".to_string()));
        }
        let body = ChatRequest {
            model: &request.model,
            messages: build_messages(request),
            temperature: request.sampling.temperature,
            top_p: request.sampling.top_p,
            max_tokens: request.sampling.max_tokens,
        };

        tracing::debug!(target: "samai::providers", model = %request.model, turns = request.turns.len(), "dispatching chat completion");

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(target: "samai::providers", status = status.as_u16(), "chat completion failed");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        parse_response(&text)
    }
}
