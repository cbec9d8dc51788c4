//! Dispatch: compose the prompt for the selected adapter, call it under a timeout, and turn
//! the outcome into a [`ResponseRecord`]. Nothing fails out of here; every backend error
//! becomes a record carrying the user-facing fallback text.

use super::persona::PersonalityProfile;
use super::registry::RegisteredAdapter;
use crate::error::BackendError;
use crate::memory::ConversationEntry;
use crate::prompts::{category_system_prompt, FALLBACK_RESPONSE_FA};
use crate::providers::{ChatTurn, GenerationRequest, SamplingParams};
use crate::shared::TaskCategory;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub const CREATIVE_TEMPERATURE: f32 = 0.7;
pub const DEFAULT_TEMPERATURE: f32 = 0.5;
pub const TOP_P: f32 = 0.9;
pub const MAX_TOKENS: u32 = 1000;
/// History entries replayed into each prompt.
pub const HISTORY_TURNS: usize = 5;
pub const DEFAULT_ADAPTER_TIMEOUT: Duration = Duration::from_secs(30);

/// Result of one dispatch, as returned to callers and stored in history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseRecord {
    pub success: bool,
    #[serde(default)]
    pub content: String,
    /// None only when the request was rejected before an adapter was chosen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<TaskCategory>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback_response: Option<String>,
    #[serde(default)]
    pub personality_applied: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub personality_name: Option<String>,
}

impl ResponseRecord {
    pub fn succeeded(
        adapter_id: impl Into<String>,
        category: TaskCategory,
        content: String,
        tokens_used: Option<u32>,
    ) -> Self {
        Self {
            success: true,
            content,
            adapter_id: Some(adapter_id.into()),
            category: Some(category),
            tokens_used,
            error: None,
            fallback_response: None,
            personality_applied: false,
            personality_name: None,
        }
    }

    /// Failed dispatch; carries the fallback text for the end user.
    pub fn failed(adapter_id: impl Into<String>, category: TaskCategory, error: String) -> Self {
        Self {
            success: false,
            content: String::new(),
            adapter_id: Some(adapter_id.into()),
            category: Some(category),
            tokens_used: None,
            error: Some(error),
            fallback_response: Some(FALLBACK_RESPONSE_FA.to_string()),
            personality_applied: false,
            personality_name: None,
        }
    }

    /// Rejected before any adapter was involved. Never recorded.
    pub fn rejected(error: String) -> Self {
        Self {
            success: false,
            content: String::new(),
            adapter_id: None,
            category: None,
            tokens_used: None,
            error: Some(error),
            fallback_response: None,
            personality_applied: false,
            personality_name: None,
        }
    }

    /// Text the user actually saw: the content, or the fallback on failure.
    pub fn visible_text(&self) -> &str {
        if self.success {
            &self.content
        } else {
            self.fallback_response.as_deref().unwrap_or_default()
        }
    }
}

/// Everything needed to compose one backend call.
#[derive(Debug, Clone, Copy)]
pub struct DispatchInput<'a> {
    pub user_text: &'a str,
    pub category: TaskCategory,
    /// Replaces the category template (named specialties).
    pub system_override: Option<&'a str>,
    pub context: Option<&'a serde_json::Value>,
    /// Prior exchanges, oldest first. Only the last [`HISTORY_TURNS`] are replayed.
    pub history: &'a [ConversationEntry],
    pub profile: Option<&'a PersonalityProfile>,
}

pub fn sampling_for(category: TaskCategory) -> SamplingParams {
    let temperature = if category == TaskCategory::CreativeWriting {
        CREATIVE_TEMPERATURE
    } else {
        DEFAULT_TEMPERATURE
    };
    SamplingParams {
        temperature,
        top_p: TOP_P,
        max_tokens: MAX_TOKENS,
    }
}

/// Template (or override), then personality sentences, then request context as `key: value` lines.
pub fn compose_system_prompt(input: &DispatchInput<'_>) -> String {
    let mut parts = vec![input
        .system_override
        .unwrap_or_else(|| category_system_prompt(input.category))
        .to_string()];
    if let Some(profile) = input.profile {
        parts.push(profile.prompt_description());
    }
    if let Some(context) = input.context.and_then(render_context) {
        parts.push(context);
    }
    parts.join("\n\n")
}

fn render_context(context: &serde_json::Value) -> Option<String> {
    let lines: Vec<String> = match context {
        serde_json::Value::Null => return None,
        serde_json::Value::Object(map) => map
            .iter()
            .map(|(k, v)| match v {
                serde_json::Value::String(s) => format!("{}: {}", k, s),
                other => format!("{}: {}", k, other),
            })
            .collect(),
        serde_json::Value::String(s) if s.trim().is_empty() => return None,
        serde_json::Value::String(s) => vec![format!("context: {}", s)],
        other => vec![format!("context: {}", other)],
    };
    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

pub fn compose_turns(input: &DispatchInput<'_>) -> Vec<ChatTurn> {
    let start = input.history.len().saturating_sub(HISTORY_TURNS);
    let mut turns = Vec::with_capacity((input.history.len() - start) * 2 + 1);
    for entry in &input.history[start..] {
        turns.push(ChatTurn::user(entry.user_input.as_str()));
        turns.push(ChatTurn::assistant(entry.response.visible_text()));
    }
    turns.push(ChatTurn::user(input.user_text));
    turns
}

pub fn build_request(adapter: &RegisteredAdapter, input: &DispatchInput<'_>) -> GenerationRequest {
    GenerationRequest {
        model: adapter.descriptor.model.clone(),
        system_prompt: compose_system_prompt(input),
        turns: compose_turns(input),
        sampling: sampling_for(input.category),
    }
}

/// Calls the adapter's backend and converts any failure into a failed record.
pub async fn dispatch(adapter: &RegisteredAdapter, input: DispatchInput<'_>, timeout: Duration) -> ResponseRecord {
    let started = Instant::now();
    let outcome = call_backend(adapter, &input, timeout).await;
    let elapsed_ms = started.elapsed().as_millis() as u64;

    match outcome {
        Ok(generation) => {
            tracing::debug!(
                target: "samai::dispatch",
                adapter = %adapter.id(),
                elapsed_ms,
                tokens = ?generation.tokens_used,
                "adapter call succeeded"
            );
            ResponseRecord::succeeded(adapter.id(), input.category, generation.text, generation.tokens_used)
        }
        Err(e) => {
            tracing::warn!(
                target: "samai::dispatch",
                adapter = %adapter.id(),
                elapsed_ms,
                error = %e,
                "adapter call failed"
            );
            ResponseRecord::failed(adapter.id(), input.category, e.to_string())
        }
    }
}

async fn call_backend(
    adapter: &RegisteredAdapter,
    input: &DispatchInput<'_>,
    timeout: Duration,
) -> Result<crate::providers::Generation, BackendError> {
    let backend = adapter
        .backend()
        .ok_or_else(|| BackendError::Unavailable(adapter.id().to_string()))?;
    let request = build_request(adapter, input);
    match tokio::time::timeout(timeout, backend.generate(&request)).await {
        Ok(result) => result,
        Err(_) => Err(BackendError::Timeout(timeout)),
    }
}
