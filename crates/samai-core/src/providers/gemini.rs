//! Gemini `generateContent` client.

use super::{Generation, GenerationRequest, GenerativeBackend, TurnRole};
use crate::error::BackendError;
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content<'a>>,
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'static str>,
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_p: f32,
    max_output_tokens: u32,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    usage_metadata: Option<UsageMetadata>,
}

#[derive(Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct UsageMetadata {
    #[serde(default)]
    total_token_count: u32,
}

pub struct GeminiBackend {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiBackend {
    pub fn new(api_key: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            api_key: api_key.into().trim().to_string(),
            base_url: DEFAULT_GEMINI_API_URL.to_string(),
            client,
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{}:generateContent", self.base_url, model)
    }
}

fn build_body(request: &GenerationRequest) -> GenerateContentRequest<'_> {
    let system_instruction = (!request.system_prompt.is_empty()).then(|| Content {
        role: None,
        parts: vec![Part {
            text: &request.system_prompt,
        }],
    });
    let contents = request
        .turns
        .iter()
        .map(|t| Content {
            role: Some(match t.role {
                TurnRole::User => "user",
                TurnRole::Assistant => "model",
            }),
            parts: vec![Part { text: &t.content }],
        })
        .collect();
    GenerateContentRequest {
        system_instruction,
        contents,
        generation_config: GenerationConfig {
            temperature: request.sampling.temperature,
            top_p: request.sampling.top_p,
            max_output_tokens: request.sampling.max_tokens,
        },
    }
}

fn parse_response(body: &str) -> Result<Generation, BackendError> {
    let parsed: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| BackendError::MalformedResponse(e.to_string()))?;
    let parts = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts)
        .unwrap_or_default();
    let text: String = parts.into_iter().filter_map(|p| p.text).collect();
    if text.is_empty() {
        return Err(BackendError::MalformedResponse("no text in Gemini candidates".to_string()));
    }
    Ok(Generation {
        text,
        tokens_used: parsed.usage_metadata.map(|u| u.total_token_count),
    })
}

#[async_trait::async_trait]
impl GenerativeBackend for GeminiBackend {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, BackendError> {
        if self.api_key.is_empty() {
            return Err(BackendError::MissingCredentials("Google API key".to_string()));
        }

        tracing::debug!(target: "samai::providers", model = %request.model, turns = request.turns.len(), "dispatching generateContent");

        let response = self
            .client
            .post(self.endpoint(&request.model))
            .query(&[("key", self.api_key.as_str())])
            .json(&build_body(request))
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            tracing::warn!(target: "samai::providers", status = status.as_u16(), "generateContent failed");
            return Err(BackendError::Status {
                status: status.as_u16(),
                body: text,
            });
        }
        parse_response(&text)
    }
}
