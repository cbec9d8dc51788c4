//! Mock backend: deterministic reply with no network, used when `llm_mode = "mock"`.

use super::{Generation, GenerationRequest, GenerativeBackend};
use crate::error::BackendError;

#[derive(Debug, Clone, Default)]
pub struct MockBackend {
    label: Option<String>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag replies with a label (typically the adapter id) so callers can tell adapters apart.
    pub fn labeled(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
        }
    }
}

#[async_trait::async_trait]
impl GenerativeBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<Generation, BackendError> {
        let last = request
            .turns
            .last()
            .map(|t| t.content.as_str())
            .unwrap_or_default();
        let preview: String = last.chars().take(80).collect();
        let ellipsis = if last.chars().count() > 80 { "…" } else { "" };
        let label = self.label.as_deref().unwrap_or(&request.model);
        let text = format!("[Generated – Mock {}] {}{}", label, preview, ellipsis);
        let tokens = (text.split_whitespace().count() + request.turns.len()) as u32;
        Ok(Generation {
            text,
            tokens_used: Some(tokens),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{ChatTurn, SamplingParams};

    #[tokio::test]
    async fn test_mock_echoes_last_turn() {
        let req = GenerationRequest {
            model: "gpt-4".to_string(),
            system_prompt: String::new(),
            turns: vec![ChatTurn::user("سلام")],
            sampling: SamplingParams {
                temperature: 0.5,
                top_p: 0.9,
                max_tokens: 10,
            },
        };
        let g = MockBackend::new().generate(&req).await.unwrap();
        assert_eq!(g.text, "[Generated – Mock gpt-4] سلام");
        let g = MockBackend::labeled("x").generate(&req).await.unwrap();
        assert!(g.text.starts_with("[Generated – Mock x]"));
        assert!(g.tokens_used.unwrap() > 0);
    }
}
