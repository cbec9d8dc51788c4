//! Shared types: task categories and backend kinds.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Closed classification of user intent. Exactly one is assigned per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// General chat. Default when nothing else matches.
    #[default]
    Conversation,
    ContentGeneration,
    FinancialAdvice,
    PsychologicalSupport,
    CreativeWriting,
    TechnicalAnalysis,
    Translation,
    Research,
    Meditation,
    Companionship,
}

impl TaskCategory {
    /// Every category, in declaration order.
    pub const ALL: [TaskCategory; 10] = [
        TaskCategory::Conversation,
        TaskCategory::ContentGeneration,
        TaskCategory::FinancialAdvice,
        TaskCategory::PsychologicalSupport,
        TaskCategory::CreativeWriting,
        TaskCategory::TechnicalAnalysis,
        TaskCategory::Translation,
        TaskCategory::Research,
        TaskCategory::Meditation,
        TaskCategory::Companionship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TaskCategory::Conversation => "conversation",
            TaskCategory::ContentGeneration => "content_generation",
            TaskCategory::FinancialAdvice => "financial_advice",
            TaskCategory::PsychologicalSupport => "psychological_support",
            TaskCategory::CreativeWriting => "creative_writing",
            TaskCategory::TechnicalAnalysis => "technical_analysis",
            TaskCategory::Translation => "translation",
            TaskCategory::Research => "research",
            TaskCategory::Meditation => "meditation",
            TaskCategory::Companionship => "companionship",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|c| c.as_str().eq_ignore_ascii_case(s))
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which generative service shape an adapter speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendKind {
    /// OpenAI-compatible chat completions (OpenAI, OpenRouter).
    #[serde(alias = "openai")]
    OpenAi,
    /// Google Gemini `generateContent`.
    #[serde(alias = "google")]
    Gemini,
    /// Locally hosted model with no client in this system; never available.
    Local,
}

impl BackendKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::OpenAi => "open_ai",
            BackendKind::Gemini => "gemini",
            BackendKind::Local => "local",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "open_ai" | "openai" => Some(BackendKind::OpenAi),
            "gemini" | "google" => Some(BackendKind::Gemini),
            "local" => Some(BackendKind::Local),
            _ => None,
        }
    }
}
