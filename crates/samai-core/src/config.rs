//! Engine configuration, layered with the `config` crate.
//!
//! Precedence (lowest to highest): built-in defaults, the TOML file named by `SAMAI_CONFIG`
//! (default `config/samai.toml`, skipped when absent), then `SAMAI__*` environment variables.
//! Provider keys additionally fall back to the conventional `OPENAI_API_KEY` and
//! `GOOGLE_API_KEY` variables.

use crate::engine::dispatch::DEFAULT_ADAPTER_TIMEOUT;
use crate::engine::registry::{default_catalog, AdapterDescriptor};
use crate::error::EngineResult;
use crate::providers::{DEFAULT_GEMINI_API_URL, DEFAULT_OPENAI_API_URL};
use crate::shared::{BackendKind, TaskCategory};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

pub const ENV_CONFIG_PATH: &str = "SAMAI_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "config/samai.toml";
pub const ENV_PREFIX: &str = "SAMAI";
pub const ENV_OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const ENV_GOOGLE_API_KEY: &str = "GOOGLE_API_KEY";
pub const DEFAULT_ADAPTER_ID: &str = "gpt-3.5-turbo";

/// Mock answers locally with no network; Live binds real clients when keys are present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LlmMode {
    #[default]
    Mock,
    Live,
}

/// One adapter entry of a custom catalog.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterConfig {
    pub id: String,
    /// Model name sent to the backend; defaults to `id`.
    #[serde(default)]
    pub model: Option<String>,
    pub backend: BackendKind,
    #[serde(default)]
    pub specialties: Vec<TaskCategory>,
    pub performance_score: f32,
}

impl AdapterConfig {
    pub fn descriptor(&self) -> AdapterDescriptor {
        let d = AdapterDescriptor::new(
            self.id.as_str(),
            self.backend,
            self.specialties.iter().copied(),
            self.performance_score,
        );
        match &self.model {
            Some(model) if !model.trim().is_empty() => d.with_model(model.trim()),
            _ => d,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub app_name: String,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub llm_mode: LlmMode,
    #[serde(default)]
    pub openai_api_key: Option<String>,
    pub openai_api_url: String,
    #[serde(default)]
    pub google_api_key: Option<String>,
    pub gemini_api_url: String,
    pub default_adapter: String,
    pub adapter_timeout_secs: u64,
    /// Seed for personality draws; entropy when unset.
    #[serde(default)]
    pub personality_seed: Option<u64>,
    /// Replaces the built-in catalog when set.
    #[serde(default)]
    pub adapters: Option<Vec<AdapterConfig>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_name: "Sam.AI".to_string(),
            host: "0.0.0.0".to_string(),
            port: 8000,
            llm_mode: LlmMode::Mock,
            openai_api_key: None,
            openai_api_url: DEFAULT_OPENAI_API_URL.to_string(),
            google_api_key: None,
            gemini_api_url: DEFAULT_GEMINI_API_URL.to_string(),
            default_adapter: DEFAULT_ADAPTER_ID.to_string(),
            adapter_timeout_secs: DEFAULT_ADAPTER_TIMEOUT.as_secs(),
            personality_seed: None,
            adapters: None,
        }
    }
}

impl EngineConfig {
    /// Load from file and environment. See the module docs for precedence.
    pub fn load() -> EngineResult<Self> {
        let config_path = std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let builder = Self::defaults()?;

        let path = Path::new(&config_path);
        let builder = if path.exists() {
            builder.add_source(config::File::from(path))
        } else {
            builder
        };

        let built = builder
            .add_source(config::Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?;

        let loaded: Self = built.try_deserialize()?;
        Ok(loaded.with_key_fallbacks(env_opt_string))
    }

    /// Defaults overlaid with a TOML document; no environment involved.
    pub fn from_toml_str(toml: &str) -> EngineResult<Self> {
        let loaded: Self = Self::defaults()?
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        Ok(loaded)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        let d = Self::default();
        config::Config::builder()
            .set_default("app_name", d.app_name)?
            .set_default("host", d.host)?
            .set_default("port", i64::from(d.port))?
            .set_default("llm_mode", "mock")?
            .set_default("openai_api_url", d.openai_api_url)?
            .set_default("gemini_api_url", d.gemini_api_url)?
            .set_default("default_adapter", d.default_adapter)?
            .set_default("adapter_timeout_secs", d.adapter_timeout_secs as i64)
    }

    /// Fill missing or blank keys from the conventional provider variables.
    pub fn with_key_fallbacks(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        self.openai_api_key = non_blank(self.openai_api_key).or_else(|| lookup(ENV_OPENAI_API_KEY));
        self.google_api_key = non_blank(self.google_api_key).or_else(|| lookup(ENV_GOOGLE_API_KEY));
        self
    }

    pub fn adapter_timeout(&self) -> Duration {
        if self.adapter_timeout_secs == 0 {
            DEFAULT_ADAPTER_TIMEOUT
        } else {
            Duration::from_secs(self.adapter_timeout_secs)
        }
    }

    /// Custom catalog if configured, otherwise the built-in one.
    pub fn catalog(&self) -> Vec<AdapterDescriptor> {
        match &self.adapters {
            Some(adapters) => adapters.iter().map(AdapterConfig::descriptor).collect(),
            None => default_catalog(),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;

    #[test]
    fn test_defaults_from_empty_document() {
        let c = EngineConfig::from_toml_str("").unwrap();
        assert_eq!(c, EngineConfig::default());
        assert_eq!(c.port, 8000);
        assert_eq!(c.llm_mode, LlmMode::Mock);
        assert_eq!(c.adapter_timeout(), Duration::from_secs(30));
        assert_eq!(c.catalog().len(), 5);
    }

    #[test]
    fn test_file_overrides_and_custom_catalog() {
        let c = EngineConfig::from_toml_str(
            r#"
            llm_mode = "live"
            port = 9100
            default_adapter = "general"
            personality_seed = 42

            [[adapters]]
            id = "financial"
            model = "gpt-4o"
            backend = "openai"
            specialties = ["financial_advice", "technical_analysis"]
            performance_score = 0.95

            [[adapters]]
            id = "general"
            backend = "google"
            specialties = ["conversation"]
            performance_score = 0.85
            "#,
        )
        .unwrap();
        assert_eq!(c.llm_mode, LlmMode::Live);
        assert_eq!(c.port, 9100);
        assert_eq!(c.personality_seed, Some(42));
        let catalog = c.catalog();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[0].model, "gpt-4o");
        assert_eq!(catalog[0].backend, BackendKind::OpenAi);
        assert_eq!(catalog[1].model, "general");
        assert_eq!(catalog[1].backend, BackendKind::Gemini);
    }

    #[test]
    fn test_key_fallbacks() {
        let lookup = |name: &str| match name {
            ENV_OPENAI_API_KEY => Some("sk-env".to_string()),
            ENV_GOOGLE_API_KEY => Some("g-env".to_string()),
            _ => None,
        };
        let mut c = EngineConfig::default();
        c.openai_api_key = Some("sk-file".to_string());
        c.google_api_key = Some("  ".to_string());
        let c = c.with_key_fallbacks(lookup);
        assert_eq!(c.openai_api_key.as_deref(), Some("sk-file"));
        assert_eq!(c.google_api_key.as_deref(), Some("g-env"));
    }

    #[test]
    fn test_bad_document_surfaces_as_engine_error() {
        let err = EngineConfig::from_toml_str("port = \"not a number\"").unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
        let err = EngineConfig::from_toml_str("port = [").unwrap_err();
        assert!(err.to_string().starts_with("Configuration error"));
    }

    #[test]
    fn test_zero_timeout_uses_default() {
        let mut c = EngineConfig::default();
        c.adapter_timeout_secs = 0;
        assert_eq!(c.adapter_timeout(), DEFAULT_ADAPTER_TIMEOUT);
    }
}
