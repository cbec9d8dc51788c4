//! The multi-model engine: classify, select, dispatch, personalize, record.
//!
//! [`MultiAiEngine`] is shared as `Arc<MultiAiEngine>` across request handlers. The registry
//! is frozen at construction; the personality profile is swapped atomically; the history and
//! the personality RNG sit behind short-lived locks that are never held across an await.

pub mod classifier;
pub mod dispatch;
pub mod persona;
pub mod registry;
pub mod selector;

use crate::config::{EngineConfig, LlmMode};
use crate::error::{EngineError, EngineResult};
use crate::memory::{ConversationEntry, ConversationStats, ConversationStore};
use crate::prompts;
use crate::providers::{GeminiBackend, GenerativeBackend, MockBackend, OpenAiChatBackend};
use crate::shared::{BackendKind, TaskCategory};
use classifier::TaskClassifier;
use dispatch::{DispatchInput, ResponseRecord, DEFAULT_ADAPTER_TIMEOUT, HISTORY_TURNS};
use persona::{Gender, PersonalityEngine, PersonalityProfile, PersonalityType};
use rand::rngs::StdRng;
use rand::SeedableRng;
use registry::{AdapterDescriptor, ModelInfo, ModelRegistry, RegisteredAdapter};
use selector::ModelSelector;
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::Duration;

/// Runtime knobs that are not part of the catalog.
#[derive(Debug, Clone, Copy)]
pub struct EngineOptions {
    pub adapter_timeout: Duration,
    /// Seed for personality draws; entropy when unset.
    pub personality_seed: Option<u64>,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            adapter_timeout: DEFAULT_ADAPTER_TIMEOUT,
            personality_seed: None,
        }
    }
}

pub struct MultiAiEngine {
    registry: ModelRegistry,
    classifier: TaskClassifier,
    selector: ModelSelector,
    personality: PersonalityEngine,
    history: ConversationStore,
    profile: RwLock<Option<Arc<PersonalityProfile>>>,
    rng: Mutex<StdRng>,
    adapter_timeout: Duration,
}

impl MultiAiEngine {
    /// Builds the registry from configuration, binding a client per adapter where possible.
    pub fn new(config: &EngineConfig) -> EngineResult<Self> {
        let adapters = config
            .catalog()
            .into_iter()
            .map(|d| bind_adapter(d, config))
            .collect::<Vec<_>>();
        let registry = ModelRegistry::new(adapters, config.default_adapter.as_str())?;

        let available = registry.adapters().iter().filter(|a| a.descriptor.available).count();
        tracing::info!(
            target: "samai::engine",
            mode = ?config.llm_mode,
            adapters = registry.len(),
            available,
            default_adapter = %registry.default_adapter_id(),
            "engine initialized"
        );

        Ok(Self::with_registry(
            registry,
            EngineOptions {
                adapter_timeout: config.adapter_timeout(),
                personality_seed: config.personality_seed,
            },
        ))
    }

    /// Engine over a prepared registry (custom backends, tests).
    pub fn with_registry(registry: ModelRegistry, options: EngineOptions) -> Self {
        let rng = match options.personality_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            registry,
            classifier: TaskClassifier::new(),
            selector: ModelSelector,
            personality: PersonalityEngine,
            history: ConversationStore::new(),
            profile: RwLock::new(None),
            rng: Mutex::new(rng),
            adapter_timeout: options.adapter_timeout,
        }
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    /// Builds a profile from a preset and replaces the active one.
    pub fn setup_personality(
        &self,
        gender: Gender,
        name: Option<&str>,
        personality_type: PersonalityType,
    ) -> PersonalityProfile {
        let profile = {
            let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
            PersonalityProfile::from_preset(gender, name, personality_type, &mut *rng)
        };
        let mut slot = self.profile.write().unwrap_or_else(|p| p.into_inner());
        *slot = Some(Arc::new(profile.clone()));
        tracing::info!(
            target: "samai::persona",
            name = %profile.name,
            gender = profile.gender.as_str(),
            personality_type = profile.personality_type.as_str(),
            "personality configured"
        );
        profile
    }

    pub fn get_personality_info(&self) -> EngineResult<PersonalityProfile> {
        self.current_profile()
            .map(|p| (*p).clone())
            .ok_or(EngineError::PersonalityNotConfigured)
    }

    fn current_profile(&self) -> Option<Arc<PersonalityProfile>> {
        self.profile.read().unwrap_or_else(|p| p.into_inner()).clone()
    }

    /// Full pipeline. `task_type` skips classification. Never fails; failures come back as
    /// records and are recorded like successes.
    pub async fn process_request(
        &self,
        user_input: &str,
        task_type: Option<TaskCategory>,
        context: Option<&serde_json::Value>,
    ) -> ResponseRecord {
        let category = match task_type {
            Some(c) => c,
            None => self.classifier.classify(user_input),
        };
        tracing::info!(
            target: "samai::engine",
            category = %category,
            explicit = task_type.is_some(),
            input_len = user_input.chars().count(),
            "request classified"
        );
        self.run(user_input, category, None, context).await
    }

    /// Named specialty shortcut. Unknown keys are rejected and not recorded.
    pub async fn get_specialized_response(
        &self,
        specialty: &str,
        query: &str,
        context: Option<&serde_json::Value>,
    ) -> ResponseRecord {
        let Some(named) = prompts::specialty(specialty) else {
            let err = EngineError::UnknownSpecialty(specialty.to_string());
            tracing::warn!(target: "samai::engine", specialty = %specialty, "unknown specialty");
            return ResponseRecord::rejected(err.to_string());
        };
        self.run(query, named.category, Some(named.system_prompt), context).await
    }

    async fn run(
        &self,
        user_input: &str,
        category: TaskCategory,
        system_override: Option<&str>,
        context: Option<&serde_json::Value>,
    ) -> ResponseRecord {
        let (adapter, reason) = self.selector.select(category, &self.registry);
        tracing::info!(
            target: "samai::engine",
            adapter = %adapter.id(),
            reason = reason.as_str(),
            category = %category,
            "adapter selected"
        );

        let history = self.history.recent(HISTORY_TURNS);
        let profile = self.current_profile();
        let input = DispatchInput {
            user_text: user_input,
            category,
            system_override,
            context,
            history: &history,
            profile: profile.as_deref(),
        };
        let response = dispatch::dispatch(adapter, input, self.adapter_timeout).await;
        let response = self.personalize(response, category, profile.as_deref());

        tracing::info!(
            target: "samai::engine",
            adapter = %adapter.id(),
            success = response.success,
            personality_applied = response.personality_applied,
            "request completed"
        );
        self.history
            .append(ConversationEntry::new(user_input, category, response.clone()));
        response
    }

    fn personalize(
        &self,
        response: ResponseRecord,
        category: TaskCategory,
        profile: Option<&PersonalityProfile>,
    ) -> ResponseRecord {
        let mut rng = self.rng.lock().unwrap_or_else(|p| p.into_inner());
        self.personality.apply(response, category, profile, &mut *rng)
    }

    pub fn get_available_models(&self) -> BTreeMap<String, ModelInfo> {
        self.registry.model_info()
    }

    pub fn get_conversation_stats(&self) -> ConversationStats {
        self.history.stats()
    }

    /// Up to `n` most recent exchanges, oldest first.
    pub fn recent_history(&self, n: usize) -> Vec<ConversationEntry> {
        self.history.recent(n)
    }
}

fn bind_adapter(descriptor: AdapterDescriptor, config: &EngineConfig) -> RegisteredAdapter {
    let backend: Option<Arc<dyn GenerativeBackend>> = match (config.llm_mode, descriptor.backend) {
        (_, BackendKind::Local) => None,
        (LlmMode::Mock, _) => Some(Arc::new(MockBackend::labeled(descriptor.id.as_str()))),
        (LlmMode::Live, BackendKind::OpenAi) => config.openai_api_key.as_deref().map(|key| {
            Arc::new(OpenAiChatBackend::new(key).with_api_url(&config.openai_api_url)) as Arc<dyn GenerativeBackend>
        }),
        (LlmMode::Live, BackendKind::Gemini) => config.google_api_key.as_deref().map(|key| {
            Arc::new(GeminiBackend::new(key).with_base_url(&config.gemini_api_url)) as Arc<dyn GenerativeBackend>
        }),
    };
    match backend {
        Some(backend) => RegisteredAdapter::bound(descriptor, backend),
        None => {
            tracing::debug!(
                target: "samai::engine",
                adapter = %descriptor.id,
                backend = descriptor.backend.as_str(),
                "no client bound; adapter unavailable"
            );
            RegisteredAdapter::unbound(descriptor)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn live(openai: Option<&str>, google: Option<&str>) -> EngineConfig {
        EngineConfig {
            llm_mode: LlmMode::Live,
            openai_api_key: openai.map(str::to_string),
            google_api_key: google.map(str::to_string),
            ..EngineConfig::default()
        }
    }

    #[test]
    fn test_mock_mode_binds_all_but_local() {
        let engine = MultiAiEngine::new(&EngineConfig::default()).unwrap();
        let models = engine.get_available_models();
        assert!(models["gpt-4"].available);
        assert!(models["gemini-pro"].available);
        assert!(!models["llama-2-70b"].available);
        assert!(!models["t5-large"].available);
    }

    #[test]
    fn test_live_mode_follows_credentials() {
        let engine = MultiAiEngine::new(&live(Some("sk-test"), None)).unwrap();
        let models = engine.get_available_models();
        assert!(models["gpt-3.5-turbo"].available);
        assert!(!models["gemini-pro"].available);

        let engine = MultiAiEngine::new(&live(None, Some("g-test"))).unwrap();
        let models = engine.get_available_models();
        assert!(!models["gpt-4"].available);
        assert!(models["gemini-pro"].available);
    }

    #[test]
    fn test_empty_custom_catalog_rejected() {
        let config = EngineConfig {
            adapters: Some(Vec::new()),
            ..EngineConfig::default()
        };
        assert!(matches!(MultiAiEngine::new(&config), Err(EngineError::EmptyRegistry)));
    }

    #[test]
    fn test_personality_lifecycle() {
        let engine = MultiAiEngine::new(&EngineConfig::default()).unwrap();
        assert!(matches!(engine.get_personality_info(), Err(EngineError::PersonalityNotConfigured)));
        engine.setup_personality(Gender::Female, Some("Luna"), PersonalityType::Friendly);
        let replaced = engine.setup_personality(Gender::Male, Some("Kian"), PersonalityType::Professional);
        let info = engine.get_personality_info().unwrap();
        assert_eq!(info, replaced);
        assert_eq!(info.name, "Kian");
    }

    #[tokio::test]
    async fn test_mock_engine_round_trip() {
        let engine = MultiAiEngine::new(&EngineConfig::default()).unwrap();
        let r = engine.process_request("یک شعر بنویس", None, None).await;
        assert!(r.success);
        assert_eq!(r.category, Some(TaskCategory::CreativeWriting));
        assert_eq!(r.adapter_id.as_deref(), Some("gemini-pro"));
        assert_eq!(engine.recent_history(10).len(), 1);
    }
}
