//! Model registry: the static catalog of backend adapters built once at engine construction.

use crate::error::{EngineError, EngineResult};
use crate::providers::GenerativeBackend;
use crate::shared::{BackendKind, TaskCategory};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Declared capabilities of one backend model. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdapterDescriptor {
    /// Stable identifier (e.g. "gpt-4").
    pub id: String,
    /// Model name sent to the backend API.
    pub model: String,
    pub backend: BackendKind,
    /// True when a client could be bound at startup.
    pub available: bool,
    /// Ordered set of categories this adapter is competent for.
    pub specialties: Vec<TaskCategory>,
    /// Static quality ranking in [0, 1]; only used to break ties among specialty matches.
    pub performance_score: f32,
}

impl AdapterDescriptor {
    pub fn new(
        id: impl Into<String>,
        backend: BackendKind,
        specialties: impl IntoIterator<Item = TaskCategory>,
        performance_score: f32,
    ) -> Self {
        let id = id.into();
        let mut ordered: Vec<TaskCategory> = Vec::new();
        for s in specialties {
            if !ordered.contains(&s) {
                ordered.push(s);
            }
        }
        Self {
            model: id.clone(),
            id,
            backend,
            available: false,
            specialties: ordered,
            performance_score,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn supports(&self, category: TaskCategory) -> bool {
        self.specialties.contains(&category)
    }
}

/// Public view of an adapter for `get_available_models`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub available: bool,
    pub specialties: Vec<TaskCategory>,
    pub performance_score: f32,
}

/// Descriptor plus the bound client, if any. `available` mirrors whether a backend is present.
#[derive(Clone)]
pub struct RegisteredAdapter {
    pub descriptor: AdapterDescriptor,
    backend: Option<Arc<dyn GenerativeBackend>>,
}

impl RegisteredAdapter {
    /// Adapter with a bound client; marked available.
    pub fn bound(mut descriptor: AdapterDescriptor, backend: Arc<dyn GenerativeBackend>) -> Self {
        descriptor.available = true;
        Self {
            descriptor,
            backend: Some(backend),
        }
    }

    /// Adapter without a client (missing credentials or local model); marked unavailable.
    pub fn unbound(mut descriptor: AdapterDescriptor) -> Self {
        descriptor.available = false;
        Self {
            descriptor,
            backend: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.descriptor.id
    }

    pub fn backend(&self) -> Option<&Arc<dyn GenerativeBackend>> {
        self.backend.as_ref()
    }
}

impl std::fmt::Debug for RegisteredAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisteredAdapter")
            .field("descriptor", &self.descriptor)
            .field("bound", &self.backend.is_some())
            .finish()
    }
}

/// Ordered catalog of adapters. Registration order is the selector's tie-break order.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    adapters: Vec<RegisteredAdapter>,
    default_adapter: String,
}

impl ModelRegistry {
    /// Validates and freezes the catalog. Rejects empty catalogs, duplicate ids and
    /// performance scores outside [0, 1].
    pub fn new(adapters: Vec<RegisteredAdapter>, default_adapter: impl Into<String>) -> EngineResult<Self> {
        if adapters.is_empty() {
            return Err(EngineError::EmptyRegistry);
        }
        for (i, a) in adapters.iter().enumerate() {
            let score = a.descriptor.performance_score;
            if !score.is_finite() || !(0.0..=1.0).contains(&score) {
                return Err(EngineError::InvalidPerformanceScore {
                    id: a.id().to_string(),
                    score,
                });
            }
            if adapters[..i].iter().any(|b| b.id() == a.id()) {
                return Err(EngineError::DuplicateAdapter(a.id().to_string()));
            }
        }
        let default_adapter = default_adapter.into();
        if !adapters.iter().any(|a| a.id() == default_adapter) {
            tracing::warn!(
                target: "samai::engine",
                default_adapter = %default_adapter,
                "default adapter not in registry; fallback will use first registered adapter"
            );
        }
        Ok(Self {
            adapters,
            default_adapter,
        })
    }

    pub fn adapters(&self) -> &[RegisteredAdapter] {
        &self.adapters
    }

    pub fn get(&self, id: &str) -> Option<&RegisteredAdapter> {
        self.adapters.iter().find(|a| a.id() == id)
    }

    pub fn default_adapter_id(&self) -> &str {
        &self.default_adapter
    }

    pub fn len(&self) -> usize {
        self.adapters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adapters.is_empty()
    }

    /// Adapter id → availability, specialties and score.
    pub fn model_info(&self) -> BTreeMap<String, ModelInfo> {
        self.adapters
            .iter()
            .map(|a| {
                (
                    a.id().to_string(),
                    ModelInfo {
                        available: a.descriptor.available,
                        specialties: a.descriptor.specialties.clone(),
                        performance_score: a.descriptor.performance_score,
                    },
                )
            })
            .collect()
    }
}

/// The built-in catalog: two OpenAI chat models, Gemini, and two local models with no client.
pub fn default_catalog() -> Vec<AdapterDescriptor> {
    use TaskCategory::*;
    vec![
        AdapterDescriptor::new("gpt-4", BackendKind::OpenAi, [Conversation, ContentGeneration, Research], 0.95),
        AdapterDescriptor::new("gpt-3.5-turbo", BackendKind::OpenAi, [Conversation, Translation], 0.85),
        AdapterDescriptor::new("gemini-pro", BackendKind::Gemini, [CreativeWriting, TechnicalAnalysis], 0.90),
        AdapterDescriptor::new("llama-2-70b", BackendKind::Local, [Conversation, Research], 0.80),
        AdapterDescriptor::new("t5-large", BackendKind::Local, [Translation, ContentGeneration], 0.75),
    ]
}
