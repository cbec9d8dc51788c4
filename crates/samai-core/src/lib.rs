//! Sam.AI core: routes each user message to the best-suited generative model.
//!
//! Pipeline per request: classify the text into a [`TaskCategory`], select an adapter from the
//! [`ModelRegistry`], dispatch a composed prompt to its backend, apply the personality layer,
//! and record the exchange in the bounded conversation history.

pub mod config;
pub mod engine;
pub mod error;
pub mod memory;
pub mod prompts;
pub mod providers;
pub mod shared;

pub use config::{AdapterConfig, EngineConfig, LlmMode};
pub use engine::classifier::{classify, TaskClassifier};
pub use engine::dispatch::ResponseRecord;
pub use engine::persona::{Gender, PersonalityEngine, PersonalityProfile, PersonalityType};
pub use engine::registry::{default_catalog, AdapterDescriptor, ModelInfo, ModelRegistry, RegisteredAdapter};
pub use engine::selector::{ModelSelector, SelectionReason};
pub use engine::{EngineOptions, MultiAiEngine};
pub use error::{BackendError, EngineError, EngineResult};
pub use memory::{ConversationEntry, ConversationStats, ConversationStore, HISTORY_CAPACITY};
pub use providers::{ChatTurn, Generation, GenerationRequest, GenerativeBackend, SamplingParams, TurnRole};
pub use shared::{BackendKind, TaskCategory};
