//! Prompt templates: per-category system instructions and named specialty overrides.

pub mod category;
pub mod specialty;

pub use category::{category_system_prompt, FALLBACK_RESPONSE_FA};
pub use specialty::{specialty, Specialty, SPECIALTIES};
