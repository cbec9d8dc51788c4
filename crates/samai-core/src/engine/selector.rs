//! Model selector: best-fit adapter by specialty, tie-broken by performance score.

use super::registry::{ModelRegistry, RegisteredAdapter};
use crate::shared::TaskCategory;

/// Why an adapter was chosen; logged with each dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionReason {
    /// Available adapter with the category in its specialties.
    SpecialtyMatch,
    /// No specialty match; the configured general-purpose adapter.
    DefaultAdapter,
    /// Default adapter missing or unavailable; first registered adapter (may itself be unavailable).
    FirstRegistered,
}

impl SelectionReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            SelectionReason::SpecialtyMatch => "specialty_match",
            SelectionReason::DefaultAdapter => "default_adapter",
            SelectionReason::FirstRegistered => "first_registered",
        }
    }
}

/// Stateless selection policy over a [`ModelRegistry`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ModelSelector;

impl ModelSelector {
    /// Picks an adapter for `category`. Never fails: the registry is non-empty by construction.
    pub fn select<'r>(&self, category: TaskCategory, registry: &'r ModelRegistry) -> (&'r RegisteredAdapter, SelectionReason) {
        let mut best: Option<&RegisteredAdapter> = None;
        for adapter in registry.adapters() {
            let d = &adapter.descriptor;
            if !d.available || !d.supports(category) {
                continue;
            }
            // strict comparison keeps the first registered adapter on equal scores
            match best {
                Some(b) if d.performance_score <= b.descriptor.performance_score => {}
                _ => best = Some(adapter),
            }
        }
        if let Some(adapter) = best {
            return (adapter, SelectionReason::SpecialtyMatch);
        }

        if let Some(default) = registry
            .get(registry.default_adapter_id())
            .filter(|a| a.descriptor.available)
        {
            return (default, SelectionReason::DefaultAdapter);
        }

        // Degraded mode: dispatch reports the failure if this adapter has no client.
        (&registry.adapters()[0], SelectionReason::FirstRegistered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::registry::AdapterDescriptor;
    use crate::providers::{GenerativeBackend, MockBackend};
    use crate::shared::BackendKind;
    use std::sync::Arc;
    use TaskCategory::*;

    fn bound(id: &str, specialties: &[TaskCategory], score: f32) -> RegisteredAdapter {
        let backend: Arc<dyn GenerativeBackend> = Arc::new(MockBackend::new());
        RegisteredAdapter::bound(
            AdapterDescriptor::new(id, BackendKind::OpenAi, specialties.iter().copied(), score),
            backend,
        )
    }

    fn unbound(id: &str, specialties: &[TaskCategory], score: f32) -> RegisteredAdapter {
        RegisteredAdapter::unbound(AdapterDescriptor::new(id, BackendKind::Local, specialties.iter().copied(), score))
    }

    #[test]
    fn test_highest_score_among_matches() {
        let registry = ModelRegistry::new(
            vec![
                bound("general", &[Conversation, FinancialAdvice], 0.85),
                bound("finance", &[FinancialAdvice], 0.95),
            ],
            "general",
        )
        .unwrap();
        let (a, reason) = ModelSelector.select(FinancialAdvice, &registry);
        assert_eq!(a.id(), "finance");
        assert_eq!(reason, SelectionReason::SpecialtyMatch);
    }

    #[test]
    fn test_unavailable_match_is_skipped() {
        let registry = ModelRegistry::new(
            vec![
                unbound("local", &[Research], 0.99),
                bound("remote", &[Research], 0.60),
            ],
            "remote",
        )
        .unwrap();
        let (a, _) = ModelSelector.select(Research, &registry);
        assert_eq!(a.id(), "remote");
        assert!(a.descriptor.available && a.descriptor.supports(Research));
    }

    #[test]
    fn test_equal_scores_first_registered_wins() {
        let registry = ModelRegistry::new(
            vec![bound("first", &[Translation], 0.8), bound("second", &[Translation], 0.8)],
            "second",
        )
        .unwrap();
        for _ in 0..10 {
            assert_eq!(ModelSelector.select(Translation, &registry).0.id(), "first");
        }
    }

    #[test]
    fn test_falls_back_to_default() {
        let registry = ModelRegistry::new(
            vec![bound("writer", &[CreativeWriting], 0.9), bound("general", &[Conversation], 0.85)],
            "general",
        )
        .unwrap();
        let (a, reason) = ModelSelector.select(Meditation, &registry);
        assert_eq!(a.id(), "general");
        assert_eq!(reason, SelectionReason::DefaultAdapter);
    }

    #[test]
    fn test_unavailable_default_falls_back_to_first_registered() {
        let registry = ModelRegistry::new(
            vec![unbound("local", &[Research], 0.8), unbound("general", &[Conversation], 0.85)],
            "general",
        )
        .unwrap();
        let (a, reason) = ModelSelector.select(Meditation, &registry);
        assert_eq!(a.id(), "local");
        assert!(!a.descriptor.available);
        assert_eq!(reason, SelectionReason::FirstRegistered);
    }
}
