//! Conversation store: bounded in-memory log of exchanges plus aggregate statistics.
//!
//! Oldest entries are evicted once [`HISTORY_CAPACITY`] is reached. The lock is only held
//! for the append or the copy-out, never across an await.

use crate::engine::dispatch::ResponseRecord;
use crate::shared::TaskCategory;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

pub const HISTORY_CAPACITY: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub user_input: String,
    pub category: TaskCategory,
    /// Adapter that served the exchange; None only for rejected requests.
    pub adapter_id: Option<String>,
    pub success: bool,
    pub response: ResponseRecord,
}

impl ConversationEntry {
    pub fn new(user_input: impl Into<String>, category: TaskCategory, response: ResponseRecord) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            user_input: user_input.into(),
            category,
            adapter_id: response.adapter_id.clone(),
            success: response.success,
            response,
        }
    }
}

/// Aggregates over the current history window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationStats {
    pub total_conversations: usize,
    pub task_distribution: BTreeMap<TaskCategory, usize>,
    pub model_usage: BTreeMap<String, usize>,
    /// Percentage with one decimal, e.g. "50.0%".
    pub success_rate: String,
    pub most_used_task: Option<TaskCategory>,
    pub most_used_model: Option<String>,
}

#[derive(Debug)]
pub struct ConversationStore {
    entries: Mutex<VecDeque<ConversationEntry>>,
    capacity: usize,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        Self::with_capacity(HISTORY_CAPACITY)
    }

    fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: Mutex::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    // A poisoned lock still holds a consistent deque; keep serving it.
    fn lock(&self) -> MutexGuard<'_, VecDeque<ConversationEntry>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn append(&self, entry: ConversationEntry) {
        let mut entries = self.lock();
        while entries.len() >= self.capacity {
            entries.pop_front();
        }
        entries.push_back(entry);
    }

    /// Up to `n` most recent entries, oldest first.
    pub fn recent(&self, n: usize) -> Vec<ConversationEntry> {
        let entries = self.lock();
        let start = entries.len().saturating_sub(n);
        entries.iter().skip(start).cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn stats(&self) -> ConversationStats {
        let entries = self.recent(self.capacity);
        let total = entries.len();

        let mut task_distribution = BTreeMap::new();
        let mut model_usage = BTreeMap::new();
        let mut task_order: Vec<TaskCategory> = Vec::new();
        let mut model_order: Vec<String> = Vec::new();
        let mut successes = 0usize;

        for entry in &entries {
            let count = task_distribution.entry(entry.category).or_insert(0usize);
            if *count == 0 {
                task_order.push(entry.category);
            }
            *count += 1;

            if let Some(adapter) = entry.adapter_id.as_deref() {
                let count = model_usage.entry(adapter.to_string()).or_insert(0usize);
                if *count == 0 {
                    model_order.push(adapter.to_string());
                }
                *count += 1;
            }

            if entry.success {
                successes += 1;
            }
        }

        let rate = if total == 0 {
            0.0
        } else {
            successes as f64 / total as f64 * 100.0
        };

        ConversationStats {
            total_conversations: total,
            most_used_task: first_mode(&task_order, &task_distribution),
            most_used_model: first_mode(&model_order, &model_usage),
            task_distribution,
            model_usage,
            success_rate: format!("{:.1}%", rate),
        }
    }
}

/// Highest count; ties go to whichever key was seen first.
fn first_mode<K: Ord + Clone>(order: &[K], counts: &BTreeMap<K, usize>) -> Option<K> {
    let mut best: Option<(&K, usize)> = None;
    for key in order {
        let count = counts.get(key).copied().unwrap_or(0);
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((key, count));
        }
    }
    best.map(|(k, _)| k.clone())
}
