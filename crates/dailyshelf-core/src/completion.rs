//! Finished-story flags for the current microlearning selection.
//!
//! The flags are index-aligned with the day's microlearning payload. They
//! are loaded once at startup, reset whenever a new selection is drawn and
//! persisted on every change.

use tracing::{debug, warn};

use crate::cache::{CacheEntry, Namespace};
use crate::date::DateKey;
use crate::store::KeyValueStore;

pub const COMPLETION_NAMESPACE: &str = "microlearning_completion";

pub struct CompletionTracker<S> {
    store: S,
    namespace: Namespace,
    date_key: Option<DateKey>,
    completed: Vec<bool>,
}

impl<S: KeyValueStore> CompletionTracker<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            namespace: Namespace(COMPLETION_NAMESPACE.to_string()),
            date_key: None,
            completed: Vec::new(),
        }
    }

    /// Read persisted flags. Missing, unreadable or malformed data leaves the
    /// tracker empty, so every story reads as not completed.
    pub async fn load(&mut self) {
        let contents = match self.store.get(self.namespace.as_str()).await {
            Ok(Some(contents)) => contents,
            Ok(None) => return,
            Err(e) => {
                warn!(error = %e, "Failed to read completion state");
                return;
            }
        };
        match serde_json::from_str::<CacheEntry<Vec<bool>>>(&contents) {
            Ok(entry) => {
                debug!(date = %entry.date_key, count = entry.payload.len(), "Loaded completion state");
                self.date_key = Some(entry.date_key);
                self.completed = entry.payload;
            }
            Err(e) => {
                debug!(error = %e, "Ignoring malformed completion state");
            }
        }
    }

    /// Start over with `len` unfinished stories for the selection drawn on
    /// `date_key`.
    pub async fn reset(&mut self, len: usize, date_key: DateKey) {
        self.completed = vec![false; len];
        self.date_key = Some(date_key);
        self.persist().await;
    }

    /// Mark story `index` finished. Out-of-range indices are logged and
    /// ignored.
    pub async fn mark_complete(&mut self, index: usize) {
        let Some(flag) = self.completed.get_mut(index) else {
            warn!(index, len = self.completed.len(), "Completion index out of range");
            return;
        };
        *flag = true;
        self.persist().await;
    }

    pub fn is_complete(&self, index: usize) -> bool {
        self.completed.get(index).copied().unwrap_or(false)
    }

    pub fn completed_count(&self) -> usize {
        self.completed.iter().filter(|&&done| done).count()
    }

    pub fn len(&self) -> usize {
        self.completed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
    }

    pub fn date_key(&self) -> Option<&DateKey> {
        self.date_key.as_ref()
    }

    /// True when the flags were recorded for the selection drawn on `date_key`.
    pub fn is_current_for(&self, date_key: &DateKey) -> bool {
        self.date_key.as_ref() == Some(date_key)
    }

    /// Finished stories counted only if the flags belong to `date_key`.
    pub fn completed_count_for(&self, date_key: &DateKey) -> usize {
        if self.is_current_for(date_key) {
            self.completed_count()
        } else {
            0
        }
    }

    pub fn flags(&self) -> &[bool] {
        &self.completed
    }

    /// Forget all flags, in memory and in the store.
    pub async fn clear(&mut self) {
        self.completed.clear();
        self.date_key = None;
        if let Err(e) = self.store.remove(self.namespace.as_str()).await {
            warn!(error = %e, "Failed to remove completion state");
        }
    }

    async fn persist(&self) {
        let Some(date_key) = self.date_key.clone() else {
            return;
        };
        let entry = CacheEntry::new(&self.namespace, date_key, &self.completed);
        let contents = match serde_json::to_string(&entry) {
            Ok(contents) => contents,
            Err(e) => {
                warn!(error = %e, "Failed to encode completion state");
                return;
            }
        };
        if let Err(e) = self.store.set(self.namespace.as_str(), &contents).await {
            warn!(error = %e, "Failed to persist completion state");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use std::sync::Arc;

    fn key(s: &str) -> DateKey {
        DateKey::parse(s).unwrap()
    }

    #[tokio::test]
    async fn test_defaults_to_not_complete() {
        let tracker = CompletionTracker::new(MemoryStore::new());
        assert!(!tracker.is_complete(0));
        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn test_reset_then_mark() {
        let mut tracker = CompletionTracker::new(MemoryStore::new());
        tracker.reset(3, key("2024-05-30")).await;
        tracker.mark_complete(1).await;
        assert_eq!(tracker.flags(), &[false, true, false]);
        assert_eq!(tracker.completed_count(), 1);
    }

    #[tokio::test]
    async fn test_out_of_range_is_ignored() {
        let mut tracker = CompletionTracker::new(MemoryStore::new());
        tracker.reset(2, key("2024-05-30")).await;
        tracker.mark_complete(5).await;
        assert_eq!(tracker.flags(), &[false, false]);
        assert!(!tracker.is_complete(5));
    }

    #[tokio::test]
    async fn test_marks_survive_reload() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = CompletionTracker::new(store.clone());
        tracker.reset(4, key("2024-05-30")).await;
        tracker.mark_complete(0).await;
        tracker.mark_complete(3).await;

        let mut reloaded = CompletionTracker::new(store);
        reloaded.load().await;
        assert_eq!(reloaded.flags(), &[true, false, false, true]);
        assert_eq!(reloaded.date_key(), Some(&key("2024-05-30")));
    }

    #[tokio::test]
    async fn test_reset_discards_previous_marks() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = CompletionTracker::new(store.clone());
        tracker.reset(2, key("2024-05-30")).await;
        tracker.mark_complete(0).await;
        tracker.reset(5, key("2024-05-31")).await;
        assert_eq!(tracker.flags(), &[false; 5]);

        let mut reloaded = CompletionTracker::new(store);
        reloaded.load().await;
        assert_eq!(reloaded.len(), 5);
        assert_eq!(reloaded.completed_count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_state_loads_empty() {
        let store = Arc::new(MemoryStore::new());
        store.set(COMPLETION_NAMESPACE, "[true, ").await.unwrap();
        let mut tracker = CompletionTracker::new(store);
        tracker.load().await;
        assert!(tracker.is_empty());
    }

    #[tokio::test]
    async fn test_flags_from_another_day_are_not_current() {
        let mut tracker = CompletionTracker::new(MemoryStore::new());
        tracker.reset(2, key("2024-05-30")).await;
        tracker.mark_complete(0).await;
        assert!(tracker.is_current_for(&key("2024-05-30")));
        assert!(!tracker.is_current_for(&key("2024-05-31")));
        assert_eq!(tracker.completed_count_for(&key("2024-05-30")), 1);
        assert_eq!(tracker.completed_count_for(&key("2024-05-31")), 0);
    }

    #[tokio::test]
    async fn test_clear() {
        let store = Arc::new(MemoryStore::new());
        let mut tracker = CompletionTracker::new(store.clone());
        tracker.reset(2, key("2024-05-30")).await;
        tracker.clear().await;
        assert!(tracker.is_empty());
        assert_eq!(store.get(COMPLETION_NAMESPACE).await.unwrap(), None);
    }
}
