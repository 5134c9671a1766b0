//! TTL and version-stamped recommendation cache.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use parking_lot::RwLock;
use rec_core::{CachedRecommendations, Recommendation};
use telemetry::metrics;

/// Per-learner cache of computed recommendation lists.
///
/// Writes are last-writer-wins; versions increase monotonically per learner
/// for observability, not conflict resolution. Expired entries are treated
/// as absent on read but stay in place for stale fallback until the janitor
/// removes them.
pub struct RecommendationCache {
    entries: RwLock<HashMap<String, CachedRecommendations>>,
    ttl: chrono::Duration,
}

impl RecommendationCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl: chrono::Duration::from_std(ttl).unwrap_or_else(|_| chrono::Duration::minutes(30)),
        }
    }

    /// Returns the cached list when present and unexpired; a miss means the
    /// caller must recompute.
    pub fn get(&self, learner_id: &str) -> Option<CachedRecommendations> {
        let entries = self.entries.read();
        match entries.get(learner_id) {
            Some(entry) if !entry.is_expired() => {
                metrics().cache_hits.inc();
                Some(entry.clone())
            }
            _ => {
                metrics().cache_misses.inc();
                None
            }
        }
    }

    /// Returns the entry regardless of expiry. Used by the trigger policy's
    /// debounce check and the stale-fallback read path.
    pub fn peek(&self, learner_id: &str) -> Option<CachedRecommendations> {
        self.entries.read().get(learner_id).cloned()
    }

    /// Overwrites the learner's entry with a freshly computed list,
    /// stamping generation time, expiry, and the next version.
    pub fn put(
        &self,
        learner_id: &str,
        items: Vec<Recommendation>,
        strategy: &str,
    ) -> CachedRecommendations {
        let now = Utc::now();
        let mut entries = self.entries.write();

        let version = entries
            .get(learner_id)
            .map(|prior| prior.version + 1)
            .unwrap_or(1);

        let entry = CachedRecommendations {
            learner_id: learner_id.to_string(),
            items,
            generated_at: now,
            expires_at: now + self.ttl,
            version,
            strategy: strategy.to_string(),
        };

        entries.insert(learner_id.to_string(), entry.clone());
        entry
    }

    /// Deletes expired entries. One write lock for the whole sweep.
    pub fn evict_expired(&self) -> usize {
        let mut entries = self.entries.write();
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        let evicted = before - entries.len();
        drop(entries);

        if evicted > 0 {
            metrics().cache_entries_evicted.inc_by(evicted as u64);
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
