//! Periodic eviction of idle sessions and expired cache entries.

use std::sync::Arc;
use std::time::Duration;

use telemetry::metrics;
use tokio::time::interval;
use tracing::{debug, info};

use crate::cache::RecommendationCache;
use crate::sessions::SessionStore;

pub struct Janitor {
    sessions: Arc<SessionStore>,
    cache: Arc<RecommendationCache>,
    session_timeout: chrono::Duration,
    period: Duration,
}

impl Janitor {
    pub fn new(
        sessions: Arc<SessionStore>,
        cache: Arc<RecommendationCache>,
        session_timeout: chrono::Duration,
        period: Duration,
    ) -> Self {
        Self {
            sessions,
            cache,
            session_timeout,
            period,
        }
    }

    /// Runs the sweep loop forever.
    pub async fn run(self) {
        info!(period_secs = self.period.as_secs(), "Janitor starting");
        let mut ticker = interval(self.period);
        // The first tick fires immediately; skip it so a sweep never races
        // engine startup.
        ticker.tick().await;

        loop {
            ticker.tick().await;
            self.sweep();
        }
    }

    /// One pass over both structures. Each sweep takes its structure's
    /// write lock once, not per entry.
    pub fn sweep(&self) {
        let sessions_evicted = self.sessions.evict_idle(self.session_timeout);
        let cache_evicted = self.cache.evict_expired();

        if sessions_evicted > 0 || cache_evicted > 0 {
            debug!(
                sessions_evicted = sessions_evicted,
                cache_evicted = cache_evicted,
                "Janitor sweep complete"
            );
        }

        debug!(snapshot = ?metrics().snapshot(), "Engine metrics");
    }
}
