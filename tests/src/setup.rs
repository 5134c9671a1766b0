//! Common test setup functions.

use std::sync::Arc;
use std::time::{Duration, Instant};

use pipeline::{EngineConfig, RecommendationEngine};
use tokio::task::JoinHandle;

use crate::mocks::{MockAnalytics, MockPersonalization};

/// Engine configuration with timings suitable for tests: no debounce by
/// default (every qualifying event recomputes), long TTL, and an inert
/// janitor.
pub fn test_config() -> EngineConfig {
    let mut config = EngineConfig::default();
    config.queue_capacity = 64;
    config.update_channel_capacity = 8;
    config.trigger.debounce_secs = 0;
    config.cache_ttl_secs = 300;
    config.session_timeout_secs = 300;
    config.janitor_interval_secs = 3600;
    config
}

/// Test context wiring the engine to mock collaborators.
pub struct TestContext {
    pub engine: Arc<RecommendationEngine>,
    pub analytics: Arc<MockAnalytics>,
    pub personalization: Arc<MockPersonalization>,
    pub handles: Vec<JoinHandle<()>>,
}

impl TestContext {
    /// Create a started engine with default test config.
    pub fn new() -> Self {
        Self::with_config(test_config())
    }

    /// Create a started engine with a custom config.
    pub fn with_config(config: EngineConfig) -> Self {
        let mut ctx = Self::unstarted(config);
        ctx.handles = ctx.engine.start();
        ctx
    }

    /// Create an engine without starting the consumer or janitor, for
    /// tests that exercise the queue boundary directly.
    pub fn unstarted(config: EngineConfig) -> Self {
        let analytics = Arc::new(MockAnalytics::new());
        let personalization = Arc::new(MockPersonalization::new());

        let engine = Arc::new(RecommendationEngine::new(
            config,
            analytics.clone(),
            personalization.clone(),
        ));

        Self {
            engine,
            analytics,
            personalization,
            handles: Vec::new(),
        }
    }

    /// Waits until the mock personalization service has seen `count`
    /// generation calls.
    pub async fn wait_for_recomputations(&self, count: usize) -> bool {
        wait_until(2_000, || self.personalization.call_count() >= count).await
    }

    /// Waits until the learner's session reflects `count` events.
    pub async fn wait_for_events(&self, learner_id: &str, count: usize) -> bool {
        wait_until(2_000, || {
            self.engine
                .session(learner_id)
                .map(|s| s.activity_count() >= count)
                .unwrap_or(false)
        })
        .await
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Polls a predicate until it holds or the timeout elapses.
pub async fn wait_until(timeout_ms: u64, mut predicate: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    while Instant::now() < deadline {
        if predicate() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    predicate()
}
