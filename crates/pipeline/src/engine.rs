//! Engine facade wiring the pipeline together.

use std::sync::Arc;

use connectors::{AnalyticsSink, PersonalizationProvider};
use parking_lot::Mutex;
use rec_core::{LearnerEvent, Recommendation, Result, Session};
use telemetry::metrics;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cache::RecommendationCache;
use crate::config::EngineConfig;
use crate::generator::{strategy_for, RecommendationGenerator};
use crate::janitor::Janitor;
use crate::processor::EventProcessor;
use crate::queue::EventQueue;
use crate::sessions::SessionStore;
use crate::subscribers::{SubscriberRegistry, UpdateStream};
use crate::trigger::TriggerPolicy;

/// The real-time recommendation update engine.
///
/// Owns the session store, cache, and subscriber registry, each behind its
/// own lock; the ingestion queue is the only producer→consumer hand-off.
pub struct RecommendationEngine {
    config: EngineConfig,
    queue: EventQueue,
    receiver: Mutex<Option<mpsc::Receiver<LearnerEvent>>>,
    sessions: Arc<SessionStore>,
    cache: Arc<RecommendationCache>,
    subscribers: Arc<SubscriberRegistry>,
    generator: Arc<RecommendationGenerator>,
    analytics: Arc<dyn AnalyticsSink>,
}

impl RecommendationEngine {
    pub fn new(
        config: EngineConfig,
        analytics: Arc<dyn AnalyticsSink>,
        provider: Arc<dyn PersonalizationProvider>,
    ) -> Self {
        let (queue, receiver) = EventQueue::bounded(config.queue_capacity);

        let sessions = Arc::new(SessionStore::new());
        let cache = Arc::new(RecommendationCache::new(config.cache_ttl()));
        let subscribers = Arc::new(SubscriberRegistry::new(config.update_channel_capacity));
        let generator = Arc::new(RecommendationGenerator::new(
            provider,
            config.adjustments.clone(),
            config.max_results,
            config.personalization_timeout(),
        ));

        Self {
            config,
            queue,
            receiver: Mutex::new(Some(receiver)),
            sessions,
            cache,
            subscribers,
            generator,
            analytics,
        }
    }

    /// Starts the event processor and janitor tasks.
    pub fn start(&self) -> Vec<JoinHandle<()>> {
        let receiver = match self.receiver.lock().take() {
            Some(receiver) => receiver,
            None => {
                warn!("Engine already started");
                return Vec::new();
            }
        };

        let mut handles = Vec::new();

        let processor = EventProcessor::new(
            Arc::clone(&self.sessions),
            Arc::clone(&self.cache),
            Arc::clone(&self.subscribers),
            Arc::clone(&self.generator),
            Arc::clone(&self.analytics),
            TriggerPolicy::new(self.config.trigger.clone()),
            self.config.analytics_timeout(),
        );
        handles.push(tokio::spawn(processor.run(receiver)));

        let janitor = Janitor::new(
            Arc::clone(&self.sessions),
            Arc::clone(&self.cache),
            self.config.session_timeout(),
            self.config.janitor_interval(),
        );
        handles.push(tokio::spawn(janitor.run()));

        info!("Recommendation engine started");
        handles
    }

    /// Validates and enqueues an event. Fails fast on a malformed event or
    /// a full queue; never blocks the producer.
    pub fn submit_event(&self, event: LearnerEvent) -> Result<Uuid> {
        self.queue.submit(event)
    }

    /// Serves recommendations from the cache, computing synchronously on a
    /// miss. When the collaborator fails, any previously cached list (even
    /// stale) is served instead of the error.
    pub async fn get_recommendations(&self, learner_id: &str) -> Result<Vec<Recommendation>> {
        if let Some(entry) = self.cache.get(learner_id) {
            return Ok(entry.items);
        }

        let session = self.sessions.get(learner_id);
        match self.generator.generate(learner_id, session.as_ref()).await {
            Ok(items) => {
                let entry = self
                    .cache
                    .put(learner_id, items, strategy_for(session.as_ref()));
                Ok(entry.items)
            }
            Err(e) => match self.cache.peek(learner_id) {
                Some(stale) => {
                    metrics().stale_served.inc();
                    warn!(
                        learner_id = %learner_id,
                        error = %e,
                        "Serving stale recommendations after collaborator failure"
                    );
                    Ok(stale.items)
                }
                None => Err(e),
            },
        }
    }

    /// Opens (or replaces) the learner's update stream.
    pub fn subscribe(&self, learner_id: &str) -> UpdateStream {
        self.subscribers.subscribe(learner_id)
    }

    /// Closes the learner's update stream, if any.
    pub fn unsubscribe(&self, learner_id: &str) -> bool {
        self.subscribers.unsubscribe(learner_id)
    }

    /// Direct session lookup.
    pub fn session(&self, learner_id: &str) -> Result<Session> {
        self.sessions.learner_session(learner_id)
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Current cache version for a learner, if an entry exists.
    pub fn cached_version(&self, learner_id: &str) -> Option<u64> {
        self.cache.peek(learner_id).map(|entry| entry.version)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}
