//! Single-consumer event processor.
//!
//! Drains the ingestion queue strictly in arrival order, which is what
//! guarantees per-learner session mutations apply in event order without
//! per-learner locks. Analytics forwarding and recomputation run as
//! detached tasks whose failures never stop the loop.

use std::sync::Arc;
use std::time::{Duration, Instant};

use connectors::AnalyticsSink;
use rec_core::{BehaviorRecord, LearnerEvent, RecommendationUpdate, UpdateType};
use telemetry::metrics;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::cache::RecommendationCache;
use crate::generator::{strategy_for, RecommendationGenerator};
use crate::sessions::SessionStore;
use crate::subscribers::SubscriberRegistry;
use crate::trigger::TriggerPolicy;

pub struct EventProcessor {
    sessions: Arc<SessionStore>,
    cache: Arc<RecommendationCache>,
    subscribers: Arc<SubscriberRegistry>,
    generator: Arc<RecommendationGenerator>,
    analytics: Arc<dyn AnalyticsSink>,
    trigger: TriggerPolicy,
    analytics_timeout: Duration,
}

impl EventProcessor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        sessions: Arc<SessionStore>,
        cache: Arc<RecommendationCache>,
        subscribers: Arc<SubscriberRegistry>,
        generator: Arc<RecommendationGenerator>,
        analytics: Arc<dyn AnalyticsSink>,
        trigger: TriggerPolicy,
        analytics_timeout: Duration,
    ) -> Self {
        Self {
            sessions,
            cache,
            subscribers,
            generator,
            analytics,
            trigger,
            analytics_timeout,
        }
    }

    /// Main run loop. Exits when every producer handle has been dropped.
    pub async fn run(self, mut rx: mpsc::Receiver<LearnerEvent>) {
        info!("Event processor starting");

        while let Some(event) = rx.recv().await {
            self.process_event(event);
        }

        info!("Event processor stopped; queue closed");
    }

    fn process_event(&self, event: LearnerEvent) {
        self.sessions.apply_event(&event);
        metrics().events_processed.inc();

        self.forward_behavior(&event);

        let cached = self.cache.peek(&event.learner_id);
        if let Some(reason) = self.trigger.evaluate(&event, cached.as_ref()) {
            metrics().recomputations_triggered.inc();
            debug!(
                learner_id = %event.learner_id,
                reason = %reason,
                "Recomputation triggered"
            );
            self.spawn_recompute(event.learner_id.clone(), reason);
        }
    }

    /// Fire-and-forget forward to the analytics collaborator. Failures are
    /// logged and never surface to the consumer loop.
    fn forward_behavior(&self, event: &LearnerEvent) {
        let analytics = Arc::clone(&self.analytics);
        let record = BehaviorRecord::from(event);
        let call_timeout = self.analytics_timeout;

        tokio::spawn(async move {
            match timeout(call_timeout, analytics.record_behavior(record)).await {
                Ok(Ok(())) => {
                    metrics().behavior_records_sent.inc();
                }
                Ok(Err(e)) => {
                    metrics().analytics_failures.inc();
                    warn!(error = %e, "Analytics forward failed");
                }
                Err(_) => {
                    metrics().analytics_failures.inc();
                    warn!("Analytics forward timed out");
                }
            }
        });
    }

    /// Detached recomputation: generate, cache, fan out. An error leaves
    /// the prior cached value authoritative and notifies nobody.
    fn spawn_recompute(&self, learner_id: String, reason: String) {
        let sessions = Arc::clone(&self.sessions);
        let cache = Arc::clone(&self.cache);
        let subscribers = Arc::clone(&self.subscribers);
        let generator = Arc::clone(&self.generator);

        tokio::spawn(async move {
            let start = Instant::now();
            let session = sessions.get(&learner_id);

            match generator.generate(&learner_id, session.as_ref()).await {
                Ok(items) => {
                    let entry = cache.put(&learner_id, items, strategy_for(session.as_ref()));

                    let update_type = if entry.version == 1 {
                        UpdateType::Initial
                    } else {
                        UpdateType::Refresh
                    };
                    let mut metadata = std::collections::HashMap::new();
                    metadata.insert("version".to_string(), serde_json::json!(entry.version));
                    metadata.insert("strategy".to_string(), serde_json::json!(entry.strategy));

                    subscribers.publish(
                        &learner_id,
                        RecommendationUpdate {
                            update_type,
                            items: entry.items.clone(),
                            reason: reason.clone(),
                            timestamp: entry.generated_at,
                            metadata,
                        },
                    );

                    metrics()
                        .recompute_latency_ms
                        .observe(start.elapsed().as_millis() as u64);
                    debug!(
                        learner_id = %learner_id,
                        version = entry.version,
                        reason = %reason,
                        "Recommendations refreshed"
                    );
                }
                Err(e) => {
                    metrics().recomputations_failed.inc();
                    warn!(
                        learner_id = %learner_id,
                        reason = %reason,
                        error = %e,
                        "Recomputation failed; cached value left intact"
                    );
                }
            }
        });
    }
}
