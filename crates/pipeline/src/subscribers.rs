//! Subscriber registry and update fan-out.
//!
//! Pushes are a best-effort freshness hint over bounded channels; the
//! cache stays authoritative. At most one active channel per learner:
//! re-subscribing closes the prior channel before installing the new one,
//! so orphaned consumers observe end-of-stream instead of hanging.

use std::collections::HashMap;

use parking_lot::RwLock;
use rec_core::RecommendationUpdate;
use telemetry::metrics;
use tokio::sync::mpsc;
use tracing::debug;

/// Read handle for a learner's update stream.
pub struct UpdateStream {
    rx: mpsc::Receiver<RecommendationUpdate>,
}

impl UpdateStream {
    /// Receives the next update; None once the subscription is closed.
    pub async fn recv(&mut self) -> Option<RecommendationUpdate> {
        self.rx.recv().await
    }

    /// Non-blocking poll for a pending update.
    pub fn try_recv(&mut self) -> Option<RecommendationUpdate> {
        self.rx.try_recv().ok()
    }
}

/// Per-learner bounded output channels.
pub struct SubscriberRegistry {
    channels: RwLock<HashMap<String, mpsc::Sender<RecommendationUpdate>>>,
    channel_capacity: usize,
}

impl SubscriberRegistry {
    pub fn new(channel_capacity: usize) -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
            channel_capacity,
        }
    }

    /// Installs a fresh channel for the learner and returns its read
    /// handle. A prior registration is replaced and its channel closed.
    pub fn subscribe(&self, learner_id: &str) -> UpdateStream {
        let (tx, rx) = mpsc::channel(self.channel_capacity);

        let replaced = self
            .channels
            .write()
            .insert(learner_id.to_string(), tx)
            .is_some();
        if replaced {
            debug!(learner_id = %learner_id, "Replaced existing subscription; prior channel closed");
        }

        metrics().active_subscribers.set(self.len() as u64);
        UpdateStream { rx }
    }

    /// Removes and closes the learner's channel. Returns false when no
    /// subscription existed.
    pub fn unsubscribe(&self, learner_id: &str) -> bool {
        let removed = self.channels.write().remove(learner_id).is_some();
        metrics().active_subscribers.set(self.len() as u64);
        removed
    }

    /// Non-blocking send to the learner's channel, if any. A full buffer
    /// drops the update; that is an expected outcome, not an error.
    pub fn publish(&self, learner_id: &str, update: RecommendationUpdate) -> bool {
        let tx = match self.channels.read().get(learner_id) {
            Some(tx) => tx.clone(),
            None => return false,
        };

        match tx.try_send(update) {
            Ok(()) => {
                metrics().updates_published.inc();
                true
            }
            Err(mpsc::error::TrySendError::Full(_)) => {
                metrics().updates_dropped.inc();
                debug!(learner_id = %learner_id, "Subscriber buffer full, update dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => false,
        }
    }

    pub fn len(&self) -> usize {
        self.channels.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.read().is_empty()
    }
}
