//! Bounded event ingestion queue.
//!
//! The single hand-off point between producers and the event processor.
//! Submissions validate at the boundary, then enqueue without blocking;
//! a full queue rejects the newest event rather than buffering unboundedly
//! or evicting older ones.

use chrono::Utc;
use rec_core::{Error, LearnerEvent, Result};
use telemetry::metrics;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;
use validator::Validate;

/// Producer-side handle to the ingestion queue.
#[derive(Clone)]
pub struct EventQueue {
    tx: mpsc::Sender<LearnerEvent>,
    capacity: usize,
}

impl EventQueue {
    /// Creates a bounded queue, returning the producer handle and the
    /// consumer's receiver.
    pub fn bounded(capacity: usize) -> (Self, mpsc::Receiver<LearnerEvent>) {
        let (tx, rx) = mpsc::channel(capacity);
        (Self { tx, capacity }, rx)
    }

    /// Validates and enqueues an event, assigning its identifier and
    /// timestamp when absent. Fails fast with `QueueFull` under overload.
    pub fn submit(&self, mut event: LearnerEvent) -> Result<Uuid> {
        event.validate().map_err(|e| {
            metrics().events_rejected.inc();
            Error::validation(e.to_string())
        })?;

        let id = *event.id.get_or_insert_with(Uuid::new_v4);
        event.timestamp.get_or_insert_with(Utc::now);

        self.tx.try_send(event).map_err(|e| match e {
            mpsc::error::TrySendError::Full(_) => {
                metrics().queue_full_rejections.inc();
                Error::queue_full(self.capacity)
            }
            mpsc::error::TrySendError::Closed(_) => {
                Error::internal("event processor has shut down")
            }
        })?;

        metrics().events_submitted.inc();
        debug!(event_id = %id, "Event enqueued");
        Ok(id)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
