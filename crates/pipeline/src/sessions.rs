//! In-memory session store.

use std::collections::HashMap;

use parking_lot::RwLock;
use rec_core::{Error, LearnerEvent, Result, Session};
use telemetry::metrics;

/// Learner sessions keyed by learner id, guarded by a single read/write
/// lock. Only the event processor mutates entries; the janitor evicts idle
/// ones.
#[derive(Default)]
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies an event to the learner's session, creating it on first
    /// contact. Returns a snapshot of the updated session.
    pub fn apply_event(&self, event: &LearnerEvent) -> Session {
        let mut sessions = self.sessions.write();

        let session = sessions
            .entry(event.learner_id.clone())
            .or_insert_with(|| Session::new(&event.learner_id, &event.session_id));

        session.record_event(event);
        let snapshot = session.clone();
        drop(sessions);

        metrics()
            .active_sessions
            .set(self.len() as u64);
        snapshot
    }

    /// Returns a snapshot of the learner's session, if any.
    pub fn get(&self, learner_id: &str) -> Option<Session> {
        self.sessions.read().get(learner_id).cloned()
    }

    /// Direct session lookup for callers that need a definite answer.
    pub fn learner_session(&self, learner_id: &str) -> Result<Session> {
        self.get(learner_id)
            .ok_or_else(|| Error::session_not_found(learner_id))
    }

    /// Evicts sessions idle past the timeout. One write lock for the whole
    /// sweep.
    pub fn evict_idle(&self, timeout: chrono::Duration) -> usize {
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_timed_out(timeout));
        let evicted = before - sessions.len();
        drop(sessions);

        if evicted > 0 {
            metrics().sessions_evicted.inc_by(evicted as u64);
            metrics().active_sessions.set(self.len() as u64);
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}
