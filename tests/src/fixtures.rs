//! Test fixtures and event builders.

use rec_core::{EventType, LearnerEvent};

/// A valid event of the given type for a learner.
pub fn event(learner_id: &str, event_type: EventType) -> LearnerEvent {
    LearnerEvent::new(learner_id, event_type, "interacted").with_session("session-1")
}

/// A content_view with a dwell duration in milliseconds.
pub fn content_view(learner_id: &str, content_id: &str, duration_ms: i64) -> LearnerEvent {
    LearnerEvent::new(learner_id, EventType::ContentView, "viewed")
        .with_session("session-1")
        .with_content(content_id)
        .with_duration(duration_ms)
}

/// An engagement event carrying a level property.
pub fn engagement(learner_id: &str, level: f64) -> LearnerEvent {
    LearnerEvent::new(learner_id, EventType::Engagement, "rated")
        .with_session("session-1")
        .with_property("level", level)
}

/// A hard-completion event.
pub fn completion(learner_id: &str, content_id: &str) -> LearnerEvent {
    LearnerEvent::new(learner_id, EventType::ContentComplete, "completed")
        .with_session("session-1")
        .with_content(content_id)
}

/// An event missing its learner id; must be rejected at the boundary.
pub fn missing_learner_event() -> LearnerEvent {
    let mut e = LearnerEvent::new("", EventType::ContentView, "viewed");
    e.learner_id = String::new();
    e
}

/// An event missing its action label; must be rejected at the boundary.
pub fn missing_action_event(learner_id: &str) -> LearnerEvent {
    let mut e = LearnerEvent::new(learner_id, EventType::ContentView, "viewed");
    e.action = String::new();
    e
}
