//! Learner interaction event types.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::limits::MAX_EVENT_PROPERTIES_BYTES;

/// Interaction event types emitted by learning clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    ContentView,
    Engagement,
    Comprehension,
    Focus,
    ContentComplete,
    QuizComplete,
    SkillMastery,
    /// Unrecognized wire types. Accepted, but they only touch the session's
    /// activity clock and never trigger recomputation.
    #[serde(other)]
    Unknown,
}

impl EventType {
    /// Returns the event type as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ContentView => "content_view",
            Self::Engagement => "engagement",
            Self::Comprehension => "comprehension",
            Self::Focus => "focus",
            Self::ContentComplete => "content_complete",
            Self::QuizComplete => "quiz_complete",
            Self::SkillMastery => "skill_mastery",
            Self::Unknown => "unknown",
        }
    }

    /// Hard-completion events: explicit milestones worth reacting to.
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            Self::ContentComplete | Self::QuizComplete | Self::SkillMastery
        )
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured client context attached to events.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventContext {
    /// Device label (e.g., "tablet")
    pub device: Option<String>,
    /// Client platform (e.g., "ios", "web")
    pub platform: Option<String>,
    /// Coarse location label
    pub location: Option<String>,
    /// Time-of-day bucket (e.g., "morning")
    pub time_of_day: Option<String>,
    /// Free-form environment bag
    #[serde(default)]
    pub environment: HashMap<String, Value>,
}

/// Validates the property bag's serialized size.
fn validate_properties_size(props: &HashMap<String, Value>) -> Result<(), ValidationError> {
    if props.is_empty() {
        return Ok(());
    }

    let size = serde_json::to_vec(props).map(|v| v.len()).unwrap_or(0);

    if size > MAX_EVENT_PROPERTIES_BYTES {
        let mut err = ValidationError::new("properties_too_large");
        err.message = Some(
            format!(
                "properties {}KB exceeds {}KB limit",
                size / 1024,
                MAX_EVENT_PROPERTIES_BYTES / 1024
            )
            .into(),
        );
        return Err(err);
    }
    Ok(())
}

/// A single learner interaction event.
///
/// Immutable after creation; consumed exactly once by the event processor.
/// `id` and `timestamp` are assigned at submission when the producer leaves
/// them unset.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LearnerEvent {
    /// Unique event ID, assigned on submit if absent
    #[serde(default)]
    pub id: Option<Uuid>,
    /// Learner this event belongs to
    #[validate(length(min = 1, max = 128))]
    pub learner_id: String,
    /// Client session the event was produced in
    #[serde(default)]
    pub session_id: String,
    /// Event type
    #[serde(rename = "type")]
    pub event_type: EventType,
    /// Content the event refers to, if any
    pub content_id: Option<String>,
    /// Action label (e.g., "viewed", "paused")
    #[validate(length(min = 1, max = 64))]
    pub action: String,
    /// Event timestamp, assigned on submit if absent
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
    /// Interaction duration in milliseconds
    pub duration_ms: Option<i64>,
    /// Free-form properties (max 16KB serialized)
    #[serde(default)]
    #[validate(custom(function = "validate_properties_size"))]
    pub properties: HashMap<String, Value>,
    /// Structured client context
    #[serde(default)]
    pub context: EventContext,
}

impl LearnerEvent {
    /// Creates a new event with generated ID and timestamp.
    pub fn new(
        learner_id: impl Into<String>,
        event_type: EventType,
        action: impl Into<String>,
    ) -> Self {
        Self {
            id: Some(Uuid::new_v4()),
            learner_id: learner_id.into(),
            session_id: String::new(),
            event_type,
            content_id: None,
            action: action.into(),
            timestamp: Some(Utc::now()),
            duration_ms: None,
            properties: HashMap::new(),
            context: EventContext::default(),
        }
    }

    pub fn with_session(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = session_id.into();
        self
    }

    pub fn with_content(mut self, content_id: impl Into<String>) -> Self {
        self.content_id = Some(content_id.into());
        self
    }

    pub fn with_duration(mut self, duration_ms: i64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Event timestamp, falling back to now for events not yet stamped.
    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.timestamp.unwrap_or_else(Utc::now)
    }

    /// Reads a numeric property, ignoring non-numeric values.
    pub fn numeric_property(&self, key: &str) -> Option<f64> {
        self.properties.get(key).and_then(Value::as_f64)
    }

    /// Reads a string property.
    pub fn string_property(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }
}

/// Behavior record forwarded to the analytics collaborator.
///
/// A flattened translation of the event; failures recording it are
/// non-fatal to the pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BehaviorRecord {
    pub learner_id: String,
    pub session_id: String,
    /// Event type string
    pub category: String,
    pub action: String,
    pub content_id: Option<String>,
    pub duration_ms: Option<i64>,
    pub occurred_at: DateTime<Utc>,
    #[serde(default)]
    pub attributes: HashMap<String, Value>,
}

impl From<&LearnerEvent> for BehaviorRecord {
    fn from(event: &LearnerEvent) -> Self {
        Self {
            learner_id: event.learner_id.clone(),
            session_id: event.session_id.clone(),
            category: event.event_type.as_str().to_string(),
            action: event.action.clone(),
            content_id: event.content_id.clone(),
            duration_ms: event.duration_ms,
            occurred_at: event.occurred_at(),
            attributes: event.properties.clone(),
        }
    }
}
