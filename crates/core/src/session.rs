//! Session state tracked per learner.

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::events::{EventType, LearnerEvent};
use crate::limits::MAX_SESSION_EVENTS;

/// Content difficulty labels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DifficultyLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl DifficultyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Beginner => "beginner",
            Self::Intermediate => "intermediate",
            Self::Advanced => "advanced",
        }
    }

    /// Parses a difficulty label from a property value; unrecognized labels
    /// return None.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "beginner" => Some(Self::Beginner),
            "intermediate" => Some(Self::Intermediate),
            "advanced" => Some(Self::Advanced),
            _ => None,
        }
    }
}

/// Learning-style labels with content-type affinities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LearningStyle {
    Visual,
    Auditory,
    Kinesthetic,
    #[default]
    Unspecified,
}

impl LearningStyle {
    /// Content type this style has an affinity for, if any.
    pub fn preferred_content_type(&self) -> Option<&'static str> {
        match self {
            Self::Visual => Some("video"),
            Self::Auditory => Some("audio"),
            Self::Kinesthetic => Some("interactive"),
            Self::Unspecified => None,
        }
    }

    pub fn parse(label: &str) -> Option<Self> {
        match label {
            "visual" => Some(Self::Visual),
            "auditory" => Some(Self::Auditory),
            "kinesthetic" => Some(Self::Kinesthetic),
            _ => None,
        }
    }
}

/// Rolling learning state derived from the event stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LearningState {
    /// Content the learner is currently on
    pub current_content_id: Option<String>,
    /// Progress through the current content (0..=1)
    pub progress: f64,
    /// Engagement level (0..=1)
    pub engagement_level: f64,
    /// Working difficulty label
    pub difficulty: DifficultyLevel,
    /// Learning-style label
    pub learning_style: LearningStyle,
    /// Focus level (0..=1)
    pub focus_level: f64,
    /// Comprehension rate (0..=1)
    pub comprehension_rate: f64,
}

impl Default for LearningState {
    fn default() -> Self {
        Self {
            current_content_id: None,
            progress: 0.0,
            engagement_level: 0.5,
            difficulty: DifficultyLevel::default(),
            learning_style: LearningStyle::default(),
            focus_level: 0.5,
            comprehension_rate: 0.5,
        }
    }
}

fn clamp_unit(value: f64) -> f64 {
    value.clamp(0.0, 1.0)
}

/// A learner's rolling session.
///
/// Created on the learner's first event, mutated in place by the event
/// processor, and evicted by the janitor after an inactivity timeout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Learner this session belongs to
    pub learner_id: String,
    /// Client session ID from the first event
    pub session_id: String,
    /// Session start time
    pub started_at: DateTime<Utc>,
    /// Last activity time
    pub last_active_at: DateTime<Utc>,
    /// Most recent events, oldest dropped past the cap
    pub events: VecDeque<LearnerEvent>,
    /// Free-form session context
    #[serde(default)]
    pub context: HashMap<String, Value>,
    /// Current learning state
    pub state: LearningState,
}

impl Session {
    /// Creates a new session from the learner's first event.
    pub fn new(learner_id: impl Into<String>, session_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            learner_id: learner_id.into(),
            session_id: session_id.into(),
            started_at: now,
            last_active_at: now,
            events: VecDeque::new(),
            context: HashMap::new(),
            state: LearningState::default(),
        }
    }

    /// Applies an event: appends to the bounded history, touches the
    /// activity clock, and derives learning-state updates.
    pub fn record_event(&mut self, event: &LearnerEvent) {
        self.last_active_at = event.occurred_at();

        self.events.push_back(event.clone());
        while self.events.len() > MAX_SESSION_EVENTS {
            self.events.pop_front();
        }

        self.apply_state(event);
    }

    fn apply_state(&mut self, event: &LearnerEvent) {
        // Any event may carry a refreshed style label.
        if let Some(style) = event
            .string_property("learning_style")
            .and_then(LearningStyle::parse)
        {
            self.state.learning_style = style;
        }

        match event.event_type {
            EventType::ContentView => {
                if event.content_id.is_some() {
                    self.state.current_content_id = event.content_id.clone();
                }
                if let Some(progress) = event.numeric_property("progress") {
                    self.state.progress = clamp_unit(progress);
                }
            }
            EventType::Engagement => {
                if let Some(level) = event.numeric_property("level") {
                    self.state.engagement_level = clamp_unit(level);
                }
            }
            EventType::Comprehension => {
                if let Some(rate) = event.numeric_property("rate") {
                    self.state.comprehension_rate = clamp_unit(rate);
                }
            }
            EventType::Focus => {
                if let Some(level) = event.numeric_property("level") {
                    self.state.focus_level = clamp_unit(level);
                }
            }
            EventType::ContentComplete => {
                self.state.progress = 1.0;
                if let Some(difficulty) = event
                    .string_property("difficulty")
                    .and_then(DifficultyLevel::parse)
                {
                    self.state.difficulty = difficulty;
                }
            }
            EventType::QuizComplete => {
                if let Some(score) = event.numeric_property("score") {
                    self.state.comprehension_rate = clamp_unit(score);
                }
            }
            EventType::SkillMastery => {
                if let Some(difficulty) = event
                    .string_property("difficulty")
                    .and_then(DifficultyLevel::parse)
                {
                    self.state.difficulty = difficulty;
                }
                self.state.engagement_level = clamp_unit(self.state.engagement_level + 0.1);
            }
            // Unrecognized types only touch last_active_at.
            EventType::Unknown => {}
        }
    }

    /// Checks if the session has been idle past the timeout.
    pub fn is_timed_out(&self, timeout: Duration) -> bool {
        Utc::now() - self.last_active_at > timeout
    }

    /// Returns the session duration.
    pub fn duration(&self) -> Duration {
        self.last_active_at - self.started_at
    }

    /// Number of events observed in the retained window.
    pub fn activity_count(&self) -> usize {
        self.events.len()
    }

    /// Compact summaries of the most recent events, newest first, for the
    /// personalization request.
    pub fn activity_log(&self, limit: usize) -> Vec<String> {
        self.events
            .iter()
            .rev()
            .take(limit)
            .map(|event| {
                let target = event.content_id.as_deref().unwrap_or("-");
                match event.duration_ms {
                    Some(ms) => format!("{} {} ({}s)", event.event_type, target, ms / 1000),
                    None => format!("{} {}", event.event_type, target),
                }
            })
            .collect()
    }
}
