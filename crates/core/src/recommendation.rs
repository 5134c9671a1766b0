//! Recommendation, cache entry, and update message types.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::session::{DifficultyLevel, LearningState, LearningStyle};

/// A single recommendation record.
///
/// Immutable once produced; each computation builds a fresh list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Unique recommendation ID
    pub id: Uuid,
    /// Recommended content
    pub content_id: String,
    /// Learner the recommendation was computed for
    pub learner_id: String,
    /// Adjusted relevance score
    pub score: f64,
    /// Content difficulty label
    pub difficulty: DifficultyLevel,
    /// Content type (e.g., "video", "interactive", "game")
    pub content_type: String,
    /// Estimated time to complete, in milliseconds
    pub estimated_duration_ms: i64,
    /// Free-form metadata
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

/// A learner's cached recommendation list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedRecommendations {
    pub learner_id: String,
    pub items: Vec<Recommendation>,
    pub generated_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    /// Monotonically increasing per learner, starting at 1. Observability
    /// only; last write wins regardless of version.
    pub version: u64,
    /// Strategy label recorded at generation time
    pub strategy: String,
}

impl CachedRecommendations {
    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Time since this entry was generated.
    pub fn age(&self) -> Duration {
        Utc::now() - self.generated_at
    }
}

/// Kind of update pushed to subscribers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateType {
    /// First computed list for the learner
    Initial,
    /// Replacement for a previously published list
    Refresh,
}

/// Update message pushed to a learner's subscribers.
///
/// Best-effort freshness hint; the cache remains the authoritative value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationUpdate {
    pub update_type: UpdateType,
    pub items: Vec<Recommendation>,
    /// Reason string referencing the triggering event
    pub reason: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub metadata: HashMap<String, Value>,
}

/// Session-derived context folded into a personalization request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SituationalContext {
    pub current_content_id: Option<String>,
    pub progress: f64,
    pub engagement_level: f64,
    pub difficulty: DifficultyLevel,
    pub learning_style: LearningStyle,
    pub focus_level: f64,
    pub comprehension_rate: f64,
    pub session_duration_secs: i64,
    pub activity_count: usize,
    /// Compact summaries of recent events, newest first
    pub activity_log: Vec<String>,
}

impl SituationalContext {
    /// Snapshot of the learning state plus session-derived fields.
    pub fn from_state(
        state: &LearningState,
        session_duration_secs: i64,
        activity_count: usize,
        activity_log: Vec<String>,
    ) -> Self {
        Self {
            current_content_id: state.current_content_id.clone(),
            progress: state.progress,
            engagement_level: state.engagement_level,
            difficulty: state.difficulty,
            learning_style: state.learning_style,
            focus_level: state.focus_level,
            comprehension_rate: state.comprehension_rate,
            session_duration_secs,
            activity_count,
            activity_log,
        }
    }
}

/// Request sent to the personalization collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalizationRequest {
    pub learner_id: String,
    pub max_results: usize,
    /// None for learners with no session yet (minimal cold request)
    pub situational_context: Option<SituationalContext>,
}

impl PersonalizationRequest {
    /// Minimal request for a learner with no session state.
    pub fn minimal(learner_id: impl Into<String>, max_results: usize) -> Self {
        Self {
            learner_id: learner_id.into(),
            max_results,
            situational_context: None,
        }
    }
}
