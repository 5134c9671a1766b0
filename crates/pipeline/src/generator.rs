//! Recommendation generator.
//!
//! Builds a personalization request from session state, calls the external
//! provider under a bounded timeout, then applies local score adjustments.
//! Adjustments are multiplicative, independent, and compounding; they run
//! once per computation against the fresh base list, so a recomputation can
//! never stack boosts on an already-adjusted score.

use std::cmp::Ordering;
use std::sync::Arc;
use std::time::Duration;

use connectors::PersonalizationProvider;
use rec_core::{
    limits::MAX_ACTIVITY_LOG_ENTRIES, DifficultyLevel, Error, LearningState,
    PersonalizationRequest, Recommendation, Result, Session, SituationalContext,
};
use tokio::time::timeout;
use tracing::debug;

use crate::config::AdjustmentConfig;

/// Strategy label recorded with each computed list.
pub fn strategy_for(session: Option<&Session>) -> &'static str {
    if session.is_some() {
        "session_aware"
    } else {
        "profile_only"
    }
}

pub struct RecommendationGenerator {
    provider: Arc<dyn PersonalizationProvider>,
    adjustments: AdjustmentConfig,
    max_results: usize,
    call_timeout: Duration,
}

impl RecommendationGenerator {
    pub fn new(
        provider: Arc<dyn PersonalizationProvider>,
        adjustments: AdjustmentConfig,
        max_results: usize,
        call_timeout: Duration,
    ) -> Self {
        Self {
            provider,
            adjustments,
            max_results,
            call_timeout,
        }
    }

    /// Computes a fresh recommendation list for the learner.
    ///
    /// On provider error or timeout the computation aborts; the caller's
    /// cache and subscribers stay untouched.
    pub async fn generate(
        &self,
        learner_id: &str,
        session: Option<&Session>,
    ) -> Result<Vec<Recommendation>> {
        let request = self.build_request(learner_id, session);

        let mut items = timeout(self.call_timeout, self.provider.generate(request))
            .await
            .map_err(|_| Error::collaborator("personalization call timed out"))??;

        if let Some(session) = session {
            apply_adjustments(&mut items, &session.state, &self.adjustments);
        }

        items.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        items.truncate(self.max_results);

        debug!(
            learner_id = %learner_id,
            count = items.len(),
            strategy = strategy_for(session),
            "Computed recommendations"
        );

        Ok(items)
    }

    fn build_request(&self, learner_id: &str, session: Option<&Session>) -> PersonalizationRequest {
        match session {
            Some(session) => PersonalizationRequest {
                learner_id: learner_id.to_string(),
                max_results: self.max_results,
                situational_context: Some(SituationalContext::from_state(
                    &session.state,
                    session.duration().num_seconds(),
                    session.activity_count(),
                    session.activity_log(MAX_ACTIVITY_LOG_ENTRIES),
                )),
            },
            None => PersonalizationRequest::minimal(learner_id, self.max_results),
        }
    }
}

/// Applies the session-state-aware score boosts to a base candidate list.
/// Each rule fires independently; a single item can collect several.
fn apply_adjustments(
    items: &mut [Recommendation],
    state: &LearningState,
    config: &AdjustmentConfig,
) {
    let style_affinity = state.learning_style.preferred_content_type();

    for item in items.iter_mut() {
        if state.engagement_level < config.engagement_low
            && matches!(item.content_type.as_str(), "interactive" | "game")
        {
            item.score *= config.low_engagement_boost;
        }

        if state.engagement_level > config.engagement_high
            && item.difficulty == DifficultyLevel::Advanced
        {
            item.score *= config.high_engagement_boost;
        }

        if state.comprehension_rate < config.comprehension_threshold
            && matches!(
                item.difficulty,
                DifficultyLevel::Beginner | DifficultyLevel::Intermediate
            )
        {
            item.score *= config.reinforce_boost;
        }

        if state.focus_level < config.focus_threshold
            && item.estimated_duration_ms < config.short_content_cutoff_ms
        {
            item.score *= config.short_content_boost;
        }

        if style_affinity == Some(item.content_type.as_str()) {
            item.score *= config.style_match_boost;
        }
    }
}
