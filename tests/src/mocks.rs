//! Mock collaborator implementations for testing.

use std::time::Duration;

use async_trait::async_trait;
use connectors::{AnalyticsSink, PersonalizationProvider};
use parking_lot::Mutex;
use rec_core::{
    BehaviorRecord, DifficultyLevel, Error, PersonalizationRequest, Recommendation, Result,
};
use uuid::Uuid;

/// Mock analytics sink that captures behavior records in memory.
#[derive(Default)]
pub struct MockAnalytics {
    records: Mutex<Vec<BehaviorRecord>>,
    should_fail: Mutex<bool>,
}

impl MockAnalytics {
    pub fn new() -> Self {
        Self::default()
    }

    /// All behavior records received, in arrival order.
    pub fn captured_records(&self) -> Vec<BehaviorRecord> {
        self.records.lock().clone()
    }

    pub fn record_count(&self) -> usize {
        self.records.lock().len()
    }

    /// Set failure mode for testing error isolation.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }
}

#[async_trait]
impl AnalyticsSink for MockAnalytics {
    async fn record_behavior(&self, record: BehaviorRecord) -> Result<()> {
        if *self.should_fail.lock() {
            return Err(Error::collaborator("Mock analytics failure"));
        }

        self.records.lock().push(record);
        Ok(())
    }

    fn is_healthy(&self) -> bool {
        !*self.should_fail.lock()
    }
}

/// Known base candidates served by [`MockPersonalization`].
///
/// Scores are fixed so adjustment tests can compare adjusted output against
/// the unadjusted base.
pub fn base_candidates(learner_id: &str) -> Vec<Recommendation> {
    let candidate = |content_id: &str,
                     content_type: &str,
                     difficulty: DifficultyLevel,
                     minutes: i64,
                     score: f64| Recommendation {
        id: Uuid::new_v4(),
        content_id: content_id.into(),
        learner_id: learner_id.into(),
        score,
        difficulty,
        content_type: content_type.into(),
        estimated_duration_ms: minutes * 60 * 1000,
        metadata: Default::default(),
    };

    vec![
        candidate("video-basics", "video", DifficultyLevel::Intermediate, 12, 0.9),
        candidate("game-fractions", "game", DifficultyLevel::Beginner, 6, 0.8),
        candidate("interactive-lab", "interactive", DifficultyLevel::Intermediate, 10, 0.7),
        candidate("audio-review", "audio", DifficultyLevel::Intermediate, 14, 0.6),
    ]
}

/// Mock personalization provider with captured requests, a failure switch,
/// and an optional per-call delay for timeout testing.
#[derive(Default)]
pub struct MockPersonalization {
    requests: Mutex<Vec<PersonalizationRequest>>,
    should_fail: Mutex<bool>,
    delay: Mutex<Option<Duration>>,
}

impl MockPersonalization {
    pub fn new() -> Self {
        Self::default()
    }

    /// All generation requests received, in arrival order.
    pub fn captured_requests(&self) -> Vec<PersonalizationRequest> {
        self.requests.lock().clone()
    }

    /// Number of generation calls observed.
    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }

    /// Set failure mode for testing error isolation.
    pub fn set_should_fail(&self, fail: bool) {
        *self.should_fail.lock() = fail;
    }

    /// Delay every call, to exercise the generator's bounded timeout.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock() = delay;
    }
}

#[async_trait]
impl PersonalizationProvider for MockPersonalization {
    async fn generate(&self, request: PersonalizationRequest) -> Result<Vec<Recommendation>> {
        let learner_id = request.learner_id.clone();
        self.requests.lock().push(request);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.should_fail.lock() {
            return Err(Error::collaborator("Mock personalization failure"));
        }

        Ok(base_candidates(&learner_id))
    }

    fn is_healthy(&self) -> bool {
        !*self.should_fail.lock()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_personalization_captures_requests() {
        let mock = MockPersonalization::new();

        let items = mock
            .generate(PersonalizationRequest::minimal("l1", 10))
            .await
            .unwrap();
        assert_eq!(items.len(), 4);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(mock.captured_requests()[0].learner_id, "l1");
    }

    #[tokio::test]
    async fn test_mock_personalization_failure_mode() {
        let mock = MockPersonalization::new();
        mock.set_should_fail(true);

        let result = mock.generate(PersonalizationRequest::minimal("l1", 10)).await;
        assert!(result.is_err());
        assert!(!mock.is_healthy());
    }

    #[tokio::test]
    async fn test_mock_analytics_captures_records() {
        let mock = MockAnalytics::new();
        let event = rec_core::LearnerEvent::new("l1", rec_core::EventType::Focus, "focused");

        mock.record_behavior(BehaviorRecord::from(&event)).await.unwrap();
        assert_eq!(mock.record_count(), 1);
        assert_eq!(mock.captured_records()[0].category, "focus");
    }
}
