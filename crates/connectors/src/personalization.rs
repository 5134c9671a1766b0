//! Personalization collaborator client.

use std::time::Duration;

use async_trait::async_trait;
use rec_core::{
    DifficultyLevel, Error, PersonalizationRequest, Recommendation, Result,
};
use serde::Deserialize;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::PersonalizationConfig;

/// Contract for the personalization collaborator.
///
/// The pipeline treats this as the scoring oracle: it returns a base-ranked
/// candidate list which the generator then adjusts locally.
#[async_trait]
pub trait PersonalizationProvider: Send + Sync {
    /// Generates a base-ranked candidate list for a learner.
    async fn generate(&self, request: PersonalizationRequest) -> Result<Vec<Recommendation>>;

    fn is_healthy(&self) -> bool {
        true
    }
}

/// Wire response from the personalization service.
#[derive(Debug, Deserialize)]
struct CandidateListResponse {
    items: Vec<Recommendation>,
}

/// HTTP personalization client.
///
/// Mock mode (empty or "mock" base URL) serves a deterministic
/// catalog-derived candidate list keyed on the learner id, so the engine
/// runs standalone in development and tests.
#[derive(Clone)]
pub struct HttpPersonalizationClient {
    base_url: String,
    http_client: reqwest::Client,
    mock_mode: bool,
}

impl HttpPersonalizationClient {
    /// Creates a new personalization client.
    pub fn new(config: PersonalizationConfig) -> Result<Self> {
        let mock_mode = config.base_url.is_empty() || config.base_url == "mock";

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| Error::internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            base_url: config.base_url,
            http_client,
            mock_mode,
        })
    }

    async fn remote_generate(
        &self,
        request: &PersonalizationRequest,
    ) -> Result<Vec<Recommendation>> {
        let url = format!("{}/recommendations/generate", self.base_url);

        debug!(url = %url, learner_id = %request.learner_id, "Calling personalization service");

        let response = self
            .http_client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Personalization request failed");
                Error::collaborator(format!("Personalization service unavailable: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, body = %body, "Personalization service returned error");
            return Err(Error::collaborator(format!(
                "Personalization service returned {}",
                status
            )));
        }

        let candidates: CandidateListResponse = response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse personalization response");
            Error::collaborator(format!("Invalid personalization response: {}", e))
        })?;

        Ok(candidates.items)
    }

    /// Deterministic candidates for testing/development.
    fn mock_generate(&self, request: &PersonalizationRequest) -> Vec<Recommendation> {
        debug!(learner_id = %request.learner_id, "Using mock personalization");

        const CATALOG: &[(&str, DifficultyLevel, i64)] = &[
            ("video", DifficultyLevel::Intermediate, 12),
            ("interactive", DifficultyLevel::Beginner, 8),
            ("article", DifficultyLevel::Intermediate, 15),
            ("game", DifficultyLevel::Beginner, 6),
            ("audio", DifficultyLevel::Intermediate, 14),
            ("video", DifficultyLevel::Advanced, 18),
            ("interactive", DifficultyLevel::Intermediate, 10),
            ("article", DifficultyLevel::Advanced, 20),
        ];

        let seed = learner_seed(&request.learner_id);

        CATALOG
            .iter()
            .enumerate()
            .take(request.max_results.max(1))
            .map(|(i, &(content_type, difficulty, minutes))| Recommendation {
                id: Uuid::new_v4(),
                content_id: format!("content-{:04x}-{}", seed & 0xffff, i),
                learner_id: request.learner_id.clone(),
                score: 0.95 - i as f64 * 0.06,
                difficulty,
                content_type: content_type.to_string(),
                estimated_duration_ms: minutes * 60 * 1000,
                metadata: Default::default(),
            })
            .collect()
    }
}

/// Deterministic seed from the learner id; keeps mock candidates stable
/// per learner across calls.
fn learner_seed(learner_id: &str) -> u64 {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    let mut hasher = DefaultHasher::new();
    learner_id.hash(&mut hasher);
    hasher.finish()
}

#[async_trait]
impl PersonalizationProvider for HttpPersonalizationClient {
    async fn generate(&self, request: PersonalizationRequest) -> Result<Vec<Recommendation>> {
        if self.mock_mode {
            return Ok(self.mock_generate(&request));
        }

        self.remote_generate(&request).await
    }
}
