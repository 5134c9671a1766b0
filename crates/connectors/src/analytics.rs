//! Analytics collaborator client.

use std::time::Duration;

use async_trait::async_trait;
use rec_core::{BehaviorRecord, Error, Result};
use tracing::{debug, warn};

use crate::config::AnalyticsConfig;

/// Contract for the analytics collaborator.
///
/// Failures here are non-fatal to the pipeline; the caller logs and moves on.
#[async_trait]
pub trait AnalyticsSink: Send + Sync {
    /// Records a translated behavior record.
    async fn record_behavior(&self, record: BehaviorRecord) -> Result<()>;

    fn is_healthy(&self) -> bool {
        true
    }
}

/// HTTP analytics client.
///
/// Posts behavior records to the analytics service. Mock mode (empty or
/// "mock" base URL) accepts everything without a network call, so the
/// engine runs standalone in development.
#[derive(Clone)]
pub struct HttpAnalyticsClient {
    base_url: String,
    http_client: reqwest::Client,
    mock_mode: bool,
}

impl HttpAnalyticsClient {
    /// Creates a new analytics client.
    pub fn new(config: AnalyticsConfig) -> Result<Self> {
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
}

#[async_trait]
impl AnalyticsSink for HttpAnalyticsClient {
    async fn record_behavior(&self, record: BehaviorRecord) -> Result<()> {
        if self.mock_mode {
            debug!(learner_id = %record.learner_id, category = %record.category, "Mock analytics accepted record");
            return Ok(());
        }

        let url = format!("{}/behavior", self.base_url);

        let response = self
            .http_client
            .post(&url)
            .json(&record)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Analytics request failed");
                Error::collaborator(format!("Analytics service unavailable: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(Error::collaborator(format!(
                "Analytics service returned {}",
                status
            )));
        }

        Ok(())
    }
}
