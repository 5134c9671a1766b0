//! Collaborator client configuration.

use serde::{Deserialize, Serialize};

/// Analytics collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyticsConfig {
    /// Service base URL; empty or "mock" enables mock mode
    #[serde(default = "default_mock_url")]
    pub base_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_analytics_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_mock_url() -> String {
    "mock".to_string()
}

fn default_analytics_timeout_ms() -> u64 {
    2_000
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            base_url: default_mock_url(),
            timeout_ms: default_analytics_timeout_ms(),
        }
    }
}

/// Personalization collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersonalizationConfig {
    /// Service base URL; empty or "mock" enables mock mode
    #[serde(default = "default_mock_url")]
    pub base_url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_personalization_timeout_ms")]
    pub timeout_ms: u64,
}

fn default_personalization_timeout_ms() -> u64 {
    5_000
}

impl Default for PersonalizationConfig {
    fn default() -> Self {
        Self {
            base_url: default_mock_url(),
            timeout_ms: default_personalization_timeout_ms(),
        }
    }
}
