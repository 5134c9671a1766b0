//! Pipeline configuration.
//!
//! Trigger thresholds and adjustment multipliers are carried as defaults
//! from the original tuning, not validated business rules; deployments
//! override them through the layered configuration.

use std::time::Duration;

use rec_core::limits::{DEFAULT_QUEUE_CAPACITY, DEFAULT_UPDATE_CHANNEL_CAPACITY};
use serde::{Deserialize, Serialize};

/// Trigger policy thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Minimum interval between recomputations for one learner, in seconds
    #[serde(default = "default_debounce_secs")]
    pub debounce_secs: u64,
    /// content_view dwell above this (ms) signals deep engagement
    #[serde(default = "default_long_dwell_ms")]
    pub long_dwell_ms: i64,
    /// Engagement below this bound signals disengagement
    #[serde(default = "default_engagement_low")]
    pub engagement_low: f64,
    /// Engagement above this bound signals readiness for harder material
    #[serde(default = "default_engagement_high")]
    pub engagement_high: f64,
}

fn default_debounce_secs() -> u64 {
    60
}

fn default_long_dwell_ms() -> i64 {
    300_000
}

fn default_engagement_low() -> f64 {
    0.3
}

fn default_engagement_high() -> f64 {
    0.8
}

impl Default for TriggerConfig {
    fn default() -> Self {
        Self {
            debounce_secs: default_debounce_secs(),
            long_dwell_ms: default_long_dwell_ms(),
            engagement_low: default_engagement_low(),
            engagement_high: default_engagement_high(),
        }
    }
}

/// Score adjustment multipliers applied after the base ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdjustmentConfig {
    /// Engagement below this favors interactive material
    #[serde(default = "default_engagement_low")]
    pub engagement_low: f64,
    /// Engagement above this favors advanced material
    #[serde(default = "default_engagement_high")]
    pub engagement_high: f64,
    /// Boost for interactive/game items when engagement is low
    #[serde(default = "default_low_engagement_boost")]
    pub low_engagement_boost: f64,
    /// Boost for advanced items when engagement is high
    #[serde(default = "default_high_engagement_boost")]
    pub high_engagement_boost: f64,
    /// Comprehension rate below this gets reinforcement material
    #[serde(default = "default_comprehension_threshold")]
    pub comprehension_threshold: f64,
    /// Boost for beginner/intermediate items when comprehension is low
    #[serde(default = "default_reinforce_boost")]
    pub reinforce_boost: f64,
    /// Focus level below this favors short content
    #[serde(default = "default_focus_threshold")]
    pub focus_threshold: f64,
    /// Items shorter than this (ms) count as short content
    #[serde(default = "default_short_content_cutoff_ms")]
    pub short_content_cutoff_ms: i64,
    /// Boost for short items when focus is low
    #[serde(default = "default_short_content_boost")]
    pub short_content_boost: f64,
    /// Boost for items matching the learner's style affinity
    #[serde(default = "default_style_match_boost")]
    pub style_match_boost: f64,
}

fn default_low_engagement_boost() -> f64 {
    1.3
}

fn default_high_engagement_boost() -> f64 {
    1.2
}

fn default_comprehension_threshold() -> f64 {
    0.5
}

fn default_reinforce_boost() -> f64 {
    1.25
}

fn default_focus_threshold() -> f64 {
    0.4
}

fn default_short_content_cutoff_ms() -> i64 {
    600_000
}

fn default_short_content_boost() -> f64 {
    1.2
}

fn default_style_match_boost() -> f64 {
    1.4
}

impl Default for AdjustmentConfig {
    fn default() -> Self {
        Self {
            engagement_low: default_engagement_low(),
            engagement_high: default_engagement_high(),
            low_engagement_boost: default_low_engagement_boost(),
            high_engagement_boost: default_high_engagement_boost(),
            comprehension_threshold: default_comprehension_threshold(),
            reinforce_boost: default_reinforce_boost(),
            focus_threshold: default_focus_threshold(),
            short_content_cutoff_ms: default_short_content_cutoff_ms(),
            short_content_boost: default_short_content_boost(),
            style_match_boost: default_style_match_boost(),
        }
    }
}

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Ingestion queue capacity; submissions beyond this fail fast
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
    /// Per-subscriber update channel capacity
    #[serde(default = "default_update_channel_capacity")]
    pub update_channel_capacity: usize,
    /// Maximum recommendations per computed list
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Cache entry time-to-live, in seconds
    #[serde(default = "default_cache_ttl_secs")]
    pub cache_ttl_secs: u64,
    /// Session inactivity timeout, in seconds
    #[serde(default = "default_session_timeout_secs")]
    pub session_timeout_secs: u64,
    /// Janitor sweep period, in seconds
    #[serde(default = "default_janitor_interval_secs")]
    pub janitor_interval_secs: u64,
    /// Timeout for the fire-and-forget analytics forward, in milliseconds
    #[serde(default = "default_analytics_timeout_ms")]
    pub analytics_timeout_ms: u64,
    /// Timeout for the personalization call, in milliseconds
    #[serde(default = "default_personalization_timeout_ms")]
    pub personalization_timeout_ms: u64,

    #[serde(default)]
    pub trigger: TriggerConfig,

    #[serde(default)]
    pub adjustments: AdjustmentConfig,
}

fn default_queue_capacity() -> usize {
    DEFAULT_QUEUE_CAPACITY
}

fn default_update_channel_capacity() -> usize {
    DEFAULT_UPDATE_CHANNEL_CAPACITY
}

fn default_max_results() -> usize {
    10
}

fn default_cache_ttl_secs() -> u64 {
    1800
}

fn default_session_timeout_secs() -> u64 {
    1800
}

fn default_janitor_interval_secs() -> u64 {
    300
}

fn default_analytics_timeout_ms() -> u64 {
    2_000
}

fn default_personalization_timeout_ms() -> u64 {
    5_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            update_channel_capacity: default_update_channel_capacity(),
            max_results: default_max_results(),
            cache_ttl_secs: default_cache_ttl_secs(),
            session_timeout_secs: default_session_timeout_secs(),
            janitor_interval_secs: default_janitor_interval_secs(),
            analytics_timeout_ms: default_analytics_timeout_ms(),
            personalization_timeout_ms: default_personalization_timeout_ms(),
            trigger: TriggerConfig::default(),
            adjustments: AdjustmentConfig::default(),
        }
    }
}

impl EngineConfig {
    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    pub fn session_timeout(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.session_timeout_secs as i64)
    }

    pub fn janitor_interval(&self) -> Duration {
        Duration::from_secs(self.janitor_interval_secs)
    }

    pub fn analytics_timeout(&self) -> Duration {
        Duration::from_millis(self.analytics_timeout_ms)
    }

    pub fn personalization_timeout(&self) -> Duration {
        Duration::from_millis(self.personalization_timeout_ms)
    }
}
