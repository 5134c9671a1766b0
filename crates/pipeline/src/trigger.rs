//! Trigger policy: decides when a cached list is stale enough to recompute.
//!
//! Trades freshness for load: at most one recomputation per learner per
//! debounce interval, with high-signal events qualifying once the interval
//! has elapsed.

use chrono::Utc;
use rec_core::{CachedRecommendations, EventType, LearnerEvent};

use crate::config::TriggerConfig;

/// Decision function over (event, cached entry).
#[derive(Debug, Clone)]
pub struct TriggerPolicy {
    config: TriggerConfig,
}

impl TriggerPolicy {
    pub fn new(config: TriggerConfig) -> Self {
        Self { config }
    }

    /// Returns the recomputation reason when the event warrants one,
    /// None to skip.
    pub fn evaluate(
        &self,
        event: &LearnerEvent,
        cached: Option<&CachedRecommendations>,
    ) -> Option<String> {
        let entry = match cached {
            // No entry yet: always worth computing.
            None => return Some(format!("cold_start:{}", event.event_type)),
            Some(entry) => entry,
        };

        // Debounce floor applies to every event type.
        let elapsed = Utc::now() - entry.generated_at;
        if elapsed < chrono::Duration::seconds(self.config.debounce_secs as i64) {
            return None;
        }

        if event.event_type.is_completion() {
            return Some(format!("completion:{}", event.event_type));
        }

        match event.event_type {
            EventType::ContentView => {
                let dwell = event.duration_ms.unwrap_or(0);
                if dwell > self.config.long_dwell_ms {
                    return Some(format!("long_dwell:{}ms", dwell));
                }
            }
            EventType::Engagement => {
                if let Some(level) = event.numeric_property("level") {
                    if level < self.config.engagement_low {
                        return Some(format!("engagement_low:{:.2}", level));
                    }
                    if level > self.config.engagement_high {
                        return Some(format!("engagement_high:{:.2}", level));
                    }
                }
            }
            _ => {}
        }

        None
    }
}
