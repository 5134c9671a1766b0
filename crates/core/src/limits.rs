//! Structural limits for the recommendation pipeline.
//!
//! These caps bound the working set of the in-memory structures. Tuning
//! thresholds for the trigger policy and score adjustments live in the
//! pipeline configuration instead, where they can be overridden per
//! deployment.

// === Session Limits ===

/// Maximum events retained per session, oldest dropped first.
///
/// Bounds per-learner memory; the activity log sent to the personalization
/// service is derived from this window.
pub const MAX_SESSION_EVENTS: usize = 100;

/// Maximum event summaries folded into a personalization request.
pub const MAX_ACTIVITY_LOG_ENTRIES: usize = 10;

// === Event Field Limits (chars) ===

/// Learner ID max length.
/// UUIDs=36, emails=~50, custom IDs up to 128.
pub const MAX_LEARNER_ID_LEN: usize = 128;

/// Action label max length.
pub const MAX_ACTION_LEN: usize = 64;

/// Maximum event properties JSON size in bytes (16KB).
///
/// Most real-world property bags are under 1KB.
pub const MAX_EVENT_PROPERTIES_BYTES: usize = 16 * 1024;

// === Channel Capacities ===

/// Default ingestion queue capacity. Submissions beyond this fail fast
/// rather than block the producer.
pub const DEFAULT_QUEUE_CAPACITY: usize = 1024;

/// Default per-subscriber update channel capacity. A full buffer drops the
/// update; subscribers poll the cache for the authoritative value.
pub const DEFAULT_UPDATE_CHANNEL_CAPACITY: usize = 16;
