//! Unified error types for the recommendation engine.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the recommendation engine.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed or incomplete event, rejected at the submission boundary.
    #[error("validation error: {0}")]
    Validation(String),

    /// Ingestion queue is at capacity. The caller owns the retry/drop policy.
    #[error("ingestion queue full (capacity {capacity})")]
    QueueFull { capacity: usize },

    /// A collaborator call failed or timed out.
    #[error("collaborator error: {0}")]
    Collaborator(String),

    /// No session exists for the learner yet.
    #[error("no session for learner: {0}")]
    SessionNotFound(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn queue_full(capacity: usize) -> Self {
        Self::QueueFull { capacity }
    }

    pub fn collaborator(msg: impl Into<String>) -> Self {
        Self::Collaborator(msg.into())
    }

    pub fn session_not_found(learner_id: impl Into<String>) -> Self {
        Self::SessionNotFound(learner_id.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// True for errors a producer should treat as backpressure rather than
    /// a bad request.
    pub fn is_overload(&self) -> bool {
        matches!(self, Self::QueueFull { .. })
    }
}
