//! Collaborator service clients.
//!
//! The pipeline talks to two external services through narrow contracts:
//! an analytics sink receiving behavior records, and a personalization
//! service producing base-ranked candidate lists. Both ship with an HTTP
//! implementation and a mock mode for development and tests.

pub mod analytics;
pub mod config;
pub mod personalization;

pub use analytics::*;
pub use config::*;
pub use personalization::*;
