//! Internal telemetry for the recommendation engine.
//!
//! Metrics are collected in-process with atomics; the janitor logs a
//! snapshot each sweep rather than shipping to an external system.

pub mod metrics;
pub mod tracing_setup;

pub use metrics::*;
pub use tracing_setup::*;
