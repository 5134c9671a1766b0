//! Internal metrics collection.
//!
//! Collected in-memory with atomics; the janitor logs a snapshot on each
//! sweep.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// A counter metric.
#[derive(Debug, Default)]
pub struct Counter(AtomicU64);

impl Counter {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn inc(&self) {
        self.0.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_by(&self, n: u64) {
        self.0.fetch_add(n, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// A gauge metric (can go up or down).
#[derive(Debug, Default)]
pub struct Gauge(AtomicU64);

impl Gauge {
    pub fn new() -> Self {
        Self(AtomicU64::new(0))
    }

    pub fn set(&self, val: u64) {
        self.0.store(val, Ordering::Relaxed);
    }

    pub fn get(&self) -> u64 {
        self.0.load(Ordering::Relaxed)
    }
}

/// Histogram for latency tracking.
#[derive(Debug)]
pub struct Histogram {
    /// Buckets: 1ms, 5ms, 10ms, 25ms, 50ms, 100ms, 250ms, 500ms, 1s, 5s, 10s
    buckets: [AtomicU64; 11],
    sum: AtomicU64,
    count: AtomicU64,
}

impl Default for Histogram {
    fn default() -> Self {
        Self::new()
    }
}

impl Histogram {
    const BUCKET_BOUNDS: [u64; 11] = [1, 5, 10, 25, 50, 100, 250, 500, 1000, 5000, 10000];

    pub fn new() -> Self {
        Self {
            buckets: Default::default(),
            sum: AtomicU64::new(0),
            count: AtomicU64::new(0),
        }
    }

    /// Records a value in milliseconds.
    pub fn observe(&self, ms: u64) {
        self.sum.fetch_add(ms, Ordering::Relaxed);
        self.count.fetch_add(1, Ordering::Relaxed);

        for (i, &bound) in Self::BUCKET_BOUNDS.iter().enumerate() {
            if ms <= bound {
                self.buckets[i].fetch_add(1, Ordering::Relaxed);
                return;
            }
        }
        // Value exceeds all buckets, add to last
        self.buckets[10].fetch_add(1, Ordering::Relaxed);
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    pub fn mean(&self) -> f64 {
        let count = self.count();
        if count == 0 {
            0.0
        } else {
            self.sum.load(Ordering::Relaxed) as f64 / count as f64
        }
    }
}

/// Collected metrics for the recommendation engine.
#[derive(Debug, Default)]
pub struct Metrics {
    // Ingestion
    pub events_submitted: Counter,
    pub events_rejected: Counter,
    pub queue_full_rejections: Counter,
    pub events_processed: Counter,

    // Collaborators
    pub behavior_records_sent: Counter,
    pub analytics_failures: Counter,

    // Recomputation
    pub recomputations_triggered: Counter,
    pub recomputations_failed: Counter,
    pub cache_hits: Counter,
    pub cache_misses: Counter,
    pub stale_served: Counter,

    // Fan-out
    pub updates_published: Counter,
    pub updates_dropped: Counter,

    // Janitor
    pub sessions_evicted: Counter,
    pub cache_entries_evicted: Counter,

    // Latency histograms
    pub recompute_latency_ms: Histogram,

    // Gauges
    pub active_sessions: Gauge,
    pub active_subscribers: Gauge,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }
}

/// A snapshot of metrics at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub timestamp: DateTime<Utc>,
    pub events_submitted: u64,
    pub events_rejected: u64,
    pub queue_full_rejections: u64,
    pub events_processed: u64,
    pub analytics_failures: u64,
    pub recomputations_triggered: u64,
    pub recomputations_failed: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub updates_published: u64,
    pub updates_dropped: u64,
    pub sessions_evicted: u64,
    pub cache_entries_evicted: u64,
    pub recompute_latency_mean_ms: f64,
    pub active_sessions: u64,
    pub active_subscribers: u64,
}

impl Metrics {
    /// Takes a snapshot of current metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            timestamp: Utc::now(),
            events_submitted: self.events_submitted.get(),
            events_rejected: self.events_rejected.get(),
            queue_full_rejections: self.queue_full_rejections.get(),
            events_processed: self.events_processed.get(),
            analytics_failures: self.analytics_failures.get(),
            recomputations_triggered: self.recomputations_triggered.get(),
            recomputations_failed: self.recomputations_failed.get(),
            cache_hits: self.cache_hits.get(),
            cache_misses: self.cache_misses.get(),
            updates_published: self.updates_published.get(),
            updates_dropped: self.updates_dropped.get(),
            sessions_evicted: self.sessions_evicted.get(),
            cache_entries_evicted: self.cache_entries_evicted.get(),
            recompute_latency_mean_ms: self.recompute_latency_ms.mean(),
            active_sessions: self.active_sessions.get(),
            active_subscribers: self.active_subscribers.get(),
        }
    }
}

/// Global metrics registry.
pub static METRICS: std::sync::LazyLock<Metrics> = std::sync::LazyLock::new(Metrics::new);

/// Get the global metrics instance.
pub fn metrics() -> &'static Metrics {
    &METRICS
}
