//! Observability stubs (metrics, tracing)

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics handle for recording counters
#[derive(Debug, Default)]
pub struct Metrics {
    listings_upstream: AtomicU64,
    listings_store: AtomicU64,
    listings_seed: AtomicU64,
    upstream_failures: AtomicU64,
    trailer_lookups: AtomicU64,
    trailer_lookup_failures: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listing_served_upstream(&self) {
        self.listings_upstream.fetch_add(1, Ordering::Relaxed);
    }

    pub fn listing_served_store(&self) {
        self.listings_store.fetch_add(1, Ordering::Relaxed);
    }

    pub fn listing_served_seed(&self) {
        self.listings_seed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn upstream_failure(&self) {
        self.upstream_failures.fetch_add(1, Ordering::Relaxed);
        tracing::debug!(counter = "upstream_failures", "Metric incremented");
    }

    pub fn trailer_lookup(&self) {
        self.trailer_lookups.fetch_add(1, Ordering::Relaxed);
    }

    pub fn trailer_lookup_failed(&self) {
        self.trailer_lookup_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            listings_upstream: self.listings_upstream.load(Ordering::Relaxed),
            listings_store: self.listings_store.load(Ordering::Relaxed),
            listings_seed: self.listings_seed.load(Ordering::Relaxed),
            upstream_failures: self.upstream_failures.load(Ordering::Relaxed),
            trailer_lookups: self.trailer_lookups.load(Ordering::Relaxed),
            trailer_lookup_failures: self.trailer_lookup_failures.load(Ordering::Relaxed),
        }
    }
}

#[derive(Debug, Clone, serde::Serialize)]
pub struct MetricsSnapshot {
    pub listings_upstream: u64,
    pub listings_store: u64,
    pub listings_seed: u64,
    pub upstream_failures: u64,
    pub trailer_lookups: u64,
    pub trailer_lookup_failures: u64,
}
