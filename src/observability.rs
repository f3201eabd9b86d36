//! Observability and metrics collection for cache operations.
//!
//! The catalog service reports every cache outcome through the
//! `CacheMetrics` trait: hits, misses, writes, evictions, and the soft
//! failures it swallowed on behalf of the caller. Wire an implementation
//! into the service to feed a monitoring system; the default `NoOpMetrics`
//! discards everything.
//!
//! The error hook matters more here than in most caches. Because cache
//! failures never fail a request, metrics are the only place degraded-mode
//! operation is visible at all beyond the logs.
//!
//! # Example
//!
//! ```ignore
//! use marquee::observability::CacheMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl CacheMetrics for PrometheusMetrics {
//!     fn record_hit(&self, _key: &str, _duration: Duration) {
//!         // counter!("cache_hits").inc();
//!     }
//!     // ... implement other methods
//! }
//!
//! // let catalog = CatalogService::new(store, cache)
//! //     .with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! # Metrics Methods
//!
//! - `record_hit()` - cache hit with operation duration
//! - `record_miss()` - cache miss with operation duration
//! - `record_set()` - cache write with operation duration
//! - `record_delete()` - cache eviction with operation duration
//! - `record_error()` - swallowed cache failure with error message

use std::time::Duration;

/// Trait for cache metrics collection.
pub trait CacheMetrics: Send + Sync {
    /// Record a cache hit.
    fn record_hit(&self, key: &str, duration: Duration) {
        debug!("Cache HIT: {} took {:?}", key, duration);
    }

    /// Record a cache miss.
    ///
    /// Decode failures count as misses too; they additionally go through
    /// `record_error`.
    fn record_miss(&self, key: &str, duration: Duration) {
        debug!("Cache MISS: {} took {:?}", key, duration);
    }

    /// Record a cache set operation.
    fn record_set(&self, key: &str, duration: Duration) {
        debug!("Cache SET: {} took {:?}", key, duration);
    }

    /// Record a cache delete operation.
    fn record_delete(&self, key: &str, duration: Duration) {
        debug!("Cache DELETE: {} took {:?}", key, duration);
    }

    /// Record a swallowed cache error.
    fn record_error(&self, key: &str, error: &str) {
        warn!("Cache ERROR for {}: {}", key, error);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl CacheMetrics for NoOpMetrics {
    fn record_hit(&self, _key: &str, _duration: Duration) {}
    fn record_miss(&self, _key: &str, _duration: Duration) {}
    fn record_set(&self, _key: &str, _duration: Duration) {}
    fn record_delete(&self, _key: &str, _duration: Duration) {}
    fn record_error(&self, _key: &str, _error: &str) {}
}
