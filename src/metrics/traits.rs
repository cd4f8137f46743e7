//! # Metrics Trait Hierarchy
//!
//! Mirrors the cache trait design by separating *recording*, *snapshotting*,
//! and *export* responsibilities into small, composable traits.
//!
//! ## Architecture
//!
//! ```text
//!                     ┌─────────────────────────────┐
//!                     │     CoreMetricsRecorder     │
//!                     │  get_hit/get_miss/insert    │
//!                     │  evict/remove/clear         │
//!                     └──────────────┬──────────────┘
//!                                    │
//!                    ┌───────────────┴───────────────┐
//!                    ▼                               ▼
//!             ┌──────────────┐                ┌──────────────┐
//!             │ LruRecorder  │                │ LfuRecorder  │
//!             └──────────────┘                └──────────────┘
//!
//!   Consumption (decoupled from recording):
//!   ┌──────────────────────────────┐    ┌──────────────────────────────┐
//!   │ MetricsSnapshotProvider<S>   │    │ MetricsExporter<S>           │
//!   │ (bench/test)                 │    │ (production monitoring)      │
//!   └──────────────────────────────┘    └──────────────────────────────┘
//! ```
//!
//! `*ReadRecorder` traits take `&self` so operations that run under a shared
//! lock can still count themselves.

/// Common counters for any cache policy.
pub trait CoreMetricsRecorder {
    fn record_get_hit(&mut self);
    fn record_get_miss(&mut self);
    fn record_insert_call(&mut self);
    fn record_insert_new(&mut self);
    fn record_insert_update(&mut self);
    fn record_evict_call(&mut self);
    fn record_evicted_entry(&mut self);
    fn record_remove_call(&mut self);
    fn record_remove_found(&mut self);
    fn record_clear(&mut self);
}

/// Read-path counters shared by all policies.
pub trait CoreMetricsReadRecorder {
    fn record_peek_call(&self);
    fn record_peek_found(&self);
}

/// Metrics for LRU behavior (recency order).
pub trait LruMetricsRecorder: CoreMetricsRecorder {
    fn record_pop_lru_call(&mut self);
    fn record_pop_lru_found(&mut self);
    fn record_touch_call(&mut self);
    fn record_touch_found(&mut self);
}

/// Read-only LRU metrics for `&self` methods.
pub trait LruMetricsReadRecorder: CoreMetricsReadRecorder {
    fn record_peek_lru_call(&self);
    fn record_peek_lru_found(&self);
    fn record_recency_rank_call(&self);
    fn record_recency_rank_found(&self);
    fn record_recency_rank_scan_step(&self);
}

/// Metrics for LFU behavior (frequency order).
pub trait LfuMetricsRecorder: CoreMetricsRecorder {
    fn record_pop_lfu_call(&mut self);
    fn record_pop_lfu_found(&mut self);
    fn record_promotion(&mut self);
    fn record_bucket_created(&mut self);
    fn record_bucket_dropped(&mut self);
    fn record_min_freq_scan_step(&mut self);
}

/// Read-only LFU metrics for `&self` methods.
pub trait LfuMetricsReadRecorder: CoreMetricsReadRecorder {
    fn record_peek_lfu_call(&self);
    fn record_peek_lfu_found(&self);
    fn record_frequency_call(&self);
    fn record_frequency_found(&self);
}

/// Snapshot provider for bench/testing.
pub trait MetricsSnapshotProvider<S> {
    fn snapshot(&self) -> S;
}

/// Export/publish metrics to production monitoring backends.
pub trait MetricsExporter<S> {
    fn export(&self, snapshot: &S);
}
