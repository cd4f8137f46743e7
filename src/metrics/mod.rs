//! Optional per-policy counters, enabled with the `metrics` feature.
//!
//! Recording happens inside the cache cores; reading goes through
//! `metrics_snapshot()` or [`MetricsSnapshotProvider`](traits::MetricsSnapshotProvider);
//! publishing goes through [`PrometheusTextExporter`](exporter::PrometheusTextExporter).

pub mod cell;
pub mod exporter;
pub mod metrics_impl;
pub mod snapshot;
pub mod traits;
