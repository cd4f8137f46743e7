//! evictkit: bounded in-memory caches with LRU and LFU eviction.
//!
//! Both caches are built on [`ds::OrderedList`], an arena-backed doubly-linked
//! list addressed by generation-checked handles. See `DESIGN.md` for the
//! internal architecture and invariants.

pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;

#[cfg(feature = "metrics")]
pub mod metrics;

pub mod prelude;
pub mod traits;
