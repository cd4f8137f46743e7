pub mod lfu;
pub mod lru;

/// Upper bound on slots reserved up front; larger caches grow on demand.
pub(crate) const MAX_PREALLOC: usize = 1 << 12;
