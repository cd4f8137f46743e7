//! Unified cache builder for the eviction policies.
//!
//! Provides one thread-safe facade over [`LruCache`] and [`LfuCache`] so
//! callers can pick a policy at runtime without changing call sites.
//!
//! ## Example
//!
//! ```rust
//! use evictkit::builder::{CacheBuilder, CachePolicy};
//!
//! let cache = CacheBuilder::new(100)
//!     .build::<u64, String>(CachePolicy::Lru)
//!     .unwrap();
//! cache.put(1, "hello".to_string());
//! assert_eq!(cache.get(&1), Some("hello".to_string()));
//!
//! assert!(CacheBuilder::new(0).build::<u64, String>(CachePolicy::Lfu).is_err());
//! ```

use std::hash::Hash;

use crate::error::{ConfigError, non_zero_capacity};
use crate::policy::lfu::LfuCache;
use crate::policy::lru::LruCache;
use crate::traits::ConcurrentCache;

/// Available cache eviction policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CachePolicy {
    /// Least Recently Used eviction.
    Lru,
    /// Least Frequently Used eviction, ties broken by recency.
    Lfu,
}

/// Policy-erased, thread-safe cache handle.
///
/// Cloning shares the same underlying cache.
#[derive(Debug)]
pub struct Cache<K, V> {
    inner: CacheInner<K, V>,
}

#[derive(Debug)]
enum CacheInner<K, V> {
    Lru(LruCache<K, V>),
    Lfu(LfuCache<K, V>),
}

impl<K, V> Clone for Cache<K, V> {
    fn clone(&self) -> Self {
        let inner = match &self.inner {
            CacheInner::Lru(lru) => CacheInner::Lru(lru.clone()),
            CacheInner::Lfu(lfu) => CacheInner::Lfu(lfu.clone()),
        };
        Cache { inner }
    }
}

impl<K, V> Cache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Eviction policy this cache was built with.
    pub fn policy(&self) -> CachePolicy {
        match &self.inner {
            CacheInner::Lru(_) => CachePolicy::Lru,
            CacheInner::Lfu(_) => CachePolicy::Lfu,
        }
    }

    /// Insert a key-value pair. Returns the previous value if the key existed.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.put(key, value),
            CacheInner::Lfu(lfu) => lfu.put(key, value),
        }
    }

    /// Get a clone of a value, recording the access with the policy.
    pub fn get(&self, key: &K) -> Option<V> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.get(key),
            CacheInner::Lfu(lfu) => lfu.get(key),
        }
    }

    /// Get a clone of a value without recording an access.
    pub fn peek(&self, key: &K) -> Option<V> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.peek(key),
            CacheInner::Lfu(lfu) => lfu.peek(key),
        }
    }

    pub fn contains(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(lru) => lru.contains(key),
            CacheInner::Lfu(lfu) => lfu.contains(key),
        }
    }

    /// Remove a key; returns whether it was present.
    pub fn remove(&self, key: &K) -> bool {
        match &self.inner {
            CacheInner::Lru(lru) => lru.remove(key),
            CacheInner::Lfu(lfu) => lfu.remove(key),
        }
    }

    /// Snapshot of resident keys (recency order for LRU, unordered for LFU).
    pub fn keys(&self) -> Vec<K> {
        match &self.inner {
            CacheInner::Lru(lru) => lru.keys(),
            CacheInner::Lfu(lfu) => lfu.keys(),
        }
    }

    pub fn len(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.len(),
            CacheInner::Lfu(lfu) => lfu.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        match &self.inner {
            CacheInner::Lru(lru) => lru.capacity(),
            CacheInner::Lfu(lfu) => lfu.capacity(),
        }
    }

    pub fn clear(&self) {
        match &self.inner {
            CacheInner::Lru(lru) => lru.clear(),
            CacheInner::Lfu(lfu) => lfu.clear(),
        }
    }
}

impl<K, V> ConcurrentCache for Cache<K, V>
where
    K: Send + Sync,
    V: Send + Sync,
{
}

/// Builder for creating cache instances.
#[derive(Debug, Clone, Copy)]
pub struct CacheBuilder {
    capacity: usize,
}

impl CacheBuilder {
    /// Create a new cache builder with the specified capacity.
    pub fn new(capacity: usize) -> Self {
        Self { capacity }
    }

    /// Build a cache with the specified policy.
    ///
    /// Fails with [`ConfigError`] when the capacity is 0.
    ///
    /// # Example
    ///
    /// ```rust
    /// use evictkit::builder::{CacheBuilder, CachePolicy};
    ///
    /// let lfu = CacheBuilder::new(2).build::<u64, u64>(CachePolicy::Lfu).unwrap();
    /// lfu.put(1, 10);
    /// lfu.put(2, 20);
    /// lfu.get(&1);
    /// lfu.put(3, 30);
    /// assert!(!lfu.contains(&2));
    /// ```
    pub fn build<K, V>(self, policy: CachePolicy) -> Result<Cache<K, V>, ConfigError>
    where
        K: Eq + Hash + Clone,
        V: Clone,
    {
        let capacity = non_zero_capacity(self.capacity)?;
        let inner = match policy {
            CachePolicy::Lru => CacheInner::Lru(LruCache::new(capacity)),
            CachePolicy::Lfu => CacheInner::Lfu(LfuCache::new(capacity)),
        };

        Ok(Cache { inner })
    }
}
