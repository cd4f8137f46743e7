//! # Cache Trait Hierarchy
//!
//! Unified interface for the eviction policies in this crate, shared by the
//! single-threaded cores ([`LruCore`](crate::policy::lru::LruCore),
//! [`LfuCore`](crate::policy::lfu::LfuCore)).
//!
//! ## Architecture
//!
//! ```text
//!                          ┌─────────────────────────────────────────┐
//!                          │            CoreCache<K, V>              │
//!                          │                                         │
//!                          │  insert(&mut, K, V) → Option<V>         │
//!                          │  get(&mut, &K) → Option<&V>             │
//!                          │  peek(&, &K) → Option<&V>               │
//!                          │  contains(&, &K) → bool                 │
//!                          │  len / is_empty / capacity / clear      │
//!                          └──────────────────┬──────────────────────┘
//!                                             │
//!                                             ▼
//!                          ┌─────────────────────────────────────────┐
//!                          │          MutableCache<K, V>             │
//!                          │  remove(&K) → Option<V>                 │
//!                          └──────────────────┬──────────────────────┘
//!                                             │
//!                 ┌───────────────────────────┴───────────────────────────┐
//!                 ▼                                                       ▼
//!   ┌────────────────────────────┐                          ┌────────────────────────────┐
//!   │   LruCacheTrait<K, V>      │                          │   LfuCacheTrait<K, V>      │
//!   │                            │                          │                            │
//!   │  pop_lru() → (K, V)        │                          │  pop_lfu() → (K, V)        │
//!   │  peek_lru() → (&K, &V)     │                          │  peek_lfu() → (&K, &V)     │
//!   │  touch(&K) → bool          │                          │  frequency(&K) → u64       │
//!   │  recency_rank(&K) → usize  │                          │  min_frequency() → u64     │
//!   └────────────────────────────┘                          └────────────────────────────┘
//! ```
//!
//! ## Trait Summary
//!
//! | Trait             | Extends        | Purpose                              |
//! |-------------------|----------------|--------------------------------------|
//! | `CoreCache`       | -              | Universal cache operations           |
//! | `MutableCache`    | `CoreCache`    | Adds arbitrary key removal           |
//! | `LruCacheTrait`   | `MutableCache` | LRU-specific with recency tracking   |
//! | `LfuCacheTrait`   | `MutableCache` | LFU-specific with frequency tracking |
//! | `ConcurrentCache` | `Send + Sync`  | Marker for thread-safe caches        |
//!
//! ## Thread Safety
//!
//! The cores are **not** thread-safe; they need `&mut self` for every
//! operation that reorders entries. The thread-safe wrappers
//! ([`LruCache`](crate::policy::lru::LruCache),
//! [`LfuCache`](crate::policy::lfu::LfuCache)) implement [`ConcurrentCache`]
//! and expose an owned-value API instead of these traits.

/// Core cache operations that all caches support.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use evictkit::policy::lru::LruCore;
/// use evictkit::traits::CoreCache;
///
/// fn warm_cache<C: CoreCache<u64, String>>(cache: &mut C, data: &[(u64, String)]) {
///     for (key, value) in data {
///         cache.insert(*key, value.clone());
///     }
/// }
///
/// let mut cache = LruCore::new(NonZeroUsize::new(100).unwrap());
/// warm_cache(&mut cache, &[(1, "one".to_string()), (2, "two".to_string())]);
/// assert_eq!(cache.len(), 2);
/// ```
pub trait CoreCache<K, V> {
    /// Inserts a key-value pair, returning the previous value if it existed.
    ///
    /// If the key is new and the cache is at capacity, one entry is evicted
    /// according to the cache's policy first. Updating an existing key counts
    /// as an access.
    fn insert(&mut self, key: K, value: V) -> Option<V>;

    /// Gets a reference to a value by key, recording the access.
    ///
    /// Use [`peek`](Self::peek) or [`contains`](Self::contains) to read
    /// without affecting eviction order.
    fn get(&mut self, key: &K) -> Option<&V>;

    /// Gets a reference to a value without recording an access.
    fn peek(&self, key: &K) -> Option<&V>;

    /// Checks if a key exists without updating access state.
    fn contains(&self, key: &K) -> bool;

    /// Returns the current number of entries in the cache.
    fn len(&self) -> usize;

    /// Returns `true` if the cache contains no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum capacity of the cache.
    fn capacity(&self) -> usize;

    /// Removes all entries from the cache. Capacity is preserved.
    fn clear(&mut self);
}

/// Caches that support arbitrary key-based removal.
///
/// # Example
///
/// ```
/// use std::num::NonZeroUsize;
///
/// use evictkit::policy::lfu::LfuCore;
/// use evictkit::traits::{CoreCache, MutableCache};
///
/// fn invalidate_keys<C: MutableCache<u64, String>>(cache: &mut C, keys: &[u64]) {
///     for key in keys {
///         cache.remove(key);
///     }
/// }
///
/// let mut cache = LfuCore::new(NonZeroUsize::new(100).unwrap());
/// cache.insert(1, "one".to_string());
/// cache.insert(2, "two".to_string());
/// cache.insert(3, "three".to_string());
///
/// invalidate_keys(&mut cache, &[1, 3]);
/// assert!(!cache.contains(&1));
/// assert!(cache.contains(&2));
/// assert!(!cache.contains(&3));
/// ```
pub trait MutableCache<K, V>: CoreCache<K, V> {
    /// Removes a specific key, returning its value if it was present.
    fn remove(&mut self, key: &K) -> Option<V>;

    /// Removes multiple keys. The default implementation loops over
    /// [`remove`](Self::remove).
    fn remove_batch(&mut self, keys: &[K]) -> Vec<Option<V>> {
        keys.iter().map(|key| self.remove(key)).collect()
    }
}

/// LRU-specific operations.
pub trait LruCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the least recently used entry.
    fn pop_lru(&mut self) -> Option<(K, V)>;

    /// Returns the least recently used entry without removing it.
    fn peek_lru(&self) -> Option<(&K, &V)>;

    /// Marks `key` as most recently used; returns `false` if absent.
    fn touch(&mut self, key: &K) -> bool;

    /// Returns the position of `key` in recency order (0 = most recent).
    fn recency_rank(&self, key: &K) -> Option<usize>;
}

/// LFU-specific operations.
pub trait LfuCacheTrait<K, V>: MutableCache<K, V> {
    /// Removes and returns the eviction candidate: the least recently touched
    /// entry among those with the lowest frequency.
    fn pop_lfu(&mut self) -> Option<(K, V)>;

    /// Returns the eviction candidate without removing it.
    fn peek_lfu(&self) -> Option<(&K, &V)>;

    /// Returns the access frequency of `key`.
    fn frequency(&self, key: &K) -> Option<u64>;

    /// Returns the lowest frequency among resident entries.
    fn min_frequency(&self) -> Option<u64>;
}

/// Marker trait for caches that are safe to share across threads.
pub trait ConcurrentCache: Send + Sync {}
