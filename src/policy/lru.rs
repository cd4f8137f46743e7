//! # Least Recently Used (LRU) Cache Implementation
//!
//! A bounded cache that evicts the entry whose last access is oldest. Order
//! is kept in an [`OrderedList`] whose front is the most recently used entry;
//! a hash index maps each key to its list node.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                          LruCache<K, V>                                  │
//!   │                                                                          │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │                    Arc<RwLock<LruCore<K, V>>>                      │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   │                                  │                                       │
//!   │                                  ▼                                       │
//!   │   ┌────────────────────────────────────────────────────────────────────┐ │
//!   │   │                         LruCore<K, V>                              │ │
//!   │   │                                                                    │ │
//!   │   │   index: FxHashMap<K, NodeRef>                                     │ │
//!   │   │     key_a ─────────┐   key_b ───────────────┐                      │ │
//!   │   │                    ▼                        ▼                      │ │
//!   │   │   list: OrderedList<LruEntry<K, V>>                                │ │
//!   │   │   head ──► ┌──────┐ ◄──► ┌──────┐ ◄──► ┌──────┐ ◄── tail           │ │
//!   │   │     (MRU)  │key_a │      │key_b │      │key_c │   (LRU)            │ │
//!   │   │            │value │      │value │      │value │                    │ │
//!   │   │            └──────┘      └──────┘      └──────┘                    │ │
//!   │   └────────────────────────────────────────────────────────────────────┘ │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## LRU Operations Flow
//!
//! ```text
//!   INSERT new item (cache full)
//!   ═══════════════════════════════════════════════════════════════════════════
//!
//!   Before:
//!     head ──► [A] ◄──► [B] ◄──► [C] ◄── tail    (capacity = 3)
//!              MRU                LRU
//!
//!   insert(D):
//!     1. Evict [C] from tail, drop its index entry
//!     2. Push [D] at head
//!
//!   After:
//!     head ──► [D] ◄──► [A] ◄──► [B] ◄── tail
//!
//!   ═══════════════════════════════════════════════════════════════════════════
//!
//!   ACCESS existing item
//!   ═══════════════════════════════════════════════════════════════════════════
//!
//!   get(B):
//!     1. Find B's NodeRef in the index: O(1)
//!     2. Relink the node at head: O(1), no allocation
//!
//!   After:
//!     head ──► [B] ◄──► [A] ◄──► [C] ◄── tail
//! ```
//!
//! ## LruCache Methods
//!
//! | Method               | Lock Type | Description                          |
//! |----------------------|-----------|--------------------------------------|
//! | `new(capacity)`      | None      | Create cache (`NonZeroUsize`)        |
//! | `try_new(capacity)`  | None      | Create cache, `ConfigError` on 0     |
//! | `put(k, v)`          | Write     | Insert or update, may evict LRU      |
//! | `get(&k)`            | Write     | Clone value + move to MRU            |
//! | `peek(&k)`           | Read      | Clone value without reordering       |
//! | `contains(&k)`       | Read      | Check key existence                  |
//! | `remove(&k)`         | Write     | Remove entry                         |
//! | `keys()`             | Read      | Keys from MRU to LRU                 |
//! | `touch(&k)`          | Write     | Move to MRU                          |
//! | `pop_lru()`          | Write     | Evict LRU entry                      |
//! | `peek_lru()`         | Read      | Peek at LRU                          |
//! | `len()` / `capacity()` | Read    | Size accessors                       |
//! | `clear()`            | Write     | Remove all entries                   |
//!
//! ## Concurrency Model
//!
//! `get` reorders the list, so it takes the write lock for its entire
//! duration. There is no read-then-upgrade path: a lookup and the promotion
//! it triggers are one critical section, so another thread can never evict
//! the node in between.
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::lru::LruCache;
//!
//! let cache: LruCache<u32, String> = LruCache::try_new(3).unwrap();
//! cache.put(1, "one".to_string());
//! cache.put(2, "two".to_string());
//! cache.put(3, "three".to_string());
//! assert_eq!(cache.keys(), vec![3, 2, 1]);
//!
//! assert_eq!(cache.get(&1), Some("one".to_string()));
//! assert_eq!(cache.keys(), vec![1, 3, 2]);
//!
//! cache.put(4, "four".to_string()); // evicts 2
//! assert_eq!(cache.keys(), vec![4, 1, 3]);
//! ```

use std::fmt;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::ds::{NodeRef, OrderedList};
use crate::error::{ConfigError, InvariantError, non_zero_capacity};
#[cfg(feature = "metrics")]
use crate::metrics::metrics_impl::LruMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LruMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsReadRecorder, CoreMetricsRecorder, LruMetricsReadRecorder, LruMetricsRecorder,
    MetricsSnapshotProvider,
};
use crate::policy::MAX_PREALLOC;
use crate::traits::{ConcurrentCache, CoreCache, LruCacheTrait, MutableCache};

#[derive(Debug)]
struct LruEntry<K, V> {
    key: K,
    value: V,
}

/// Single-threaded LRU cache core.
///
/// Front of the list is the most recently used entry, back is the eviction
/// candidate. Every resident key maps to exactly one list node.
pub struct LruCore<K, V> {
    index: FxHashMap<K, NodeRef>,
    list: OrderedList<LruEntry<K, V>>,
    capacity: NonZeroUsize,
    #[cfg(feature = "metrics")]
    metrics: LruMetrics,
}

impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a new LRU cache core with the given capacity.
    ///
    /// # Example
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use evictkit::policy::lru::LruCore;
    /// use evictkit::traits::CoreCache;
    ///
    /// let cache: LruCore<u32, String> = LruCore::new(NonZeroUsize::new(100).unwrap());
    /// assert_eq!(cache.capacity(), 100);
    /// ```
    pub fn new(capacity: NonZeroUsize) -> Self {
        let reserve = capacity.get().min(MAX_PREALLOC);
        LruCore {
            index: FxHashMap::with_capacity_and_hasher(reserve, Default::default()),
            list: OrderedList::with_capacity(reserve),
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LruMetrics::default(),
        }
    }

    /// Creates a new LRU cache core, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        non_zero_capacity(capacity).map(Self::new)
    }

    /// Returns the keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        self.list.iter().map(|entry| entry.key.clone()).collect()
    }

    /// Iterates `(key, value)` pairs from most to least recently used.
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> {
        self.list.iter().map(|entry| (&entry.key, &entry.value))
    }

    fn evict_lru(&mut self) -> Option<(K, V)> {
        let entry = self.list.pop_back()?;
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Verifies that the index and the recency list describe the same entries.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        self.list.check_invariants()?;

        if self.index.len() != self.list.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but recency list holds {} nodes",
                self.index.len(),
                self.list.len()
            )));
        }
        if self.list.len() > self.capacity.get() {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                self.list.len(),
                self.capacity
            )));
        }
        for (rank, node) in self.list.iter_refs().enumerate() {
            let entry = self.list.get(node).ok_or_else(|| {
                InvariantError::new(format!("recency list node at rank {} is unreadable", rank))
            })?;
            if self.index.get(&entry.key) != Some(&node) {
                return Err(InvariantError::new(format!(
                    "index does not point at the list node at rank {}",
                    rank
                )));
            }
        }
        Ok(())
    }
}

impl<K, V> CoreCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(&node) = self.index.get(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            let previous = self
                .list
                .get_mut(node)
                .map(|entry| std::mem::replace(&mut entry.value, value));
            self.list.move_to_front(node);
            return previous;
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.list.len() >= self.capacity.get() {
            #[cfg(feature = "metrics")]
            self.metrics.record_evict_call();

            if let Some((_key, _value)) = self.evict_lru() {
                #[cfg(feature = "metrics")]
                self.metrics.record_evicted_entry();
            }
        }

        let node = self.list.push_front(LruEntry {
            key: key.clone(),
            value,
        });
        self.index.insert(key, node);

        debug_assert_eq!(self.index.len(), self.list.len());
        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let node = match self.index.get(key) {
            Some(&node) => node,
            None => {
                #[cfg(feature = "metrics")]
                self.metrics.record_get_miss();
                return None;
            },
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.list.move_to_front(node);
        self.list.get(node).map(|entry| &entry.value)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_call();

        let node = *self.index.get(key)?;
        let value = self.list.get(node).map(|entry| &entry.value);

        #[cfg(feature = "metrics")]
        if value.is_some() {
            self.metrics.record_peek_found();
        }

        value
    }

    fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    fn len(&self) -> usize {
        self.index.len()
    }

    fn capacity(&self) -> usize {
        self.capacity.get()
    }

    fn clear(&mut self) {
        #[cfg(feature = "metrics")]
        self.metrics.record_clear();

        self.index.clear();
        self.list.clear();
    }
}

impl<K, V> MutableCache<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let node = self.index.remove(key)?;
        let entry = self.list.remove(node)?;

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();

        Some(entry.value)
    }
}

impl<K, V> LruCacheTrait<K, V> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lru(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lru_call();

        let popped = self.evict_lru();

        #[cfg(feature = "metrics")]
        if popped.is_some() {
            self.metrics.record_pop_lru_found();
        }

        popped
    }

    fn peek_lru(&self) -> Option<(&K, &V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lru_call();

        let entry = self.list.back_value()?;

        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lru_found();

        Some((&entry.key, &entry.value))
    }

    fn touch(&mut self, key: &K) -> bool {
        #[cfg(feature = "metrics")]
        self.metrics.record_touch_call();

        let Some(&node) = self.index.get(key) else {
            return false;
        };
        let moved = self.list.move_to_front(node);

        #[cfg(feature = "metrics")]
        if moved {
            self.metrics.record_touch_found();
        }

        moved
    }

    fn recency_rank(&self, key: &K) -> Option<usize> {
        #[cfg(feature = "metrics")]
        self.metrics.record_recency_rank_call();

        let &target = self.index.get(key)?;
        for (rank, node) in self.list.iter_refs().enumerate() {
            #[cfg(feature = "metrics")]
            self.metrics.record_recency_rank_scan_step();

            if node == target {
                #[cfg(feature = "metrics")]
                self.metrics.record_recency_rank_found();
                return Some(rank);
            }
        }
        None
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        LruMetricsSnapshot {
            get_calls: self.metrics.get_calls,
            get_hits: self.metrics.get_hits,
            get_misses: self.metrics.get_misses,
            insert_calls: self.metrics.insert_calls,
            insert_updates: self.metrics.insert_updates,
            insert_new: self.metrics.insert_new,
            evict_calls: self.metrics.evict_calls,
            evicted_entries: self.metrics.evicted_entries,
            remove_calls: self.metrics.remove_calls,
            remove_found: self.metrics.remove_found,
            clear_calls: self.metrics.clear_calls,
            peek_calls: self.metrics.peek_calls.get(),
            peek_found: self.metrics.peek_found.get(),
            pop_lru_calls: self.metrics.pop_lru_calls,
            pop_lru_found: self.metrics.pop_lru_found,
            peek_lru_calls: self.metrics.peek_lru_calls.get(),
            peek_lru_found: self.metrics.peek_lru_found.get(),
            touch_calls: self.metrics.touch_calls,
            touch_found: self.metrics.touch_found,
            recency_rank_calls: self.metrics.recency_rank_calls.get(),
            recency_rank_found: self.metrics.recency_rank_found.get(),
            recency_rank_scan_steps: self.metrics.recency_rank_scan_steps.get(),
            cache_len: self.index.len(),
            capacity: self.capacity.get(),
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for LruCore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCore")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LruCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Thread-safe LRU cache.
///
/// Composes an [`LruCore`] with a `parking_lot::RwLock`. Cloning the handle
/// shares the same underlying cache. All accessors return clones of stored
/// keys and values; internal nodes are never exposed.
pub struct LruCache<K, V> {
    inner: Arc<RwLock<LruCore<K, V>>>,
}

impl<K, V> Clone for LruCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for LruCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("LruCache")
            .field("len", &cache.index.len())
            .field("capacity", &cache.capacity)
            .finish_non_exhaustive()
    }
}

impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a new thread-safe LRU cache with the given capacity.
    pub fn new(capacity: NonZeroUsize) -> Self {
        LruCache {
            inner: Arc::new(RwLock::new(LruCore::new(capacity))),
        }
    }

    /// Creates a new thread-safe LRU cache, rejecting a zero capacity.
    ///
    /// # Example
    ///
    /// ```
    /// use evictkit::policy::lru::LruCache;
    ///
    /// let cache: LruCache<u32, String> = LruCache::try_new(100).unwrap();
    /// assert_eq!(cache.capacity(), 100);
    /// assert!(cache.is_empty());
    ///
    /// assert!(LruCache::<u32, String>::try_new(0).is_err());
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        non_zero_capacity(capacity).map(Self::new)
    }

    /// Inserts or updates `key`, marking it most recently used.
    ///
    /// Returns the previous value if the key existed. Inserting a new key
    /// into a full cache evicts the least recently used entry first.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let mut cache = self.inner.write();
        cache.insert(key, value)
    }

    /// Returns a clone of the value for `key` and marks it most recently used.
    ///
    /// Takes the write lock for the whole lookup and promotion.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.write();
        cache.get(key).cloned()
    }

    /// Returns a clone of the value for `key` without changing recency order.
    pub fn peek(&self, key: &K) -> Option<V> {
        let cache = self.inner.read();
        cache.peek(key).cloned()
    }

    /// Returns `true` if `key` is resident. Does not change recency order.
    pub fn contains(&self, key: &K) -> bool {
        let cache = self.inner.read();
        cache.contains(key)
    }

    /// Removes `key`; returns whether it was present.
    pub fn remove(&self, key: &K) -> bool {
        let mut cache = self.inner.write();
        cache.remove(key).is_some()
    }

    /// Moves `key` to the most recently used position without reading it.
    pub fn touch(&self, key: &K) -> bool {
        let mut cache = self.inner.write();
        cache.touch(key)
    }

    /// Removes and returns the least recently used entry.
    pub fn pop_lru(&self) -> Option<(K, V)> {
        let mut cache = self.inner.write();
        cache.pop_lru()
    }

    /// Returns the least recently used entry without removing it.
    pub fn peek_lru(&self) -> Option<(K, V)> {
        let cache = self.inner.read();
        cache.peek_lru().map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Returns the position of `key` in recency order (0 = most recent).
    pub fn recency_rank(&self, key: &K) -> Option<usize> {
        let cache = self.inner.read();
        cache.recency_rank(key)
    }

    /// Snapshot of keys from most to least recently used.
    pub fn keys(&self) -> Vec<K> {
        let cache = self.inner.read();
        cache.keys()
    }

    /// Removes every entry. Capacity is unchanged.
    pub fn clear(&self) {
        let mut cache = self.inner.write();
        cache.clear();
    }

    pub fn len(&self) -> usize {
        let cache = self.inner.read();
        cache.len()
    }

    pub fn is_empty(&self) -> bool {
        let cache = self.inner.read();
        cache.is_empty()
    }

    pub fn capacity(&self) -> usize {
        let cache = self.inner.read();
        cache.capacity()
    }

    /// Runs [`LruCore::check_invariants`] under the read lock.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let cache = self.inner.read();
        cache.check_invariants()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn metrics_snapshot(&self) -> LruMetricsSnapshot {
        let cache = self.inner.read();
        cache.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LruMetricsSnapshot> for LruCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn snapshot(&self) -> LruMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> ConcurrentCache for LruCache<K, V>
where
    K: Send + Sync,
    V: Send + Sync,
{
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core<V>(capacity: usize) -> LruCore<i32, V> {
        LruCore::try_new(capacity).unwrap()
    }

    // ==============================================
    // CORRECTNESS TESTS MODULE
    // ==============================================
    mod correctness {
        use super::*;

        mod basic_behavior {
            use super::*;

            #[test]
            fn test_new_cache_creation() {
                let cache: LruCore<i32, i32> = core(10);
                assert_eq!(cache.capacity(), 10);
                assert_eq!(cache.len(), 0);
                assert!(cache.is_empty());
            }

            #[test]
            fn test_zero_capacity_is_rejected() {
                let err = LruCore::<i32, i32>::try_new(0).unwrap_err();
                assert!(err.message().contains("capacity"));
                assert!(LruCache::<i32, i32>::try_new(0).is_err());
            }

            #[test]
            fn test_insert_and_get() {
                let mut cache = core(5);
                assert_eq!(cache.insert(1, 100), None);
                assert_eq!(cache.get(&1), Some(&100));
                assert_eq!(cache.get(&2), None);
                assert_eq!(cache.len(), 1);
            }

            #[test]
            fn test_insert_existing_returns_previous() {
                let mut cache = core(5);
                cache.insert(1, "a");
                assert_eq!(cache.insert(1, "b"), Some("a"));
                assert_eq!(cache.peek(&1), Some(&"b"));
                assert_eq!(cache.len(), 1);
            }

            #[test]
            fn test_remove_existing_and_missing() {
                let mut cache = core(5);
                cache.insert(1, 10);
                assert_eq!(cache.remove(&1), Some(10));
                assert_eq!(cache.remove(&1), None);
                assert!(!cache.contains(&1));
                assert!(cache.is_empty());
            }

            #[test]
            fn test_clear_preserves_capacity() {
                let mut cache = core(3);
                cache.insert(1, 1);
                cache.insert(2, 2);
                cache.clear();
                assert!(cache.is_empty());
                assert_eq!(cache.capacity(), 3);
                assert!(cache.keys().is_empty());

                cache.insert(3, 3);
                assert_eq!(cache.keys(), vec![3]);
                cache.check_invariants().unwrap();
            }
        }

        mod lru_operations {
            use super::*;

            #[test]
            fn test_keys_follow_recency_order() {
                let mut cache = core(3);
                cache.insert(1, "one");
                cache.insert(2, "two");
                cache.insert(3, "three");
                assert_eq!(cache.keys(), vec![3, 2, 1]);

                cache.get(&1);
                assert_eq!(cache.keys(), vec![1, 3, 2]);

                cache.insert(4, "four");
                assert_eq!(cache.keys(), vec![4, 1, 3]);
                assert!(!cache.contains(&2));
            }

            #[test]
            fn test_update_promotes_to_front() {
                let mut cache = core(3);
                cache.insert(1, 1);
                cache.insert(2, 2);
                cache.insert(3, 3);
                cache.insert(1, 10);
                assert_eq!(cache.keys(), vec![1, 3, 2]);

                cache.insert(4, 4);
                assert!(!cache.contains(&2));
                assert_eq!(cache.peek(&1), Some(&10));
            }

            #[test]
            fn test_peek_does_not_update_order() {
                let mut cache = core(3);
                cache.insert(1, 1);
                cache.insert(2, 2);
                cache.insert(3, 3);
                let before = cache.keys();
                for _ in 0..5 {
                    assert_eq!(cache.peek(&1), Some(&1));
                    assert!(cache.contains(&1));
                }
                assert_eq!(cache.keys(), before);

                cache.insert(4, 4);
                assert!(!cache.contains(&1));
            }

            #[test]
            fn test_each_new_key_at_capacity_evicts_exactly_one() {
                let mut cache = core(4);
                for i in 0..4 {
                    cache.insert(i, i);
                }
                for i in 4..20 {
                    let before: Vec<_> = cache.keys();
                    cache.insert(i, i);
                    assert_eq!(cache.len(), 4);
                    let evicted: Vec<_> =
                        before.iter().filter(|k| !cache.contains(k)).copied().collect();
                    assert_eq!(evicted, vec![*before.last().unwrap()]);
                }
            }

            #[test]
            fn test_touch_and_pop_lru() {
                let mut cache = core(3);
                cache.insert(1, 'a');
                cache.insert(2, 'b');
                cache.insert(3, 'c');

                assert!(cache.touch(&1));
                assert!(!cache.touch(&9));
                assert_eq!(cache.peek_lru(), Some((&2, &'b')));
                assert_eq!(cache.pop_lru(), Some((2, 'b')));
                assert_eq!(cache.pop_lru(), Some((3, 'c')));
                assert_eq!(cache.pop_lru(), Some((1, 'a')));
                assert_eq!(cache.pop_lru(), None);
                assert_eq!(cache.peek_lru(), None);
            }

            #[test]
            fn test_recency_rank() {
                let mut cache = core(4);
                cache.insert(1, ());
                cache.insert(2, ());
                cache.insert(3, ());
                assert_eq!(cache.recency_rank(&3), Some(0));
                assert_eq!(cache.recency_rank(&1), Some(2));
                cache.get(&1);
                assert_eq!(cache.recency_rank(&1), Some(0));
                assert_eq!(cache.recency_rank(&3), Some(1));
                assert_eq!(cache.recency_rank(&42), None);
            }

            #[test]
            fn test_iter_matches_keys() {
                let mut cache = core(3);
                cache.extend([(1, 10), (2, 20), (3, 30)]);
                let pairs: Vec<_> = cache.iter().map(|(k, v)| (*k, *v)).collect();
                assert_eq!(pairs, vec![(3, 30), (2, 20), (1, 10)]);
            }
        }

        mod edge_cases {
            use super::*;

            #[test]
            fn test_single_capacity_cache() {
                let mut cache = core(1);
                cache.insert(1, 1);
                cache.insert(2, 2);
                assert_eq!(cache.keys(), vec![2]);
                assert_eq!(cache.get(&1), None);
                cache.insert(2, 3);
                assert_eq!(cache.get(&2), Some(&3));
                cache.check_invariants().unwrap();
            }

            #[test]
            fn test_huge_capacity_does_not_preallocate() {
                let mut cache: LruCore<i32, i32> = LruCore::try_new(usize::MAX).unwrap();
                assert_eq!(cache.capacity(), usize::MAX);
                for i in 0..10 {
                    cache.insert(i, i);
                }
                assert_eq!(cache.len(), 10);
                assert_eq!(cache.get(&3), Some(&3));
                cache.check_invariants().unwrap();

                let shared: LruCache<u32, u32> = LruCache::try_new(usize::MAX).unwrap();
                shared.put(1, 1);
                assert_eq!(shared.get(&1), Some(1));
                assert_eq!(shared.capacity(), usize::MAX);
            }

            #[test]
            fn test_remove_head_and_tail() {
                let mut cache = core(4);
                for i in 1..=4 {
                    cache.insert(i, i);
                }
                assert_eq!(cache.remove(&4), Some(4));
                assert_eq!(cache.remove(&1), Some(1));
                assert_eq!(cache.keys(), vec![3, 2]);
                cache.check_invariants().unwrap();
            }

            #[test]
            fn test_reinsert_after_remove_goes_to_front() {
                let mut cache = core(3);
                cache.insert(1, 1);
                cache.insert(2, 2);
                cache.remove(&1);
                cache.insert(1, 11);
                assert_eq!(cache.keys(), vec![1, 2]);
                assert_eq!(cache.peek(&1), Some(&11));
            }

            #[test]
            fn test_remove_batch() {
                let mut cache = core(4);
                cache.extend([(1, 'a'), (2, 'b'), (3, 'c')]);
                let removed = cache.remove_batch(&[1, 9, 3]);
                assert_eq!(removed, vec![Some('a'), None, Some('c')]);
                assert_eq!(cache.keys(), vec![2]);
            }

            #[test]
            fn test_string_keys() {
                let mut cache: LruCore<String, usize> = LruCore::try_new(2).unwrap();
                cache.insert("alpha".to_string(), 1);
                cache.insert("beta".to_string(), 2);
                cache.get(&"alpha".to_string());
                cache.insert("gamma".to_string(), 3);
                assert!(!cache.contains(&"beta".to_string()));
                assert_eq!(cache.keys(), vec!["gamma".to_string(), "alpha".to_string()]);
            }
        }

        mod state_consistency {
            use super::*;

            #[test]
            fn test_invariants_hold_through_mixed_workload() {
                let mut cache = core(8);
                for i in 0..200 {
                    match i % 5 {
                        0 | 1 => {
                            cache.insert(i % 13, i);
                        },
                        2 => {
                            cache.get(&(i % 7));
                        },
                        3 => {
                            cache.remove(&(i % 11));
                        },
                        _ => {
                            cache.touch(&(i % 5));
                        },
                    }
                    cache.check_invariants().unwrap();
                    assert!(cache.len() <= cache.capacity());
                }
            }

            #[test]
            fn test_peek_and_get_agree() {
                let mut cache = core(4);
                cache.extend((0..6).map(|i| (i, i * 100)));
                for key in cache.keys() {
                    let peeked = cache.peek(&key).copied();
                    let got = cache.get(&key).copied();
                    assert_eq!(peeked, got);
                }
            }
        }
    }

    // ==============================================
    // CONCURRENT WRAPPER TESTS
    // ==============================================
    mod concurrent {
        use std::thread;

        use super::*;

        #[test]
        fn test_concurrent_cache_basic() {
            let cache: LruCache<i32, String> = LruCache::try_new(3).unwrap();
            assert_eq!(cache.put(1, "one".to_string()), None);
            assert_eq!(cache.put(1, "uno".to_string()), Some("one".to_string()));
            assert_eq!(cache.get(&1), Some("uno".to_string()));
            assert_eq!(cache.peek(&2), None);
            assert!(cache.contains(&1));
            assert!(cache.remove(&1));
            assert!(!cache.remove(&1));
            assert!(cache.is_empty());
        }

        #[test]
        fn test_recency_order_sequence() {
            let cache = LruCache::new(NonZeroUsize::new(3).unwrap());
            cache.put(1, 'a');
            cache.put(2, 'b');
            cache.put(3, 'c');
            assert_eq!(cache.keys(), vec![3, 2, 1]);
            assert_eq!(cache.get(&1), Some('a'));
            assert_eq!(cache.keys(), vec![1, 3, 2]);
            cache.put(4, 'd');
            assert_eq!(cache.keys(), vec![4, 1, 3]);
            assert_eq!(cache.peek_lru(), Some((3, 'c')));
        }

        #[test]
        fn test_clone_shares_state() {
            let cache: LruCache<u8, u8> = LruCache::try_new(2).unwrap();
            let other = cache.clone();
            other.put(1, 1);
            assert_eq!(cache.get(&1), Some(1));
            cache.clear();
            assert!(other.is_empty());
            assert_eq!(other.capacity(), 2);
        }

        #[test]
        fn test_concurrent_mixed_operations_keep_invariants() {
            let cache: LruCache<u32, u32> = LruCache::try_new(32).unwrap();
            let handles: Vec<_> = (0..8u32)
                .map(|t| {
                    let cache = cache.clone();
                    thread::spawn(move || {
                        for i in 0..2_000u32 {
                            let key = (i * 7 + t) % 64;
                            match i % 4 {
                                0 | 1 => {
                                    cache.put(key, i);
                                },
                                2 => {
                                    cache.get(&key);
                                },
                                _ => {
                                    cache.remove(&key);
                                },
                            }
                        }
                    })
                })
                .collect();
            for handle in handles {
                handle.join().unwrap();
            }

            assert!(cache.len() <= cache.capacity());
            cache.check_invariants().unwrap();
        }

        #[test]
        fn test_concurrent_cache_is_send_sync() {
            fn assert_concurrent<C: ConcurrentCache>() {}
            assert_concurrent::<LruCache<u64, String>>();
        }
    }

    #[cfg(feature = "metrics")]
    mod metrics {
        use super::*;

        #[test]
        fn test_metrics_track_hits_misses_and_evictions() {
            let mut cache = core(2);
            cache.insert(1, 1);
            cache.insert(2, 2);
            cache.insert(1, 11);
            cache.get(&1);
            cache.get(&9);
            cache.insert(3, 3);
            cache.peek(&3);

            let snapshot = cache.metrics_snapshot();
            assert_eq!(snapshot.insert_calls, 4);
            assert_eq!(snapshot.insert_updates, 1);
            assert_eq!(snapshot.insert_new, 3);
            assert_eq!(snapshot.get_hits, 1);
            assert_eq!(snapshot.get_misses, 1);
            assert_eq!(snapshot.evicted_entries, 1);
            assert_eq!(snapshot.peek_calls, 1);
            assert_eq!(snapshot.peek_found, 1);
            assert_eq!(snapshot.cache_len, 2);
            assert_eq!(snapshot.capacity, 2);
        }
    }
}
