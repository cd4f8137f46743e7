//! # Least Frequently Used (LFU) Cache Implementation
//!
//! Evicts the entry with the fewest accesses; among entries with the same
//! access count, the least recently touched one goes first.
//!
//! ## Architecture
//!
//! ```text
//!   ┌──────────────────────────────────────────────────────────────────────────┐
//!   │                            LfuCore<K, V>                                 │
//!   │                                                                          │
//!   │   index: FxHashMap<K, BucketSlot>        BucketSlot = { freq, node }     │
//!   │                                                                          │
//!   │   buckets: FxHashMap<u64, OrderedList<LfuEntry<K, V>>>                   │
//!   │                                                                          │
//!   │     freq=1  head ──► [E] ◄──► [D] ◄── tail   ◄── min_freq (evict D)      │
//!   │     freq=3  head ──► [B] ◄── tail                                        │
//!   │     freq=7  head ──► [A] ◄──► [C] ◄── tail                               │
//!   │                                                                          │
//!   │   Front of a bucket = most recently promoted, back = eviction candidate  │
//!   └──────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Operations Flow
//!
//! ```text
//!   get(D) with D at freq=1
//!   ═══════════════════════════════════════════════════════════════════════════
//!     1. Remove D's node from bucket 1 (entry moves out, nothing cloned)
//!     2. D.freq = 2, push D to the FRONT of bucket 2 (created on demand)
//!     3. Bucket 1 still holds E, so min_freq stays 1
//!
//!   put(F) on a full cache
//!   ═══════════════════════════════════════════════════════════════════════════
//!     1. Pop the BACK of bucket min_freq, drop its index entry
//!     2. Drop the bucket if empty, advance min_freq to the next bucket
//!     3. Push F to the front of bucket 1, min_freq = 1
//! ```
//!
//! Buckets are kept sparse: a bucket exists only while it holds at least one
//! entry. Frequencies never decay; they saturate at `u64::MAX`, after which a
//! promotion only refreshes the entry's position inside its bucket.
//!
//! ## LfuCache Methods
//!
//! | Method               | Lock Type | Description                          |
//! |----------------------|-----------|--------------------------------------|
//! | `put(k, v)`          | Write     | Insert or update (update = access)   |
//! | `get(&k)`            | Write     | Clone value + bump frequency         |
//! | `peek(&k)`           | Read      | Clone value, no frequency change     |
//! | `get_frequency(&k)`  | Read      | Current access count                 |
//! | `contains(&k)`       | Read      | Check key existence                  |
//! | `remove(&k)`         | Write     | Remove entry                         |
//! | `pop_lfu()`          | Write     | Evict the LFU entry                  |
//! | `peek_lfu()`         | Read      | Peek at the LFU entry                |
//! | `keys()`             | Read      | Unordered key snapshot               |
//! | `clear()`            | Write     | Remove all entries                   |
//!
//! ## Example Usage
//!
//! ```
//! use evictkit::policy::lfu::LfuCache;
//!
//! let cache: LfuCache<u32, u32> = LfuCache::try_new(2).unwrap();
//! cache.put(1, 100);
//! cache.put(2, 200);
//! cache.get(&1);
//! cache.put(3, 300); // evicts 2 (freq 1)
//!
//! assert!(cache.contains(&1));
//! assert!(!cache.contains(&2));
//! assert_eq!(cache.get_frequency(&1), Some(2));
//! assert_eq!(cache.get_frequency(&3), Some(1));
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
use crate::metrics::metrics_impl::LfuMetrics;
#[cfg(feature = "metrics")]
use crate::metrics::snapshot::LfuMetricsSnapshot;
#[cfg(feature = "metrics")]
use crate::metrics::traits::{
    CoreMetricsReadRecorder, CoreMetricsRecorder, LfuMetricsReadRecorder, LfuMetricsRecorder,
    MetricsSnapshotProvider,
};
use crate::policy::MAX_PREALLOC;
use crate::traits::{ConcurrentCache, CoreCache, LfuCacheTrait, MutableCache};

#[derive(Debug)]
struct LfuEntry<K, V> {
    key: K,
    value: V,
    freq: u64,
}

/// Where a resident key lives: its bucket and its node inside that bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct BucketSlot {
    freq: u64,
    node: NodeRef,
}

/// Single-threaded LFU cache core with LRU tie-breaking.
pub struct LfuCore<K, V> {
    index: FxHashMap<K, BucketSlot>,
    buckets: FxHashMap<u64, OrderedList<LfuEntry<K, V>>>,
    min_freq: u64,
    capacity: NonZeroUsize,
    #[cfg(feature = "metrics")]
    metrics: LfuMetrics,
}

impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    /// Creates a new LFU cache core with the given capacity.
    ///
    /// # Example
    /// ```
    /// use std::num::NonZeroUsize;
    ///
    /// use evictkit::policy::lfu::LfuCore;
    /// use evictkit::traits::CoreCache;
    ///
    /// let cache: LfuCore<u32, String> = LfuCore::new(NonZeroUsize::new(64).unwrap());
    /// assert_eq!(cache.capacity(), 64);
    /// assert!(cache.is_empty());
    /// ```
    pub fn new(capacity: NonZeroUsize) -> Self {
        LfuCore {
            index: FxHashMap::with_capacity_and_hasher(
                capacity.get().min(MAX_PREALLOC),
                Default::default(),
            ),
            buckets: FxHashMap::default(),
            min_freq: 0,
            capacity,
            #[cfg(feature = "metrics")]
            metrics: LfuMetrics::default(),
        }
    }

    /// Creates a new LFU cache core, rejecting a zero capacity.
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        non_zero_capacity(capacity).map(Self::new)
    }

    /// Returns a snapshot of resident keys in no particular order.
    pub fn keys(&self) -> Vec<K> {
        self.index.keys().cloned().collect()
    }

    /// Number of non-empty frequency buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Moves the entry at `slot` from bucket `f` to the front of bucket `f + 1`.
    ///
    /// Returns the entry's new location. At `u64::MAX` the entry stays in its
    /// bucket and is only moved to the front.
    fn promote(&mut self, slot: BucketSlot) -> BucketSlot {
        let freq = slot.freq;
        let Some(bucket) = self.buckets.get_mut(&freq) else {
            return slot;
        };

        if freq == u64::MAX {
            bucket.move_to_front(slot.node);
            return slot;
        }

        let Some(mut entry) = bucket.remove(slot.node) else {
            return slot;
        };
        if bucket.is_empty() {
            self.buckets.remove(&freq);
            #[cfg(feature = "metrics")]
            self.metrics.record_bucket_dropped();

            if self.min_freq == freq {
                self.min_freq = freq + 1;
            }
        }

        let next = freq + 1;
        entry.freq = next;
        if !self.buckets.contains_key(&next) {
            #[cfg(feature = "metrics")]
            self.metrics.record_bucket_created();
        }
        let node = self.buckets.entry(next).or_default().push_front(entry);

        #[cfg(feature = "metrics")]
        self.metrics.record_promotion();

        BucketSlot { freq: next, node }
    }

    /// Promotes `key` if resident and records its new location.
    fn touch_key(&mut self, key: &K) -> Option<BucketSlot> {
        let slot = *self.index.get(key)?;
        let moved = self.promote(slot);
        if let Some(current) = self.index.get_mut(key) {
            *current = moved;
        }
        Some(moved)
    }

    /// Smallest bucket frequency above `freq`, or 0 when none remains.
    fn next_min_after(&mut self, freq: u64) -> u64 {
        let mut next: Option<u64> = None;
        for &candidate in self.buckets.keys() {
            #[cfg(feature = "metrics")]
            self.metrics.record_min_freq_scan_step();

            if candidate > freq && next.is_none_or(|current| candidate < current) {
                next = Some(candidate);
            }
        }
        next.unwrap_or(0)
    }

    /// Unlinks the node at `slot`, dropping its bucket and advancing
    /// `min_freq` when the bucket empties.
    fn unlink(&mut self, slot: BucketSlot) -> Option<LfuEntry<K, V>> {
        let bucket = self.buckets.get_mut(&slot.freq)?;
        let entry = bucket.remove(slot.node)?;
        if bucket.is_empty() {
            self.drop_bucket(slot.freq);
        }
        Some(entry)
    }

    fn drop_bucket(&mut self, freq: u64) {
        self.buckets.remove(&freq);
        #[cfg(feature = "metrics")]
        self.metrics.record_bucket_dropped();

        if self.min_freq == freq {
            self.min_freq = self.next_min_after(freq);
        }
    }

    fn evict_min_freq(&mut self) -> Option<(K, V)> {
        let freq = self.min_freq;
        let bucket = self.buckets.get_mut(&freq)?;
        let entry = bucket.pop_back()?;
        if bucket.is_empty() {
            self.drop_bucket(freq);
        }
        self.index.remove(&entry.key);
        Some((entry.key, entry.value))
    }

    /// Verifies bucket membership, `min_freq`, and index consistency.
    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let mut resident = 0usize;
        for (&freq, bucket) in &self.buckets {
            bucket.check_invariants()?;
            if bucket.is_empty() {
                return Err(InvariantError::new(format!("empty bucket stored for freq {}", freq)));
            }
            if freq == 0 {
                return Err(InvariantError::new("bucket stored for freq 0"));
            }
            for node in bucket.iter_refs() {
                let entry = bucket.get(node).ok_or_else(|| {
                    InvariantError::new(format!("unreadable node in bucket {}", freq))
                })?;
                if entry.freq != freq {
                    return Err(InvariantError::new(format!(
                        "entry with freq {} sits in bucket {}",
                        entry.freq, freq
                    )));
                }
                if self.index.get(&entry.key) != Some(&BucketSlot { freq, node }) {
                    return Err(InvariantError::new(format!(
                        "index does not point at a node in bucket {}",
                        freq
                    )));
                }
            }
            resident += bucket.len();
        }

        if resident != self.index.len() {
            return Err(InvariantError::new(format!(
                "index holds {} keys but buckets hold {} nodes",
                self.index.len(),
                resident
            )));
        }
        if resident > self.capacity.get() {
            return Err(InvariantError::new(format!(
                "len {} exceeds capacity {}",
                resident, self.capacity
            )));
        }

        let expected_min = self.buckets.keys().copied().min().unwrap_or(0);
        if self.min_freq != expected_min {
            return Err(InvariantError::new(format!(
                "min_freq is {} but smallest bucket is {}",
                self.min_freq, expected_min
            )));
        }
        Ok(())
    }
}

impl<K, V> CoreCache<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn insert(&mut self, key: K, value: V) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_insert_call();

        if let Some(slot) = self.touch_key(&key) {
            #[cfg(feature = "metrics")]
            self.metrics.record_insert_update();

            return self
                .buckets
                .get_mut(&slot.freq)
                .and_then(|bucket| bucket.get_mut(slot.node))
                .map(|entry| std::mem::replace(&mut entry.value, value));
        }

        #[cfg(feature = "metrics")]
        self.metrics.record_insert_new();

        if self.index.len() >= self.capacity.get() {
            #[cfg(feature = "metrics")]
            self.metrics.record_evict_call();

            if let Some((_key, _value)) = self.evict_min_freq() {
                #[cfg(feature = "metrics")]
                self.metrics.record_evicted_entry();
            }
        }

        if !self.buckets.contains_key(&1) {
            #[cfg(feature = "metrics")]
            self.metrics.record_bucket_created();
        }
        let node = self.buckets.entry(1).or_default().push_front(LfuEntry {
            key: key.clone(),
            value,
            freq: 1,
        });
        self.index.insert(key, BucketSlot { freq: 1, node });
        self.min_freq = 1;

        None
    }

    fn get(&mut self, key: &K) -> Option<&V> {
        let Some(slot) = self.touch_key(key) else {
            #[cfg(feature = "metrics")]
            self.metrics.record_get_miss();
            return None;
        };

        #[cfg(feature = "metrics")]
        self.metrics.record_get_hit();

        self.buckets
            .get(&slot.freq)
            .and_then(|bucket| bucket.get(slot.node))
            .map(|entry| &entry.value)
    }

    fn peek(&self, key: &K) -> Option<&V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_call();

        let slot = self.index.get(key)?;
        let value = self
            .buckets
            .get(&slot.freq)
            .and_then(|bucket| bucket.get(slot.node))
            .map(|entry| &entry.value);

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
        self.buckets.clear();
        self.min_freq = 0;
    }
}

impl<K, V> MutableCache<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn remove(&mut self, key: &K) -> Option<V> {
        #[cfg(feature = "metrics")]
        self.metrics.record_remove_call();

        let slot = self.index.remove(key)?;
        let entry = self.unlink(slot)?;

        #[cfg(feature = "metrics")]
        self.metrics.record_remove_found();

        Some(entry.value)
    }
}

impl<K, V> LfuCacheTrait<K, V> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn pop_lfu(&mut self) -> Option<(K, V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_pop_lfu_call();

        let popped = self.evict_min_freq();

        #[cfg(feature = "metrics")]
        if popped.is_some() {
            self.metrics.record_pop_lfu_found();
        }

        popped
    }

    fn peek_lfu(&self) -> Option<(&K, &V)> {
        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lfu_call();

        let entry = self.buckets.get(&self.min_freq)?.back_value()?;

        #[cfg(feature = "metrics")]
        self.metrics.record_peek_lfu_found();

        Some((&entry.key, &entry.value))
    }

    fn frequency(&self, key: &K) -> Option<u64> {
        #[cfg(feature = "metrics")]
        self.metrics.record_frequency_call();

        let freq = self.index.get(key).map(|slot| slot.freq);

        #[cfg(feature = "metrics")]
        if freq.is_some() {
            self.metrics.record_frequency_found();
        }

        freq
    }

    fn min_frequency(&self) -> Option<u64> {
        (self.min_freq != 0).then_some(self.min_freq)
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        LfuMetricsSnapshot {
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
            pop_lfu_calls: self.metrics.pop_lfu_calls,
            pop_lfu_found: self.metrics.pop_lfu_found,
            peek_lfu_calls: self.metrics.peek_lfu_calls.get(),
            peek_lfu_found: self.metrics.peek_lfu_found.get(),
            frequency_calls: self.metrics.frequency_calls.get(),
            frequency_found: self.metrics.frequency_found.get(),
            promotions: self.metrics.promotions,
            buckets_created: self.metrics.buckets_created,
            buckets_dropped: self.metrics.buckets_dropped,
            min_freq_scan_steps: self.metrics.min_freq_scan_steps,
            cache_len: self.index.len(),
            capacity: self.capacity.get(),
            bucket_count: self.buckets.len(),
            min_freq: self.min_freq,
        }
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LfuMetricsSnapshot> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn snapshot(&self) -> LfuMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> fmt::Debug for LfuCore<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LfuCore")
            .field("len", &self.index.len())
            .field("capacity", &self.capacity)
            .field("buckets", &self.buckets.len())
            .field("min_freq", &self.min_freq)
            .finish_non_exhaustive()
    }
}

impl<K, V> Extend<(K, V)> for LfuCore<K, V>
where
    K: Eq + Hash + Clone,
{
    fn extend<T: IntoIterator<Item = (K, V)>>(&mut self, iter: T) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

/// Thread-safe LFU cache.
///
/// Wraps an [`LfuCore`] in `Arc<parking_lot::RwLock<_>>`. `get` bumps the
/// entry's frequency, so it runs under the write lock for its whole
/// duration; read-only queries share the read lock.
pub struct LfuCache<K, V> {
    inner: Arc<RwLock<LfuCore<K, V>>>,
}

impl<K, V> Clone for LfuCache<K, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<K, V> fmt::Debug for LfuCache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cache = self.inner.read();
        f.debug_struct("LfuCache")
            .field("len", &cache.index.len())
            .field("capacity", &cache.capacity)
            .field("min_freq", &cache.min_freq)
            .finish_non_exhaustive()
    }
}

impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(capacity: NonZeroUsize) -> Self {
        LfuCache {
            inner: Arc::new(RwLock::new(LfuCore::new(capacity))),
        }
    }

    /// Creates a new thread-safe LFU cache, rejecting a zero capacity.
    ///
    /// ```
    /// use evictkit::policy::lfu::LfuCache;
    ///
    /// let err = LfuCache::<u32, u32>::try_new(0).unwrap_err();
    /// assert_eq!(err.to_string(), "capacity must be greater than 0");
    /// ```
    pub fn try_new(capacity: usize) -> Result<Self, ConfigError> {
        non_zero_capacity(capacity).map(Self::new)
    }

    /// Inserts or updates `key`. An update counts as an access.
    pub fn put(&self, key: K, value: V) -> Option<V> {
        let mut cache = self.inner.write();
        cache.insert(key, value)
    }

    /// Returns a clone of the value and increments the key's frequency.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut cache = self.inner.write();
        cache.get(key).cloned()
    }

    pub fn peek(&self, key: &K) -> Option<V> {
        let cache = self.inner.read();
        cache.peek(key).cloned()
    }

    pub fn contains(&self, key: &K) -> bool {
        let cache = self.inner.read();
        cache.contains(key)
    }

    /// Returns the access count of `key` without changing it.
    pub fn get_frequency(&self, key: &K) -> Option<u64> {
        let cache = self.inner.read();
        cache.frequency(key)
    }

    /// Removes `key`; returns whether it was present.
    pub fn remove(&self, key: &K) -> bool {
        let mut cache = self.inner.write();
        cache.remove(key).is_some()
    }

    /// Removes and returns the entry that would be evicted next.
    pub fn pop_lfu(&self) -> Option<(K, V)> {
        let mut cache = self.inner.write();
        cache.pop_lfu()
    }

    pub fn peek_lfu(&self) -> Option<(K, V)> {
        let cache = self.inner.read();
        cache.peek_lfu().map(|(k, v)| (k.clone(), v.clone()))
    }

    /// Smallest resident frequency, `None` when empty.
    pub fn min_frequency(&self) -> Option<u64> {
        let cache = self.inner.read();
        cache.min_frequency()
    }

    /// Unordered snapshot of resident keys.
    pub fn keys(&self) -> Vec<K> {
        let cache = self.inner.read();
        cache.keys()
    }

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

    pub fn check_invariants(&self) -> Result<(), InvariantError> {
        let cache = self.inner.read();
        cache.check_invariants()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> LfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn metrics_snapshot(&self) -> LfuMetricsSnapshot {
        let cache = self.inner.read();
        cache.metrics_snapshot()
    }
}

#[cfg(feature = "metrics")]
impl<K, V> MetricsSnapshotProvider<LfuMetricsSnapshot> for LfuCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn snapshot(&self) -> LfuMetricsSnapshot {
        self.metrics_snapshot()
    }
}

impl<K, V> ConcurrentCache for LfuCache<K, V>
where
    K: Send + Sync,
    V: Send + Sync,
{
}
