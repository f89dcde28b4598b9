//! Cache Store Module
//!
//! Main cache engine combining a hash index with the recency list under a
//! single reader/writer lock.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;

use ahash::RandomState;
use parking_lot::RwLock;
use tracing::{debug, trace};

use crate::cache::entry::SlotId;
use crate::cache::lru::RecencyList;
use crate::cache::CacheStats;
use crate::error::{CacheError, Result};

/// Upper bound on slots reserved up front; larger caches grow on demand.
const MAX_PREALLOCATED_SLOTS: usize = 4096;

/// Callback invoked with every entry that leaves the cache, except on
/// [`Cache::purge`] and when the cache is dropped.
pub type EvictionCallback<K, V> = Box<dyn Fn(K, V) + Send + Sync>;

// == Inner State ==
/// Everything guarded by the lock. The list and the index are only ever
/// mutated together.
struct Inner<K, V> {
    list: RecencyList<K, V>,
    index: HashMap<K, SlotId, RandomState>,
    stats: CacheStats,
}

impl<K, V> Inner<K, V>
where
    K: Hash + Eq + Clone,
{
    fn new(max_entries: usize) -> Self {
        let reserved = max_entries.min(MAX_PREALLOCATED_SLOTS);
        Self {
            list: RecencyList::with_capacity(reserved),
            index: HashMap::with_capacity_and_hasher(reserved, RandomState::new()),
            stats: CacheStats::new(),
        }
    }

    fn add(&mut self, key: K, value: V, max_entries: usize) -> Option<(K, V)> {
        if let Some(&id) = self.index.get(&key) {
            if let Some(entry) = self.list.get_mut(id) {
                entry.value = value;
            }
            self.list.touch(id);
            return None;
        }

        let id = self.list.push_front(key.clone(), value);
        self.index.insert(key, id);
        self.stats.set_total_entries(self.list.len());

        // A single insertion can overshoot the bound by at most one
        if max_entries != 0 && self.list.len() > max_entries {
            self.remove_oldest()
        } else {
            None
        }
    }

    fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.index.get(key).copied() {
            Some(id) => {
                self.stats.record_hit();
                self.list.touch(id);
                self.list.get(id).map(|entry| &entry.value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    fn peek<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.index.get(key)?;
        self.list.get(id).map(|entry| &entry.value)
    }

    fn remove<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let id = *self.index.get(key)?;
        let removed = self.remove_slot(id)?;
        self.stats.record_removal();
        Some(removed)
    }

    fn remove_oldest(&mut self) -> Option<(K, V)> {
        let id = self.list.back()?;
        let removed = self.remove_slot(id)?;
        self.stats.record_eviction();
        trace!(remaining = self.list.len(), "evicted least recently used entry");
        Some(removed)
    }

    /// Shared removal procedure: detach from the list, then drop the index entry.
    fn remove_slot(&mut self, id: SlotId) -> Option<(K, V)> {
        let (key, value) = self.list.remove(id)?;
        self.index.remove(&key);
        self.stats.set_total_entries(self.list.len());
        Some((key, value))
    }

    fn purge(&mut self, max_entries: usize) -> usize {
        let cleared = self.list.len();
        let fresh = Inner::new(max_entries);
        self.list = fresh.list;
        self.index = fresh.index;
        self.stats.set_total_entries(0);
        cleared
    }

    /// Panics if the index and the recency list disagree.
    #[cfg(test)]
    fn assert_consistent(&self) {
        assert_eq!(self.index.len(), self.list.len(), "index/list length mismatch");

        let mut walked = 0;
        for (id, entry) in self.list.iter() {
            assert_eq!(
                self.index.get(&entry.key),
                Some(&id),
                "list node not indexed at its slot"
            );
            walked += 1;
        }
        assert_eq!(walked, self.list.len(), "list walk does not cover every node");
        assert_eq!(self.stats.total_entries, self.list.len());
    }
}

// == Cache ==
/// Thread-safe, fixed-capacity LRU cache.
///
/// Every operation that touches recency order (`add`, `get`, `remove`,
/// `remove_oldest`, `purge`) takes the exclusive lock. Pure reads (`len`,
/// `keys`, `peek`, `contains`, `stats`) take the shared lock.
///
/// The eviction callback runs on the calling thread after the lock has been
/// released, so it may call back into the same cache.
///
/// # Example
/// ```
/// use mini_lru::Cache;
///
/// let cache = Cache::new(2).unwrap();
/// cache.add("a", 1);
/// cache.add("b", 2);
/// cache.get("a");
/// cache.add("c", 3); // evicts "b"
///
/// assert_eq!(cache.get("b"), None);
/// assert_eq!(cache.get("a"), Some(1));
/// ```
pub struct Cache<K, V> {
    /// Capacity bound, 0 = unbounded
    max_entries: usize,
    inner: RwLock<Inner<K, V>>,
    on_evicted: Option<EvictionCallback<K, V>>,
}

impl<K, V> Cache<K, V>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// A capacity of 0 means unbounded: entries only leave through explicit
    /// removal.
    ///
    /// # Errors
    /// Returns [`CacheError::InvalidSize`] if `capacity` is negative.
    pub fn new(capacity: isize) -> Result<Self> {
        let max_entries =
            usize::try_from(capacity).map_err(|_| CacheError::InvalidSize(capacity))?;
        debug!(max_entries, "created LRU cache");

        Ok(Self {
            max_entries,
            inner: RwLock::new(Inner::new(max_entries)),
            on_evicted: None,
        })
    }

    /// Creates a cache without a capacity bound.
    pub fn unbounded() -> Self {
        Self {
            max_entries: 0,
            inner: RwLock::new(Inner::new(0)),
            on_evicted: None,
        }
    }

    // == Eviction Callback ==
    /// Attaches a callback fired with the (key, value) of every entry that
    /// leaves through capacity pressure, [`remove`](Self::remove) or
    /// [`remove_oldest`](Self::remove_oldest).
    pub fn on_evicted<F>(mut self, callback: F) -> Self
    where
        F: Fn(K, V) + Send + Sync + 'static,
    {
        self.on_evicted = Some(Box::new(callback));
        self
    }

    // == Add ==
    /// Inserts or updates an entry and marks it most recently used.
    ///
    /// Adding a new key to a full cache evicts the least recently used entry.
    /// Updating an existing key never evicts.
    pub fn add(&self, key: K, value: V) {
        let evicted = {
            let mut inner = self.inner.write();
            inner.add(key, value, self.max_entries)
        };
        self.notify(evicted);
    }

    // == Get ==
    /// Returns a copy of the value for `key` and marks it most recently used.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        let mut inner = self.inner.write();
        inner.get(key).cloned()
    }

    /// Returns a copy of the value for `key` without touching recency order.
    pub fn peek<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.inner.read().peek(key).cloned()
    }

    /// Returns true if `key` is cached, without touching recency order.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.inner.read().index.contains_key(key)
    }

    // == Remove ==
    /// Removes `key` if present. Missing keys are ignored.
    pub fn remove<Q>(&self, key: &Q)
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let removed = self.inner.write().remove(key);
        self.notify(removed);
    }

    /// Removes the least recently used entry. Does nothing on an empty cache.
    pub fn remove_oldest(&self) {
        let removed = self.inner.write().remove_oldest();
        self.notify(removed);
    }

    // == Keys ==
    /// Snapshot of the cached keys in unspecified order.
    pub fn keys(&self) -> Vec<K> {
        self.inner.read().index.keys().cloned().collect()
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.read().list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Configured capacity bound, 0 when unbounded.
    pub fn capacity(&self) -> usize {
        self.max_entries
    }

    // == Purge ==
    /// Drops every entry without invoking the eviction callback.
    ///
    /// Statistics counters are kept.
    pub fn purge(&self) {
        let cleared = self.inner.write().purge(self.max_entries);
        debug!(cleared, "purged LRU cache");
    }

    // == Stats ==
    /// Returns a snapshot of the cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.inner.read().stats.clone()
    }

    /// Hands a departed entry to the callback. Must be called without the lock held.
    fn notify(&self, removed: Option<(K, V)>) {
        if let (Some(callback), Some((key, value))) = (&self.on_evicted, removed) {
            callback(key, value);
        }
    }

    /// Panics if the index and the recency list disagree.
    #[cfg(test)]
    pub(crate) fn assert_consistent(&self) {
        self.inner.read().assert_consistent();
    }
}

impl<K, V> fmt::Debug for Cache<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.read();
        f.debug_struct("Cache")
            .field("max_entries", &self.max_entries)
            .field("len", &inner.list.len())
            .field("has_eviction_callback", &self.on_evicted.is_some())
            .finish()
    }
}
