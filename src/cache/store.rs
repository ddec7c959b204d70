//! Cache Store Module
//!
//! Fixed-capacity cache engine with least-frequently-used eviction.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::cache::{CacheEntry, CacheStats, CachedValue};

// == Lfu Cache ==
/// Fixed-capacity key-value cache with LFU eviction.
///
/// The map is never exposed; callers go through the operations below, and
/// every operation takes the interior lock for its whole duration, so each
/// call is atomic with respect to every other call on the same instance.
/// Methods are synchronous and never perform I/O, so the lock is never
/// held across an await point.
///
/// A zero-capacity cache stores nothing and every lookup misses.
#[derive(Debug)]
pub struct LfuCache {
    inner: RwLock<LfuInner>,
    /// Maximum number of entries; fixed at construction
    capacity: usize,
}

#[derive(Debug)]
struct LfuInner {
    entries: HashMap<String, CacheEntry>,
    /// Stamped on every insert; breaks eviction ties toward the oldest
    next_seq: u64,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl LfuInner {
    // == Eviction ==
    /// Removes the entry with the lowest frequency. Ties go to the entry
    /// inserted earliest, so eviction order is deterministic.
    fn evict_lfu(&mut self) {
        let victim = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| (entry.frequency, entry.inserted_seq))
            .map(|(key, _)| key.clone());

        if let Some(key) = victim {
            self.entries.remove(&key);
            self.evictions += 1;
        }
    }
}

impl LfuCache {
    // == Constructor ==
    /// Creates an empty cache holding at most `capacity` entries.
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: RwLock::new(LfuInner {
                entries: HashMap::new(),
                next_seq: 0,
                hits: 0,
                misses: 0,
                evictions: 0,
            }),
            capacity,
        }
    }

    // == Get ==
    /// Looks up a key, returning a clone of the stored value on a hit.
    ///
    /// A hit increments the entry's frequency counter, feeding future
    /// eviction priority; a miss leaves the entries untouched.
    pub fn get(&self, key: &str) -> Option<CachedValue> {
        let mut inner = self.inner.write();
        if let Some(entry) = inner.entries.get_mut(key) {
            entry.frequency += 1;
            let value = entry.value.clone();
            inner.hits += 1;
            return Some(value);
        }
        inner.misses += 1;
        None
    }

    // == Set ==
    /// Stores a value under a key.
    ///
    /// An existing key has its value replaced and its frequency bumped,
    /// without evicting anything. A new key is inserted with frequency 1,
    /// evicting the least frequently used entry first when the cache is
    /// full.
    pub fn set(&self, key: impl Into<String>, value: CachedValue) {
        let key = key.into();
        let mut inner = self.inner.write();

        if let Some(entry) = inner.entries.get_mut(&key) {
            entry.value = value;
            entry.frequency += 1;
            return;
        }

        if self.capacity == 0 {
            return;
        }
        if inner.entries.len() >= self.capacity {
            inner.evict_lfu();
        }

        let seq = inner.next_seq;
        inner.next_seq += 1;
        inner.entries.insert(key, CacheEntry::new(value, seq));
    }

    // == Delete ==
    /// Removes a key if present; removing an absent key is a no-op.
    pub fn delete(&self, key: &str) {
        let mut inner = self.inner.write();
        inner.entries.remove(key);
    }

    // == Delete Prefix ==
    /// Removes every key starting with `prefix`; a no-op when none match.
    ///
    /// Used to drop all of a requester's cached list queries in one call;
    /// keys outside the prefix are untouched.
    pub fn delete_prefix(&self, prefix: &str) {
        let mut inner = self.inner.write();
        inner.entries.retain(|key, _| !key.starts_with(prefix));
    }

    // == Length ==
    /// Returns the current number of entries in the cache.
    pub fn len(&self) -> usize {
        self.inner.read().entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.read().entries.is_empty()
    }

    // == Stats ==
    /// Returns a snapshot of the performance counters.
    pub fn stats(&self) -> CacheStats {
        let inner = self.inner.read();
        CacheStats {
            hits: inner.hits,
            misses: inner.misses,
            evictions: inner.evictions,
            entries: inner.entries.len(),
        }
    }
}
