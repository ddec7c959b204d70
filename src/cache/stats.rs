//! Cache Statistics Module
//!
//! Point-in-time snapshot of the cache's performance counters.

use serde::Serialize;

// == Cache Stats ==
/// Snapshot of cache performance counters, taken under the store's lock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Lookups answered from the cache
    pub hits: u64,
    /// Lookups that fell through to the caller
    pub misses: u64,
    /// Entries removed by the eviction policy
    pub evictions: u64,
    /// Entries currently stored
    pub entries: usize,
}

impl CacheStats {
    // == Hit Rate ==
    /// Hit rate over all lookups so far.
    ///
    /// Returns hits / (hits + misses), or 0.0 if nothing was looked up
    /// yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
