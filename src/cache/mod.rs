//! Cache Module
//!
//! The authorization-aware caching layer: a fixed-capacity LFU eviction
//! store and the key policy for its two key families (`doc:` and
//! `list:`).

pub mod keys;

mod entry;
mod stats;
mod store;


// Re-export public types
pub use entry::{CacheEntry, CachedValue};
pub use stats::CacheStats;
pub use store::LfuCache;
