//! Cache Module
//!
//! Provides a thread-safe in-memory cache with LRU eviction.

mod entry;
mod lru;
mod stats;
mod store;


// Re-export public types
pub use stats::CacheStats;
pub use store::{Cache, EvictionCallback};
