//! Mini LRU - A thread-safe, fixed-capacity in-process cache
//!
//! Provides O(1) insert, lookup and removal with least-recently-used eviction
//! and an optional eviction callback.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{Cache, CacheStats, EvictionCallback};
pub use config::Config;
pub use error::{CacheError, Result};
