//! Configuration Module
//!
//! Loads the soak workload parameters from environment variables.

use std::env;

/// Workload configuration for the soak driver.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Maximum number of entries the cache can hold (0 = unbounded).
    ///
    /// Kept signed so a negative value reaches the cache constructor and is
    /// reported as an invalid size instead of failing to parse.
    pub max_entries: isize,
    /// Number of worker threads sharing the cache
    pub worker_threads: usize,
    /// Operations issued by each worker
    pub ops_per_thread: u64,
    /// Number of distinct keys the workers draw from
    pub key_space: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `MAX_ENTRIES` - Maximum cache entries (default: 1000)
    /// - `WORKER_THREADS` - Worker thread count (default: 4)
    /// - `OPS_PER_THREAD` - Operations per worker (default: 100000)
    /// - `KEY_SPACE` - Distinct keys in the workload (default: 4000)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_entries: parse_var("MAX_ENTRIES").unwrap_or(defaults.max_entries),
            worker_threads: parse_var("WORKER_THREADS").unwrap_or(defaults.worker_threads),
            ops_per_thread: parse_var("OPS_PER_THREAD").unwrap_or(defaults.ops_per_thread),
            key_space: parse_var::<u64>("KEY_SPACE")
                .filter(|&n| n > 0)
                .unwrap_or(defaults.key_space),
        }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_entries: 1000,
            worker_threads: 4,
            ops_per_thread: 100_000,
            key_space: 4000,
        }
    }
}
