//! LRU soak driver
//!
//! Hammers one shared cache from several threads with a mixed
//! add/get/remove workload, then checks the capacity bound and prints the
//! final statistics as JSON.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use anyhow::{ensure, Context};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use mini_lru::{Cache, Config};

fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mini_lru=info,lru_soak=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_entries={}, worker_threads={}, ops_per_thread={}, key_space={}",
        config.max_entries, config.worker_threads, config.ops_per_thread, config.key_space
    );

    let departures = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&departures);
    let cache: Cache<u64, u64> = Cache::new(config.max_entries)
        .context("failed to create cache")?
        .on_evicted(move |_key, _value| {
            counter.fetch_add(1, Ordering::Relaxed);
        });

    let started = Instant::now();
    thread::scope(|scope| {
        for worker in 0..config.worker_threads {
            let cache = &cache;
            let config = &config;
            scope.spawn(move || run_worker(cache, config, worker as u64));
        }
    });
    let elapsed = started.elapsed();

    let stats = cache.stats();
    let total_ops = config.ops_per_thread * config.worker_threads as u64;
    info!(
        "Soak finished: {} ops in {:.2?} ({} entries cached, {} departures)",
        total_ops,
        elapsed,
        cache.len(),
        departures.load(Ordering::Relaxed)
    );

    if cache.capacity() > 0 {
        ensure!(
            cache.len() <= cache.capacity(),
            "cache holds {} entries, capacity is {}",
            cache.len(),
            cache.capacity()
        );
    }
    ensure!(
        departures.load(Ordering::Relaxed) == stats.evictions + stats.removals,
        "callback count does not match recorded evictions and removals"
    );

    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

// == Workload ==
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkloadOp {
    Add(u64),
    Get(u64),
    Remove(u64),
}

/// Draws one operation: 50% add, 40% get, 10% remove.
fn next_op(rng: &mut SmallRng, key_space: u64) -> WorkloadOp {
    let key = rng.random_range(0..key_space);
    match rng.random_range(0..10) {
        0..=4 => WorkloadOp::Add(key),
        5..=8 => WorkloadOp::Get(key),
        _ => WorkloadOp::Remove(key),
    }
}

/// Issues `ops_per_thread` operations drawn from a per-worker seeded generator.
fn run_worker(cache: &Cache<u64, u64>, config: &Config, worker: u64) {
    let mut rng = SmallRng::seed_from_u64(worker);

    for op in 0..config.ops_per_thread {
        match next_op(&mut rng, config.key_space) {
            WorkloadOp::Add(key) => cache.add(key, op),
            WorkloadOp::Get(key) => {
                cache.get(&key);
            }
            WorkloadOp::Remove(key) => cache.remove(&key),
        }
    }

    debug!(worker, "worker finished");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_op_keys_within_key_space() {
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..1_000 {
            let key = match next_op(&mut rng, 16) {
                WorkloadOp::Add(key) | WorkloadOp::Get(key) | WorkloadOp::Remove(key) => key,
            };
            assert!(key < 16);
        }
    }

    #[test]
    fn test_next_op_same_seed_same_sequence() {
        let mut first = SmallRng::seed_from_u64(3);
        let mut second = SmallRng::seed_from_u64(3);
        for _ in 0..100 {
            assert_eq!(next_op(&mut first, 50), next_op(&mut second, 50));
        }
    }

    #[test]
    fn test_next_op_mix_covers_every_kind() {
        let mut rng = SmallRng::seed_from_u64(0);
        let (mut adds, mut gets, mut removes) = (0, 0, 0);
        for _ in 0..10_000 {
            match next_op(&mut rng, 100) {
                WorkloadOp::Add(_) => adds += 1,
                WorkloadOp::Get(_) => gets += 1,
                WorkloadOp::Remove(_) => removes += 1,
            }
        }
        // Roughly 50/40/10 with generous bounds
        assert!(adds > 4_000 && adds < 6_000);
        assert!(gets > 3_000 && gets < 5_000);
        assert!(removes > 500 && removes < 1_500);
    }

    #[test]
    fn test_run_worker_respects_capacity() {
        let cache = Cache::new(8).unwrap();
        let config = Config {
            max_entries: 8,
            worker_threads: 1,
            ops_per_thread: 500,
            key_space: 64,
        };
        run_worker(&cache, &config, 1);
        assert!(cache.len() <= 8);
    }
}
