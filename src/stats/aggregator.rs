//! Statistics aggregation
//!
//! The reduction stage: collects every thread's `LocalStats` after the pool
//! has drained and merges them into one global aggregate. The merge operators
//! (max, min, sum) are associative and commutative, so the aggregate is
//! independent of the order in which threads are added.
//!
//! # Example
//!
//! ```
//! use statpulse::stats::{LocalStats, aggregator::StatsAggregator};
//! use statpulse::record::Verdict;
//!
//! let mut coordinator = LocalStats::new();
//! coordinator.record_verdict(Verdict::Qualified(500.0));
//!
//! let mut worker = LocalStats::new();
//! worker.record_verdict(Verdict::Qualified(700.0));
//!
//! let mut aggregator = StatsAggregator::new();
//! aggregator.add_thread(0, coordinator);
//! aggregator.add_thread(1, worker);
//!
//! let global = aggregator.aggregate();
//! assert_eq!(global.qualifying(), 2);
//! assert_eq!(global.mean(), Some(600.0));
//! ```

use std::collections::HashMap;

use crate::stats::LocalStats;

/// Reduces per-thread aggregates into one global view
///
/// Keeps the original per-thread statistics around for inspection while
/// computing the aggregate lazily and caching it.
#[derive(Debug)]
pub struct StatsAggregator {
    /// Per-thread statistics (thread_id -> stats)
    threads: HashMap<usize, LocalStats>,

    /// Cached aggregate (computed on demand)
    aggregate_cache: Option<LocalStats>,

    /// Whether the cache is valid
    cache_valid: bool,
}

impl StatsAggregator {
    /// Create an empty aggregator
    pub fn new() -> Self {
        Self {
            threads: HashMap::new(),
            aggregate_cache: None,
            cache_valid: false,
        }
    }

    /// Add one thread's statistics
    pub fn add_thread(&mut self, thread_id: usize, stats: LocalStats) {
        self.threads.insert(thread_id, stats);
        self.cache_valid = false;
    }

    /// Number of threads that have contributed
    pub fn num_threads(&self) -> usize {
        self.threads.len()
    }

    /// Global aggregate across all contributed threads
    ///
    /// Computed on first call and cached until another thread is added.
    pub fn aggregate(&mut self) -> &LocalStats {
        if !self.cache_valid {
            self.compute_aggregate();
        }

        self.aggregate_cache.as_ref().unwrap()
    }

    fn compute_aggregate(&mut self) {
        // All threads share one configured histogram shape, so reuse the
        // first contribution as the base instead of guessing a shape
        let mut ids = self.thread_ids().into_iter();
        let mut aggregate = match ids.next() {
            Some(first) => self.threads[&first].clone(),
            None => LocalStats::new(),
        };

        for id in ids {
            aggregate
                .merge(&self.threads[&id])
                .expect("Failed to merge thread statistics");
        }

        self.aggregate_cache = Some(aggregate);
        self.cache_valid = true;
    }

    /// Statistics for one thread, if it contributed
    pub fn thread_stats(&self, thread_id: usize) -> Option<&LocalStats> {
        self.threads.get(&thread_id)
    }

    /// Sorted list of contributing thread IDs
    pub fn thread_ids(&self) -> Vec<usize> {
        let mut ids: Vec<usize> = self.threads.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Drop all contributed statistics
    pub fn clear(&mut self) {
        self.threads.clear();
        self.aggregate_cache = None;
        self.cache_valid = false;
    }
}

impl Default for StatsAggregator {
    fn default() -> Self {
        Self::new()
    }
}
