//! Statistics collection
//!
//! Per-thread running aggregates and their reduction. Each thread in the pool
//! owns exactly one `LocalStats` and is the only writer to it until the run
//! ends; cross-thread combination happens once, through `merge`, after every
//! loop has observed its termination signal. Because `merge` is associative
//! and commutative (max, min and sums), the reduced result is independent of
//! the pool size and of the order threads finish in.
//!
//! # Example
//!
//! ```
//! use statpulse::stats::LocalStats;
//! use statpulse::record::Verdict;
//!
//! let mut stats = LocalStats::new();
//! stats.record_verdict(Verdict::Qualified(600.0));
//! stats.record_verdict(Verdict::Absent);
//!
//! assert_eq!(stats.qualifying(), 1);
//! assert_eq!(stats.seen(), 2);
//! assert_eq!(stats.mean(), Some(600.0));
//! ```

pub mod aggregator;
pub mod histogram;

use crate::record::Verdict;
use crate::Result;
use histogram::ScoreHistogram;

/// Running aggregate owned by one thread
///
/// Bounds start at -inf/+inf so the first qualifying record always updates
/// both; `max()`/`min()` hide the sentinels behind `Option` once the run is
/// over.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalStats {
    /// Largest qualifying score seen
    max: f64,
    /// Smallest qualifying score seen
    min: f64,
    /// Sum of qualifying scores
    sum: f64,
    /// Records that passed every filter
    qualifying: u64,
    /// Records dropped by the presence or zero-score filter
    filtered: u64,
    /// Records dropped for being short or non-numeric
    malformed: u64,
    /// Every record this thread was assigned
    seen: u64,
    /// Distribution of qualifying scores
    histogram: ScoreHistogram,
}

impl LocalStats {
    /// Create an empty aggregate with the default histogram shape
    pub fn new() -> Self {
        Self::with_histogram(ScoreHistogram::default())
    }

    /// Create an empty aggregate around a pre-shaped histogram
    ///
    /// Every thread in a run must use the same shape or the reduction will
    /// refuse to merge.
    pub fn with_histogram(histogram: ScoreHistogram) -> Self {
        Self {
            max: f64::NEG_INFINITY,
            min: f64::INFINITY,
            sum: 0.0,
            qualifying: 0,
            filtered: 0,
            malformed: 0,
            seen: 0,
            histogram,
        }
    }

    /// Fold one record verdict into the aggregate
    pub fn record_verdict(&mut self, verdict: Verdict) {
        self.seen += 1;
        match verdict {
            Verdict::Qualified(score) => {
                if score > self.max {
                    self.max = score;
                }
                if score < self.min {
                    self.min = score;
                }
                self.sum += score;
                self.qualifying += 1;
                self.histogram.record(score);
            }
            Verdict::Absent | Verdict::ZeroScore => self.filtered += 1,
            Verdict::Malformed => self.malformed += 1,
        }
    }

    /// Records that passed every filter
    pub fn qualifying(&self) -> u64 {
        self.qualifying
    }

    /// Records dropped by the presence or zero-score filter
    pub fn filtered(&self) -> u64 {
        self.filtered
    }

    /// Records dropped as malformed
    pub fn malformed(&self) -> u64 {
        self.malformed
    }

    /// Every record this aggregate has seen
    pub fn seen(&self) -> u64 {
        self.seen
    }

    /// Sum of qualifying scores
    pub fn sum(&self) -> f64 {
        self.sum
    }

    /// Largest qualifying score, None if nothing qualified
    pub fn max(&self) -> Option<f64> {
        (self.qualifying > 0).then_some(self.max)
    }

    /// Smallest qualifying score, None if nothing qualified
    pub fn min(&self) -> Option<f64> {
        (self.qualifying > 0).then_some(self.min)
    }

    /// Mean qualifying score, None if nothing qualified
    ///
    /// Guarding here is what keeps a no-data run a reportable condition
    /// instead of a NaN in the output.
    pub fn mean(&self) -> Option<f64> {
        (self.qualifying > 0).then(|| self.sum / self.qualifying as f64)
    }

    /// Distribution of qualifying scores
    pub fn histogram(&self) -> &ScoreHistogram {
        &self.histogram
    }

    /// Merge another aggregate into this one
    ///
    /// Elementwise max/min on the bounds, sums for everything else.
    /// Associative and commutative, so reduction order never changes the
    /// result.
    pub fn merge(&mut self, other: &LocalStats) -> Result<()> {
        self.max = self.max.max(other.max);
        self.min = self.min.min(other.min);
        self.sum += other.sum;
        self.qualifying += other.qualifying;
        self.filtered += other.filtered;
        self.malformed += other.malformed;
        self.seen += other.seen;
        self.histogram.merge(&other.histogram)
    }
}

impl Default for LocalStats {
    fn default() -> Self {
        Self::new()
    }
}
