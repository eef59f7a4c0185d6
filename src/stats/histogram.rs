//! Score distribution histogram
//!
//! A small fixed-size histogram with linear buckets over the score scale.
//! Scores here are means of 0-1000 component grades, so a linear 0-1000
//! range covers real data; anything outside lands in the overflow bucket
//! rather than being dropped, so merged totals always reconcile with the
//! qualifying count.

use anyhow::bail;

use crate::Result;

/// Upper bound of the score scale covered by the linear buckets
pub const SCORE_SCALE_MAX: f64 = 1000.0;

/// Default number of linear buckets
pub const DEFAULT_BUCKETS: usize = 20;

/// Fixed-bucket score histogram
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreHistogram {
    /// Counts per linear bucket over [0, upper_bound)
    buckets: Vec<u64>,
    /// Upper bound of the linear range
    upper_bound: f64,
    /// Samples at or above the upper bound, or below zero
    overflow: u64,
    /// Total number of samples
    num_samples: u64,
}

impl ScoreHistogram {
    /// Create an empty histogram with `num_buckets` linear buckets over
    /// `[0, upper_bound)`
    pub fn new(num_buckets: usize, upper_bound: f64) -> Self {
        Self {
            buckets: vec![0; num_buckets.max(1)],
            upper_bound,
            overflow: 0,
            num_samples: 0,
        }
    }

    /// Record one score sample
    #[inline]
    pub fn record(&mut self, score: f64) {
        self.num_samples += 1;

        if score < 0.0 || score >= self.upper_bound {
            self.overflow += 1;
            return;
        }

        let idx = (score / self.upper_bound * self.buckets.len() as f64) as usize;
        let last = self.buckets.len() - 1;
        self.buckets[idx.min(last)] += 1;
    }

    /// Get the number of samples
    pub fn len(&self) -> u64 {
        self.num_samples
    }

    /// Check if the histogram is empty
    pub fn is_empty(&self) -> bool {
        self.num_samples == 0
    }

    /// Width of one linear bucket
    pub fn bucket_width(&self) -> f64 {
        self.upper_bound / self.buckets.len() as f64
    }

    /// Get all bucket counts
    pub fn buckets(&self) -> &[u64] {
        &self.buckets
    }

    /// Samples outside the linear range
    pub fn overflow(&self) -> u64 {
        self.overflow
    }

    /// Merge another histogram into this one
    ///
    /// Both histograms must share the same bucket shape; every thread in a
    /// run builds its histogram from the same configuration, so a mismatch
    /// is a caller bug, not a data condition.
    pub fn merge(&mut self, other: &ScoreHistogram) -> Result<()> {
        if self.buckets.len() != other.buckets.len() || self.upper_bound != other.upper_bound {
            bail!(
                "cannot merge histograms with different shapes ({} x {} vs {} x {})",
                self.buckets.len(),
                self.upper_bound,
                other.buckets.len(),
                other.upper_bound
            );
        }

        for (bucket, &count) in self.buckets.iter_mut().zip(&other.buckets) {
            *bucket += count;
        }
        self.overflow += other.overflow;
        self.num_samples += other.num_samples;
        Ok(())
    }

    /// Render the histogram as a text bar chart, one line per bucket
    ///
    /// Returns None when there is nothing to draw.
    pub fn render(&self) -> Option<String> {
        if self.num_samples == 0 {
            return None;
        }

        const BAR_WIDTH: usize = 50;
        let max_count = self.buckets.iter().copied().max().unwrap_or(0).max(1);
        let width = self.bucket_width();

        let mut out = String::from("Score Distribution:\n");
        for (idx, &count) in self.buckets.iter().enumerate() {
            let lo = idx as f64 * width;
            let hi = lo + width;
            let bar_len = ((count as f64 / max_count as f64) * BAR_WIDTH as f64) as usize;
            out.push_str(&format!(
                "  [{:6.1}-{:6.1}) {:>10} {}\n",
                lo,
                hi,
                count,
                "#".repeat(bar_len)
            ));
        }
        if self.overflow > 0 {
            out.push_str(&format!("  [ out of range] {:>10}\n", self.overflow));
        }
        Some(out)
    }
}

impl Default for ScoreHistogram {
    fn default() -> Self {
        Self::new(DEFAULT_BUCKETS, SCORE_SCALE_MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_histogram_basic() {
        let mut hist = ScoreHistogram::new(10, 1000.0);

        assert_eq!(hist.len(), 0);
        assert!(hist.is_empty());

        hist.record(500.0);
        assert_eq!(hist.len(), 1);
        assert!(!hist.is_empty());
        assert_eq!(hist.buckets()[5], 1);
    }

    #[test]
    fn test_histogram_bucket_edges() {
        let mut hist = ScoreHistogram::new(10, 1000.0);

        hist.record(0.0);
        hist.record(99.9);
        hist.record(100.0);
        hist.record(999.9);

        assert_eq!(hist.buckets()[0], 2);
        assert_eq!(hist.buckets()[1], 1);
        assert_eq!(hist.buckets()[9], 1);
        assert_eq!(hist.overflow(), 0);
    }

    #[test]
    fn test_histogram_top_of_range_lands_in_last_bucket() {
        let mut hist = ScoreHistogram::new(10, 1000.0);

        // Just below the upper bound must clamp into the last bucket, not
        // index past the end of the array
        hist.record(999.9999999999999);
        hist.record(900.0);

        assert_eq!(hist.buckets()[9], 2);
        assert_eq!(hist.overflow(), 0);
    }

    #[test]
    fn test_histogram_overflow() {
        let mut hist = ScoreHistogram::new(10, 1000.0);

        hist.record(1000.0);
        hist.record(1500.0);
        hist.record(-1.0);

        assert_eq!(hist.overflow(), 3);
        assert_eq!(hist.len(), 3);
    }

    #[test]
    fn test_histogram_merge() {
        let mut hist1 = ScoreHistogram::new(10, 1000.0);
        let mut hist2 = ScoreHistogram::new(10, 1000.0);

        hist1.record(100.0);
        hist1.record(200.0);
        hist2.record(100.0);
        hist2.record(1500.0);

        hist1.merge(&hist2).unwrap();

        assert_eq!(hist1.len(), 4);
        assert_eq!(hist1.buckets()[1], 2);
        assert_eq!(hist1.buckets()[2], 1);
        assert_eq!(hist1.overflow(), 1);
    }

    #[test]
    fn test_histogram_merge_shape_mismatch() {
        let mut hist1 = ScoreHistogram::new(10, 1000.0);
        let hist2 = ScoreHistogram::new(20, 1000.0);

        assert!(hist1.merge(&hist2).is_err());
    }

    #[test]
    fn test_histogram_render() {
        let mut hist = ScoreHistogram::new(4, 1000.0);
        assert!(hist.render().is_none());

        hist.record(600.0);
        let rendered = hist.render().unwrap();
        assert!(rendered.contains("Score Distribution"));
        assert!(rendered.contains('#'));
    }
}
