//! Record layout and per-record evaluation
//!
//! A record is one line of the input stream: positional fields separated by a
//! single-character delimiter. The `FieldLayout` names the columns that matter
//! (presence flags and numeric scores); `evaluate` is the pure filter/fold
//! input for the pipeline - it never touches shared state and never fails the
//! run, it only classifies one line.
//!
//! Classification rules:
//!
//! - A record qualifies only if every presence flag equals `"1"`.
//! - A non-exempt score of exactly 0.0 marks the component as absent and
//!   disqualifies the record. Exempt scores (e.g. an essay score, where zero
//!   is a legitimate result) skip this check but still enter the mean.
//! - The record's value is the arithmetic mean of all score fields.
//! - Lines with too few fields, or with non-numeric score text, are malformed
//!   and recovered per-record: the line is skipped and counted, nothing more.

use serde::{Deserialize, Serialize};

/// Field value that marks a presence flag as "present"
pub const PRESENT: &str = "1";

/// Result of evaluating one record against a layout
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Verdict {
    /// Record passed every filter; carries the derived score (mean of all
    /// score fields)
    Qualified(f64),
    /// At least one required presence flag was not set
    Absent,
    /// At least one non-exempt score was exactly zero
    ZeroScore,
    /// Too few fields, or a score field that is not a number
    Malformed,
}

/// Static mapping from semantic field to column position
///
/// Built once from configuration and shared read-only by every thread in the
/// pool. Default positions match the ENEM 2023 microdata layout: presence
/// flags for the language and mathematics exams, four zero-checked component
/// scores, and the essay score (exempt, since a zero essay is a real grade).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldLayout {
    /// Field delimiter
    #[serde(default = "default_delimiter")]
    pub delimiter: char,
    /// Columns that must equal "1" for the record to qualify
    #[serde(default = "default_presence_cols")]
    pub presence_cols: Vec<usize>,
    /// Score columns where 0.0 means "absent" and disqualifies
    #[serde(default = "default_score_cols")]
    pub score_cols: Vec<usize>,
    /// Score columns included in the mean but exempt from the zero check
    #[serde(default = "default_exempt_cols")]
    pub exempt_cols: Vec<usize>,
}

fn default_delimiter() -> char {
    ';'
}

fn default_presence_cols() -> Vec<usize> {
    vec![25, 26]
}

fn default_score_cols() -> Vec<usize> {
    vec![31, 32, 33, 34]
}

fn default_exempt_cols() -> Vec<usize> {
    vec![50]
}

impl Default for FieldLayout {
    fn default() -> Self {
        Self {
            delimiter: default_delimiter(),
            presence_cols: default_presence_cols(),
            score_cols: default_score_cols(),
            exempt_cols: default_exempt_cols(),
        }
    }
}

impl FieldLayout {
    /// Minimum number of fields a record must have to cover every referenced
    /// column
    pub fn min_fields(&self) -> usize {
        self.presence_cols
            .iter()
            .chain(&self.score_cols)
            .chain(&self.exempt_cols)
            .max()
            .map(|&col| col + 1)
            .unwrap_or(0)
    }

    /// Total number of score fields entering the mean
    pub fn num_scores(&self) -> usize {
        self.score_cols.len() + self.exempt_cols.len()
    }

    /// Evaluate one raw record line
    ///
    /// Pure function: splits the line, applies the presence filter, the
    /// zero-score filter and derives the mean score. Short or non-numeric
    /// records come back as `Verdict::Malformed` instead of panicking.
    pub fn evaluate(&self, line: &str) -> Verdict {
        let fields: Vec<&str> = line.split(self.delimiter).collect();

        if fields.len() < self.min_fields() {
            return Verdict::Malformed;
        }

        for &col in &self.presence_cols {
            if fields[col].trim() != PRESENT {
                return Verdict::Absent;
            }
        }

        let mut sum = 0.0;
        for &col in &self.score_cols {
            match parse_score(fields[col]) {
                Some(score) if score == 0.0 => return Verdict::ZeroScore,
                Some(score) => sum += score,
                None => return Verdict::Malformed,
            }
        }
        for &col in &self.exempt_cols {
            match parse_score(fields[col]) {
                Some(score) => sum += score,
                None => return Verdict::Malformed,
            }
        }

        Verdict::Qualified(sum / self.num_scores() as f64)
    }
}

/// Parse one numeric score field
///
/// Empty fields read as 0.0 (the source data leaves absent scores blank);
/// non-empty text that is not a finite number is a malformed field. Rust's
/// f64 parser accepts "NaN" and "inf", which are never legitimate grades and
/// would poison every downstream sum, so they are rejected here.
fn parse_score(field: &str) -> Option<f64> {
    let trimmed = field.trim();
    if trimmed.is_empty() {
        Some(0.0)
    } else {
        trimmed.parse().ok().filter(|score: &f64| score.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Compact layout for tests: flags at 0-1, scores at 2-3, exempt at 4
    fn test_layout() -> FieldLayout {
        FieldLayout {
            delimiter: ';',
            presence_cols: vec![0, 1],
            score_cols: vec![2, 3],
            exempt_cols: vec![4],
        }
    }

    #[test]
    fn test_default_layout() {
        let layout = FieldLayout::default();
        assert_eq!(layout.delimiter, ';');
        assert_eq!(layout.min_fields(), 51);
        assert_eq!(layout.num_scores(), 5);
    }

    #[test]
    fn test_qualified_mean() {
        let layout = test_layout();
        match layout.evaluate("1;1;500.0;600.0;700.0") {
            Verdict::Qualified(value) => assert_eq!(value, 600.0),
            other => panic!("expected Qualified, got {:?}", other),
        }
    }

    #[test]
    fn test_absent_flag() {
        let layout = test_layout();
        assert_eq!(layout.evaluate("0;1;500.0;600.0;700.0"), Verdict::Absent);
        assert_eq!(layout.evaluate("1;2;500.0;600.0;700.0"), Verdict::Absent);
        assert_eq!(layout.evaluate(";;500.0;600.0;700.0"), Verdict::Absent);
    }

    #[test]
    fn test_zero_score_disqualifies() {
        let layout = test_layout();
        assert_eq!(layout.evaluate("1;1;0.0;600.0;700.0"), Verdict::ZeroScore);
        assert_eq!(layout.evaluate("1;1;500.0;0;700.0"), Verdict::ZeroScore);
    }

    #[test]
    fn test_exempt_zero_still_qualifies() {
        let layout = test_layout();
        match layout.evaluate("1;1;500.0;600.0;0.0") {
            Verdict::Qualified(value) => {
                assert!((value - 1100.0 / 3.0).abs() < 1e-9);
            }
            other => panic!("expected Qualified, got {:?}", other),
        }
    }

    #[test]
    fn test_empty_score_reads_as_zero() {
        let layout = test_layout();
        // Empty non-exempt score behaves like 0.0 and disqualifies
        assert_eq!(layout.evaluate("1;1;;600.0;700.0"), Verdict::ZeroScore);
        // Empty exempt score contributes 0.0 to the mean
        match layout.evaluate("1;1;500.0;600.0;") {
            Verdict::Qualified(value) => {
                assert!((value - 1100.0 / 3.0).abs() < 1e-9);
            }
            other => panic!("expected Qualified, got {:?}", other),
        }
    }

    #[test]
    fn test_short_record_is_malformed() {
        let layout = test_layout();
        assert_eq!(layout.evaluate("1;1;500.0"), Verdict::Malformed);
        assert_eq!(layout.evaluate(""), Verdict::Malformed);
    }

    #[test]
    fn test_non_numeric_score_is_malformed() {
        let layout = test_layout();
        assert_eq!(layout.evaluate("1;1;abc;600.0;700.0"), Verdict::Malformed);
        assert_eq!(layout.evaluate("1;1;500.0;600.0;xyz"), Verdict::Malformed);
    }

    #[test]
    fn test_non_finite_score_is_malformed() {
        let layout = test_layout();
        assert_eq!(layout.evaluate("1;1;NaN;600.0;700.0"), Verdict::Malformed);
        assert_eq!(layout.evaluate("1;1;inf;600.0;700.0"), Verdict::Malformed);
        assert_eq!(layout.evaluate("1;1;500.0;600.0;-inf"), Verdict::Malformed);
    }

    #[test]
    fn test_whitespace_tolerated() {
        let layout = test_layout();
        match layout.evaluate(" 1 ; 1 ; 500.0 ; 600.0 ; 700.0 ") {
            Verdict::Qualified(value) => assert_eq!(value, 600.0),
            other => panic!("expected Qualified, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_fields_ignored() {
        let layout = test_layout();
        match layout.evaluate("1;1;500.0;600.0;700.0;junk;more") {
            Verdict::Qualified(value) => assert_eq!(value, 600.0),
            other => panic!("expected Qualified, got {:?}", other),
        }
    }
}
