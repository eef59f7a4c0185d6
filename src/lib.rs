//! StatPulse - parallel statistics over delimited record streams
//!
//! StatPulse is a batch CLI tool that computes aggregate statistics (maximum,
//! minimum, mean and qualifying-record counts) over very large delimited text
//! files, splitting the work across a fixed pool of threads to bound
//! wall-clock time.
//!
//! # Architecture
//!
//! - **Coordinator**: sole owner of the input stream, round-robin dispatch
//! - **Workers**: independent filter/aggregate loops fed over FIFO channels
//! - **Reduction**: associative merge of per-thread aggregates into one result
//! - **Reports**: human-readable text plus optional JSON output

pub mod config;
pub mod output;
pub mod pipeline;
pub mod record;
pub mod stats;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use record::FieldLayout;
pub use stats::LocalStats;

/// Result type used throughout StatPulse
pub type Result<T> = anyhow::Result<T>;
