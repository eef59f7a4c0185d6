//! JSON report formatting
//!
//! Serializes the final run report for downstream tooling: run metadata
//! (version, host, timestamp), record counts, score statistics (null when
//! nothing qualified) and, on request, the raw histogram buckets.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::Path;

use crate::config::Config;
use crate::pipeline::RunReport;
use crate::Result;

/// Complete JSON report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonReport {
    pub metadata: JsonMetadata,
    pub records: JsonRecords,
    pub scores: JsonScores,
    pub elapsed_seconds: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub histogram: Option<JsonHistogram>,
}

/// Run identification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonMetadata {
    pub tool: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hostname: Option<String>,
    pub timestamp: String,
    pub input: String,
    pub pool_size: usize,
}

/// Record counts
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonRecords {
    pub enrolled: u64,
    pub qualifying: u64,
    pub filtered: u64,
    pub malformed: u64,
}

/// Score statistics (null when no records qualified)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonScores {
    pub max: Option<f64>,
    pub min: Option<f64>,
    pub mean: Option<f64>,
    pub sum: f64,
}

/// Raw histogram buckets
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonHistogram {
    pub bucket_width: f64,
    pub buckets: Vec<u64>,
    pub overflow: u64,
}

/// Build the JSON report structure from a finished run
pub fn build_report(report: &RunReport, config: &Config) -> JsonReport {
    let stats = &report.stats;

    let histogram = if config.output.json_histogram {
        Some(JsonHistogram {
            bucket_width: stats.histogram().bucket_width(),
            buckets: stats.histogram().buckets().to_vec(),
            overflow: stats.histogram().overflow(),
        })
    } else {
        None
    };

    JsonReport {
        metadata: JsonMetadata {
            tool: "statpulse".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            hostname: hostname::get().ok().and_then(|h| h.into_string().ok()),
            timestamp: chrono::Utc::now().to_rfc3339(),
            input: config.input.path.display().to_string(),
            pool_size: report.pool_size,
        },
        records: JsonRecords {
            enrolled: stats.seen(),
            qualifying: stats.qualifying(),
            filtered: stats.filtered(),
            malformed: stats.malformed(),
        },
        scores: JsonScores {
            max: stats.max(),
            min: stats.min(),
            mean: stats.mean(),
            sum: stats.sum(),
        },
        elapsed_seconds: report.elapsed.as_secs_f64(),
        histogram,
    }
}

/// Write the JSON report to a file
pub fn write_json_report(path: &Path, report: &RunReport, config: &Config) -> Result<()> {
    let json = build_report(report, config);

    let file = File::create(path)
        .with_context(|| format!("Failed to create JSON report: {}", path.display()))?;
    serde_json::to_writer_pretty(file, &json).context("Failed to serialize JSON report")?;

    Ok(())
}
