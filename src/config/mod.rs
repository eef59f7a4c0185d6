//! Configuration module
//!
//! Handles CLI argument parsing, TOML configuration files, and validation.

pub mod cli;
pub mod toml;
pub mod validator;

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::record::FieldLayout;
use crate::Result;
use cli::Cli;

/// Complete run configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub input: InputConfig,
    #[serde(default)]
    pub layout: FieldLayout,
    #[serde(default)]
    pub pool: PoolConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub runtime: RuntimeConfig,
}

/// Input stream configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputConfig {
    /// Path to the delimited input file
    pub path: PathBuf,
    /// Whether the first line is a header to discard
    #[serde(default = "default_has_header")]
    pub has_header: bool,
}

fn default_has_header() -> bool {
    true
}

/// Worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Total pool size, coordinator included (owner 0 is the coordinator)
    #[serde(default = "default_pool_size")]
    pub size: usize,
    /// Capacity of each coordinator-to-worker channel
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

fn default_pool_size() -> usize {
    num_cpus::get()
}

fn default_channel_capacity() -> usize {
    1024
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            size: default_pool_size(),
            channel_capacity: default_channel_capacity(),
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// JSON report output path
    pub json_output: Option<PathBuf>,
    /// Include raw histogram buckets in the JSON report
    #[serde(default)]
    pub json_histogram: bool,
    /// Print the score distribution histogram
    #[serde(default)]
    pub show_histogram: bool,
    /// Number of histogram buckets
    #[serde(default = "default_histogram_buckets")]
    pub histogram_buckets: usize,
}

fn default_histogram_buckets() -> usize {
    20
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            json_output: None,
            json_histogram: false,
            show_histogram: false,
            histogram_buckets: default_histogram_buckets(),
        }
    }
}

/// Runtime configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Validate configuration without executing
    #[serde(default)]
    pub dry_run: bool,
    /// Enable debug output
    #[serde(default)]
    pub debug: bool,
}

/// Build the run configuration from CLI arguments
///
/// When `--config` names a TOML file, the file supplies the base and CLI
/// arguments override it; otherwise the configuration comes from CLI
/// arguments and defaults alone.
pub fn from_cli(cli: &Cli) -> Result<Config> {
    if let Some(ref path) = cli.config {
        let file_config = toml::parse_toml_file(path)?;
        toml::merge_cli_with_config(cli, file_config)
    } else {
        build_from_cli(cli)
    }
}

fn build_from_cli(cli: &Cli) -> Result<Config> {
    let path = cli
        .input
        .clone()
        .ok_or_else(|| anyhow::anyhow!("input path required"))?;

    let defaults = FieldLayout::default();
    let layout = FieldLayout {
        delimiter: cli.delimiter,
        presence_cols: cli.presence_cols.clone().unwrap_or(defaults.presence_cols),
        score_cols: cli.score_cols.clone().unwrap_or(defaults.score_cols),
        exempt_cols: cli.exempt_cols.clone().unwrap_or(defaults.exempt_cols),
    };

    Ok(Config {
        input: InputConfig {
            path,
            has_header: !cli.no_header,
        },
        layout,
        pool: PoolConfig {
            size: cli.workers.unwrap_or_else(num_cpus::get),
            channel_capacity: cli.channel_capacity,
        },
        output: OutputConfig {
            json_output: cli.json_output.clone(),
            json_histogram: cli.json_histogram,
            show_histogram: cli.show_histogram,
            histogram_buckets: cli.histogram_buckets,
        },
        runtime: RuntimeConfig {
            dry_run: cli.dry_run,
            debug: cli.debug,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli_from(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("statpulse").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_build_from_cli_defaults() {
        let config = from_cli(&cli_from(&["data.csv"])).unwrap();

        assert_eq!(config.input.path, PathBuf::from("data.csv"));
        assert!(config.input.has_header);
        assert_eq!(config.layout, FieldLayout::default());
        assert!(config.pool.size >= 1);
        assert!(!config.runtime.dry_run);
    }

    #[test]
    fn test_build_from_cli_overrides() {
        let config = from_cli(&cli_from(&[
            "data.csv",
            "--workers",
            "4",
            "--no-header",
            "--delimiter",
            ",",
            "--presence-cols",
            "0",
            "--score-cols",
            "1,2",
            "--exempt-cols",
            "3",
            "--show-histogram",
        ]))
        .unwrap();

        assert_eq!(config.pool.size, 4);
        assert!(!config.input.has_header);
        assert_eq!(config.layout.delimiter, ',');
        assert_eq!(config.layout.presence_cols, vec![0]);
        assert_eq!(config.layout.score_cols, vec![1, 2]);
        assert_eq!(config.layout.exempt_cols, vec![3]);
        assert!(config.output.show_histogram);
    }
}
