//! TOML configuration file parsing

use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

use super::Config;
use crate::config::cli::Cli;

/// Parse TOML configuration file
pub fn parse_toml_file(path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    parse_toml_string(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Parse TOML configuration from string
pub fn parse_toml_string(contents: &str) -> Result<Config> {
    let config: Config =
        ::toml::from_str(contents).context("Failed to parse TOML configuration")?;

    Ok(config)
}

/// Merge CLI arguments with TOML configuration (CLI takes precedence)
pub fn merge_cli_with_config(cli: &Cli, mut config: Config) -> Result<Config> {
    // Override input settings from CLI
    if let Some(ref path) = cli.input {
        config.input.path = path.clone();
    }
    if cli.no_header {
        config.input.has_header = false;
    }

    // Override layout settings
    if cli.delimiter != ';' {
        config.layout.delimiter = cli.delimiter;
    }
    if let Some(ref cols) = cli.presence_cols {
        config.layout.presence_cols = cols.clone();
    }
    if let Some(ref cols) = cli.score_cols {
        config.layout.score_cols = cols.clone();
    }
    if let Some(ref cols) = cli.exempt_cols {
        config.layout.exempt_cols = cols.clone();
    }

    // Override pool settings
    if let Some(workers) = cli.workers {
        config.pool.size = workers;
    }
    if cli.channel_capacity != 1024 {
        config.pool.channel_capacity = cli.channel_capacity;
    }

    // Override output settings
    if let Some(ref path) = cli.json_output {
        config.output.json_output = Some(path.clone());
    }
    if cli.json_histogram {
        config.output.json_histogram = true;
    }
    if cli.show_histogram {
        config.output.show_histogram = true;
    }
    if cli.histogram_buckets != 20 {
        config.output.histogram_buckets = cli.histogram_buckets;
    }

    // Override runtime settings
    if cli.dry_run {
        config.runtime.dry_run = true;
    }
    if cli.debug {
        config.runtime.debug = true;
    }

    Ok(config)
}
