//! CLI argument parsing using clap

use clap::Parser;
use std::path::PathBuf;

/// StatPulse - parallel statistics over delimited record streams
#[derive(Parser, Debug)]
#[command(name = "statpulse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Input file (delimited records, first line is a header)
    ///
    /// May also come from a --config file
    #[arg(value_name = "PATH")]
    pub input: Option<PathBuf>,

    // === Pool Options ===
    /// Total pool size including the coordinator (default: logical CPUs)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Capacity of each coordinator-to-worker channel
    #[arg(long, default_value = "1024")]
    pub channel_capacity: usize,

    // === Layout Options ===
    /// Field delimiter
    #[arg(long, default_value = ";")]
    pub delimiter: char,

    /// Input has no header line to skip
    #[arg(long)]
    pub no_header: bool,

    /// Presence-flag columns, zero-based (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub presence_cols: Option<Vec<usize>>,

    /// Zero-checked score columns, zero-based (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub score_cols: Option<Vec<usize>>,

    /// Score columns exempt from the zero check, zero-based (comma-separated)
    #[arg(long, value_delimiter = ',')]
    pub exempt_cols: Option<Vec<usize>>,

    // === Output Options ===
    /// JSON report output path
    #[arg(long)]
    pub json_output: Option<PathBuf>,

    /// Include raw histogram buckets in the JSON report
    #[arg(long)]
    pub json_histogram: bool,

    /// Print the score distribution histogram
    #[arg(long)]
    pub show_histogram: bool,

    /// Number of histogram buckets
    #[arg(long, default_value = "20")]
    pub histogram_buckets: usize,

    // === Configuration File ===
    /// TOML configuration file
    #[arg(short = 'c', long)]
    pub config: Option<PathBuf>,

    /// Dry run - validate configuration without executing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug output (timing, dispatch counters)
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Parse CLI arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate CLI arguments
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.input.is_none() && self.config.is_none() {
            anyhow::bail!("input path required (positional argument or --config file)");
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                anyhow::bail!("workers must be at least 1");
            }
        }

        if self.channel_capacity == 0 {
            anyhow::bail!("channel_capacity must be at least 1");
        }

        if self.histogram_buckets == 0 {
            anyhow::bail!("histogram_buckets must be at least 1");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli_from(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("statpulse").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let cli = cli_from(&["data.csv"]);
        assert_eq!(cli.delimiter, ';');
        assert_eq!(cli.channel_capacity, 1024);
        assert_eq!(cli.histogram_buckets, 20);
        assert!(cli.workers.is_none());
        assert!(cli.validate().is_ok());
    }

    #[test]
    fn test_column_lists() {
        let cli = cli_from(&["data.csv", "--presence-cols", "0,1", "--score-cols", "2,3,4"]);
        assert_eq!(cli.presence_cols, Some(vec![0, 1]));
        assert_eq!(cli.score_cols, Some(vec![2, 3, 4]));
    }

    #[test]
    fn test_missing_input_rejected() {
        let cli = cli_from(&["--workers", "4"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_zero_workers_rejected() {
        let cli = cli_from(&["data.csv", "--workers", "0"]);
        assert!(cli.validate().is_err());
    }

    #[test]
    fn test_zero_channel_capacity_rejected() {
        let cli = cli_from(&["data.csv", "--channel-capacity", "0"]);
        assert!(cli.validate().is_err());
    }
}
