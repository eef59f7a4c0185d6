//! StatPulse CLI entry point

use anyhow::{Context, Result};
use statpulse::config::{self, cli::Cli, validator};
use statpulse::{output, pipeline, Config};

fn main() -> Result<()> {
    use std::time::Instant;

    let main_start = Instant::now();

    println!("StatPulse v{}", env!("CARGO_PKG_VERSION"));
    println!("Parallel statistics over delimited record streams");
    println!();

    let cli = Cli::parse_args();
    cli.validate()?;

    let config = config::from_cli(&cli)?;
    validator::validate_config(&config).context("Configuration validation failed")?;

    print_configuration(&config);

    if config.runtime.dry_run {
        println!();
        println!("Dry run mode - configuration validated successfully");
        return Ok(());
    }

    println!();
    println!("Starting run...");
    println!();

    let report = pipeline::run(&config)?;

    output::text::print_report(&report, &config);

    if let Some(ref path) = config.output.json_output {
        output::json::write_json_report(path, &report, &config)?;
        println!();
        println!("JSON report written to {}", path.display());
    }

    if config.runtime.debug {
        eprintln!(
            "DEBUG TIMING: total: {:.3}s",
            main_start.elapsed().as_secs_f64()
        );
    }

    Ok(())
}

/// Print configuration summary
fn print_configuration(config: &Config) {
    println!("Configuration:");
    println!("  Input:");
    println!("    Path: {}", config.input.path.display());
    println!(
        "    Header: {}",
        if config.input.has_header {
            "skip first line"
        } else {
            "none"
        }
    );
    println!("  Layout:");
    println!("    Delimiter: {:?}", config.layout.delimiter);
    println!("    Presence columns: {:?}", config.layout.presence_cols);
    println!("    Score columns: {:?}", config.layout.score_cols);
    println!("    Exempt columns: {:?}", config.layout.exempt_cols);
    println!("  Pool:");
    println!(
        "    Size: {} (1 coordinator + {} workers)",
        config.pool.size,
        config.pool.size - 1
    );
    println!("    Channel capacity: {}", config.pool.channel_capacity);
}
