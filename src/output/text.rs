//! Human-readable text output

use crate::config::Config;
use crate::pipeline::RunReport;

/// Print the final run report to the console
///
/// Shows record counts, the score statistics (or a "no data" line when
/// nothing qualified), elapsed wall time, the pool size used and, on
/// request, the score distribution histogram.
pub fn print_report(report: &RunReport, config: &Config) {
    let stats = &report.stats;

    println!("═══════════════════════════════════════════════════════════");
    println!("                    RUN RESULTS");
    println!("═══════════════════════════════════════════════════════════");
    println!();

    println!("Elapsed Time: {:.3}s", report.elapsed.as_secs_f64());
    println!();

    println!("Records:");
    println!("  Enrolled:   {}", format_number(stats.seen()));
    println!("  Qualifying: {}", format_number(stats.qualifying()));
    println!("  Filtered:   {}", format_number(stats.filtered()));
    if stats.malformed() > 0 {
        println!("  Malformed:  {} (skipped)", format_number(stats.malformed()));
    }
    println!();

    println!("Scores:");
    match (stats.max(), stats.min(), stats.mean()) {
        (Some(max), Some(min), Some(mean)) => {
            println!("  Max:  {:.2}", max);
            println!("  Min:  {:.2}", min);
            println!("  Mean: {:.2}", mean);
        }
        _ => {
            println!("  No data - no records qualified");
        }
    }
    println!();

    if config.output.show_histogram {
        if let Some(rendered) = stats.histogram().render() {
            println!("{}", rendered);
        }
    }

    println!(
        "Pool: {} thread(s) (1 coordinator + {} workers)",
        report.pool_size,
        report.pool_size - 1
    );
    println!("═══════════════════════════════════════════════════════════");
}

/// Format a number with thousands separators
fn format_number(n: u64) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut count = 0;

    for c in s.chars().rev() {
        if count > 0 && count % 3 == 0 {
            result.push(',');
        }
        result.push(c);
        count += 1;
    }

    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(0), "0");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(1234567), "1,234,567");
    }
}
