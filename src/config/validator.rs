//! Configuration validation
//!
//! Cross-field checks that CLI parsing alone cannot express, run once before
//! any thread is spawned.

use anyhow::{bail, Result};
use std::collections::HashSet;

use super::Config;

/// Validate a complete run configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.pool.size == 0 {
        bail!("pool size must be at least 1");
    }
    if config.pool.channel_capacity == 0 {
        bail!("channel capacity must be at least 1");
    }
    if config.output.histogram_buckets == 0 {
        bail!("histogram buckets must be at least 1");
    }

    let layout = &config.layout;
    if layout.score_cols.is_empty() && layout.exempt_cols.is_empty() {
        bail!("layout needs at least one score column");
    }

    check_unique("presence", &layout.presence_cols)?;
    check_unique("score", &layout.score_cols)?;
    check_unique("exempt", &layout.exempt_cols)?;

    let scores: HashSet<usize> = layout.score_cols.iter().copied().collect();
    let exempt: HashSet<usize> = layout.exempt_cols.iter().copied().collect();

    if let Some(col) = scores.intersection(&exempt).next() {
        bail!("column {} is both zero-checked and exempt", col);
    }
    for &col in &layout.presence_cols {
        if scores.contains(&col) || exempt.contains(&col) {
            bail!("column {} is both a presence flag and a score", col);
        }
    }

    Ok(())
}

fn check_unique(name: &str, cols: &[usize]) -> Result<()> {
    let unique: HashSet<usize> = cols.iter().copied().collect();
    if unique.len() != cols.len() {
        bail!("duplicate {} column in layout", name);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{InputConfig, OutputConfig, PoolConfig, RuntimeConfig};
    use crate::record::FieldLayout;

    fn base_config() -> Config {
        Config {
            input: InputConfig {
                path: "scores.csv".into(),
                has_header: true,
            },
            layout: FieldLayout::default(),
            pool: PoolConfig::default(),
            output: OutputConfig::default(),
            runtime: RuntimeConfig::default(),
        }
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&base_config()).is_ok());
    }

    #[test]
    fn test_zero_pool_rejected() {
        let mut config = base_config();
        config.pool.size = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_no_score_columns_rejected() {
        let mut config = base_config();
        config.layout.score_cols.clear();
        config.layout.exempt_cols.clear();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_overlapping_score_and_exempt_rejected() {
        let mut config = base_config();
        config.layout.score_cols = vec![2, 3];
        config.layout.exempt_cols = vec![3];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_presence_column_reused_as_score_rejected() {
        let mut config = base_config();
        config.layout.presence_cols = vec![2];
        config.layout.score_cols = vec![2, 3];
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_duplicate_columns_rejected() {
        let mut config = base_config();
        config.layout.score_cols = vec![2, 2];
        assert!(validate_config(&config).is_err());
    }
}
