//! Service configuration loading and validation

use anyhow::{Context, Result};
use jrtest_core::{LogLevel, ServiceConfig};
use std::path::Path;

/// Load a configuration file; `.json` is parsed as JSON, anything else as TOML
pub fn load(path: impl AsRef<Path>) -> Result<ServiceConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config: {:?}", path))?;

    if is_json(path) {
        ServiceConfig::from_json(content.as_bytes()).context("Failed to parse JSON config")
    } else {
        from_toml(&content)
    }
}

/// Parse configuration from TOML
pub fn from_toml(content: &str) -> Result<ServiceConfig> {
    toml::from_str(content).context("Failed to parse config")
}

pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

/// Reject settings the service cannot run with
pub fn validate(config: &ServiceConfig) -> Result<()> {
    if LogLevel::parse(&config.log_level).is_none() {
        anyhow::bail!("Unknown log level: {}", config.log_level);
    }

    if config.worker_threads == Some(0) {
        anyhow::bail!("worker_threads must be at least 1");
    }

    if config.search.default_limit <= 0 {
        anyhow::bail!("search.default_limit must be positive");
    }

    if config.search.max_query_len == 0 {
        anyhow::bail!("search.max_query_len must be positive");
    }

    let reviewer = &config.reviewer;
    if reviewer.activity_lookback_hours <= 0
        || reviewer.stats_window_hours <= 0
        || reviewer.choices_lookback_days <= 0
    {
        anyhow::bail!("reviewer windows must be positive");
    }

    if reviewer.time_zone.is_empty() || config.pivot.time_zone.is_empty() {
        anyhow::bail!("time_zone cannot be empty");
    }

    if config.pivot.group_by.is_empty() {
        anyhow::bail!("pivot.group_by cannot be empty");
    }

    Ok(())
}

/// Check command implementation
pub fn check(config_path: Option<String>) -> Result<()> {
    let path = config_path.unwrap_or_else(|| "jrtest.toml".to_string());

    println!("Checking config: {}", path);

    let config = load(&path)?;
    validate(&config)?;

    println!("✓ Log level: {}", config.log_level);
    println!(
        "✓ Search: default limit {}, max query length {}",
        config.search.default_limit, config.search.max_query_len
    );
    println!(
        "✓ Reviewer: excluded users {:?}, time zone {}",
        config.reviewer.excluded_user_ids, config.reviewer.time_zone
    );
    println!(
        "✓ Pivot: group by {}, pivot on {}",
        config.pivot.group_by, config.pivot.pivot_on_field_id
    );
    println!("\nConfig is valid!");

    Ok(())
}
