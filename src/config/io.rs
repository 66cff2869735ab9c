use super::models::SyncConfig;
use super::tables::ConfigTables;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Parse a TOML document into a [`SyncConfig`]. Missing tables and keys fall
/// back to their defaults; unknown keys are ignored.
pub fn parse_config(text: &str) -> Result<SyncConfig> {
    let tables: ConfigTables = toml::from_str(text).context("Invalid config TOML")?;
    Ok(tables.into())
}

pub fn serialize_config(config: &SyncConfig) -> Result<String> {
    let tables = ConfigTables::from(config);
    toml::to_string_pretty(&tables).context("Failed to serialize config")
}

/// Load configuration from `path`, falling back to defaults when the file is
/// absent or malformed so the host can always start.
pub fn load_config(path: &Path) -> SyncConfig {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) => {
            info!(path = %path.display(), %err, "No config file; using defaults");
            return SyncConfig::default();
        }
    };
    match parse_config(&text) {
        Ok(config) => config,
        Err(err) => {
            warn!(path = %path.display(), %err, "Failed to parse config; using defaults");
            SyncConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LogLevel;

    #[test]
    fn empty_document_yields_defaults() {
        let config = parse_config("").expect("empty config parses");
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn partial_tables_keep_other_defaults() {
        let config = parse_config(
            r#"
            [tasks]
            poll_interval_ms = 250

            [logging]
            log_level = "warn"
            "#,
        )
        .expect("partial config parses");
        assert_eq!(config.poll_interval_ms, 250);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(
            config.scroll_step_distance,
            SyncConfig::default().scroll_step_distance,
            "untouched sections keep their defaults"
        );
    }

    #[test]
    fn serialize_then_parse_round_trips() {
        let mut config = SyncConfig::default();
        config.poll_interval_ms = 1500;
        config.key_scroll_forward = "n".to_string();
        config.progress_retention_days = 7;

        let text = serialize_config(&config).expect("serializes");
        let parsed = parse_config(&text).expect("round-trips");
        assert_eq!(parsed, config);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config = load_config(Path::new("/nonexistent/mangashelf-sync.toml"));
        assert_eq!(config, SyncConfig::default());
    }

    #[test]
    fn malformed_file_is_not_fatal() {
        let config = parse_config("tasks = 3");
        assert!(config.is_err(), "type mismatch surfaces as a parse error");
    }
}
