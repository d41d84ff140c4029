//! Configuration loader

use config::{Config, Environment, File};
use std::path::Path;

use super::types::AppConfig;
use crate::common::errors::{Result, WatchError};

/// Load configuration from file and environment variables
///
/// Priority (highest to lowest):
/// 1. Environment variables (prefixed with APP__, e.g. `APP__SCHEDULER__INTERVAL_SECONDS`)
/// 2. Configuration file (TOML format)
/// 3. Default values
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        if Path::new(path).exists() {
            builder = builder.add_source(File::with_name(path).required(false));
        }
    }

    builder = builder.add_source(
        Environment::with_prefix("APP")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| WatchError::Configuration(e.to_string()))?;

    config
        .try_deserialize()
        .map_err(|e| WatchError::Configuration(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_missing_file_yields_defaults() {
        let config = load_config(Some("definitely/not/here.toml")).unwrap();
        assert_eq!(config.scheduler.interval_seconds, 600);
        assert_eq!(config.fetcher.timeout_seconds, 15);
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = std::env::temp_dir().join(format!("price_watch_cfg_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("watch.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[scheduler]\ninterval_seconds = 120\n\n[alerts]\ncurrency_label = \"TRY\""
        )
        .unwrap();

        let config = load_config(path.to_str()).unwrap();
        assert_eq!(config.scheduler.interval_seconds, 120);
        assert_eq!(config.alerts.currency_label, "TRY");
        assert_eq!(config.scheduler.first_run_delay_seconds, 10);

        std::fs::remove_dir_all(&dir).ok();
    }
}
