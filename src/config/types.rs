//! Configuration types

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// HTTP fetcher settings
    #[serde(default)]
    pub fetcher: FetcherConfig,
    /// Polling scheduler settings
    #[serde(default)]
    pub scheduler: SchedulerConfig,
    /// Alert formatting
    #[serde(default)]
    pub alerts: AlertConfig,
    /// General application settings
    #[serde(default)]
    pub settings: AppSettings,
}

/// HTTP document fetcher configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Per-request timeout in seconds
    #[serde(default = "default_fetch_timeout")]
    pub timeout_seconds: u64,
    /// User-Agent sent with every page request
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Maximum number of redirects followed before giving up
    #[serde(default = "default_max_redirects")]
    pub max_redirects: usize,
}

impl FetcherConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: default_fetch_timeout(),
            user_agent: default_user_agent(),
            max_redirects: default_max_redirects(),
        }
    }
}

fn default_fetch_timeout() -> u64 {
    15
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; PriceWatch/1.0)".to_string()
}

fn default_max_redirects() -> usize {
    10
}

/// Polling scheduler configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchedulerConfig {
    /// Seconds between the start of two cycles
    #[serde(default = "default_interval")]
    pub interval_seconds: u64,
    /// Delay before the first cycle after startup
    #[serde(default = "default_first_run_delay")]
    pub first_run_delay_seconds: u64,
    /// Upper bound on in-flight fetches across all owners
    #[serde(default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: usize,
}

impl SchedulerConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_seconds.max(1))
    }

    pub fn first_run_delay(&self) -> Duration {
        Duration::from_secs(self.first_run_delay_seconds)
    }
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            interval_seconds: default_interval(),
            first_run_delay_seconds: default_first_run_delay(),
            max_concurrent_fetches: default_max_concurrent_fetches(),
        }
    }
}

fn default_interval() -> u64 {
    600
}

fn default_first_run_delay() -> u64 {
    10
}

fn default_max_concurrent_fetches() -> usize {
    8
}

/// Alert and reply formatting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlertConfig {
    /// Label printed after every price
    #[serde(default = "default_currency_label")]
    pub currency_label: String,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            currency_label: default_currency_label(),
        }
    }
}

fn default_currency_label() -> String {
    "TL".to_string()
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
