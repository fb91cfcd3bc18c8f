//! Configuration management for the console data layer.

/// Backend connection settings from environment variables
pub mod connection;
/// Polling interval and backoff settings
pub mod polling;
/// Metric threshold bands loaded from thresholds.toml
pub mod thresholds;

use crate::errors::Result;
use tracing::info;

/// Fully resolved application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Backend connection settings
    pub connection: connection::ConnectionConfig,
    /// Metric threshold bands
    pub thresholds: thresholds::MetricThresholds,
    /// Polling settings
    pub polling: polling::PollingConfig,
}

/// Loads the complete application configuration.
///
/// Connection and polling settings come from environment variables with
/// defaults; thresholds come from `thresholds.toml` when present, otherwise
/// the compiled-in defaults are used.
pub fn load_app_configuration() -> Result<AppConfig> {
    let connection = connection::ConnectionConfig::from_env();
    let thresholds = thresholds::load_default_thresholds().unwrap_or_else(|e| {
        info!("Using built-in metric thresholds ({e})");
        thresholds::MetricThresholds::default()
    });
    let polling = polling::PollingConfig::from_env();
    Ok(AppConfig {
        connection,
        thresholds,
        polling,
    })
}
