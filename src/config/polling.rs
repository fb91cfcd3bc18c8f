//! Polling interval and backoff settings.

use std::time::Duration;

/// Default seconds between successful metric fetches.
const DEFAULT_INTERVAL_SECS: u64 = 30;
/// Default base delay for the first retry after a failure.
const DEFAULT_BACKOFF_BASE_SECS: u64 = 1;
/// Default retry ceiling before the poller gives up.
const DEFAULT_MAX_RETRIES: u32 = 5;

/// Settings for a [`crate::polling::PollingService`] instance.
#[derive(Debug, Clone, Copy)]
pub struct PollingConfig {
    /// Interval between successful fetches
    pub interval: Duration,
    /// Base delay for the first retry; doubles per consecutive failure
    pub backoff_base: Duration,
    /// Consecutive-failure ceiling after which the poller stops
    pub max_retries: u32,
}

impl PollingConfig {
    /// Reads polling settings from the environment, with defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let read_secs = |name: &str, default: u64| {
            std::env::var(name)
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(default)
        };

        Self {
            interval: Duration::from_secs(read_secs(
                "CONSOLE_POLL_INTERVAL_SECS",
                DEFAULT_INTERVAL_SECS,
            )),
            backoff_base: Duration::from_secs(read_secs(
                "CONSOLE_POLL_BACKOFF_BASE_SECS",
                DEFAULT_BACKOFF_BASE_SECS,
            )),
            max_retries: std::env::var("CONSOLE_POLL_MAX_RETRIES")
                .ok()
                .and_then(|raw| raw.parse().ok())
                .unwrap_or(DEFAULT_MAX_RETRIES),
        }
    }
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            backoff_base: Duration::from_secs(DEFAULT_BACKOFF_BASE_SECS),
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }
}
