//! Backend connection settings.
//!
//! The console talks to one REST backend. Its location, the optional bearer
//! token, and the per-request timeout come from environment variables and
//! fall back to local-development defaults when unset.

use std::time::Duration;

/// Default backend when `CONSOLE_API_BASE_URL` is unset.
const DEFAULT_BASE_URL: &str = "http://localhost:8000";
/// Default per-request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Connection settings for the API client.
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// Backend base URL without trailing slash
    pub base_url: String,
    /// Bearer token attached to every request when present
    pub token: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
}

impl ConnectionConfig {
    /// Reads connection settings from the environment.
    ///
    /// `CONSOLE_API_BASE_URL` and `CONSOLE_API_TIMEOUT_SECS` fall back to
    /// local-development defaults; `CONSOLE_API_TOKEN` is optional and
    /// requests go out unauthenticated without it.
    #[must_use]
    pub fn from_env() -> Self {
        let base_url = std::env::var("CONSOLE_API_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();
        let token = std::env::var("CONSOLE_API_TOKEN").ok();
        let timeout_secs = std::env::var("CONSOLE_API_TIMEOUT_SECS")
            .ok()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            token,
            timeout: Duration::from_secs(timeout_secs),
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            token: None,
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}
