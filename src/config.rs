//! Client configuration

use std::time::Duration;

/// Default API location for local development
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Environment variable holding the API base URL
pub const ENV_API_URL: &str = "UFC_API_URL";

/// Environment variable holding an optional request timeout in seconds
pub const ENV_API_TIMEOUT_SECS: &str = "UFC_API_TIMEOUT_SECS";

/// Prediction client configuration
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL of the prediction API, without a trailing path
    pub base_url: String,
    /// Request timeout in seconds; `None` leaves the transport default
    pub timeout_secs: Option<u64>,
    /// User agent string
    pub user_agent: String,
    /// Bypass any proxy configured in the environment
    pub no_proxy: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            user_agent: format!("ufc-predictor/{}", env!("CARGO_PKG_VERSION")),
            no_proxy: false,
        }
    }
}

impl ClientConfig {
    /// Configuration pointing at the given base URL
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    /// Build a configuration from `UFC_API_URL` and `UFC_API_TIMEOUT_SECS`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            let url = url.trim();
            if !url.is_empty() {
                config.base_url = url.to_string();
            }
        }

        if let Some(raw) = lookup(ENV_API_TIMEOUT_SECS) {
            match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => config.timeout_secs = Some(secs),
                _ => tracing::warn!(
                    "Ignoring {}={:?}: expected a positive number of seconds",
                    ENV_API_TIMEOUT_SECS,
                    raw
                ),
            }
        }

        config
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
