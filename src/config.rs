//! Client configuration parsed from environment variables.

use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self { request_secs: DEFAULT_REQUEST_TIMEOUT_SECS, connect_secs: DEFAULT_CONNECT_TIMEOUT_SECS }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base URL of the REST API, without a trailing slash.
    pub api_url: String,
    pub timeouts: Timeouts,
    pub poll_interval: Duration,
}

impl ClientConfig {
    /// Config for `api_url` with default timeouts and poll interval.
    #[must_use]
    pub fn new(api_url: &str) -> Self {
        Self {
            api_url: api_url.trim_end_matches('/').to_string(),
            timeouts: Timeouts::default(),
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
        }
    }

    /// Build typed client config from environment variables.
    ///
    /// Optional:
    /// - `AUTONET_API_URL`: default `http://localhost:8000/api`
    /// - `AUTONET_REQUEST_TIMEOUT_SECS`: default 30
    /// - `AUTONET_CONNECT_TIMEOUT_SECS`: default 10
    /// - `AUTONET_POLL_INTERVAL_SECS`: default 5
    #[must_use]
    pub fn from_env() -> Self {
        let api_url = std::env::var("AUTONET_API_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let mut config = Self::new(api_url.trim());
        config.timeouts = Timeouts {
            request_secs: env_parse_u64("AUTONET_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("AUTONET_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };
        config.poll_interval =
            Duration::from_secs(env_parse_u64("AUTONET_POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS).max(1));
        config
    }

    /// Join an API path (`/login`) onto the base URL.
    #[must_use]
    pub fn api_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    /// Backend host without the `/api` prefix. OAuth routes live here.
    #[must_use]
    pub fn backend_host(&self) -> &str {
        self.api_url.strip_suffix("/api").unwrap_or(&self.api_url)
    }

    /// Join an OAuth path (`/auth/google`) onto the bare backend host.
    #[must_use]
    pub fn host_endpoint(&self, path: &str) -> String {
        format!("{}{}", self.backend_host(), path)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_URL)
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
