//! Client configuration
//!
//! # Environment variables
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | ORDER_API_URL | http://localhost:3000/api/v1 | Order service base URL |
//! | RESTAURANT_API_URL | http://localhost:3000/api/v1 | Restaurant service base URL |
//! | MENU_API_URL | http://localhost:3001/api/v1/menu | Menu service base URL |
//! | ACCESS_TOKEN | (unset) | Bearer token issued by the auth service |
//! | REQUEST_TIMEOUT_MS | 10000 | Per-request timeout |
//! | POLL_INTERVAL_MS | 5000 | Order refresh period |

use std::time::Duration;

use crate::error::DeskResult;
use crate::gateway::Gateways;

pub const DEFAULT_ORDER_API_URL: &str = "http://localhost:3000/api/v1";
pub const DEFAULT_RESTAURANT_API_URL: &str = "http://localhost:3000/api/v1";
pub const DEFAULT_MENU_API_URL: &str = "http://localhost:3001/api/v1/menu";

/// Shortest refresh period the poller accepts
pub const MIN_POLL_INTERVAL_MS: u64 = 1;

/// Client configuration for the order, restaurant and menu services
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Order service base URL
    pub order_api_url: String,
    /// Restaurant service base URL
    pub restaurant_api_url: String,
    /// Menu service base URL
    pub menu_api_url: String,
    /// Bearer token for authentication
    pub access_token: Option<String>,
    /// Request timeout in milliseconds
    pub request_timeout_ms: u64,
    /// Refresh period in milliseconds
    pub poll_interval_ms: u64,
}

impl ClientConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            order_api_url: lookup("ORDER_API_URL").unwrap_or_else(|| DEFAULT_ORDER_API_URL.into()),
            restaurant_api_url: lookup("RESTAURANT_API_URL")
                .unwrap_or_else(|| DEFAULT_RESTAURANT_API_URL.into()),
            menu_api_url: lookup("MENU_API_URL").unwrap_or_else(|| DEFAULT_MENU_API_URL.into()),
            access_token: lookup("ACCESS_TOKEN").filter(|t| !t.is_empty()),
            request_timeout_ms: lookup("REQUEST_TIMEOUT_MS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(10_000),
            poll_interval_ms: lookup("POLL_INTERVAL_MS")
                .and_then(|v| v.parse().ok())
                .filter(|ms| *ms > 0)
                .unwrap_or(5_000),
        }
    }

    /// Point all three services at one base URL
    pub fn single_host(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            order_api_url: base_url.clone(),
            restaurant_api_url: base_url.clone(),
            menu_api_url: format!("{}/menu", base_url.trim_end_matches('/')),
            ..Self::from_lookup(|_| None)
        }
    }

    /// Set the bearer token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout_ms = timeout.as_millis() as u64;
        self
    }

    /// Set the refresh period, rounded down to whole milliseconds but never
    /// below one
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_ms = (interval.as_millis() as u64).max(MIN_POLL_INTERVAL_MS);
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    /// Build HTTP gateways from this configuration
    pub fn build_gateways(&self) -> DeskResult<Gateways> {
        Gateways::http(self)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::from_env()
    }
}
