//! Back-office configuration loaded from environment variables.
//!
//! The binary calls `dotenvy::dotenv()` first, so a local `.env` file works
//! too. Unset or unparseable values fall back to their defaults.

use std::env;
use std::time::Duration;

/// Runtime configuration.
///
/// # Environment Variables
///
/// - `ADMIN_API_URL`: REST backend base URL (default: `http://localhost:5000/api`)
/// - `ADMIN_CONNECT_TIMEOUT_MS`: TCP connect timeout (default: `5000`)
/// - `ADMIN_REQUEST_TIMEOUT_MS`: whole-request timeout (default: `30000`)
/// - `ADMIN_SESSION_TIMEOUT_SECS`: idle time before auto-logout (default: `1800`)
/// - `ADMIN_SEARCH_DEBOUNCE_MS`: search debounce delay (default: `500`)
/// - `ADMIN_PAGE_SIZE`: rows per table page (default: `20`)
#[derive(Clone, Debug, PartialEq)]
pub struct AdminConfig {
    pub api_url: String,
    pub connect_timeout_ms: u64,
    pub request_timeout_ms: u64,
    pub session_timeout_secs: u64,
    pub search_debounce_ms: u64,
    pub page_size: u32,
}

impl Default for AdminConfig {
    fn default() -> Self {
        Self {
            api_url: "http://localhost:5000/api".into(),
            connect_timeout_ms: 5000,
            request_timeout_ms: 30000,
            session_timeout_secs: 1800,
            search_debounce_ms: 500,
            page_size: 20,
        }
    }
}

impl AdminConfig {
    /// Load configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let number = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.trim().parse().ok())
                .unwrap_or(default)
        };

        Self {
            api_url: lookup("ADMIN_API_URL")
                .map(|url| url.trim().trim_end_matches('/').to_string())
                .filter(|url| !url.is_empty())
                .unwrap_or(defaults.api_url),
            connect_timeout_ms: number("ADMIN_CONNECT_TIMEOUT_MS", defaults.connect_timeout_ms),
            request_timeout_ms: number("ADMIN_REQUEST_TIMEOUT_MS", defaults.request_timeout_ms),
            session_timeout_secs: number("ADMIN_SESSION_TIMEOUT_SECS", defaults.session_timeout_secs),
            search_debounce_ms: number("ADMIN_SEARCH_DEBOUNCE_MS", defaults.search_debounce_ms),
            page_size: lookup("ADMIN_PAGE_SIZE")
                .and_then(|v| v.trim().parse().ok())
                .filter(|size: &u32| *size > 0)
                .unwrap_or(defaults.page_size),
        }
    }

    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    pub fn session_timeout(&self) -> Duration {
        Duration::from_secs(self.session_timeout_secs)
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
