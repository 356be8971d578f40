//! Client configuration.
//!
//! Everything the HTTP layer needs to talk to the remote service: base URL,
//! fixed API key, user agent and timeout. Passed explicitly to
//! [`ApiClient::new`](crate::api::ApiClient::new) so several configurations
//! (e.g. a mock server in tests) can coexist in one process.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Base URL for all REST endpoints
pub const DEFAULT_BASE_URL: &str = "https://web.spaggiari.eu/rest/v1";

/// Application key the service expects from its mobile client
pub const DEFAULT_API_KEY: &str = "Tg1NWEwNGIgIC0K";

/// User agent of the mobile client
pub const DEFAULT_USER_AGENT: &str = "CVVS/std/4.2.3 Android/12";

/// HTTP request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub api_key: String,
    pub user_agent: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ClientConfig {
    /// Default configuration pointed at another base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Absolute URL for a path relative to the base URL.
    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let config = ClientConfig::with_base_url("http://127.0.0.1:1234/rest/v1/");
        assert_eq!(
            config.url("/auth/login"),
            "http://127.0.0.1:1234/rest/v1/auth/login"
        );
        assert_eq!(
            ClientConfig::default().url("/students/1/grades"),
            "https://web.spaggiari.eu/rest/v1/students/1/grades"
        );
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"base_url": "http://localhost"}"#).unwrap();
        assert_eq!(config.base_url, "http://localhost");
        assert_eq!(config.api_key, DEFAULT_API_KEY);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
    }
}
