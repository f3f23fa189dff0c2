//! Request/response types and client configuration.

use cubeai_core::ChatFilters;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

/// Default chat endpoint base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8000";

/// Default request timeout. AI responses can be very slow, so this is
/// deliberately long (10 minutes).
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);

/// Maximum number of retries after the initial attempt.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

/// Base delay for exponential backoff (doubles per retry).
pub const DEFAULT_RETRY_BASE_DELAY: Duration = Duration::from_millis(1000);

/// How often the status monitor probes the health endpoint.
pub const DEFAULT_HEALTH_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Body of `POST {base_url}/chat/`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// User message text
    pub input: String,
    /// Flattened view context
    pub filters: ChatFilters,
    /// Conversation thread id
    pub thread_id: Uuid,
}

/// A successful assistant reply.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatReply {
    /// Extracted reply text
    pub content: String,
    /// Always 0: the retry counter resets on any successful response
    pub retry_attempt: u32,
}

/// Chat client configuration
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// Base URL of the CubeAI service
    pub base_url: String,
    /// Bearer token, if configured
    pub api_key: Option<String>,
    /// Per-request timeout
    pub timeout: Duration,
    /// Retries after the initial attempt
    pub max_retries: u32,
    /// Backoff base delay (`2^attempt * base`)
    pub retry_base_delay: Duration,
    /// Health polling interval
    pub health_poll_interval: Duration,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: DEFAULT_TIMEOUT,
            max_retries: DEFAULT_MAX_RETRIES,
            retry_base_delay: DEFAULT_RETRY_BASE_DELAY,
            health_poll_interval: DEFAULT_HEALTH_POLL_INTERVAL,
        }
    }
}

impl ChatConfig {
    /// Create a new configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create configuration from environment variables
    /// (`CUBEAI_API_URL`, `CUBEAI_API_KEY`).
    pub fn from_env() -> Self {
        let base_url =
            std::env::var("CUBEAI_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let api_key = std::env::var("CUBEAI_API_KEY").ok().filter(|k| !k.is_empty());
        Self {
            base_url,
            api_key,
            ..Self::default()
        }
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the bearer token
    #[must_use]
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the retry bound
    #[must_use]
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.timeout, Duration::from_secs(600));
        assert_eq!(config.max_retries, 2);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn config_builder() {
        let config = ChatConfig::new()
            .with_base_url("https://tap.usm.edu/api")
            .with_api_key("secret")
            .with_timeout(Duration::from_secs(30))
            .with_max_retries(1);
        assert_eq!(config.base_url, "https://tap.usm.edu/api");
        assert_eq!(config.api_key.as_deref(), Some("secret"));
        assert_eq!(config.max_retries, 1);
    }

    #[test]
    fn request_serializes_expected_body() {
        let request = ChatRequest {
            input: "salinity trend?".to_string(),
            filters: ChatFilters::default(),
            thread_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["input"], "salinity trend?");
        assert!(json["filters"].is_object());
        assert_eq!(json["thread_id"], "00000000-0000-0000-0000-000000000000");
    }
}
