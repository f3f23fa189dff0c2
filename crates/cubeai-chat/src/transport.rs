//! Transport seam for the chat pipeline.

use crate::error::{Error, Result};
use crate::types::{ChatConfig, ChatRequest};
use reqwest::Client;
use tracing::debug;

/// The HTTP seam under the retry loop.
///
/// The retry logic in [`crate::client::ChatClient`] is written against
/// this trait so it can be exercised with a mock transport in tests.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ChatTransport: Send + Sync {
    /// POST the request to `/chat/` and return the raw JSON body.
    async fn post_chat(&self, request: &ChatRequest) -> Result<serde_json::Value>;

    /// GET `/healthz`; `Ok(())` means the service is live.
    async fn probe_health(&self) -> Result<()>;
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: Client,
    config: ChatConfig,
}

impl HttpTransport {
    /// Build a transport from configuration.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;
        Ok(Self { client, config })
    }

    fn map_send_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::Timeout(self.config.timeout.as_millis() as u64)
        } else if e.is_connect() {
            Error::Network(format!(
                "failed to connect to CubeAI service at {}: {}",
                self.config.base_url, e
            ))
        } else {
            Error::Network(e.to_string())
        }
    }
}

#[async_trait::async_trait]
impl ChatTransport for HttpTransport {
    async fn post_chat(&self, request: &ChatRequest) -> Result<serde_json::Value> {
        let url = format!("{}/chat/", self.config.base_url);
        debug!(thread_id = %request.thread_id, "posting chat request");

        let mut builder = self.client.post(&url).json(request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        serde_json::from_str(&body).map_err(|_| Error::InvalidResponseFormat)
    }

    async fn probe_health(&self) -> Result<()> {
        let url = format!("{}/healthz", self.config.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| self.map_send_error(e))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(Error::Api {
                status: status.as_u16(),
                message: "health probe failed".to_string(),
            })
        }
    }
}
