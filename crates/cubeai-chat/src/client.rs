//! Chat client with bounded exponential-backoff retry.

use crate::error::{Error, Result};
use crate::extract;
use crate::status::StatusMonitor;
use crate::transport::{ChatTransport, HttpTransport};
use crate::types::{ChatConfig, ChatReply, ChatRequest};
use cubeai_core::ChatFilters;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{instrument, warn};
use uuid::Uuid;

/// Client for the remote chat endpoint.
///
/// Wraps a [`ChatTransport`] with the retry policy: network errors,
/// timeouts, and 5xx responses are retried with delays of
/// `2^attempt * base` (1 s then 2 s by default), up to `max_retries`
/// times. Client errors and malformed responses surface immediately.
pub struct ChatClient {
    transport: Box<dyn ChatTransport>,
    max_retries: u32,
    retry_base_delay: Duration,
    status: Option<Arc<StatusMonitor>>,
    /// Retries spent on the in-flight request, surfaced to the UI while
    /// a send is pending. Reset at the start of every send.
    retries_in_flight: AtomicU32,
}

impl ChatClient {
    /// Build a client with the reqwest transport.
    pub fn new(config: ChatConfig) -> Result<Self> {
        let max_retries = config.max_retries;
        let retry_base_delay = config.retry_base_delay;
        let transport = HttpTransport::new(config)?;
        Ok(Self {
            transport: Box::new(transport),
            max_retries,
            retry_base_delay,
            status: None,
            retries_in_flight: AtomicU32::new(0),
        })
    }

    /// Build a client over an arbitrary transport (used by tests).
    pub fn with_transport(transport: Box<dyn ChatTransport>, config: &ChatConfig) -> Self {
        Self {
            transport,
            max_retries: config.max_retries,
            retry_base_delay: config.retry_base_delay,
            status: None,
            retries_in_flight: AtomicU32::new(0),
        }
    }

    /// Report round-trip outcomes to a status monitor.
    #[must_use]
    pub fn with_status_monitor(mut self, monitor: Arc<StatusMonitor>) -> Self {
        self.status = Some(monitor);
        self
    }

    /// Retries spent on the current (or most recent) request.
    pub fn retries_in_flight(&self) -> u32 {
        self.retries_in_flight.load(Ordering::Relaxed)
    }

    /// Send a user message with its view context.
    ///
    /// Returns the extracted reply text; `retry_attempt` on the reply is
    /// always 0 because the counter resets on success.
    #[instrument(skip(self, filters), fields(thread_id = %thread_id))]
    pub async fn send(
        &self,
        input: &str,
        filters: &ChatFilters,
        thread_id: Uuid,
    ) -> Result<ChatReply> {
        let request = ChatRequest {
            input: input.to_string(),
            filters: filters.clone(),
            thread_id,
        };

        self.retries_in_flight.store(0, Ordering::Relaxed);
        let mut attempt = 0u32;

        loop {
            match self.transport.post_chat(&request).await {
                Ok(body) => {
                    let content = match extract::extract_reply(&body) {
                        Ok(content) => content,
                        Err(e) => {
                            // The service answered but we can't read it;
                            // not a connectivity problem, so don't retry
                            // and don't mark disconnected.
                            return Err(e);
                        }
                    };
                    if let Some(monitor) = &self.status {
                        monitor.mark_connected().await;
                    }
                    return Ok(ChatReply {
                        content,
                        retry_attempt: 0,
                    });
                }
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    attempt += 1;
                    self.retries_in_flight.store(attempt, Ordering::Relaxed);
                    let delay = backoff_delay(self.retry_base_delay, attempt);
                    warn!(
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "chat request failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => {
                    if let Some(monitor) = &self.status {
                        monitor.mark_disconnected().await;
                    }
                    return Err(if e.is_retryable() { Error::Disconnected } else { e });
                }
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based): `2^(attempt-1) * base`.
pub(crate) fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let shift = attempt.saturating_sub(1).min(20);
    base.saturating_mul(1u32 << shift)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DISCONNECTED_MESSAGE;
    use crate::transport::MockChatTransport;
    use serde_json::json;

    fn test_config() -> ChatConfig {
        ChatConfig::default().with_base_url("http://test.invalid")
    }

    fn network_err() -> Error {
        Error::Network("connection refused".to_string())
    }

    #[test]
    fn backoff_doubles_per_retry() {
        let base = Duration::from_millis(1000);
        assert_eq!(backoff_delay(base, 1), Duration::from_millis(1000));
        assert_eq!(backoff_delay(base, 2), Duration::from_millis(2000));
        assert_eq!(backoff_delay(base, 3), Duration::from_millis(4000));
    }

    #[tokio::test(start_paused = true)]
    async fn fail_twice_then_succeed_retries_with_backoff() {
        let mut transport = MockChatTransport::new();
        let mut calls = 0u32;
        transport.expect_post_chat().times(3).returning(move |_| {
            calls += 1;
            if calls < 3 {
                Err(network_err())
            } else {
                Ok(json!({"response": "recovered"}))
            }
        });

        let client = ChatClient::with_transport(Box::new(transport), &test_config());

        let started = tokio::time::Instant::now();
        let reply = client
            .send("hello", &ChatFilters::default(), Uuid::new_v4())
            .await
            .unwrap();

        // Two retries: 1000ms + 2000ms of backoff before success.
        assert_eq!(started.elapsed(), Duration::from_millis(3000));
        assert_eq!(reply.content, "recovered");
        assert_eq!(reply.retry_attempt, 0);
        assert_eq!(client.retries_in_flight(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn exhausted_retries_surface_disconnected() {
        let mut transport = MockChatTransport::new();
        transport
            .expect_post_chat()
            .times(3)
            .returning(|_| Err(network_err()));

        let monitor = Arc::new(StatusMonitor::new("http://test.invalid", false));
        let client = ChatClient::with_transport(Box::new(transport), &test_config())
            .with_status_monitor(monitor.clone());

        let err = client
            .send("hello", &ChatFilters::default(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Disconnected));
        assert_eq!(err.to_string(), DISCONNECTED_MESSAGE);
        assert!(!monitor.current().await.connected);
    }

    #[tokio::test]
    async fn client_error_is_not_retried() {
        let mut transport = MockChatTransport::new();
        transport.expect_post_chat().times(1).returning(|_| {
            Err(Error::Api {
                status: 401,
                message: "unauthorized".to_string(),
            })
        });

        let client = ChatClient::with_transport(Box::new(transport), &test_config());
        let err = client
            .send("hello", &ChatFilters::default(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Api { status: 401, .. }));
    }

    #[tokio::test]
    async fn malformed_body_is_not_retried_and_not_disconnected() {
        let mut transport = MockChatTransport::new();
        transport
            .expect_post_chat()
            .times(1)
            .returning(|_| Ok(json!({"unexpected": true})));

        let monitor = Arc::new(StatusMonitor::new("http://test.invalid", false));
        {
            // Start from a connected state to show it is preserved.
            monitor.mark_connected().await;
        }
        let client = ChatClient::with_transport(Box::new(transport), &test_config())
            .with_status_monitor(monitor.clone());

        let err = client
            .send("hello", &ChatFilters::default(), Uuid::new_v4())
            .await
            .unwrap_err();

        assert!(matches!(err, Error::InvalidResponseFormat));
        assert!(monitor.current().await.connected);
    }

    #[tokio::test(start_paused = true)]
    async fn success_after_server_error_marks_connected() {
        let mut transport = MockChatTransport::new();
        let mut calls = 0u32;
        transport.expect_post_chat().times(2).returning(move |_| {
            calls += 1;
            if calls == 1 {
                Err(Error::Api {
                    status: 503,
                    message: "unavailable".to_string(),
                })
            } else {
                Ok(json!({"response": "ok"}))
            }
        });

        let monitor = Arc::new(StatusMonitor::new("http://test.invalid", false));
        let client = ChatClient::with_transport(Box::new(transport), &test_config())
            .with_status_monitor(monitor.clone());

        let reply = client
            .send("hello", &ChatFilters::default(), Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(reply.content, "ok");
        assert!(monitor.current().await.connected);
    }
}
