//! Shared domain types for the CubeAI client.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where a chat message originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageSource {
    /// Typed by the user
    User,
    /// Returned by the remote AI service
    Assistant,
    /// Synthesized locally after a failure
    Error,
}

/// A single entry in the in-memory conversation transcript.
///
/// Messages are immutable once created and are appended in order;
/// they are never persisted beyond the session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message ID
    pub id: Uuid,
    /// Message text
    pub content: String,
    /// Whether the user authored this message
    pub is_user: bool,
    /// Message origin
    pub source: MessageSource,
    /// Creation time
    pub timestamp: DateTime<Utc>,
    /// Retry attempt that produced this message (0 for any success)
    pub retry_attempt: u32,
}

impl ChatMessage {
    fn new(content: impl Into<String>, source: MessageSource, retry_attempt: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            is_user: source == MessageSource::User,
            source,
            timestamp: Utc::now(),
            retry_attempt,
        }
    }

    /// Create a user-authored message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, MessageSource::User, 0)
    }

    /// Create an assistant response message.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, MessageSource::Assistant, 0)
    }

    /// Create a locally synthesized error message, recording how many
    /// retries were spent before giving up.
    pub fn error(content: impl Into<String>, retry_attempt: u32) -> Self {
        Self::new(content, MessageSource::Error, retry_attempt)
    }
}

/// Connection status of the remote CubeAI service.
///
/// Refreshed by the status monitor on its polling interval and after
/// each chat round-trip.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiStatus {
    /// Whether the last probe or round-trip succeeded
    pub connected: bool,
    /// Endpoint being monitored
    pub endpoint: String,
    /// When this status was last refreshed
    pub timestamp: DateTime<Utc>,
    /// Whether an API key is configured
    pub has_api_key: bool,
}

impl ApiStatus {
    /// Initial (disconnected) status for an endpoint.
    pub fn new(endpoint: impl Into<String>, has_api_key: bool) -> Self {
        Self {
            connected: false,
            endpoint: endpoint.into(),
            timestamp: Utc::now(),
            has_api_key,
        }
    }
}

/// Snapshot of the animation timeline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    /// Whether the timer is running
    pub is_playing: bool,
    /// Playback speed multiplier, clamped to [0.1, 5.0]
    pub speed: f64,
    /// Current frame index; `0 <= current_frame < total_frames` when
    /// `total_frames > 0`
    pub current_frame: usize,
    /// Total number of frames in the loaded dataset
    pub total_frames: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_flags() {
        let msg = ChatMessage::user("how salty is the sound today?");
        assert!(msg.is_user);
        assert_eq!(msg.source, MessageSource::User);
        assert_eq!(msg.retry_attempt, 0);
    }

    #[test]
    fn error_message_carries_retry_attempt() {
        let msg = ChatMessage::error("service unreachable", 2);
        assert!(!msg.is_user);
        assert_eq!(msg.source, MessageSource::Error);
        assert_eq!(msg.retry_attempt, 2);
    }

    #[test]
    fn api_status_starts_disconnected() {
        let status = ApiStatus::new("https://api.example.com", true);
        assert!(!status.connected);
        assert!(status.has_api_key);
        assert_eq!(status.endpoint, "https://api.example.com");
    }
}
