//! Connection-status monitoring.
//!
//! Tracks an [`ApiStatus`] refreshed two ways: a periodic health probe
//! against `/healthz`, and reports from the chat client after each
//! round-trip.

use crate::transport::ChatTransport;
use chrono::Utc;
use cubeai_core::ApiStatus;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Shared connection-status tracker.
pub struct StatusMonitor {
    status: RwLock<ApiStatus>,
}

impl StatusMonitor {
    /// Create a monitor for an endpoint, initially disconnected.
    pub fn new(endpoint: impl Into<String>, has_api_key: bool) -> Self {
        Self {
            status: RwLock::new(ApiStatus::new(endpoint, has_api_key)),
        }
    }

    /// Current status snapshot.
    pub async fn current(&self) -> ApiStatus {
        self.status.read().await.clone()
    }

    /// Record a successful round-trip or probe.
    pub async fn mark_connected(&self) {
        let mut status = self.status.write().await;
        status.connected = true;
        status.timestamp = Utc::now();
    }

    /// Record a failed round-trip or probe.
    pub async fn mark_disconnected(&self) {
        let mut status = self.status.write().await;
        status.connected = false;
        status.timestamp = Utc::now();
    }

    /// Probe the health endpoint once and record the result.
    pub async fn probe_once(&self, transport: &dyn ChatTransport) -> bool {
        match transport.probe_health().await {
            Ok(()) => {
                debug!("health probe ok");
                self.mark_connected().await;
                true
            }
            Err(e) => {
                warn!(error = %e, "health probe failed");
                self.mark_disconnected().await;
                false
            }
        }
    }

    /// Spawn the periodic polling task. The returned handle should be
    /// aborted when the owning component shuts down.
    pub fn spawn_polling(
        self: &Arc<Self>,
        transport: Arc<dyn ChatTransport>,
        interval: Duration,
    ) -> JoinHandle<()> {
        let monitor = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                monitor.probe_once(transport.as_ref()).await;
            }
        })
    }
}
