//! CubeAI HoloOcean — WebSocket client for the simulation sidecar.
//!
//! The HoloOcean service speaks JSON text frames over a WebSocket at
//! `ws(s)://…/ws/holoocean`: command frames `{type, data}` go out,
//! sensor frames stream back in. The client owns the writer half behind
//! a mutex; a spawned reader task forwards parsed frames to an mpsc
//! channel and flips the shared connected flag when the stream ends.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use futures_util::stream::{SplitSink, SplitStream, StreamExt};
use futures_util::SinkExt;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Mutex, RwLock};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, warn};
use url::Url;

// Type aliases because tokio-tungstenite streams are a mouthful
type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type WsSender = SplitSink<WsStream, Message>;

/// Frames buffered before the reader applies backpressure.
const FRAME_BUFFER: usize = 64;

/// HoloOcean client error type
#[derive(Debug, Error)]
pub enum Error {
    /// URL failed to parse
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Connection could not be established
    #[error("connect failed: {0}")]
    Connect(String),

    /// No active connection
    #[error("not connected to HoloOcean")]
    NotConnected,

    /// Frame could not be sent
    #[error("send failed: {0}")]
    Send(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// A command frame sent to the simulator.
#[derive(Debug, Clone, Serialize)]
pub struct HoloOceanCommand {
    /// Command type (e.g. `"spawn"`, `"move"`, `"set_pov"`)
    #[serde(rename = "type")]
    pub kind: String,
    /// Command payload
    pub data: serde_json::Value,
}

impl HoloOceanCommand {
    /// Create a command frame.
    pub fn new(kind: impl Into<String>, data: serde_json::Value) -> Self {
        Self {
            kind: kind.into(),
            data,
        }
    }
}

/// A sensor frame received from the simulator.
#[derive(Debug, Clone, Deserialize)]
pub struct SensorFrame {
    /// Frame type reported by the simulator
    #[serde(rename = "type", default)]
    pub kind: String,
    /// Sensor payload
    #[serde(default)]
    pub data: serde_json::Value,
}

/// WebSocket client for the HoloOcean sidecar.
pub struct HoloOceanClient {
    sender: Arc<Mutex<Option<WsSender>>>,
    connected: Arc<RwLock<bool>>,
}

impl HoloOceanClient {
    /// Create a disconnected client.
    pub fn new() -> Self {
        Self {
            sender: Arc::new(Mutex::new(None)),
            connected: Arc::new(RwLock::new(false)),
        }
    }

    /// Connect to the sidecar and return the incoming sensor stream.
    pub async fn connect(&self, url_str: &str) -> Result<mpsc::Receiver<SensorFrame>> {
        let url = Url::parse(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let (ws_stream, _) = connect_async(url)
            .await
            .map_err(|e| Error::Connect(e.to_string()))?;
        let (write, read) = ws_stream.split();

        *self.sender.lock().await = Some(write);
        *self.connected.write().await = true;

        let (frames_tx, frames_rx) = mpsc::channel(FRAME_BUFFER);
        let connected = Arc::clone(&self.connected);
        tokio::spawn(read_frames(read, frames_tx, connected));

        debug!(url = url_str, "connected to HoloOcean");
        Ok(frames_rx)
    }

    /// Send a command frame. Fails when not connected.
    pub async fn send_command(&self, command: &HoloOceanCommand) -> Result<()> {
        let payload =
            serde_json::to_string(command).map_err(|e| Error::Send(e.to_string()))?;

        let mut guard = self.sender.lock().await;
        let sender = guard.as_mut().ok_or(Error::NotConnected)?;
        sender
            .send(Message::Text(payload))
            .await
            .map_err(|e| Error::Send(e.to_string()))
    }

    /// Whether the connection is currently up.
    pub async fn is_connected(&self) -> bool {
        *self.connected.read().await
    }

    /// Close the connection.
    pub async fn disconnect(&self) -> Result<()> {
        let mut guard = self.sender.lock().await;
        if let Some(sender) = guard.as_mut() {
            let _ = sender.send(Message::Close(None)).await;
        }
        *guard = None;
        *self.connected.write().await = false;
        Ok(())
    }
}

impl Default for HoloOceanClient {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_frames(
    mut read: SplitStream<WsStream>,
    frames_tx: mpsc::Sender<SensorFrame>,
    connected: Arc<RwLock<bool>>,
) {
    while let Some(message) = read.next().await {
        match message {
            Ok(Message::Text(text)) => match serde_json::from_str::<SensorFrame>(&text) {
                Ok(frame) => {
                    if frames_tx.send(frame).await.is_err() {
                        // Receiver dropped; nobody is listening anymore.
                        break;
                    }
                }
                Err(e) => warn!(error = %e, "discarding malformed sensor frame"),
            },
            Ok(Message::Close(_)) => {
                debug!("HoloOcean closed the connection");
                break;
            }
            Ok(_) => {} // ping/pong/binary are ignored
            Err(e) => {
                warn!(error = %e, "HoloOcean stream error");
                break;
            }
        }
    }
    *connected.write().await = false;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn command_serializes_wire_shape() {
        let command = HoloOceanCommand::new("set_pov", json!({"lat": 30.3, "lon": -88.6}));
        let wire = serde_json::to_value(&command).unwrap();
        assert_eq!(wire["type"], "set_pov");
        assert_eq!(wire["data"]["lat"], 30.3);
    }

    #[test]
    fn sensor_frame_tolerates_missing_fields() {
        let frame: SensorFrame = serde_json::from_str(r#"{"type":"sonar"}"#).unwrap();
        assert_eq!(frame.kind, "sonar");
        assert!(frame.data.is_null());

        let frame: SensorFrame = serde_json::from_str("{}").unwrap();
        assert_eq!(frame.kind, "");
    }

    #[tokio::test]
    async fn send_without_connection_fails() {
        let client = HoloOceanClient::new();
        assert!(!client.is_connected().await);

        let err = client
            .send_command(&HoloOceanCommand::new("move", json!({})))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotConnected));
    }

    #[tokio::test]
    async fn bad_url_is_rejected() {
        let client = HoloOceanClient::new();
        let err = client.connect("not a url").await.unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let client = HoloOceanClient::new();
        client.disconnect().await.unwrap();
        client.disconnect().await.unwrap();
        assert!(!client.is_connected().await);
    }
}
