//! `cubeai holoocean` — smoke-test the simulation sidecar connection.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use cubeai_holoocean::{HoloOceanClient, HoloOceanCommand};
use serde_json::json;
use std::time::Duration;
use tracing::info;

/// Connect to the sidecar, send a ping command, and print the first
/// sensor frames that come back.
pub async fn run(frames: usize) -> Result<()> {
    let config = AppConfig::load(AppConfig::default_path()?)?;

    let client = HoloOceanClient::new();
    let mut incoming = client
        .connect(&config.holoocean.url)
        .await
        .context("could not reach the HoloOcean sidecar")?;

    info!(url = %config.holoocean.url, "connected");
    client
        .send_command(&HoloOceanCommand::new("ping", json!({})))
        .await?;

    let mut seen = 0usize;
    while seen < frames {
        match tokio::time::timeout(Duration::from_secs(10), incoming.recv()).await {
            Ok(Some(frame)) => {
                seen += 1;
                println!("[{}] {}", frame.kind, frame.data);
            }
            Ok(None) => {
                println!("stream ended after {} frame(s)", seen);
                break;
            }
            Err(_) => {
                println!("no frame within 10s, giving up");
                break;
            }
        }
    }

    client.disconnect().await?;
    Ok(())
}
