//! `cubeai status` — one-shot health probe.

use crate::config::AppConfig;
use anyhow::Result;
use cubeai_chat::{HttpTransport, StatusMonitor};

/// Probe `/healthz` once and print the resulting status.
pub async fn run() -> Result<()> {
    let config = AppConfig::load(AppConfig::default_path()?)?;
    let chat_config = config.chat_config();

    let monitor = StatusMonitor::new(chat_config.base_url.clone(), chat_config.api_key.is_some());
    let transport = HttpTransport::new(chat_config)?;

    monitor.probe_once(&transport).await;
    let status = monitor.current().await;

    println!("endpoint:  {}", status.endpoint);
    println!("connected: {}", status.connected);
    println!("api key:   {}", if status.has_api_key { "configured" } else { "none" });
    println!("checked:   {}", status.timestamp);

    if !status.connected {
        std::process::exit(1);
    }
    Ok(())
}
