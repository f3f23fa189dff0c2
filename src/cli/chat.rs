//! `cubeai chat` — one-shot chat round-trip.

use crate::config::AppConfig;
use anyhow::{Context, Result};
use cubeai_chat::{ChatClient, StatusMonitor};
use cubeai_core::{ChatFilters, ChatMessage, SessionContext};
use cubeai_crypto::{SecureStore, SessionCipher};
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Send one message and print the reply (or the degraded error message).
pub async fn run(
    message: &str,
    area: Option<String>,
    model: Option<String>,
    parameter: Option<String>,
) -> Result<()> {
    let config = AppConfig::load(AppConfig::default_path()?)?;
    let chat_config = config.chat_config();

    let session = open_session();
    let mut store = open_store(session.as_ref())?;
    let thread_id = load_or_create_thread(&mut store, session.as_ref())?;

    let mut filters = ChatFilters::new();
    if let Some(area) = area {
        filters = filters.with_area(area);
    }
    if let Some(model) = model {
        filters = filters.with_model(model);
    }
    if let Some(parameter) = parameter {
        filters = filters.with_parameter(parameter);
    }

    let monitor = Arc::new(StatusMonitor::new(
        chat_config.base_url.clone(),
        chat_config.api_key.is_some(),
    ));
    let client = ChatClient::new(chat_config)?.with_status_monitor(Arc::clone(&monitor));

    let outgoing = ChatMessage::user(message);
    info!(message_id = %outgoing.id, thread_id = %thread_id, "sending chat message");

    match client.send(message, &filters, thread_id).await {
        Ok(reply) => {
            let incoming = ChatMessage::assistant(reply.content);
            println!("{}", incoming.content);
        }
        Err(e) => {
            let retries = client.retries_in_flight();
            let incoming = ChatMessage::error(e.to_string(), retries);
            warn!(retries, "chat failed: {}", incoming.content);
            println!("{}", incoming.content);
            let status = monitor.current().await;
            if !status.connected {
                eprintln!("(service marked disconnected as of {})", status.timestamp);
            }
        }
    }

    Ok(())
}

/// Build the session context from the environment, when a session key is
/// available. The key material is owned by the context and zeroized when
/// this command finishes.
fn open_session() -> Option<SessionContext> {
    match std::env::var("CUBEAI_SESSION_KEY") {
        Ok(passphrase) if !passphrase.is_empty() => match cubeai_crypto::derive_key(&passphrase) {
            Ok(key) => Some(SessionContext::from_key(key)),
            Err(e) => {
                warn!(error = %e, "ignoring unusable session key");
                None
            }
        },
        _ => None,
    }
}

fn open_store(session: Option<&SessionContext>) -> Result<SecureStore> {
    // Without a session the store degrades to plaintext, which
    // SecureStore logs.
    let cipher = session.map(|ctx| SessionCipher::from_key(*ctx.key_bytes()));
    SecureStore::open_default(cipher).context("failed to open preference store")
}

fn load_or_create_thread(
    store: &mut SecureStore,
    session: Option<&SessionContext>,
) -> Result<Uuid> {
    if let Ok(Some(existing)) = store.get::<Uuid>("thread_id") {
        return Ok(existing);
    }
    let fresh = session.map(SessionContext::thread_id).unwrap_or_else(Uuid::new_v4);
    store
        .save("thread_id", &fresh)
        .context("failed to persist thread id")?;
    Ok(fresh)
}
