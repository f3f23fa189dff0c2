//! CubeAI Chat - client for the remote chat/AI service
//!
//! This crate provides the chat request pipeline:
//! - Transport: the HTTP seam (`ChatTransport`) with a reqwest implementation
//! - Client: bounded exponential-backoff retry around the transport
//! - Extract: response-shape extraction across the known payload variants
//! - Status: healthz polling and connection-status tracking

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod extract;
pub mod status;
pub mod transport;
pub mod types;

pub use client::ChatClient;
pub use error::{Error, Result};
pub use status::StatusMonitor;
pub use transport::{ChatTransport, HttpTransport};
pub use types::{ChatConfig, ChatReply, ChatRequest};
