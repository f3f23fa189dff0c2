//! CubeAI Core - shared domain types and client-side state machines
//!
//! This crate provides the non-I/O core of the CubeAI client:
//! - Types: chat messages, API status, animation state
//! - Animation: timeline state machine and the tokio-driven controller
//! - Filters: the typed oceanographic view context sent with chat requests
//! - Session: the owned session context (key + thread id) with a defined
//!   lifetime (created at login, zeroized on drop at logout)

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod animation;
pub mod error;
pub mod filters;
pub mod session;
pub mod types;

pub use animation::{
    AnimationCommand, AnimationController, AnimationTimeline, MAX_SPEED, MIN_SPEED,
};
pub use error::{Error, Result};
pub use filters::ChatFilters;
pub use session::SessionContext;
pub use types::{AnimationState, ApiStatus, ChatMessage, MessageSource};
