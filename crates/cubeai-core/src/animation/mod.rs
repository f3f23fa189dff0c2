//! Timeline animation.
//!
//! Split into a pure state machine ([`AnimationTimeline`]) that owns all
//! speed/interval/frame arithmetic, and an async [`AnimationController`]
//! that drives it from a `tokio::time` interval and a command channel.

mod controller;
mod timeline;


pub use controller::AnimationController;
pub use timeline::{
    AnimationCommand, AnimationTimeline, BASE_INTERVAL_MS, MAX_FRAME_STEP, MAX_SPEED, MAX_TICK_MS,
    MIN_SPEED, MIN_TICK_MS, SPEED_STEP,
};
