//! `cubeai animate` — drive the timeline controller from the terminal.

use crate::config::AppConfig;
use anyhow::Result;
use cubeai_core::{AnimationCommand, AnimationController};
use tracing::info;

/// Run the animation for `ticks` timer ticks, printing frame positions.
pub async fn run(frames: usize, speed: Option<f64>, ticks: usize) -> Result<()> {
    let config = AppConfig::load(AppConfig::default_path()?)?;
    let speed = speed.unwrap_or(config.animation.default_speed);

    let controller = AnimationController::spawn(frames);
    let mut state_rx = controller.subscribe();

    controller.send(AnimationCommand::SetSpeed(speed)).await?;
    controller.send(AnimationCommand::Play).await?;

    let state = controller.state();
    info!(frames, speed = state.speed, "animation started");

    let mut seen = 0usize;
    while seen < ticks {
        if state_rx.changed().await.is_err() {
            break;
        }
        let state = *state_rx.borrow();
        if !state.is_playing {
            continue;
        }
        seen += 1;
        println!("tick {:>3}  frame {:>4}/{}", seen, state.current_frame, state.total_frames);
    }

    controller.send(AnimationCommand::Stop).await?;
    Ok(())
}
