//! Tokio driver for the animation timeline.

use crate::animation::timeline::{AnimationCommand, AnimationTimeline};
use crate::error::{Error, Result};
use crate::types::AnimationState;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::debug;

/// Async animation controller.
///
/// Owns a background task that holds the [`AnimationTimeline`], receives
/// commands over an mpsc channel, and publishes state snapshots on a
/// watch channel. The timer is a `tokio::time` interval, rebuilt whenever
/// a command changes the tick interval; pause and stop simply gate the
/// tick arm so no timer fires while not playing.
///
/// The controller is owned by a single caller; dropping it aborts the
/// background task.
pub struct AnimationController {
    commands: mpsc::Sender<AnimationCommand>,
    state_rx: watch::Receiver<AnimationState>,
    task: JoinHandle<()>,
}

impl AnimationController {
    /// Spawn a controller over `total_frames` frames.
    pub fn spawn(total_frames: usize) -> Self {
        let timeline = AnimationTimeline::new(total_frames);
        let (cmd_tx, cmd_rx) = mpsc::channel(32);
        let (state_tx, state_rx) = watch::channel(timeline.state());
        let task = tokio::spawn(run(timeline, cmd_rx, state_tx));
        Self {
            commands: cmd_tx,
            state_rx,
            task,
        }
    }

    /// Send a command to the timeline.
    pub async fn send(&self, command: AnimationCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| Error::AnimationStopped)
    }

    /// Latest published state.
    pub fn state(&self) -> AnimationState {
        *self.state_rx.borrow()
    }

    /// Subscribe to state updates.
    pub fn subscribe(&self) -> watch::Receiver<AnimationState> {
        self.state_rx.clone()
    }
}

impl Drop for AnimationController {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run(
    mut timeline: AnimationTimeline,
    mut commands: mpsc::Receiver<AnimationCommand>,
    state_tx: watch::Sender<AnimationState>,
) {
    let mut ticker = make_ticker(&timeline);
    loop {
        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                let interval_before = timeline.tick_interval();
                let state = timeline.apply(command);
                // Rebuild the timer on any interval change, and on Play so
                // the first frame advance happens a full period from now.
                if timeline.tick_interval() != interval_before
                    || command == AnimationCommand::Play
                {
                    ticker = make_ticker(&timeline);
                }
                debug!(?command, frame = state.current_frame, speed = state.speed, "animation command applied");
                let _ = state_tx.send(state);
            }
            _ = ticker.tick(), if timeline.state().is_playing => {
                let state = timeline.tick();
                let _ = state_tx.send(state);
            }
        }
    }
    debug!("animation controller task exiting");
}

fn make_ticker(timeline: &AnimationTimeline) -> time::Interval {
    let period = timeline.tick_interval();
    let mut ticker = time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker
}
