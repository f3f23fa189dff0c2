//! Pure animation timeline state machine.

use crate::types::AnimationState;
use std::time::Duration;
use tracing::warn;

/// Minimum playback speed multiplier.
pub const MIN_SPEED: f64 = 0.1;
/// Maximum playback speed multiplier.
pub const MAX_SPEED: f64 = 5.0;
/// Speed increment applied by `SpeedUp` / `SpeedDown`.
pub const SPEED_STEP: f64 = 0.25;
/// Interval at speed 1.0, in milliseconds.
pub const BASE_INTERVAL_MS: u64 = 500;
/// Fastest allowed tick, in milliseconds.
pub const MIN_TICK_MS: u64 = 32;
/// Slowest allowed tick, in milliseconds.
pub const MAX_TICK_MS: u64 = 1000;
/// Largest number of frames skipped per tick.
pub const MAX_FRAME_STEP: usize = 10;

/// Commands accepted by the timeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnimationCommand {
    /// Start the periodic timer
    Play,
    /// Stop the timer, keep the current frame
    Pause,
    /// Stop the timer and rewind to frame 0
    Stop,
    /// Rewind to frame 0 and restore speed 1.0
    Reset,
    /// Increase speed by one step
    SpeedUp,
    /// Decrease speed by one step
    SpeedDown,
    /// Set the speed multiplier (clamped to [0.1, 5.0])
    SetSpeed(f64),
    /// Jump to a frame (clamped into range)
    SetFrame(usize),
    /// Update the total frame count after a dataset (re)load
    Sync {
        /// New total number of frames
        total_frames: usize,
    },
}

/// Pure timeline state machine.
///
/// All arithmetic lives here so it can be unit tested without a runtime;
/// the [`super::AnimationController`] owns one of these and feeds it
/// commands and ticks.
#[derive(Debug, Clone)]
pub struct AnimationTimeline {
    state: AnimationState,
}

impl AnimationTimeline {
    /// Create a stopped timeline over `total_frames` frames.
    pub fn new(total_frames: usize) -> Self {
        Self {
            state: AnimationState {
                is_playing: false,
                speed: 1.0,
                current_frame: 0,
                total_frames,
            },
        }
    }

    /// Current state snapshot.
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// The ideal tick interval for the current speed, before clamping.
    fn ideal_interval_ms(&self) -> u64 {
        let ms = (BASE_INTERVAL_MS as f64 / self.state.speed).round() as u64;
        ms.max(1)
    }

    /// The actual timer interval: ideal, clamped to `[32, 1000]` ms.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.ideal_interval_ms().clamp(MIN_TICK_MS, MAX_TICK_MS))
    }

    /// Frames advanced per tick.
    ///
    /// When the ideal interval is faster than the minimum allowed tick,
    /// frames are skipped to preserve perceived speed:
    /// `ceil(safe / ideal)`, clamped to `[1, 10]`.
    pub fn frame_step(&self) -> usize {
        let ideal = self.ideal_interval_ms();
        let safe = ideal.clamp(MIN_TICK_MS, MAX_TICK_MS);
        let step = safe.div_ceil(ideal) as usize;
        step.clamp(1, MAX_FRAME_STEP)
    }

    /// Apply a command, returning the new state.
    pub fn apply(&mut self, command: AnimationCommand) -> AnimationState {
        match command {
            AnimationCommand::Play => {
                if self.state.total_frames == 0 {
                    warn!("play requested with no frames loaded; staying stopped");
                    self.state.is_playing = false;
                } else {
                    self.state.is_playing = true;
                }
            }
            AnimationCommand::Pause => self.state.is_playing = false,
            AnimationCommand::Stop => {
                self.state.is_playing = false;
                self.state.current_frame = 0;
            }
            AnimationCommand::Reset => {
                self.state.is_playing = false;
                self.state.current_frame = 0;
                self.state.speed = 1.0;
            }
            AnimationCommand::SpeedUp => self.set_speed(self.state.speed + SPEED_STEP),
            AnimationCommand::SpeedDown => self.set_speed(self.state.speed - SPEED_STEP),
            AnimationCommand::SetSpeed(speed) => self.set_speed(speed),
            AnimationCommand::SetFrame(frame) => {
                self.state.current_frame = match self.state.total_frames {
                    0 => 0,
                    total => frame.min(total - 1),
                };
            }
            AnimationCommand::Sync { total_frames } => {
                self.state.total_frames = total_frames;
                if total_frames == 0 {
                    self.state.current_frame = 0;
                    self.state.is_playing = false;
                } else if self.state.current_frame >= total_frames {
                    self.state.current_frame = 0;
                }
            }
        }
        self.state
    }

    fn set_speed(&mut self, speed: f64) {
        self.state.speed = speed.clamp(MIN_SPEED, MAX_SPEED);
    }

    /// Advance by one tick, wrapping to frame 0 at the boundary.
    pub fn tick(&mut self) -> AnimationState {
        if self.state.total_frames == 0 {
            // Defensive: nothing to animate.
            self.state.is_playing = false;
            return self.state;
        }
        if self.state.is_playing {
            let next = self.state.current_frame + self.frame_step();
            self.state.current_frame = if next >= self.state.total_frames {
                0
            } else {
                next
            };
        }
        self.state
    }
}
