//! Playback clock for a single clip.

use serde::{Deserialize, Serialize};

use crate::data::LoopMode;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// Timing parameters a clock needs from its clip.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipTiming {
    pub length: f32,
    pub loop_mode: LoopMode,
    pub speed: f32,
}

/// Elapsed time, loop count and play state for one clip instance.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlaybackClock {
    timing: ClipTiming,
    state: PlayState,
    current_time: f32,
    loop_count: u32,
    finished: bool,
    speed_scale: f32,
}

impl PlaybackClock {
    /// A stopped clock at time 0.
    pub fn new(timing: ClipTiming) -> Self {
        Self {
            timing,
            state: PlayState::Stopped,
            current_time: 0.0,
            loop_count: 0,
            finished: false,
            speed_scale: 1.0,
        }
    }

    pub fn play(&mut self) {
        self.state = PlayState::Playing;
        self.finished = false;
    }

    pub fn pause(&mut self) {
        if self.state == PlayState::Playing {
            self.state = PlayState::Paused;
        }
    }

    pub fn resume(&mut self) {
        if self.state == PlayState::Paused {
            self.state = PlayState::Playing;
        }
    }

    pub fn stop(&mut self) {
        self.state = PlayState::Stopped;
        self.current_time = 0.0;
        self.loop_count = 0;
        self.finished = false;
    }

    pub fn restart(&mut self) {
        self.stop();
        self.play();
    }

    /// Advance by `dt` seconds scaled by the clip speed. No-op unless playing.
    pub fn advance(&mut self, dt: f32) {
        if self.state != PlayState::Playing {
            return;
        }
        self.current_time += dt * self.effective_speed();

        let ClipTiming {
            length, loop_mode, ..
        } = self.timing;
        if length <= 0.0 {
            self.current_time = 0.0;
            if !loop_mode.is_looping() {
                self.finish();
            }
            return;
        }

        if self.current_time >= length {
            match loop_mode {
                LoopMode::Loop => {
                    self.loop_count = self.loop_count.wrapping_add(1);
                    self.current_time %= length;
                }
                LoopMode::Once | LoopMode::HoldLast => {
                    self.current_time = length;
                    self.finish();
                }
            }
        }
    }

    fn finish(&mut self) {
        self.state = PlayState::Stopped;
        self.finished = true;
    }

    /// Jump to `time`, clamped to `[0, length]`.
    pub fn seek(&mut self, time: f32) {
        self.current_time = time.clamp(0.0, self.timing.length.max(0.0));
    }

    /// Whether the owning layer should contribute to the pose this tick.
    #[inline]
    pub fn should_apply(&self) -> bool {
        self.state == PlayState::Playing
            || (self.finished && self.timing.loop_mode == LoopMode::HoldLast)
    }

    /// `current_time / length`, or 0 for zero-length clips.
    pub fn progress(&self) -> f32 {
        if self.timing.length <= 0.0 {
            return 0.0;
        }
        self.current_time / self.timing.length
    }

    /// Position within the current loop as a fraction of the length.
    pub fn normalized_time(&self) -> f32 {
        let length = self.timing.length;
        if length <= 0.0 {
            return 0.0;
        }
        (self.current_time % length) / length
    }

    /// Extra multiplier on top of the clip speed, clamped to `>= 0`.
    pub fn set_speed_scale(&mut self, scale: f32) {
        self.speed_scale = scale.max(0.0);
    }

    #[inline]
    pub fn speed_scale(&self) -> f32 {
        self.speed_scale
    }

    #[inline]
    pub fn effective_speed(&self) -> f32 {
        self.timing.speed * self.speed_scale
    }

    #[inline]
    pub fn timing(&self) -> ClipTiming {
        self.timing
    }

    #[inline]
    pub fn current_time(&self) -> f32 {
        self.current_time
    }

    #[inline]
    pub fn state(&self) -> PlayState {
        self.state
    }

    #[inline]
    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    #[inline]
    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    #[inline]
    pub fn is_paused(&self) -> bool {
        self.state == PlayState::Paused
    }

    #[inline]
    pub fn is_stopped(&self) -> bool {
        self.state == PlayState::Stopped
    }
}
