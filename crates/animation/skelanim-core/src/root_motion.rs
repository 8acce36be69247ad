//! Root motion extraction.
//!
//! The extractor differentiates a root bone's global transform between ticks.
//! It only computes deltas; moving the character is left to a
//! [`RootMotionSink`], and callers may skip `apply_motion` for a tick without
//! affecting later deltas.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::RootMotionConfig;
use crate::math::Vec3;

/// Read access to the designated root bone's global transform.
pub trait RootBone {
    fn global_position(&self) -> Vec3;
    /// Euler degrees.
    fn global_rotation(&self) -> Vec3;
}

/// Receiver for extracted motion, usually the character's world transform.
pub trait RootMotionSink {
    fn translate_global(&mut self, delta: Vec3);
    /// Euler degrees.
    fn rotate_global(&mut self, delta: Vec3);
}

/// Motion produced by the last `update`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RootMotionDelta {
    pub position: Vec3,
    pub rotation: Vec3,
}

#[derive(Clone, Debug)]
pub struct RootMotionExtractor {
    cfg: RootMotionConfig,
    enabled: bool,
    previous_position: Vec3,
    previous_rotation: Vec3,
    delta: RootMotionDelta,
}

impl Default for RootMotionExtractor {
    fn default() -> Self {
        Self::new(RootMotionConfig::default())
    }
}

/// Rescale `delta` so that `|delta| / dt` does not exceed `max_velocity`.
fn cap_velocity(delta: Vec3, dt: f32, max_velocity: f32) -> Vec3 {
    let velocity = delta.norm() / dt;
    if velocity > max_velocity {
        delta * (max_velocity / velocity)
    } else {
        delta
    }
}

impl RootMotionExtractor {
    /// A disabled extractor with zeroed state.
    pub fn new(cfg: RootMotionConfig) -> Self {
        Self {
            cfg,
            enabled: false,
            previous_position: Vec3::zeros(),
            previous_rotation: Vec3::zeros(),
            delta: RootMotionDelta::default(),
        }
    }

    pub fn enable(&mut self) {
        self.enabled = true;
        debug!("root motion enabled");
    }

    pub fn disable(&mut self) {
        self.enabled = false;
        debug!("root motion disabled");
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Zero the delta and snapshot `source` as the previous transform.
    pub fn reset<R: RootBone + ?Sized>(&mut self, source: &R) {
        self.delta = RootMotionDelta::default();
        self.snapshot(source);
    }

    fn snapshot<R: RootBone + ?Sized>(&mut self, source: &R) {
        self.previous_position = source.global_position();
        self.previous_rotation = source.global_rotation();
    }

    /// Compute this tick's velocity-capped delta from `source`.
    pub fn update<R: RootBone + ?Sized>(&mut self, source: &R, dt: f32) {
        if !self.enabled {
            return;
        }
        let position = source.global_position();
        let rotation = source.global_rotation();

        if dt <= 0.0 {
            self.delta = RootMotionDelta::default();
        } else {
            if self.cfg.apply_position {
                let raw = (position - self.previous_position) * self.cfg.position_scale;
                self.delta.position = cap_velocity(raw, dt, self.cfg.max_linear_velocity);
            }
            if self.cfg.apply_rotation {
                let raw = (rotation - self.previous_rotation) * self.cfg.rotation_scale;
                self.delta.rotation = cap_velocity(raw, dt, self.cfg.max_angular_velocity);
            }
        }

        self.previous_position = position;
        self.previous_rotation = rotation;
    }

    /// Hand the last delta to `sink`.
    pub fn apply_motion<S: RootMotionSink + ?Sized>(&self, sink: &mut S) {
        if !self.enabled {
            return;
        }
        if self.cfg.apply_position {
            sink.translate_global(self.delta.position);
        }
        if self.cfg.apply_rotation {
            sink.rotate_global(self.delta.rotation);
        }
    }

    #[inline]
    pub fn delta(&self) -> RootMotionDelta {
        self.delta
    }

    #[inline]
    pub fn config(&self) -> &RootMotionConfig {
        &self.cfg
    }

    pub fn set_apply_position(&mut self, apply: bool) {
        self.cfg.apply_position = apply;
    }

    pub fn set_apply_rotation(&mut self, apply: bool) {
        self.cfg.apply_rotation = apply;
    }

    pub fn set_position_scale(&mut self, scale: f32) {
        self.cfg.position_scale = scale;
    }

    pub fn set_rotation_scale(&mut self, scale: f32) {
        self.cfg.rotation_scale = scale;
    }

    pub fn set_max_linear_velocity(&mut self, velocity: f32) {
        self.cfg.max_linear_velocity = velocity;
    }

    pub fn set_max_angular_velocity(&mut self, velocity: f32) {
        self.cfg.max_angular_velocity = velocity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slow_motion_is_not_scaled() {
        let d = Vec3::new(0.1, 0.0, 0.0);
        assert_eq!(cap_velocity(d, 1.0, 10.0), d);
    }
}
