//! Core configuration for skelanim-core.

use serde::{Deserialize, Serialize};

/// Configuration for tolerances, root-motion limits and buffer sizing.
/// Every field has a default, so partial JSON documents deserialize cleanly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub blend: BlendConfig,
    pub sampler: SamplerConfig,
    pub root_motion: RootMotionConfig,
    pub events: EventConfig,
    /// Initial capacity hint for per-stack scratch buffers (bones per layer).
    pub scratch_bones: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            blend: BlendConfig::default(),
            sampler: SamplerConfig::default(),
            root_motion: RootMotionConfig::default(),
            events: EventConfig::default(),
            scratch_bones: 64,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlendConfig {
    /// Layers at or below this weight are skipped by `BlendStack::apply`.
    pub weight_epsilon: f32,
    /// A fade snaps to its target once within this distance.
    pub fade_epsilon: f32,
    pub initial_layer_capacity: usize,
}

impl Default for BlendConfig {
    fn default() -> Self {
        Self {
            weight_epsilon: 1e-3,
            fade_epsilon: 1e-3,
            initial_layer_capacity: 4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplerConfig {
    /// Per-axis Euler delta above which rotations are interpolated as raw angles.
    pub euler_fallback_threshold_deg: f32,
    pub angle_epsilon_deg: f32,
    /// Lower bound for time differences in spline tangents.
    pub segment_epsilon: f32,
}

impl SamplerConfig {
    #[inline]
    pub fn fallback_threshold(&self) -> f32 {
        self.euler_fallback_threshold_deg + self.angle_epsilon_deg
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            euler_fallback_threshold_deg: 180.0,
            angle_epsilon_deg: 1e-3,
            segment_epsilon: 1e-6,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RootMotionConfig {
    pub apply_position: bool,
    pub apply_rotation: bool,
    pub position_scale: f32,
    pub rotation_scale: f32,
    /// Units per second.
    pub max_linear_velocity: f32,
    /// Degrees per second.
    pub max_angular_velocity: f32,
}

impl Default for RootMotionConfig {
    fn default() -> Self {
        Self {
            apply_position: true,
            apply_rotation: true,
            position_scale: 1.0,
            rotation_scale: 1.0,
            max_linear_velocity: 10.0,
            max_angular_velocity: 5.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventConfig {
    /// Tolerance applied to the inclusive ends of an event range.
    pub epsilon: f32,
}

impl Default for EventConfig {
    fn default() -> Self {
        Self { epsilon: 1e-4 }
    }
}
