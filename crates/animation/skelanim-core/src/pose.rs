//! Pose sink and the per-bone blend used by the stack.
//!
//! The engine does not own the skeleton. Hosts implement [`Pose`] over their own
//! bone storage; [`SkeletonPose`] is a small name-indexed implementation for
//! tools and tests.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::config::SamplerConfig;
use crate::interp::functions::lerp;
use crate::math::{euler_to_quat, needs_euler_fallback, quat_to_euler, slerp, Vec3};
use crate::sampling::BoneSample;

/// Weights at or above `1 - ROTATION_SNAP_EPSILON` assign the rotation directly.
const ROTATION_SNAP_EPSILON: f32 = 1e-6;

/// Local transform of one bone. Rotation is Euler degrees.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoneTransform {
    pub position: Vec3,
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl BoneTransform {
    /// Zero offset, zero rotation, unit scale.
    pub fn identity() -> Self {
        Self {
            position: Vec3::zeros(),
            rotation: Vec3::zeros(),
            scale: Vec3::repeat(1.0),
        }
    }

    pub fn new(position: Vec3, rotation: Vec3, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }
}

/// Mutable bone storage the blend stack writes into.
///
/// Bones are addressed by a dense index resolved once from the bone name; the
/// stack caches the resolution, so `bone_index` is not on the per-tick path.
pub trait Pose {
    /// Overwrite every bone's current transform with its bind transform.
    fn reset_to_bind_pose(&mut self);

    fn bone_index(&self, name: &str) -> Option<usize>;

    fn bone_mut(&mut self, index: usize) -> Option<&mut BoneTransform>;

    fn bind_pose(&self, index: usize) -> Option<&BoneTransform>;
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
struct BoneSlot {
    bind: BoneTransform,
    current: BoneTransform,
}

/// Name-indexed skeleton pose.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SkeletonPose {
    bones: IndexMap<String, BoneSlot>,
}

impl SkeletonPose {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a bone; its current transform starts at `bind`.
    pub fn insert_bone(&mut self, name: impl Into<String>, bind: BoneTransform) -> usize {
        let (index, _) = self.bones.insert_full(
            name.into(),
            BoneSlot {
                bind,
                current: bind,
            },
        );
        index
    }

    pub fn with_bone(mut self, name: impl Into<String>, bind: BoneTransform) -> Self {
        self.insert_bone(name, bind);
        self
    }

    pub fn get(&self, name: &str) -> Option<&BoneTransform> {
        self.bones.get(name).map(|slot| &slot.current)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut BoneTransform> {
        self.bones.get_mut(name).map(|slot| &mut slot.current)
    }

    pub fn bind(&self, name: &str) -> Option<&BoneTransform> {
        self.bones.get(name).map(|slot| &slot.bind)
    }

    pub fn len(&self) -> usize {
        self.bones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bones.is_empty()
    }

    pub fn bone_names(&self) -> impl Iterator<Item = &str> {
        self.bones.keys().map(String::as_str)
    }
}

impl Pose for SkeletonPose {
    fn reset_to_bind_pose(&mut self) {
        for slot in self.bones.values_mut() {
            slot.current = slot.bind;
        }
    }

    fn bone_index(&self, name: &str) -> Option<usize> {
        self.bones.get_index_of(name)
    }

    fn bone_mut(&mut self, index: usize) -> Option<&mut BoneTransform> {
        self.bones.get_index_mut(index).map(|(_, slot)| &mut slot.current)
    }

    fn bind_pose(&self, index: usize) -> Option<&BoneTransform> {
        self.bones.get_index(index).map(|(_, slot)| &slot.bind)
    }
}

/// `target += (sampled - target) * weight`
#[inline]
pub fn blend_vector(target: &mut Vec3, sampled: &Vec3, weight: f32) {
    *target += (sampled - *target) * weight;
}

/// Blend an Euler rotation toward `sampled` by `weight`.
///
/// Small deltas go through quaternion SLERP; deltas past the configured
/// threshold on any axis blend the raw angles.
pub fn blend_rotation(target: &mut Vec3, sampled: &Vec3, weight: f32, cfg: &SamplerConfig) {
    if weight <= 0.0 {
        return;
    }
    if weight >= 1.0 - ROTATION_SNAP_EPSILON {
        *target = *sampled;
        return;
    }
    if needs_euler_fallback(target, sampled, cfg.fallback_threshold()) {
        *target = lerp(*target, *sampled, weight);
        return;
    }
    let q = slerp(&euler_to_quat(target), &euler_to_quat(sampled), weight);
    *target = quat_to_euler(&q);
}

/// Compose a sample with the bind transform: offsets for position and
/// rotation, a factor for scale.
pub fn compose_with_bind(sample: &BoneSample, bind: &BoneTransform) -> BoneSample {
    BoneSample {
        position: sample.position.map(|p| bind.position + p),
        rotation: sample.rotation.map(|r| bind.rotation + r),
        scale: sample.scale.map(|s| bind.scale.component_mul(&s)),
    }
}

/// Blend every present channel of `sample` into `target`.
pub fn blend_bone(target: &mut BoneTransform, sample: &BoneSample, weight: f32, cfg: &SamplerConfig) {
    if let Some(p) = &sample.position {
        blend_vector(&mut target.position, p, weight);
    }
    if let Some(r) = &sample.rotation {
        blend_rotation(&mut target.rotation, r, weight, cfg);
    }
    if let Some(s) = &sample.scale {
        blend_vector(&mut target.scale, s, weight);
    }
}
