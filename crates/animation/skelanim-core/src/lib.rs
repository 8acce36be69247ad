//! Skelanim Core (engine-agnostic)
//!
//! Skeletal animation sampling and blending. Clips of per-bone keyframe
//! channels are sampled each tick, blended into a host-owned pose by a stack of
//! weighted layers, and a root bone's motion is extracted as velocity-capped
//! deltas. No rendering, asset loading or clip-selection logic lives here.
//!
//! Tick flow: `BlendStack::update(dt)` advances clocks and fades, then
//! `BlendStack::apply(&mut pose)` resets the pose to bind and blends each layer.

pub mod binding;
pub mod blend;
pub mod clock;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod ids;
pub mod interp;
pub mod math;
pub mod pose;
pub mod root_motion;
pub mod sampling;
pub mod scratch;

// Re-exports for hosts
pub use binding::BoneBindings;
pub use blend::{BlendLayer, BlendStack};
pub use clock::{ClipTiming, PlayState, PlaybackClock};
pub use config::{BlendConfig, Config, EventConfig, RootMotionConfig, SamplerConfig};
pub use data::{BoneTrack, Channel, ChannelKind, Clip, ClipEvent, Interpolation, Keyframe, LoopMode};
pub use error::ClipError;
pub use events::{collect_events, visit_events, EventKind, EventTracker, FiredEvent};
pub use ids::LayerId;
pub use interp::{ease, Ease, EaseDirection, EaseFamily};
pub use math::{Quat, Vec3};
pub use pose::{blend_bone, blend_rotation, blend_vector, BoneTransform, Pose, SkeletonPose};
pub use root_motion::{RootBone, RootMotionDelta, RootMotionExtractor, RootMotionSink};
pub use sampling::{BoneSample, ChannelCursor, LoopWrap, Sampler};

/// Result alias for load-time validation.
pub type Result<T> = core::result::Result<T, ClipError>;
