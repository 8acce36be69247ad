//! Clip data model.
//!
//! A [`Clip`] is produced once by an external loader and never mutated by the
//! engine. Channels must already be sorted by timestamp; [`Clip::validate`]
//! checks this (and finiteness) for loaders that want to reject bad input.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::clock::ClipTiming;
use crate::error::ClipError;
use crate::interp::Ease;
use crate::math::Vec3;

/// Interpolation mode for the segment that starts at a keyframe.
///
/// (De)serializes as its mode string. Unknown names resolve to `Linear`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Interpolation {
    #[default]
    Linear,
    Step,
    Bezier,
    CatmullRom,
    Eased(Ease),
}

impl Interpolation {
    /// Resolve a mode name. Case-insensitive; never fails.
    pub fn parse(name: &str) -> Self {
        let lower = name.trim().to_ascii_lowercase();
        match lower.as_str() {
            "linear" => Self::Linear,
            "step" => Self::Step,
            "bezier" => Self::Bezier,
            "catmullrom" => Self::CatmullRom,
            other => other.parse::<Ease>().map(Self::Eased).unwrap_or(Self::Linear),
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => f.write_str("linear"),
            Self::Step => f.write_str("step"),
            Self::Bezier => f.write_str("bezier"),
            Self::CatmullRom => f.write_str("catmullrom"),
            Self::Eased(e) => write!(f, "{e}"),
        }
    }
}

impl FromStr for Interpolation {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Interpolation {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<Interpolation> for String {
    fn from(mode: Interpolation) -> Self {
        mode.to_string()
    }
}

/// One keyframe. Rotation values are Euler degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Keyframe {
    pub timestamp: f32,
    pub value: Vec3,
    #[serde(default)]
    pub interpolation: Interpolation,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pre: Option<Vec3>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post: Option<Vec3>,
}

impl Keyframe {
    pub fn new(timestamp: f32, value: Vec3, interpolation: Interpolation) -> Self {
        Self {
            timestamp,
            value,
            interpolation,
            pre: None,
            post: None,
        }
    }

    pub fn linear(timestamp: f32, value: Vec3) -> Self {
        Self::new(timestamp, value, Interpolation::Linear)
    }

    pub fn with_pre(mut self, pre: Vec3) -> Self {
        self.pre = Some(pre);
        self
    }

    pub fn with_post(mut self, post: Vec3) -> Self {
        self.post = Some(post);
        self
    }

    /// Value a segment starting at this frame begins from (`post`, else `value`).
    #[inline]
    pub fn prev_value(&self) -> Vec3 {
        self.post.unwrap_or(self.value)
    }

    /// Value a segment ending at this frame arrives at (`pre`, else `value`).
    #[inline]
    pub fn next_value(&self) -> Vec3 {
        self.pre.unwrap_or(self.value)
    }

    fn is_finite(&self) -> bool {
        let finite = |v: &Vec3| v.iter().all(|c| c.is_finite());
        self.timestamp.is_finite()
            && finite(&self.value)
            && self.pre.as_ref().map_or(true, finite)
            && self.post.as_ref().map_or(true, finite)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChannelKind {
    Position,
    Rotation,
    Scale,
}

impl ChannelKind {
    pub const ALL: [ChannelKind; 3] = [ChannelKind::Position, ChannelKind::Rotation, ChannelKind::Scale];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            Self::Position => 0,
            Self::Rotation => 1,
            Self::Scale => 2,
        }
    }
}

/// Keyframes for one property of one bone, sorted by timestamp.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel {
    keyframes: Vec<Keyframe>,
}

impl Channel {
    pub fn new(keyframes: Vec<Keyframe>) -> Self {
        Self { keyframes }
    }

    #[inline]
    pub fn keyframes(&self) -> &[Keyframe] {
        &self.keyframes
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.keyframes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.keyframes.is_empty()
    }

    /// Append a keyframe. Callers keep the channel sorted.
    pub fn push(&mut self, keyframe: Keyframe) {
        self.keyframes.push(keyframe);
    }

    /// Index of the first keyframe that breaks ordering or finiteness.
    fn first_invalid(&self) -> Option<(usize, bool)> {
        let mut last = f32::NEG_INFINITY;
        for (i, k) in self.keyframes.iter().enumerate() {
            if !k.is_finite() {
                return Some((i, false));
            }
            if k.timestamp < last {
                return Some((i, true));
            }
            last = k.timestamp;
        }
        None
    }
}

impl FromIterator<Keyframe> for Channel {
    fn from_iter<I: IntoIterator<Item = Keyframe>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Position, rotation and scale channels for one bone.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BoneTrack {
    #[serde(default)]
    pub position: Channel,
    #[serde(default)]
    pub rotation: Channel,
    #[serde(default)]
    pub scale: Channel,
}

impl BoneTrack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(mut self, channel: Channel) -> Self {
        self.position = channel;
        self
    }

    pub fn with_rotation(mut self, channel: Channel) -> Self {
        self.rotation = channel;
        self
    }

    pub fn with_scale(mut self, channel: Channel) -> Self {
        self.scale = channel;
        self
    }

    #[inline]
    pub fn channel(&self, kind: ChannelKind) -> &Channel {
        match kind {
            ChannelKind::Position => &self.position,
            ChannelKind::Rotation => &self.rotation,
            ChannelKind::Scale => &self.scale,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoopMode {
    #[default]
    Once,
    Loop,
    HoldLast,
}

impl LoopMode {
    #[inline]
    pub fn is_looping(self) -> bool {
        self == LoopMode::Loop
    }
}

/// A timed effect trigger (particle or sound) attached to a clip.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClipEvent {
    pub timestamp: f32,
    /// Effect identifier resolved by the external dispatcher.
    pub effect: String,
    /// Locator (attachment point) the effect is spawned at.
    #[serde(default)]
    pub locator: String,
}

impl ClipEvent {
    pub fn new(timestamp: f32, effect: impl Into<String>, locator: impl Into<String>) -> Self {
        Self {
            timestamp,
            effect: effect.into(),
            locator: locator.into(),
        }
    }
}

fn default_speed() -> f32 {
    1.0
}

/// One named, time-bounded animation asset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub name: String,
    /// Seconds.
    pub length: f32,
    #[serde(default)]
    pub loop_mode: LoopMode,
    #[serde(default = "default_speed")]
    pub speed: f32,
    /// Hint for clip-selection logic; the engine does not act on it.
    #[serde(default)]
    pub override_previous: bool,
    /// Bone name -> track, in authoring order.
    #[serde(default)]
    pub bones: IndexMap<String, BoneTrack>,
    #[serde(default)]
    pub particle_events: Vec<ClipEvent>,
    #[serde(default)]
    pub sound_events: Vec<ClipEvent>,
}

impl Clip {
    pub fn new(name: impl Into<String>, length: f32, loop_mode: LoopMode) -> Self {
        Self {
            name: name.into(),
            length,
            loop_mode,
            speed: 1.0,
            override_previous: false,
            bones: IndexMap::new(),
            particle_events: Vec::new(),
            sound_events: Vec::new(),
        }
    }

    /// Set the playback speed multiplier, clamped to `>= 0`.
    pub fn with_speed(mut self, speed: f32) -> Self {
        self.speed = speed.max(0.0);
        self
    }

    pub fn with_override_previous(mut self, override_previous: bool) -> Self {
        self.override_previous = override_previous;
        self
    }

    pub fn with_bone(mut self, name: impl Into<String>, track: BoneTrack) -> Self {
        self.bones.insert(name.into(), track);
        self
    }

    pub fn with_particle_event(mut self, event: ClipEvent) -> Self {
        self.particle_events.push(event);
        self
    }

    pub fn with_sound_event(mut self, event: ClipEvent) -> Self {
        self.sound_events.push(event);
        self
    }

    #[inline]
    pub fn bone(&self, name: &str) -> Option<&BoneTrack> {
        self.bones.get(name)
    }

    #[inline]
    pub fn is_looping(&self) -> bool {
        self.loop_mode.is_looping()
    }

    /// Length, loop mode and speed as copied into a playback clock.
    pub fn timing(&self) -> ClipTiming {
        ClipTiming {
            length: self.length,
            loop_mode: self.loop_mode,
            speed: self.speed,
        }
    }

    /// Check load-time invariants: finite non-negative length and speed,
    /// finite keyframes sorted per channel, and sorted events.
    pub fn validate(&self) -> crate::Result<()> {
        if !self.length.is_finite() || self.length < 0.0 {
            return Err(ClipError::InvalidLength {
                clip: self.name.clone(),
                length: self.length,
            });
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(ClipError::InvalidSpeed {
                clip: self.name.clone(),
                speed: self.speed,
            });
        }
        for (bone, track) in &self.bones {
            for kind in ChannelKind::ALL {
                if let Some((index, unsorted)) = track.channel(kind).first_invalid() {
                    let (clip, bone) = (self.name.clone(), bone.clone());
                    return Err(if unsorted {
                        ClipError::UnsortedChannel {
                            clip,
                            bone,
                            channel: kind,
                            index,
                        }
                    } else {
                        ClipError::NonFiniteKeyframe {
                            clip,
                            bone,
                            channel: kind,
                            index,
                        }
                    });
                }
            }
        }
        for (kind, events) in [
            ("particle", &self.particle_events),
            ("sound", &self.sound_events),
        ] {
            let mut last = f32::NEG_INFINITY;
            for (index, event) in events.iter().enumerate() {
                if !event.timestamp.is_finite() || event.timestamp < last {
                    return Err(ClipError::UnsortedEvents {
                        clip: self.name.clone(),
                        kind: kind.to_string(),
                        index,
                    });
                }
                last = event.timestamp;
            }
        }
        Ok(())
    }
}
