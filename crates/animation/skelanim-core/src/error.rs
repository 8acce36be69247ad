//! Error types for clip validation.
//!
//! Sampling and blending never fail; these errors are produced only when a
//! loader asks a clip to validate itself before handing it to the engine.

use serde::{Deserialize, Serialize};

use crate::data::ChannelKind;

/// Load-time validation failures for a [`Clip`](crate::data::Clip).
#[derive(thiserror::Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[non_exhaustive]
pub enum ClipError {
    #[error("clip '{clip}' has invalid length {length}")]
    InvalidLength { clip: String, length: f32 },

    #[error("clip '{clip}' has invalid speed {speed}")]
    InvalidSpeed { clip: String, speed: f32 },

    #[error("non-finite keyframe {index} in {bone}/{channel:?} of clip '{clip}'")]
    NonFiniteKeyframe {
        clip: String,
        bone: String,
        channel: ChannelKind,
        index: usize,
    },

    #[error(
        "keyframe {index} in {bone}/{channel:?} of clip '{clip}' is earlier than its predecessor"
    )]
    UnsortedChannel {
        clip: String,
        bone: String,
        channel: ChannelKind,
        index: usize,
    },

    #[error("{kind} event {index} of clip '{clip}' is out of order or non-finite")]
    UnsortedEvents {
        clip: String,
        kind: String,
        index: usize,
    },
}

impl ClipError {
    /// Name of the clip that failed validation.
    pub fn clip(&self) -> &str {
        match self {
            Self::InvalidLength { clip, .. }
            | Self::InvalidSpeed { clip, .. }
            | Self::NonFiniteKeyframe { clip, .. }
            | Self::UnsortedChannel { clip, .. }
            | Self::UnsortedEvents { clip, .. } => clip,
        }
    }
}
