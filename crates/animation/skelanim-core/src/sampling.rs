//! Keyframe sampling.
//!
//! Model:
//! - A channel is located with a [`ChannelCursor`]: forward scan from the last
//!   resolved index while playback time moves forward, binary search otherwise.
//! - Before the first frame the first frame's `next_value()` is held; after the
//!   last frame the last frame's `prev_value()` is held. An exact hit on a frame
//!   returns its `next_value()`.
//! - Inside a segment the mode of the frame that opens it decides the curve.
//!   Rotation channels go through quaternions unless an axis moves by more than
//!   the configured threshold, in which case raw Euler angles are interpolated.
//!
//! Sampling never fails: empty channels sample as zero.

use tracing::trace;

use crate::config::SamplerConfig;
use crate::data::{BoneTrack, Channel, ChannelKind, Clip, Interpolation, Keyframe};
use crate::interp::ease_progress;
use crate::interp::functions::{cubic_bezier, lerp, SplineSegment};
use crate::math::{
    euler_to_quat, needs_euler_fallback, quat_bezier, quat_spline, quat_to_euler, slerp, Vec3,
};

/// Per-channel lookup state for amortized O(1) sampling of monotonic playback.
///
/// Any query earlier than the previous one falls back to binary search, so a
/// stale cursor after a loop, seek or restart degrades gracefully.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct ChannelCursor {
    last_index: usize,
    last_time: f32,
    valid: bool,
}

impl ChannelCursor {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Index of the first frame with `timestamp >= t` resolved by the last query.
    #[inline]
    pub fn index(&self) -> Option<usize> {
        self.valid.then_some(self.last_index)
    }

    /// First index whose timestamp is `>= t` (`frames.len()` if none).
    pub fn locate(&mut self, frames: &[Keyframe], t: f32) -> usize {
        let forward = self.valid && t >= self.last_time && self.last_index <= frames.len();
        let index = if forward {
            let mut i = self.last_index;
            while i < frames.len() && frames[i].timestamp < t {
                i += 1;
            }
            i
        } else {
            frames.partition_point(|k| k.timestamp < t)
        };
        self.last_index = index;
        self.last_time = t;
        self.valid = true;
        index
    }
}

/// Loop information the Catmull-Rom neighbors need to wrap around a clip.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct LoopWrap {
    pub length: f32,
    pub looping: bool,
}

impl LoopWrap {
    pub fn for_clip(clip: &Clip) -> Self {
        Self {
            length: clip.length,
            looping: clip.is_looping(),
        }
    }

    #[inline]
    fn wraps(&self, frame_count: usize) -> bool {
        self.looping && frame_count >= 2 && self.length > 0.0
    }
}

/// Sampled values for one bone. `None` marks a channel without keyframes.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct BoneSample {
    pub position: Option<Vec3>,
    pub rotation: Option<Vec3>,
    pub scale: Option<Vec3>,
}

/// Cursors for the three channels of one bone track.
pub type TrackCursors = [ChannelCursor; 3];

/// Stateless sampler parameterized by tolerances.
#[derive(Clone, Debug, Default)]
pub struct Sampler {
    cfg: SamplerConfig,
}

impl Sampler {
    pub fn new(cfg: SamplerConfig) -> Self {
        Self { cfg }
    }

    #[inline]
    pub fn config(&self) -> &SamplerConfig {
        &self.cfg
    }

    /// Sample `channel` at time `t`, updating `cursor`.
    pub fn sample(
        &self,
        channel: &Channel,
        kind: ChannelKind,
        t: f32,
        cursor: &mut ChannelCursor,
        wrap: LoopWrap,
    ) -> Vec3 {
        let frames = channel.keyframes();
        let Some(last) = frames.last() else {
            return Vec3::zeros();
        };

        let after = cursor.locate(frames, t);
        if after == 0 {
            return frames[0].next_value();
        }
        if after >= frames.len() {
            return last.prev_value();
        }

        let end_frame = &frames[after];
        if end_frame.timestamp == t {
            return end_frame.next_value();
        }
        let start_frame = &frames[after - 1];
        let duration = end_frame.timestamp - start_frame.timestamp;
        let frac = if duration > 0.0 {
            (t - start_frame.timestamp) / duration
        } else {
            0.0
        };

        let segment = Segment {
            frames,
            before: after - 1,
            frac,
            wrap,
        };
        match kind {
            ChannelKind::Rotation => self.rotation_segment(&segment),
            ChannelKind::Position | ChannelKind::Scale => self.vector_segment(&segment),
        }
    }

    /// Sample with a fresh cursor (plain binary search).
    pub fn sample_at(&self, channel: &Channel, kind: ChannelKind, t: f32, wrap: LoopWrap) -> Vec3 {
        self.sample(channel, kind, t, &mut ChannelCursor::new(), wrap)
    }

    /// Sample every non-empty channel of a bone track.
    pub fn sample_track(
        &self,
        track: &BoneTrack,
        t: f32,
        cursors: &mut TrackCursors,
        wrap: LoopWrap,
    ) -> BoneSample {
        let mut out = [None; 3];
        for kind in ChannelKind::ALL {
            let channel = track.channel(kind);
            if !channel.is_empty() {
                let cursor = &mut cursors[kind.index()];
                out[kind.index()] = Some(self.sample(channel, kind, t, cursor, wrap));
            }
        }
        let [position, rotation, scale] = out;
        BoneSample {
            position,
            rotation,
            scale,
        }
    }

    /// Sample one bone of a clip. Returns `None` when the clip has no such bone.
    pub fn sample_bone(&self, clip: &Clip, bone: &str, t: f32) -> Option<BoneSample> {
        let track = clip.bone(bone)?;
        let mut cursors = TrackCursors::default();
        Some(self.sample_track(track, t, &mut cursors, LoopWrap::for_clip(clip)))
    }

    fn vector_segment(&self, seg: &Segment<'_>) -> Vec3 {
        let (start, end) = (seg.start().prev_value(), seg.end().next_value());
        match seg.start().interpolation {
            Interpolation::Step => start,
            Interpolation::Bezier => {
                let (p0, p1, p2, p3) = seg.bezier_points();
                cubic_bezier(p0, p1, p2, p3, seg.frac)
            }
            Interpolation::CatmullRom => seg
                .spline(self.cfg.segment_epsilon)
                .evaluate(seg.frac, self.cfg.segment_epsilon),
            mode => lerp(start, end, ease_progress(mode, seg.frac)),
        }
    }

    fn rotation_segment(&self, seg: &Segment<'_>) -> Vec3 {
        let (start, end) = (seg.start().prev_value(), seg.end().next_value());
        if needs_euler_fallback(&start, &end, self.cfg.fallback_threshold()) {
            trace!(index = seg.before, "rotation delta exceeds threshold, using euler interpolation");
            return self.vector_segment(seg);
        }
        let q = match seg.start().interpolation {
            Interpolation::Step => return start,
            Interpolation::Bezier => {
                let (p0, p1, p2, p3) = seg.bezier_points();
                quat_bezier(
                    &euler_to_quat(&p0),
                    &euler_to_quat(&p1),
                    &euler_to_quat(&p2),
                    &euler_to_quat(&p3),
                    seg.frac,
                )
            }
            Interpolation::CatmullRom => {
                let spline = seg.spline(self.cfg.segment_epsilon);
                let keys = spline.points.map(|p| euler_to_quat(&p));
                quat_spline(&keys, spline.weights(self.cfg.segment_epsilon), seg.frac)
            }
            mode => slerp(
                &euler_to_quat(&start),
                &euler_to_quat(&end),
                ease_progress(mode, seg.frac),
            ),
        };
        quat_to_euler(&q)
    }
}

/// A located segment `frames[before] -> frames[before + 1]`.
struct Segment<'a> {
    frames: &'a [Keyframe],
    before: usize,
    frac: f32,
    wrap: LoopWrap,
}

impl<'a> Segment<'a> {
    #[inline]
    fn start(&self) -> &'a Keyframe {
        &self.frames[self.before]
    }

    #[inline]
    fn end(&self) -> &'a Keyframe {
        &self.frames[self.before + 1]
    }

    /// P0 = start value, P1 = start.post, P2 = end.pre, P3 = end value.
    fn bezier_points(&self) -> (Vec3, Vec3, Vec3, Vec3) {
        let (a, b) = (self.start(), self.end());
        let p0 = a.value;
        let p3 = b.value;
        (p0, a.post.unwrap_or(p0), b.pre.unwrap_or(p3), p3)
    }

    /// Catmull-Rom control points and times around this segment.
    ///
    /// Missing neighbors come from the opposite end of a looping clip shifted by
    /// its length, or are extrapolated linearly from the segment itself.
    fn spline(&self, eps: f32) -> SplineSegment<Vec3> {
        let frames = self.frames;
        let n = frames.len();
        let (a, b) = (self.start(), self.end());
        let (p1, p2) = (a.prev_value(), b.next_value());
        let (t1, t2) = (a.timestamp, b.timestamp);
        let span = (t2 - t1).max(eps);

        let (p0, t0) = if self.before > 0 {
            let k = &frames[self.before - 1];
            (k.value, k.timestamp)
        } else if self.wrap.wraps(n) {
            let k = &frames[n - 1];
            (k.value, k.timestamp - self.wrap.length)
        } else {
            (p1 + (p1 - p2), t1 - span)
        };

        let (p3, t3) = if self.before + 2 < n {
            let k = &frames[self.before + 2];
            (k.value, k.timestamp)
        } else if self.wrap.wraps(n) {
            let k = &frames[0];
            (k.value, k.timestamp + self.wrap.length)
        } else {
            (p2 + (p2 - p1), t2 + span)
        };

        SplineSegment {
            points: [p0, p1, p2, p3],
            times: [t0, t1, t2, t3],
        }
    }
}
