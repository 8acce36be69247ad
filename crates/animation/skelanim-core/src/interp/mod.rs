//! Curve library.
//!
//! `easing` holds the normalized-time curves (linear, step and the Penner
//! families); `functions` holds the Bezier/Hermite/Catmull-Rom evaluators that
//! work on sampled values directly.

pub mod easing;
pub mod functions;

pub use easing::{ease, Ease, EaseDirection, EaseFamily, UnknownEase};

use crate::data::Interpolation;

/// Map normalized progress through an interpolation mode.
///
/// `Step` holds the start (always 0). `Bezier` and `CatmullRom` are not
/// expressible as a time curve and pass `t` through unchanged.
#[inline]
pub fn ease_progress(mode: Interpolation, t: f32) -> f32 {
    match mode {
        Interpolation::Step => 0.0,
        Interpolation::Eased(e) => ease(e, t),
        Interpolation::Linear | Interpolation::Bezier | Interpolation::CatmullRom => t,
    }
}
