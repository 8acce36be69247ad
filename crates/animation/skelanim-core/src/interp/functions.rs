//! Cubic curve helpers: Bezier, Hermite and non-uniform Catmull-Rom.
//!
//! These operate on raw sampled values rather than normalized time, so they are
//! generic over any `T` that supports the basic arithmetic with `f32` scalars
//! (`f32` itself and `nalgebra::Vector3<f32>`).

use std::ops::{Add, Mul, Sub};

/// Component-wise linear interpolation.
#[inline]
pub fn lerp<T>(a: T, b: T, t: f32) -> T
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    a + (b - a) * t
}

/// Point on a cubic Bezier curve (Bernstein form).
///
/// B(t) = (1 - t)^3 P0 + 3 (1 - t)^2 t P1 + 3 (1 - t) t^2 P2 + t^3 P3
pub fn cubic_bezier<T>(p0: T, p1: T, p2: T, p3: T, t: f32) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    let u = 1.0 - t;
    let uu = u * u;
    let tt = t * t;
    p0 * (uu * u) + p1 * (3.0 * uu * t) + p2 * (3.0 * u * tt) + p3 * (tt * t)
}

// Hermite basis functions
#[inline]
pub fn hermite_h00(t: f32) -> f32 {
    2.0 * t * t * t - 3.0 * t * t + 1.0
}
#[inline]
pub fn hermite_h10(t: f32) -> f32 {
    t * t * t - 2.0 * t * t + t
}
#[inline]
pub fn hermite_h01(t: f32) -> f32 {
    -2.0 * t * t * t + 3.0 * t * t
}
#[inline]
pub fn hermite_h11(t: f32) -> f32 {
    t * t * t - t * t
}

/// Cubic Hermite spline over one unit segment.
///
/// H(t) = h00(t) P1 + h10(t) M1 + h01(t) P2 + h11(t) M2
pub fn hermite<T>(p1: T, p2: T, m1: T, m2: T, t: f32) -> T
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    p1 * hermite_h00(t) + m1 * hermite_h10(t) + p2 * hermite_h01(t) + m2 * hermite_h11(t)
}

/// Four control points of a Catmull-Rom segment together with their times.
/// The segment runs from `points[1]` (at `times[1]`) to `points[2]` (at `times[2]`).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplineSegment<T> {
    pub points: [T; 4],
    pub times: [f32; 4],
}

impl<T> SplineSegment<T> {
    /// Time ratios `(t2 - t1) / (t2 - t0)` and `(t2 - t1) / (t3 - t1)` that
    /// scale the neighbor chords into tangents. Differences are clamped to `eps`.
    pub fn weights(&self, eps: f32) -> (f32, f32) {
        let [t0, t1, t2, t3] = self.times;
        let span = (t2 - t1).max(eps);
        (span / (t2 - t0).max(eps), span / (t3 - t1).max(eps))
    }
}

impl<T> SplineSegment<T>
where
    T: Copy + Add<Output = T> + Sub<Output = T> + Mul<f32, Output = T>,
{
    /// Tangents at P1 and P2 expressed per unit of segment progress.
    ///
    /// m1 = (P2 - P0) / (t2 - t0) * (t2 - t1)
    /// m2 = (P3 - P1) / (t3 - t1) * (t2 - t1)
    pub fn tangents(&self, eps: f32) -> (T, T) {
        let [p0, p1, p2, p3] = self.points;
        let (w1, w2) = self.weights(eps);
        ((p2 - p0) * w1, (p3 - p1) * w2)
    }

    /// Evaluate the segment at normalized progress `frac ∈ [0, 1]`.
    pub fn evaluate(&self, frac: f32, eps: f32) -> T {
        let (m1, m2) = self.tangents(eps);
        hermite(self.points[1], self.points[2], m1, m2, frac)
    }
}
