//! Vector and rotation math shared by the sampler and the pose applier.
//!
//! Rotations are authored as Euler angles in degrees, `[x, y, z]` = roll about
//! X, pitch about Y and yaw about Z, composed as `yaw * pitch * roll`.
//! Interpolation happens on unit quaternions and is converted back on output.

use std::f32::consts::FRAC_PI_2;

use nalgebra::{Quaternion, UnitQuaternion, Vector3};

pub type Vec3 = Vector3<f32>;
pub type Quat = UnitQuaternion<f32>;

/// Below this `|sin θ|` SLERP degenerates to normalized lerp.
const SLERP_SIN_EPSILON: f32 = 1e-3;

pub use crate::interp::functions::lerp;

/// Euler degrees to a unit quaternion.
#[inline]
pub fn euler_to_quat(deg: &Vec3) -> Quat {
    UnitQuaternion::from_euler_angles(deg.x.to_radians(), deg.y.to_radians(), deg.z.to_radians())
}

/// Unit quaternion back to Euler degrees.
///
/// Pitch is clamped to ±90° when the quaternion sits on the gimbal singularity.
pub fn quat_to_euler(q: &Quat) -> Vec3 {
    let q = q.quaternion();
    let (w, x, y, z) = (q.w, q.i, q.j, q.k);

    let sinr_cosp = 2.0 * (w * x + y * z);
    let cosr_cosp = 1.0 - 2.0 * (x * x + y * y);
    let roll = sinr_cosp.atan2(cosr_cosp);

    let sinp = 2.0 * (w * y - z * x);
    let pitch = if sinp.abs() >= 1.0 {
        FRAC_PI_2.copysign(sinp)
    } else {
        sinp.asin()
    };

    let siny_cosp = 2.0 * (w * z + x * y);
    let cosy_cosp = 1.0 - 2.0 * (y * y + z * z);
    let yaw = siny_cosp.atan2(cosy_cosp);

    Vec3::new(roll.to_degrees(), pitch.to_degrees(), yaw.to_degrees())
}

/// True when any axis moves by more than `threshold_deg` between `a` and `b`.
///
/// Such deltas are treated as deliberate multi-turn or discontinuous authoring
/// and are interpolated as raw angles instead of through quaternions.
#[inline]
pub fn needs_euler_fallback(a: &Vec3, b: &Vec3, threshold_deg: f32) -> bool {
    (b - a).iter().any(|d| d.abs() > threshold_deg)
}

/// Flip `q` onto the same hemisphere as `reference`.
#[inline]
fn align(reference: &Quaternion<f32>, q: Quaternion<f32>) -> Quaternion<f32> {
    if reference.dot(&q) < 0.0 {
        -q
    } else {
        q
    }
}

/// Normalized linear interpolation along the shortest arc.
pub fn nlerp(a: &Quat, b: &Quat, t: f32) -> Quat {
    let qa = *a.quaternion();
    let qb = align(&qa, *b.quaternion());
    UnitQuaternion::new_normalize(qa * (1.0 - t) + qb * t)
}

/// Spherical linear interpolation along the shortest arc.
pub fn slerp(a: &Quat, b: &Quat, t: f32) -> Quat {
    let qa = *a.quaternion();
    let qb = align(&qa, *b.quaternion());
    let cos_theta = qa.dot(&qb).min(1.0);
    let theta = cos_theta.acos();
    let sin_theta = theta.sin();
    if sin_theta.abs() < SLERP_SIN_EPSILON {
        return nlerp(a, b, t);
    }
    let wa = ((1.0 - t) * theta).sin() / sin_theta;
    let wb = (t * theta).sin() / sin_theta;
    UnitQuaternion::new_normalize(qa * wa + qb * wb)
}

/// Cubic quaternion Bezier by De Casteljau subdivision.
pub fn quat_bezier(q0: &Quat, q1: &Quat, q2: &Quat, q3: &Quat, t: f32) -> Quat {
    let a = slerp(q0, q1, t);
    let b = slerp(q1, q2, t);
    let c = slerp(q2, q3, t);
    let d = slerp(&a, &b, t);
    let e = slerp(&b, &c, t);
    slerp(&d, &e, t)
}

/// Non-uniform Catmull-Rom through `q[1]` and `q[2]`, with `q[0]` and `q[3]`
/// as neighbors.
///
/// Tangents are chord differences in each key's local frame, scaled by
/// `weights` (see `SplineSegment::weights`). They become Bezier controls
/// `q1 * exp(m1 / 3)` and `q2 * exp(-m2 / 3)`, so a rotation about a single
/// axis follows the same Hermite curve as a vector channel.
pub fn quat_spline(q: &[Quat; 4], weights: (f32, f32), t: f32) -> Quat {
    let [q0, q1, q2, q3] = q;
    let (inv1, inv2) = (q1.inverse(), q2.inverse());
    let m1 = ((inv1 * q2).scaled_axis() - (inv1 * q0).scaled_axis()) * weights.0;
    let m2 = ((inv2 * q3).scaled_axis() - (inv2 * q1).scaled_axis()) * weights.1;
    let c1 = q1 * UnitQuaternion::from_scaled_axis(m1 / 3.0);
    let c2 = q2 * UnitQuaternion::from_scaled_axis(m2 / -3.0);
    quat_bezier(q1, &c1, &c2, q2, t)
}

/// Shortest angle between two rotations, in radians.
#[inline]
pub fn angle_between(a: &Quat, b: &Quat) -> f32 {
    a.angle_to(b)
}

/// True when `a` and `b` describe the same rotation (either sign).
#[inline]
pub fn same_rotation(a: &Quat, b: &Quat, eps: f32) -> bool {
    a.quaternion().dot(b.quaternion()).abs() >= 1.0 - eps
}
