//! Zenithal projections, centred on the north pole `(0, 0, 1)`
//!
//! Every zenithal projection maps a point at angular distance `ρ` from the
//! pole to a plane radius `R(ρ)` along the direction `(vx, vy)`, so each
//! variant only differs in its radial function.

use crate::constants::OUTLINE_SLACK;
use nalgebra::{Vector2, Vector3};
use std::f64::consts::PI;

pub(crate) fn nan_point() -> Vector2<f64> {
    Vector2::new(f64::NAN, f64::NAN)
}

pub(crate) fn nan_vector() -> Vector3<f64> {
    Vector3::new(f64::NAN, f64::NAN, f64::NAN)
}

/// Gnomonic projection. Points on or behind the horizon have no image.
pub(crate) fn project_tan(v: &Vector3<f64>) -> Vector2<f64> {
    if v.z <= 0.0 {
        return nan_point();
    }
    Vector2::new(v.x / v.z, v.y / v.z)
}

pub(crate) fn deproject_tan(p: &Vector2<f64>) -> Vector3<f64> {
    if !(p.x.is_finite() && p.y.is_finite()) {
        return nan_vector();
    }
    Vector3::new(p.x, p.y, 1.0).normalize()
}

/// Gnomonic projection extended over the whole sphere.
///
/// The front hemisphere is plain TAN; the horizon and the back hemisphere
/// are sent to infinity along `(vx, vy)`, so every point has an image.
pub(crate) fn project_xtn(v: &Vector3<f64>) -> Vector2<f64> {
    if v.z > 0.0 {
        return project_tan(v);
    }
    Vector2::new(to_infinity(v.x), to_infinity(v.y))
}

fn to_infinity(c: f64) -> f64 {
    if c == 0.0 {
        0.0
    } else {
        c.signum() * f64::INFINITY
    }
}

pub(crate) fn deproject_xtn(p: &Vector2<f64>) -> Vector3<f64> {
    if p.x.is_nan() || p.y.is_nan() {
        return nan_vector();
    }
    if p.x.is_infinite() || p.y.is_infinite() {
        // Only the direction survives; return the horizon point
        let dx = if p.x.is_infinite() { p.x.signum() } else { 0.0 };
        let dy = if p.y.is_infinite() { p.y.signum() } else { 0.0 };
        return Vector3::new(dx, dy, 0.0).normalize();
    }
    deproject_tan(p)
}

/// Orthographic projection of the front hemisphere.
pub(crate) fn project_sin(v: &Vector3<f64>) -> Vector2<f64> {
    if v.z < 0.0 {
        return nan_point();
    }
    Vector2::new(v.x, v.y)
}

pub(crate) fn deproject_sin(p: &Vector2<f64>) -> Vector3<f64> {
    let r2 = p.norm_squared();
    if r2.is_nan() || r2 > 1.0 + OUTLINE_SLACK {
        return nan_vector();
    }
    Vector3::new(p.x, p.y, (1.0 - r2).max(0.0).sqrt())
}

/// Zenithal equidistant projection: plane radius equals angular distance.
pub(crate) fn project_arc(v: &Vector3<f64>) -> Vector2<f64> {
    let h = v.x.hypot(v.y);
    if h == 0.0 {
        return if v.z >= 0.0 {
            Vector2::zeros()
        } else {
            // The antipode maps to the whole boundary circle; pick one point
            Vector2::new(PI, 0.0)
        };
    }
    let rho = h.atan2(v.z);
    Vector2::new(v.x, v.y) * (rho / h)
}

pub(crate) fn deproject_arc(p: &Vector2<f64>) -> Vector3<f64> {
    let r = p.norm();
    if r.is_nan() || r > PI {
        return nan_vector();
    }
    if r == 0.0 {
        return Vector3::z();
    }
    let (s, c) = r.sin_cos();
    Vector3::new(p.x * s / r, p.y * s / r, c)
}

/// Stereographic projection. Only the south pole has no finite image.
pub(crate) fn project_stg(v: &Vector3<f64>) -> Vector2<f64> {
    let d = 1.0 + v.z;
    if d <= 0.0 {
        return Vector2::new(to_infinity(v.x), to_infinity(v.y));
    }
    Vector2::new(2.0 * v.x / d, 2.0 * v.y / d)
}

pub(crate) fn deproject_stg(p: &Vector2<f64>) -> Vector3<f64> {
    let r2 = p.norm_squared();
    if r2.is_nan() {
        return nan_vector();
    }
    if r2.is_infinite() {
        return -Vector3::z();
    }
    let z = (4.0 - r2) / (4.0 + r2);
    let f = (1.0 + z) / 2.0;
    Vector3::new(p.x * f, p.y * f, z)
}

/// Lambert zenithal equal-area projection.
pub(crate) fn project_zea(v: &Vector3<f64>) -> Vector2<f64> {
    let d = 1.0 + v.z;
    if d <= 0.0 {
        // The antipode maps to the boundary circle of radius 2
        return Vector2::new(2.0, 0.0);
    }
    Vector2::new(v.x, v.y) * (2.0 / d).sqrt()
}

pub(crate) fn deproject_zea(p: &Vector2<f64>) -> Vector3<f64> {
    let r2 = p.norm_squared();
    if r2.is_nan() || r2 > 4.0 {
        return nan_vector();
    }
    let z = 1.0 - r2 / 2.0;
    let f = (1.0 - r2 / 4.0).sqrt();
    Vector3::new(p.x * f, p.y * f, z)
}
