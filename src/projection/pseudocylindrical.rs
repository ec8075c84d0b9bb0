//! Hammer-Aitoff and Sanson-Flamsteed projections, centred on `(1, 0, 0)`
//!
//! Both show the whole sky inside a bounded outline with the seam at
//! longitude 180°. The shadow of a point is the same sky position pushed one
//! full turn around in longitude, which lands outside the outline on the
//! other side.

use super::zenithal::{nan_point, nan_vector};
use crate::constants::{HALF_PI, OUTLINE_SLACK, TAU};
use crate::coordinates::rade_to_vector;
use nalgebra::{Vector2, Vector3};
use std::f64::consts::PI;

fn native(v: &Vector3<f64>) -> (f64, f64) {
    (v.y.atan2(v.x), v.z.clamp(-1.0, 1.0).asin())
}

fn ait_plane(phi: f64, theta: f64) -> Vector2<f64> {
    let (sin_theta, cos_theta) = theta.sin_cos();
    let half_phi = phi / 2.0;
    let denom = 1.0 + cos_theta * half_phi.cos();
    if denom <= 0.0 {
        return nan_point();
    }
    let gamma = (2.0 / denom).sqrt();
    Vector2::new(2.0 * gamma * cos_theta * half_phi.sin(), gamma * sin_theta)
}

pub(crate) fn project_ait(v: &Vector3<f64>) -> Vector2<f64> {
    let (phi, theta) = native(v);
    ait_plane(phi, theta)
}

fn ait_native(p: &Vector2<f64>) -> Option<(f64, f64)> {
    if !valid_ait(p) {
        return None;
    }
    let xs = p.x / 4.0;
    let ys = p.y / 2.0;
    let z = (1.0 - xs * xs - ys * ys).max(0.0).sqrt();
    let theta = (p.y * z).clamp(-1.0, 1.0).asin();
    let phi = 2.0 * (p.x * z / 2.0).atan2(2.0 * z * z - 1.0);
    Some((phi, theta))
}

pub(crate) fn deproject_ait(p: &Vector2<f64>) -> Vector3<f64> {
    match ait_native(p) {
        Some((phi, theta)) => rade_to_vector(phi, theta),
        None => nan_vector(),
    }
}

pub(crate) fn valid_ait(p: &Vector2<f64>) -> bool {
    p.x * p.x / 8.0 + p.y * p.y / 2.0 <= 1.0 + OUTLINE_SLACK
}

pub(crate) fn shadow_ait(p: &Vector2<f64>) -> Vector2<f64> {
    match ait_native(p) {
        Some((phi, theta)) => ait_plane(wrap_longitude(phi), theta),
        None => nan_point(),
    }
}

pub(crate) fn project_sfl(v: &Vector3<f64>) -> Vector2<f64> {
    let (phi, theta) = native(v);
    Vector2::new(phi * theta.cos(), theta)
}

fn sfl_native(p: &Vector2<f64>) -> Option<(f64, f64)> {
    if !valid_sfl(p) {
        return None;
    }
    let theta = p.y.clamp(-HALF_PI, HALF_PI);
    let cos_theta = theta.cos();
    let phi = if cos_theta > 0.0 {
        (p.x / cos_theta).clamp(-PI, PI)
    } else {
        0.0
    };
    Some((phi, theta))
}

pub(crate) fn deproject_sfl(p: &Vector2<f64>) -> Vector3<f64> {
    match sfl_native(p) {
        Some((phi, theta)) => rade_to_vector(phi, theta),
        None => nan_vector(),
    }
}

pub(crate) fn valid_sfl(p: &Vector2<f64>) -> bool {
    p.y.abs() <= HALF_PI + OUTLINE_SLACK
        && p.x.abs() <= PI * p.y.clamp(-HALF_PI, HALF_PI).cos() + OUTLINE_SLACK
}

pub(crate) fn shadow_sfl(p: &Vector2<f64>) -> Vector2<f64> {
    match sfl_native(p) {
        Some((phi, theta)) => Vector2::new(wrap_longitude(phi) * theta.cos(), theta),
        None => nan_point(),
    }
}

/// The same longitude one turn around, on the far side of the seam
fn wrap_longitude(phi: f64) -> f64 {
    phi - TAU * phi.signum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_ait_outline() {
        // The equator spans x in [-2√2, 2√2], the poles reach y = ±√2
        let edge = project_ait(&rade_to_vector(PI - 1e-12, 0.0));
        assert_relative_eq!(edge.x, 2.0 * 2f64.sqrt(), epsilon = 1e-9);
        let pole = project_ait(&Vector3::z());
        assert_relative_eq!(pole, Vector2::new(0.0, 2f64.sqrt()), epsilon = 1e-15);
        assert!(valid_ait(&pole));
        assert!(!valid_ait(&Vector2::new(2.9, 0.0)));
    }

    #[test]
    fn test_roundtrip() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..500 {
            let lon = (rng.gen::<f64>() * 2.0 - 1.0) * 3.1;
            let lat = (rng.gen::<f64>() * 2.0 - 1.0) * 1.55;
            let v = rade_to_vector(lon, lat);
            assert_relative_eq!(deproject_ait(&project_ait(&v)), v, epsilon = 1e-10);
            assert_relative_eq!(deproject_sfl(&project_sfl(&v)), v, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_poles_on_the_outline() {
        for pole in [Vector3::z(), -Vector3::z()] {
            let p = project_ait(&pole);
            assert!(valid_ait(&p));
            // asin near ±1 amplifies the last bit of y*z
            assert_relative_eq!(deproject_ait(&p), pole, epsilon = 1e-7);

            let p = project_sfl(&pole);
            assert!(valid_sfl(&p));
            assert_relative_eq!(deproject_sfl(&p), pole, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_seam_on_the_outline() {
        for lon in [PI, -PI] {
            let v = rade_to_vector(lon, 0.2);

            let p = project_ait(&v);
            assert!(valid_ait(&p));
            assert_relative_eq!(deproject_ait(&p), v, epsilon = 1e-7);
            let s = shadow_ait(&p);
            assert!(s.x.is_finite() && s.y.is_finite());
            assert_relative_eq!(s.x, -p.x, epsilon = 1e-6);

            let p = project_sfl(&v);
            assert!(valid_sfl(&p));
            assert_relative_eq!(deproject_sfl(&p), v, epsilon = 1e-10);
            let s = shadow_sfl(&p);
            assert!(s.x.is_finite());
            assert_relative_eq!(s.x, -p.x, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_sfl_outline() {
        assert!(valid_sfl(&Vector2::new(PI, 0.0)));
        assert!(!valid_sfl(&Vector2::new(2.0, 1.2)));
        assert!(deproject_sfl(&Vector2::new(2.0, 1.2)).x.is_nan());
    }

    #[test]
    fn test_shadows_cross_the_seam() {
        let near_seam = project_ait(&rade_to_vector(3.0, 0.3));
        let shadow = shadow_ait(&near_seam);
        assert!(shadow.x < 0.0);
        assert!(!valid_ait(&shadow));

        assert_relative_eq!(shadow, ait_plane(3.0 - TAU, 0.3), epsilon = 1e-10);

        let p = project_sfl(&rade_to_vector(-3.0, 0.3));
        let s = shadow_sfl(&p);
        assert_relative_eq!(s.x, (TAU - 3.0) * 0.3f64.cos(), epsilon = 1e-12);
        assert_relative_eq!(s.y, 0.3, epsilon = 1e-15);
    }
}
