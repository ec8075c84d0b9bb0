//! Conversions between spherical coordinate pairs and unit vectors
//!
//! Every transformation in this crate works on unit vectors; the helpers here
//! are the only place where `(longitude, latitude)` pairs are turned into
//! vectors and back.
//!
//! The axes follow the usual astronomical convention: X toward
//! `(lon = 0, lat = 0)`, Y toward `(lon = 90°, lat = 0)`, Z toward the pole.

pub mod position;

use nalgebra::Vector3;
use std::f64::consts::PI;

/// Converts a longitude/latitude pair in radians to a unit vector.
pub fn rade_to_vector(ra: f64, dec: f64) -> Vector3<f64> {
    let (sin_dec, cos_dec) = dec.sin_cos();
    let (sin_ra, cos_ra) = ra.sin_cos();
    Vector3::new(cos_ra * cos_dec, sin_ra * cos_dec, sin_dec)
}

/// Converts a unit vector to a longitude/latitude pair in radians.
///
/// The longitude is returned in `[0, 2π)`, the latitude in `[-π/2, π/2]`.
/// Small departures from unit length are tolerated.
pub fn vector_to_rade(unit: &Vector3<f64>) -> (f64, f64) {
    let mut ra = unit.y.atan2(unit.x);
    if ra < 0.0 {
        ra += 2.0 * PI;
    }
    // atan2 keeps the latitude well defined for slightly denormalized input
    let dec = unit.z.atan2(unit.x.hypot(unit.y));
    (ra, dec)
}
