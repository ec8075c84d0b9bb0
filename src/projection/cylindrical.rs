//! Plate carrée, centred on `(1, 0, 0)`
//!
//! The seam runs along longitude 180°, where `x` jumps between `π` and
//! `-π`. Cells crossing it are handled through shadow points, which move a
//! point by one full turn to the other side of the seam.

use super::zenithal::{nan_point, nan_vector};
use crate::constants::{HALF_PI, TAU};
use crate::coordinates::rade_to_vector;
use nalgebra::{Vector2, Vector3};
use std::f64::consts::PI;

pub(crate) fn project_car(v: &Vector3<f64>) -> Vector2<f64> {
    let lat = v.z.clamp(-1.0, 1.0).asin();
    Vector2::new(v.y.atan2(v.x), lat)
}

pub(crate) fn deproject_car(p: &Vector2<f64>) -> Vector3<f64> {
    if !valid_car(p) {
        return nan_vector();
    }
    rade_to_vector(p.x, p.y)
}

pub(crate) fn valid_car(p: &Vector2<f64>) -> bool {
    p.x.abs() <= PI && p.y.abs() <= HALF_PI
}

pub(crate) fn shadow_car(p: &Vector2<f64>) -> Vector2<f64> {
    if p.x.is_nan() {
        return nan_point();
    }
    if p.x > 0.0 {
        Vector2::new(p.x - TAU, p.y)
    } else {
        Vector2::new(p.x + TAU, p.y)
    }
}
