//! The non-rotational part of the FK4 (B1950) frame
//!
//! FK4 catalogue positions contain the elliptic terms of annual aberration
//! and differ from FK5 by a small non-orthogonal matrix, so the conversion
//! cannot be expressed by a [`Rotater`](crate::Rotater) alone. The
//! [`Fk4Distorter`] carries it as a sphere distortion:
//!
//! - `distort`: FK5/J2000 → FK4/B1950 mean place
//! - `undistort`: FK4/B1950 → FK5/J2000
//!
//! Proper motions are taken as zero in FK5.

use crate::constants::{
    BESSELIAN_BASE_EPOCH, BESSELIAN_YEAR, B1900_MJD, J2000_MJD, JULIAN_BASE_EPOCH, JULIAN_YEAR,
    TAU,
};
use crate::transform::distorter::SphereDistorter;
use lazy_static::lazy_static;
use nalgebra::{Matrix3, Vector3};

/// E-terms of aberration
const E_TERMS: [f64; 3] = [-1.62557e-6, -0.31919e-6, -0.13843e-6];

/// FK4 → FK5 position rotation at B1950
#[rustfmt::skip]
const POSITION: [f64; 9] = [
    0.9999256782, -0.0111820611, -0.0048579477,
    0.0111820610,  0.9999374784, -0.0000271765,
    0.0048579479, -0.0000271474,  0.9999881997,
];

/// Position change from the fictitious FK4 proper motion (per radian-century)
#[rustfmt::skip]
const MOTION: [f64; 9] = [
    -0.000551, -0.238565,  0.435739,
     0.238514, -0.002667, -0.008541,
    -0.435623,  0.012254,  0.002117,
];

/// Arcseconds-per-century units in one radian-per-year
const PMF: f64 = 100.0 * 60.0 * 60.0 * 360.0 / TAU;

const MAX_ITERATIONS: usize = 10;

lazy_static! {
    static ref FK4_TO_FK5: Matrix3<f64> = {
        let w = (besselian_to_julian(BESSELIAN_BASE_EPOCH) - JULIAN_BASE_EPOCH) / PMF;
        Matrix3::from_row_slice(&POSITION) + Matrix3::from_row_slice(&MOTION) * w
    };

    static ref FK5_TO_FK4: Matrix3<f64> = FK4_TO_FK5
        .try_inverse()
        .expect("FK4 to FK5 matrix is not singular");
}

/// Converts a Besselian epoch to the equivalent Julian epoch.
pub fn besselian_to_julian(epoch: f64) -> f64 {
    let mjd = B1900_MJD + (epoch - 1900.0) * BESSELIAN_YEAR;
    JULIAN_BASE_EPOCH + (mjd - J2000_MJD) / JULIAN_YEAR
}

/// E-terms and FK4/FK5 frame correction at B1950
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Fk4Distorter;

impl Fk4Distorter {
    pub fn new() -> Self {
        Fk4Distorter
    }

    fn e_terms() -> Vector3<f64> {
        Vector3::from(E_TERMS)
    }

    /// Strips the E-terms from an FK4 direction.
    fn remove_e_terms(v: &Vector3<f64>) -> Vector3<f64> {
        let a = Self::e_terms();
        (v - a + v * v.dot(&a)).normalize()
    }

    /// Finds the FK4 direction whose E-term-free direction is `u`.
    fn add_e_terms(u: &Vector3<f64>) -> Vector3<f64> {
        let mut p = *u;
        for _ in 0..MAX_ITERATIONS {
            let step = u - Self::remove_e_terms(&p);
            p = (p + step).normalize();
            if step.norm() < 1e-16 {
                break;
            }
        }
        p
    }
}

impl SphereDistorter for Fk4Distorter {
    fn name(&self) -> &str {
        "Fk4Distorter"
    }

    fn distort(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let u = (*FK5_TO_FK4 * v).normalize();
        Self::add_e_terms(&u)
    }

    fn undistort(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let u = Self::remove_e_terms(v);
        (*FK4_TO_FK5 * u).normalize()
    }
}
