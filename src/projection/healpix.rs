//! HEALPix projection with `H = 4`, `K = 3`
//!
//! An equal-area projection made of an equatorial cylindrical band
//! (`|y| ≤ π/4`) and four triangular caps towards each pole. The footprint
//! repeats every `2π` in x.

use super::zenithal::nan_vector;
use crate::constants::{HALF_PI, TAU};
use crate::coordinates::rade_to_vector;
use nalgebra::{Vector2, Vector3};
use std::f64::consts::{FRAC_PI_4, PI};

/// Width of one polar facet
const FACET: f64 = HALF_PI;

/// Sine of the latitude where the caps begin (`(K - 1) / K`)
const CAP_SINE: f64 = 2.0 / 3.0;

/// Longitude of the centre of the polar facet holding `x`
fn facet_centre(x: f64) -> f64 {
    let index = ((x + PI) / FACET).floor().clamp(0.0, 3.0);
    -PI + (index + 0.5) * FACET
}

/// Brings `x` into `[-π, π)`.
fn wrap(x: f64) -> f64 {
    (x + PI).rem_euclid(TAU) - PI
}

pub(crate) fn project_hpx(v: &Vector3<f64>) -> Vector2<f64> {
    let phi = v.y.atan2(v.x);
    let z = v.z.clamp(-1.0, 1.0);

    if z.abs() <= CAP_SINE {
        return Vector2::new(phi, 3.0 * PI / 8.0 * z);
    }

    let sigma = (3.0 * (1.0 - z.abs())).sqrt();
    let phi = wrap(phi);
    let centre = facet_centre(phi);
    let x = centre + (phi - centre) * sigma;
    let y = z.signum() * FRAC_PI_4 * (2.0 - sigma);
    Vector2::new(x, y)
}

pub(crate) fn valid_hpx(p: &Vector2<f64>) -> bool {
    if p.x.is_nan() || p.y.is_nan() || !p.x.is_finite() {
        return false;
    }
    let ay = p.y.abs();
    if ay <= FRAC_PI_4 {
        return true;
    }
    let x = wrap(p.x);
    ay <= HALF_PI && (x - facet_centre(x)).abs() <= HALF_PI - ay
}

pub(crate) fn deproject_hpx(p: &Vector2<f64>) -> Vector3<f64> {
    if !valid_hpx(p) {
        return nan_vector();
    }

    let x = wrap(p.x);
    let ay = p.y.abs();
    if ay <= FRAC_PI_4 {
        let z = p.y * 8.0 / (3.0 * PI);
        return rade_to_vector(x, z.asin());
    }

    let sigma = 2.0 - ay / FRAC_PI_4;
    let z = p.y.signum() * (1.0 - sigma * sigma / 3.0);
    let centre = facet_centre(x);
    let phi = if sigma > 0.0 {
        centre + (x - centre) / sigma
    } else {
        centre
    };
    rade_to_vector(phi, z.clamp(-1.0, 1.0).asin())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_band_and_caps_join() {
        let lat = CAP_SINE.asin();
        let band = project_hpx(&rade_to_vector(0.3, lat - 1e-12));
        let cap = project_hpx(&rade_to_vector(0.3, lat + 1e-12));
        assert_relative_eq!(band, cap, epsilon = 1e-9);
        assert_relative_eq!(band.y, FRAC_PI_4, epsilon = 1e-9);
    }

    #[test]
    fn test_poles_map_to_facet_apexes() {
        let north = project_hpx(&rade_to_vector(0.2, HALF_PI));
        assert_relative_eq!(north, Vector2::new(FRAC_PI_4, HALF_PI), epsilon = 1e-12);
        let south = project_hpx(&rade_to_vector(-2.0, -HALF_PI));
        assert_relative_eq!(south, Vector2::new(-3.0 * FRAC_PI_4, -HALF_PI), epsilon = 1e-12);
    }

    #[test]
    fn test_roundtrip() {
        let mut rng = StdRng::seed_from_u64(12);
        for _ in 0..1000 {
            let lon = rng.gen::<f64>() * TAU - PI;
            let lat = (rng.gen::<f64>() * 2.0 - 1.0) * 1.5;
            let v = rade_to_vector(lon, lat);
            let p = project_hpx(&v);
            assert!(valid_hpx(&p));
            assert_relative_eq!(deproject_hpx(&p), v, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_footprint() {
        assert!(valid_hpx(&Vector2::new(3.0, 0.7)));
        assert!(valid_hpx(&Vector2::new(FRAC_PI_4, 1.5)));
        assert!(!valid_hpx(&Vector2::new(0.0, 1.5)));
        assert!(!valid_hpx(&Vector2::new(0.0, 1.6)));
        assert!(deproject_hpx(&Vector2::new(0.0, 1.5)).x.is_nan());

        // The footprint repeats every turn in x
        let p = Vector2::new(0.5, 1.0);
        let q = Vector2::new(0.5 + TAU, 1.0);
        assert_relative_eq!(deproject_hpx(&p), deproject_hpx(&q), epsilon = 1e-12);
    }
}
