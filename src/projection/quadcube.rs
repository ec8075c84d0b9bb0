//! COBE quadrilateralized spherical cube
//!
//! The sphere is split into six cube faces, each mapped onto a `π/2` square
//! of the plane with the nearly equal-area polynomial of Chan & O'Neill
//! (1975). Faces are laid out as in FITS: face 0 (north) above face 1,
//! faces 1 to 4 along the equator at longitudes 0°, 90°, 180°, 270°, face 5
//! (south) below face 1.
//!
//! The published inverse polynomial is only good to a few arcminutes, so
//! it serves as the starting guess for a Newton refinement against the
//! forward polynomial.

use super::zenithal::nan_vector;
use crate::constants::HALF_PI;
use nalgebra::{Matrix2, Vector2, Vector3};
use std::f64::consts::{FRAC_PI_4, PI};

/// Plane coordinates of each face centre
const FACE_CENTRES: [(f64, f64); 6] = [
    (0.0, HALF_PI),
    (0.0, 0.0),
    (HALF_PI, 0.0),
    (PI, 0.0),
    (-HALF_PI, 0.0),
    (0.0, -HALF_PI),
];

/// Direction cosines relative to a face: `xi`, `eta` across it, `zeta` out of it
#[derive(Debug, Clone, Copy)]
struct FaceCoords {
    face: usize,
    xi: f64,
    eta: f64,
    zeta: f64,
}

fn select_face(v: &Vector3<f64>) -> FaceCoords {
    let (l, m, n) = (v.x, v.y, v.z);
    let candidates = [
        (0, m, -l, n),
        (1, m, n, l),
        (2, -l, n, m),
        (3, -m, n, -l),
        (4, l, n, -m),
        (5, m, l, -n),
    ];

    let mut best = FaceCoords {
        face: 0,
        xi: 0.0,
        eta: 0.0,
        zeta: f64::NEG_INFINITY,
    };
    for (face, xi, eta, zeta) in candidates {
        if zeta > best.zeta {
            best = FaceCoords { face, xi, eta, zeta };
        }
    }
    best
}

fn face_to_vector(face: usize, xi: f64, eta: f64, zeta: f64) -> Vector3<f64> {
    match face {
        0 => Vector3::new(-eta, xi, zeta),
        1 => Vector3::new(zeta, xi, eta),
        2 => Vector3::new(-xi, zeta, eta),
        3 => Vector3::new(-zeta, -xi, eta),
        4 => Vector3::new(xi, -zeta, eta),
        _ => Vector3::new(eta, xi, -zeta),
    }
}

/// Finds the face holding a plane point and the point's offset from its centre.
fn face_from_plane(p: &Vector2<f64>) -> Option<(usize, f64, f64)> {
    let (mut x, y) = (p.x, p.y);
    if !(x.is_finite() && y.is_finite()) {
        return None;
    }
    // Face 3 straddles x = π; accept its western half on either side
    if x < -3.0 * FRAC_PI_4 {
        x += 2.0 * PI;
    }

    let face = if y > FRAC_PI_4 {
        0
    } else if y < -FRAC_PI_4 {
        5
    } else if x < FRAC_PI_4 {
        if x < -FRAC_PI_4 {
            4
        } else {
            1
        }
    } else if x < 3.0 * FRAC_PI_4 {
        2
    } else {
        3
    };

    let (cx, cy) = FACE_CENTRES[face];
    let (dx, dy) = (x - cx, y - cy);
    if dx.abs() > FRAC_PI_4 || dy.abs() > FRAC_PI_4 {
        return None;
    }
    Some((face, dx / FRAC_PI_4, dy / FRAC_PI_4))
}

pub(crate) fn project_csc(v: &Vector3<f64>) -> Vector2<f64> {
    let f = select_face(v);
    let chi = f.xi / f.zeta;
    let psi = f.eta / f.zeta;

    let (cx, cy) = FACE_CENTRES[f.face];
    Vector2::new(
        cx + FRAC_PI_4 * forward_poly(chi, psi),
        cy + FRAC_PI_4 * forward_poly(psi, chi),
    )
}

pub(crate) fn valid_csc(p: &Vector2<f64>) -> bool {
    face_from_plane(p).is_some()
}

pub(crate) fn deproject_csc(p: &Vector2<f64>) -> Vector3<f64> {
    let (face, x, y) = match face_from_plane(p) {
        Some(found) => found,
        None => return nan_vector(),
    };

    let (chi, psi) = refine(x, y, inverse_poly(x, y), inverse_poly(y, x));

    let zeta = 1.0 / (1.0 + chi * chi + psi * psi).sqrt();
    face_to_vector(face, chi * zeta, psi * zeta, zeta)
}

fn forward_poly(chi: f64, psi: f64) -> f64 {
    const GAMMA_STAR: f64 = 1.37484847732;
    const M: f64 = 0.004869491981;
    const GAMMA: f64 = -0.13161671474;
    const OMEGA1: f64 = -0.159596235474;
    const C00: f64 = 0.141189631152;
    const C10: f64 = 0.0809701286525;
    const C01: f64 = -0.281528535557;
    const C20: f64 = -0.178251207466;
    const C11: f64 = 0.15384112876;
    const C02: f64 = 0.106959469314;
    const D0: f64 = 0.0759196200467;
    const D1: f64 = -0.0217762490699;

    let chi2 = chi * chi;
    let psi2 = psi * psi;
    let one_chi2 = 1.0 - chi2;

    let c = C00 + C10 * chi2 + C01 * psi2 + C20 * chi2 * chi2 + C11 * chi2 * psi2 + C02 * psi2 * psi2;
    let d = D0 + D1 * chi2;

    chi * GAMMA_STAR
        + chi * chi2 * (1.0 - GAMMA_STAR)
        + chi * psi2 * one_chi2 * (GAMMA + (M - GAMMA) * chi2 + (1.0 - psi2) * c)
        + chi * chi2 * one_chi2 * (OMEGA1 - one_chi2 * d)
}

const MAX_NEWTON_STEPS: usize = 10;
const NEWTON_STEP: f64 = 1e-7;

/// Solves `forward_poly(chi, psi) = x`, `forward_poly(psi, chi) = y` starting from a guess.
fn refine(x: f64, y: f64, mut chi: f64, mut psi: f64) -> (f64, f64) {
    let h = NEWTON_STEP;
    for _ in 0..MAX_NEWTON_STEPS {
        let residual = Vector2::new(forward_poly(chi, psi) - x, forward_poly(psi, chi) - y);
        if residual.amax() < 1e-15 {
            break;
        }

        let jacobian = Matrix2::new(
            (forward_poly(chi + h, psi) - forward_poly(chi - h, psi)) / (2.0 * h),
            (forward_poly(chi, psi + h) - forward_poly(chi, psi - h)) / (2.0 * h),
            (forward_poly(psi, chi + h) - forward_poly(psi, chi - h)) / (2.0 * h),
            (forward_poly(psi + h, chi) - forward_poly(psi - h, chi)) / (2.0 * h),
        );
        let step = match jacobian.try_inverse() {
            Some(inv) => inv * residual,
            None => break,
        };
        chi -= step.x;
        psi -= step.y;
    }
    (chi, psi)
}

/// `x + x(1 - x²) Σ P[i][j] x^2i y^2j`
fn inverse_poly(x: f64, y: f64) -> f64 {
    #[rustfmt::skip]
    const P: [&[f64]; 7] = [
        &[-0.27292696, -0.02819452, 0.27058160, -0.60441560, 0.93412077, -0.63915306, 0.14381585],
        &[-0.07629969, -0.01471565, -0.56800938, 1.50880086, -1.41601920, 0.52032238],
        &[-0.22797056, 0.48051509, 0.30803317, -0.93678576, 0.33887446],
        &[0.54852384, -1.74114454, 0.98938102, 0.08693841],
        &[-0.62930065, 1.71547508, -0.83180469],
        &[0.25795794, -0.53022337],
        &[0.02584375],
    ];

    let x2 = x * x;
    let y2 = y * y;

    let mut sum = 0.0;
    let mut x_pow = 1.0;
    for row in P.iter() {
        let mut y_pow = 1.0;
        for coeff in row.iter() {
            sum += coeff * x_pow * y_pow;
            y_pow *= y2;
        }
        x_pow *= x2;
    }

    x + x * (1.0 - x2) * sum
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::rade_to_vector;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::rstest;

    #[rstest]
    #[case(Vector3::new(0.0, 0.0, 1.0), 0)]
    #[case(Vector3::new(1.0, 0.0, 0.0), 1)]
    #[case(Vector3::new(0.0, 1.0, 0.0), 2)]
    #[case(Vector3::new(-1.0, 0.0, 0.0), 3)]
    #[case(Vector3::new(0.0, -1.0, 0.0), 4)]
    #[case(Vector3::new(0.0, 0.0, -1.0), 5)]
    fn test_face_centres(#[case] v: Vector3<f64>, #[case] face: usize) {
        assert_eq!(select_face(&v).face, face);
        let p = project_csc(&v);
        let (cx, cy) = FACE_CENTRES[face];
        assert_relative_eq!(p, Vector2::new(cx, cy), epsilon = 1e-15);
        assert_relative_eq!(deproject_csc(&p), v, epsilon = 1e-15);
    }

    #[test]
    fn test_face_edges_reach_square_edges() {
        // Longitude 45° on the equator sits on the edge between faces 1 and 2
        let p = project_csc(&rade_to_vector(FRAC_PI_4 - 1e-12, 0.0));
        assert_relative_eq!(p.x, FRAC_PI_4, epsilon = 1e-9);
        assert_relative_eq!(p.y, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn test_roundtrip() {
        let mut rng = StdRng::seed_from_u64(6);
        for _ in 0..2000 {
            let lon = rng.gen::<f64>() * 2.0 * PI;
            let lat = (rng.gen::<f64>() * 2.0 - 1.0) * HALF_PI;
            let v = rade_to_vector(lon, lat);
            let p = project_csc(&v);
            assert!(valid_csc(&p));
            assert_relative_eq!(deproject_csc(&p), v, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_face_three_wraps() {
        // Just west of longitude 180° lands at x slightly below π, just
        // east of it slightly above; -π + ε is the same place
        let v = rade_to_vector(PI + 0.1, 0.0);
        let p = project_csc(&v);
        assert!(p.x > PI);
        let wrapped = Vector2::new(p.x - 2.0 * PI, p.y);
        assert_relative_eq!(deproject_csc(&wrapped), deproject_csc(&p), epsilon = 1e-12);
    }

    #[test]
    fn test_fitted_inverse_is_close() {
        let (x, y) = (0.6, -0.3);
        let chi = inverse_poly(x, y);
        let psi = inverse_poly(y, x);
        assert_relative_eq!(forward_poly(chi, psi), x, epsilon = 1e-3);
        let (chi, psi) = refine(x, y, chi, psi);
        assert_relative_eq!(forward_poly(chi, psi), x, epsilon = 1e-14);
        assert_relative_eq!(forward_poly(psi, chi), y, epsilon = 1e-14);
    }

    #[test]
    fn test_outside_net() {
        assert!(!valid_csc(&Vector2::new(1.5, 1.0)));
        assert!(deproject_csc(&Vector2::new(0.0, 2.5)).x.is_nan());
    }
}
