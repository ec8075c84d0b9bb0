//! # Rotater
//!
//! A rigid rotation of the celestial sphere stored as an orthonormal 3×3
//! matrix.
//!
//! Rotations are built from a sequence of elemental axis rotations, the way
//! Euler angles are usually quoted in the literature. Each elemental matrix
//! rotates the *frame*, so rotating by 90° about Z carries the X axis onto
//! `-Y`:
//!
//! ```rust
//! use skywcs::Rotater;
//! use nalgebra::Vector3;
//!
//! let r = Rotater::new("z", std::f64::consts::FRAC_PI_2, 0.0, 0.0).unwrap();
//! let v = r.rotate(&Vector3::new(1.0, 0.0, 0.0));
//! assert!((v.y + 1.0).abs() < 1e-15);
//! ```
//!
//! The elemental rotations are applied in the order written: for `"ZYZ"`
//! the first Z rotation acts first and the matrix is `R3 · R2 · R1`.
//! The inverse of a rotation is its transpose.

use super::Transformer;
use crate::{Result, WcsError};
use nalgebra::{Matrix3, Vector3};

/// Rigid 3-D rotation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rotater {
    matrix: Matrix3<f64>,
}

impl Rotater {
    /// Builds a rotation from an axis sequence and one angle per axis.
    ///
    /// `axes` holds up to three of `x`, `y`, `z` (case-insensitive). Angles
    /// beyond the number of axes are ignored.
    pub fn new(axes: &str, a0: f64, a1: f64, a2: f64) -> Result<Self> {
        if axes.chars().count() > 3 {
            return Err(WcsError::IllegalConfiguration(format!(
                "rotation axis sequence '{}' has more than three axes",
                axes
            )));
        }

        let angles = [a0, a1, a2];
        let mut matrix = Matrix3::identity();
        for (axis, &angle) in axes.chars().zip(angles.iter()) {
            matrix = elemental(axis, angle)? * matrix;
        }
        Ok(Rotater { matrix })
    }

    /// Wraps an existing rotation matrix.
    ///
    /// The caller is responsible for the matrix being orthonormal.
    pub fn from_matrix(matrix: Matrix3<f64>) -> Self {
        Rotater { matrix }
    }

    /// The rotation that leaves every vector alone
    pub fn identity() -> Self {
        Rotater {
            matrix: Matrix3::identity(),
        }
    }

    /// The rotation matrix
    pub fn matrix(&self) -> &Matrix3<f64> {
        &self.matrix
    }

    /// Rotates a vector.
    pub fn rotate(&self, v: &Vector3<f64>) -> Vector3<f64> {
        self.matrix * v
    }

    /// Composite rotation that applies `self` first and then `other`.
    pub fn add(&self, other: &Rotater) -> Rotater {
        Rotater {
            matrix: other.matrix * self.matrix,
        }
    }

    /// The inverse rotation (the transpose of the matrix).
    pub fn inverse(&self) -> Rotater {
        Rotater {
            matrix: self.matrix.transpose(),
        }
    }
}

/// Frame rotation about a single axis.
fn elemental(axis: char, angle: f64) -> Result<Matrix3<f64>> {
    let (s, c) = angle.sin_cos();
    let m = match axis.to_ascii_lowercase() {
        'x' => Matrix3::new(
            1.0, 0.0, 0.0, //
            0.0, c, s, //
            0.0, -s, c,
        ),
        'y' => Matrix3::new(
            c, 0.0, -s, //
            0.0, 1.0, 0.0, //
            s, 0.0, c,
        ),
        'z' => Matrix3::new(
            c, s, 0.0, //
            -s, c, 0.0, //
            0.0, 0.0, 1.0,
        ),
        other => {
            return Err(WcsError::IllegalConfiguration(format!(
                "invalid rotation axis '{}'",
                other
            )))
        }
    };
    Ok(m)
}

impl Transformer for Rotater {
    fn name(&self) -> &str {
        "Rotater"
    }

    fn input_dimension(&self) -> usize {
        3
    }

    fn output_dimension(&self) -> usize {
        3
    }

    fn apply(&self, input: &[f64], output: &mut [f64]) {
        let v = self.rotate(&Vector3::new(input[0], input[1], input[2]));
        output.copy_from_slice(v.as_slice());
    }

    fn inverse(&self) -> Result<Box<dyn Transformer>> {
        Ok(Box::new(Rotater::inverse(self)))
    }

    fn boxed_clone(&self) -> Box<dyn Transformer> {
        Box::new(*self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::rade_to_vector;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::rstest;

    fn check(r: &Rotater, input: [f64; 3], expected: [f64; 3]) {
        let v = r.rotate(&Vector3::from(input));
        assert_abs_diff_eq!(v, Vector3::from(expected), epsilon = 1e-14);
    }

    #[rstest]
    #[case("x", [1.0, 0.0, 0.0], [1.0, 0.0, 0.0])]
    #[case("x", [0.0, 1.0, 0.0], [0.0, 0.0, -1.0])]
    #[case("x", [0.0, 0.0, 1.0], [0.0, 1.0, 0.0])]
    #[case("y", [1.0, 0.0, 0.0], [0.0, 0.0, 1.0])]
    #[case("y", [0.0, 1.0, 0.0], [0.0, 1.0, 0.0])]
    #[case("y", [0.0, 0.0, 1.0], [-1.0, 0.0, 0.0])]
    #[case("z", [1.0, 0.0, 0.0], [0.0, -1.0, 0.0])]
    #[case("z", [0.0, 1.0, 0.0], [1.0, 0.0, 0.0])]
    #[case("Z", [0.0, 0.0, 1.0], [0.0, 0.0, 1.0])]
    fn test_single_axis(#[case] axis: &str, #[case] input: [f64; 3], #[case] expected: [f64; 3]) {
        let r = Rotater::new(axis, 90f64.to_radians(), 0.0, 0.0).unwrap();
        check(&r, input, expected);
    }

    #[test]
    fn test_multi_axis_rotation() {
        let a = 48f64.to_radians();
        let r = Rotater::new("xyz", a, a, a).unwrap();
        check(
            &r,
            [1.0, 0.0, 0.0],
            [0.4477357683661733, -0.4972609476841367, 0.7431448254773942],
        );

        let v = rade_to_vector(1.0, -1.0);
        let out = r.rotate(&v);
        assert_abs_diff_eq!(
            out,
            Vector3::new(0.3400649326435842, -0.8575798632289657, -0.3858919794065476),
            epsilon = 1e-14
        );
    }

    #[test]
    fn test_invalid_axes() {
        assert!(matches!(
            Rotater::new("xq", 0.1, 0.2, 0.0),
            Err(WcsError::IllegalConfiguration(_))
        ));
        assert!(Rotater::new("xyzx", 0.1, 0.2, 0.3).is_err());
    }

    #[test]
    fn test_orthonormal_and_inverse() {
        let mut rng = StdRng::seed_from_u64(424242);
        for _ in 0..100 {
            let r = Rotater::new(
                "ZYZ",
                rng.gen::<f64>() * 6.0 - 3.0,
                rng.gen::<f64>() * 6.0 - 3.0,
                rng.gen::<f64>() * 6.0 - 3.0,
            )
            .unwrap();
            let v = Vector3::<f64>::new(rng.gen(), rng.gen(), rng.gen()).normalize();

            let out = r.rotate(&v);
            assert_abs_diff_eq!(out.norm(), 1.0, epsilon = 1e-14);

            let back = r.rotate(&r.inverse().rotate(&v));
            assert_abs_diff_eq!(back, v, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_add_applies_self_first() {
        let a = Rotater::new("z", 0.3, 0.0, 0.0).unwrap();
        let b = Rotater::new("x", 0.7, 0.0, 0.0).unwrap();
        let v = Vector3::new(0.2, 0.5, 0.8).normalize();

        let composed = a.add(&b).rotate(&v);
        let sequential = b.rotate(&a.rotate(&v));
        assert_abs_diff_eq!(composed, sequential, epsilon = 1e-14);

        let zx = Rotater::new("zx", 0.3, 0.7, 0.0).unwrap();
        assert_abs_diff_eq!(zx.rotate(&v), composed, epsilon = 1e-14);
    }

    #[test]
    fn test_transformer_inverse() {
        let r = Rotater::new("zy", 1.1, -0.4, 0.0).unwrap();
        let inv = Transformer::inverse(&r).unwrap();
        let out = r.transform(&[0.0, 0.6, 0.8]).unwrap();
        let back = inv.transform(&out).unwrap();
        assert_abs_diff_eq!(back[0], 0.0, epsilon = 1e-14);
        assert_abs_diff_eq!(back[1], 0.6, epsilon = 1e-14);
        assert_abs_diff_eq!(back[2], 0.8, epsilon = 1e-14);
    }
}
