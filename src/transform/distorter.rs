//! Nonlinear corrections on the projection plane and on the sphere
//!
//! A [`Distorter`] bends the projection plane after the projection (optical
//! distortion, for example), a [`SphereDistorter`] moves points on the
//! sphere before any projection (non-rotational frame corrections such as the
//! FK4 E-terms). Both supply their own inverse.
//!
//! Implementations are immutable parameter sets shared behind an `Arc`; the
//! [`PlaneDistortion`] and [`SphereDistortion`] stages wrap them, together
//! with a direction flag, into chainable [`Transformer`]s.

use super::Transformer;
use crate::Result;
use nalgebra::{Vector2, Vector3};
use std::fmt;
use std::sync::Arc;

/// A nonlinear, invertible map of the projection plane onto itself
pub trait Distorter: fmt::Debug + Send + Sync {
    /// Short name of the distortion
    fn name(&self) -> &str;

    /// Applies the distortion.
    fn distort(&self, p: &Vector2<f64>) -> Vector2<f64>;

    /// Removes the distortion.
    fn undistort(&self, p: &Vector2<f64>) -> Vector2<f64>;
}

/// A nonlinear, invertible map of the unit sphere onto itself
pub trait SphereDistorter: fmt::Debug + Send + Sync {
    /// Short name of the distortion
    fn name(&self) -> &str;

    /// Applies the distortion.
    fn distort(&self, v: &Vector3<f64>) -> Vector3<f64>;

    /// Removes the distortion.
    fn undistort(&self, v: &Vector3<f64>) -> Vector3<f64>;
}

/// Chain stage running a [`Distorter`] forward or backward
#[derive(Debug, Clone)]
pub struct PlaneDistortion {
    distorter: Arc<dyn Distorter>,
    inverted: bool,
}

impl PlaneDistortion {
    /// Forward stage for a distorter
    pub fn new(distorter: Arc<dyn Distorter>) -> Self {
        PlaneDistortion {
            distorter,
            inverted: false,
        }
    }

    /// The wrapped distorter
    pub fn distorter(&self) -> &Arc<dyn Distorter> {
        &self.distorter
    }

    /// Applies the stage to a plane point.
    pub fn apply_point(&self, p: &Vector2<f64>) -> Vector2<f64> {
        if self.inverted {
            self.distorter.undistort(p)
        } else {
            self.distorter.distort(p)
        }
    }

    /// The stage running in the opposite direction
    pub fn inverse(&self) -> PlaneDistortion {
        PlaneDistortion {
            distorter: Arc::clone(&self.distorter),
            inverted: !self.inverted,
        }
    }
}

impl Transformer for PlaneDistortion {
    fn name(&self) -> &str {
        self.distorter.name()
    }

    fn input_dimension(&self) -> usize {
        2
    }

    fn output_dimension(&self) -> usize {
        2
    }

    fn apply(&self, input: &[f64], output: &mut [f64]) {
        let p = self.apply_point(&Vector2::new(input[0], input[1]));
        output[0] = p.x;
        output[1] = p.y;
    }

    fn inverse(&self) -> Result<Box<dyn Transformer>> {
        Ok(Box::new(PlaneDistortion::inverse(self)))
    }

    fn boxed_clone(&self) -> Box<dyn Transformer> {
        Box::new(self.clone())
    }
}

/// Chain stage running a [`SphereDistorter`] forward or backward
#[derive(Debug, Clone)]
pub struct SphereDistortion {
    distorter: Arc<dyn SphereDistorter>,
    inverted: bool,
}

impl SphereDistortion {
    /// Forward stage for a sphere distorter
    pub fn new(distorter: Arc<dyn SphereDistorter>) -> Self {
        SphereDistortion {
            distorter,
            inverted: false,
        }
    }

    /// The wrapped distorter
    pub fn distorter(&self) -> &Arc<dyn SphereDistorter> {
        &self.distorter
    }

    /// Applies the stage to a unit vector.
    pub fn apply_vector(&self, v: &Vector3<f64>) -> Vector3<f64> {
        if self.inverted {
            self.distorter.undistort(v)
        } else {
            self.distorter.distort(v)
        }
    }

    /// The stage running in the opposite direction
    pub fn inverse(&self) -> SphereDistortion {
        SphereDistortion {
            distorter: Arc::clone(&self.distorter),
            inverted: !self.inverted,
        }
    }
}

impl Transformer for SphereDistortion {
    fn name(&self) -> &str {
        self.distorter.name()
    }

    fn input_dimension(&self) -> usize {
        3
    }

    fn output_dimension(&self) -> usize {
        3
    }

    fn apply(&self, input: &[f64], output: &mut [f64]) {
        let v = self.apply_vector(&Vector3::new(input[0], input[1], input[2]));
        output.copy_from_slice(v.as_slice());
    }

    fn inverse(&self) -> Result<Box<dyn Transformer>> {
        Ok(Box::new(SphereDistortion::inverse(self)))
    }

    fn boxed_clone(&self) -> Box<dyn Transformer> {
        Box::new(self.clone())
    }
}

/// Radial polynomial distortion about the plane origin
///
/// `r' = r (1 + k1 r² + k2 r⁴)`. The inverse is found by Newton iteration
/// and is accurate as long as the polynomial stays monotonic over the radii
/// of interest.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadialDistorter {
    k1: f64,
    k2: f64,
}

impl RadialDistorter {
    const MAX_ITERATIONS: usize = 50;
    const TOLERANCE: f64 = 1e-15;

    pub fn new(k1: f64, k2: f64) -> Self {
        RadialDistorter { k1, k2 }
    }

    fn factor(&self, r2: f64) -> f64 {
        1.0 + self.k1 * r2 + self.k2 * r2 * r2
    }
}

impl Distorter for RadialDistorter {
    fn name(&self) -> &str {
        "RadialDistorter"
    }

    fn distort(&self, p: &Vector2<f64>) -> Vector2<f64> {
        p * self.factor(p.norm_squared())
    }

    fn undistort(&self, p: &Vector2<f64>) -> Vector2<f64> {
        let target = p.norm();
        if target == 0.0 {
            return *p;
        }

        // Solve r (1 + k1 r² + k2 r⁴) = target for r
        let mut r = target;
        for _ in 0..Self::MAX_ITERATIONS {
            let r2 = r * r;
            let f = r * self.factor(r2) - target;
            let df = 1.0 + 3.0 * self.k1 * r2 + 5.0 * self.k2 * r2 * r2;
            let step = f / df;
            r -= step;
            if step.abs() <= Self::TOLERANCE * target.max(1.0) {
                break;
            }
        }
        p * (r / target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_radial_roundtrip() {
        let d = RadialDistorter::new(0.05, -0.01);
        for &(x, y) in &[(0.0, 0.0), (0.1, 0.2), (-0.4, 0.3), (0.7, -0.7)] {
            let p = Vector2::new(x, y);
            let q = d.distort(&p);
            assert_relative_eq!(d.undistort(&q), p, epsilon = 1e-13);
        }
    }

    #[test]
    fn test_plane_distortion_stage() {
        let stage = PlaneDistortion::new(Arc::new(RadialDistorter::new(0.1, 0.0)));
        let out = stage.transform(&[0.5, 0.0]).unwrap();
        assert_relative_eq!(out[0], 0.5 * 1.025, epsilon = 1e-15);

        let inv = Transformer::inverse(&stage).unwrap();
        let back = inv.transform(&out).unwrap();
        assert_relative_eq!(back[0], 0.5, epsilon = 1e-14);
        assert_relative_eq!(back[1], 0.0, epsilon = 1e-14);
    }
}
