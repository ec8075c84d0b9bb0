//! Affine transformations of the projection plane
//!
//! A [`Scaler`] is the map
//!
//! ```text
//! x' = x0 + a·x + b·y
//! y' = y0 + c·x + d·y
//! ```
//!
//! and is used to turn projection-plane coordinates (radians) into pixels.

use super::Transformer;
use crate::{Result, WcsError};
use nalgebra::{Matrix2, Vector2};

/// 2-D affine transformation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Scaler {
    x0: f64,
    y0: f64,
    a: f64,
    b: f64,
    c: f64,
    d: f64,
}

impl Scaler {
    /// Creates a new affine transformation from its six parameters.
    pub fn new(x0: f64, y0: f64, a: f64, b: f64, c: f64, d: f64) -> Self {
        Scaler { x0, y0, a, b, c, d }
    }

    /// The parameters as `[x0, y0, a, b, c, d]`
    pub fn params(&self) -> [f64; 6] {
        [self.x0, self.y0, self.a, self.b, self.c, self.d]
    }

    /// Linear part of the transformation
    pub fn linear(&self) -> Matrix2<f64> {
        Matrix2::new(self.a, self.b, self.c, self.d)
    }

    /// Translation part of the transformation
    pub fn offset(&self) -> Vector2<f64> {
        Vector2::new(self.x0, self.y0)
    }

    /// Determinant of the linear part
    pub fn determinant(&self) -> f64 {
        self.a * self.d - self.b * self.c
    }

    /// Applies the transformation to a plane point.
    pub fn scale(&self, p: &Vector2<f64>) -> Vector2<f64> {
        Vector2::new(
            self.x0 + self.a * p.x + self.b * p.y,
            self.y0 + self.c * p.x + self.d * p.y,
        )
    }

    /// Composite transformation that applies `self` first and then `next`.
    pub fn add(&self, next: &Scaler) -> Scaler {
        Scaler {
            x0: next.x0 + next.a * self.x0 + next.b * self.y0,
            y0: next.y0 + next.c * self.x0 + next.d * self.y0,
            a: next.a * self.a + next.b * self.c,
            b: next.a * self.b + next.b * self.d,
            c: next.c * self.a + next.d * self.c,
            d: next.c * self.b + next.d * self.d,
        }
    }

    /// The inverse transformation.
    ///
    /// Fails with [`WcsError::NotInvertible`] when the linear part is singular.
    pub fn inverse(&self) -> Result<Scaler> {
        let det = self.determinant();
        if det == 0.0 || !det.is_finite() {
            return Err(WcsError::NotInvertible(format!(
                "singular scaler (determinant {})",
                det
            )));
        }

        let a = self.d / det;
        let b = -self.b / det;
        let c = -self.c / det;
        let d = self.a / det;
        Ok(Scaler {
            x0: -(a * self.x0 + b * self.y0),
            y0: -(c * self.x0 + d * self.y0),
            a,
            b,
            c,
            d,
        })
    }
}

impl Transformer for Scaler {
    fn name(&self) -> &str {
        "Scaler"
    }

    fn input_dimension(&self) -> usize {
        2
    }

    fn output_dimension(&self) -> usize {
        2
    }

    fn apply(&self, input: &[f64], output: &mut [f64]) {
        let p = self.scale(&Vector2::new(input[0], input[1]));
        output[0] = p.x;
        output[1] = p.y;
    }

    fn inverse(&self) -> Result<Box<dyn Transformer>> {
        Ok(Box::new(Scaler::inverse(self)?))
    }

    fn boxed_clone(&self) -> Box<dyn Transformer> {
        Box::new(*self)
    }
}
