use super::clip::convex_area;
use crate::{Result, WcsError};
use nalgebra::Vector2;

/// A plane polygon given by its vertices in order around the outline
///
/// The closing vertex is not repeated. Coordinates are kept as separate x
/// and y vectors, matching the layout of the clipping routines.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Polygon {
    /// Builds a polygon from coordinate vectors of equal length.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> Result<Self> {
        if xs.len() != ys.len() {
            return Err(WcsError::DimensionMismatch {
                expected: xs.len(),
                actual: ys.len(),
            });
        }
        Ok(Polygon { xs, ys })
    }

    pub fn from_points(points: &[Vector2<f64>]) -> Self {
        Polygon {
            xs: points.iter().map(|p| p.x).collect(),
            ys: points.iter().map(|p| p.y).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn vertex(&self, i: usize) -> Vector2<f64> {
        Vector2::new(self.xs[i], self.ys[i])
    }

    /// Area of the polygon, assuming it is convex
    pub fn area(&self) -> f64 {
        convex_area(&self.xs, &self.ys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mismatched_lengths() {
        assert!(matches!(
            Polygon::new(vec![0.0, 1.0], vec![0.0]),
            Err(WcsError::DimensionMismatch { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_square() {
        let square = Polygon::from_points(&[
            Vector2::new(0.0, 0.0),
            Vector2::new(2.0, 0.0),
            Vector2::new(2.0, 2.0),
            Vector2::new(0.0, 2.0),
        ]);
        assert_eq!(square.len(), 4);
        assert_eq!(square.vertex(2), Vector2::new(2.0, 2.0));
        assert_relative_eq!(square.area(), 4.0, epsilon = 1e-14);
    }
}
