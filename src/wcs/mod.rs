//! World Coordinate Systems
//!
//! A [`Wcs`] is the full chain from J2000 unit vectors on the sky to pixel
//! coordinates of an image:
//!
//! 1. the frame's sphere distortion and rotation out of J2000
//! 2. the projection's reference rotation, projecter and plane distortion
//! 3. the scaler from projection-plane radians to pixels
//!
//! It is normally assembled by a [`WcsBuilder`](builder::WcsBuilder).

pub mod builder;

use crate::coordinates::{rade_to_vector, vector_to_rade};
use crate::framelib::CoordinateSystem;
use crate::projection::Projection;
use crate::transform::converter::Converter;
use crate::transform::scaler::Scaler;
use crate::transform::Transformer;
use crate::{Result, WcsError};
use log::{debug, trace};
use nalgebra::{Vector2, Vector3};

/// Sky to pixel transformation of an image
#[derive(Debug, Clone)]
pub struct Wcs {
    csys: CoordinateSystem,
    projection: Projection,
    scaler: Scaler,
    forward: Converter,
    inverse: Option<Converter>,
    scale: f64,
}

impl Wcs {
    /// Chains a frame, a projection and a pixel scaler.
    pub fn new(csys: CoordinateSystem, projection: Projection, scaler: Scaler) -> Result<Self> {
        let mut forward = csys.from_j2000()?;
        forward.append(projection.converter()?)?;
        forward.add(scaler)?;

        let inverse = match forward.inverse() {
            Ok(inverse) => Some(inverse),
            Err(e) => {
                trace!("Wcs has no inverse: {}", e);
                None
            }
        };

        let scale = 1.0 / scaler.determinant().abs().sqrt();
        debug!(
            "Built {} Wcs in frame {} with {} stages, {:.3e} rad/pixel",
            projection.kind(),
            csys.name(),
            forward.len(),
            scale
        );

        Ok(Wcs {
            csys,
            projection,
            scaler,
            forward,
            inverse,
            scale,
        })
    }

    pub fn coordinate_system(&self) -> &CoordinateSystem {
        &self.csys
    }

    pub fn projection(&self) -> &Projection {
        &self.projection
    }

    pub fn scaler(&self) -> &Scaler {
        &self.scaler
    }

    /// The sky → pixel chain
    pub fn converter(&self) -> &Converter {
        &self.forward
    }

    /// Mean size of a pixel in radians
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The pixel → sky chain.
    pub fn inverse(&self) -> Result<Converter> {
        self.inverse
            .clone()
            .ok_or_else(|| WcsError::NotInvertible("Wcs has a stage without inverse".to_string()))
    }

    /// Pixel position of a J2000 unit vector.
    pub fn sky_to_pixel(&self, v: &Vector3<f64>) -> Result<Vector2<f64>> {
        let out = self.forward.transform(v.as_slice())?;
        Ok(Vector2::new(out[0], out[1]))
    }

    /// J2000 unit vector seen at a pixel position.
    pub fn pixel_to_sky(&self, p: &Vector2<f64>) -> Result<Vector3<f64>> {
        let inverse = self
            .inverse
            .as_ref()
            .ok_or_else(|| WcsError::NotInvertible("Wcs has a stage without inverse".to_string()))?;
        let out = inverse.transform(p.as_slice())?;
        Ok(Vector3::new(out[0], out[1], out[2]))
    }

    /// Pixel position of a J2000 `(ra, dec)` pair in radians.
    pub fn rade_to_pixel(&self, ra: f64, de: f64) -> Result<Vector2<f64>> {
        self.sky_to_pixel(&rade_to_vector(ra, de))
    }

    /// J2000 `(ra, dec)` in radians seen at a pixel position.
    pub fn pixel_to_rade(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let v = self.pixel_to_sky(&Vector2::new(x, y))?;
        Ok(vector_to_rade(&v))
    }
}

impl Transformer for Wcs {
    fn name(&self) -> &str {
        "Wcs"
    }

    fn input_dimension(&self) -> usize {
        3
    }

    fn output_dimension(&self) -> usize {
        2
    }

    fn apply(&self, input: &[f64], output: &mut [f64]) {
        self.forward.apply(input, output);
    }

    fn inverse(&self) -> Result<Box<dyn Transformer>> {
        Ok(Box::new(Wcs::inverse(self)?))
    }

    fn boxed_clone(&self) -> Box<dyn Transformer> {
        Box::new(self.clone())
    }
}
