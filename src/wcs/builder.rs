//! Building a [`Wcs`] for an image from a handful of parameters
//!
//! The builder is a plain value: set the fields (or read them from JSON),
//! then call [`WcsBuilder::build`].
//!
//! ```rust
//! use skywcs::WcsBuilder;
//!
//! let json = r#"{ "ref_ra": 0.5, "ref_de": -0.2, "width": 640, "height": 480,
//!                 "projection": "tan", "pixel_scale": 1e-5 }"#;
//! let builder = WcsBuilder::from_json(json).unwrap();
//! let wcs = builder.build().unwrap();
//! assert!((wcs.scale() - 1e-5).abs() < 1e-18);
//! ```

use super::Wcs;
use crate::coordinates::rade_to_vector;
use crate::framelib::CoordinateSystem;
use crate::projection::{Projection, ProjectionKind};
use crate::transform::scaler::Scaler;
use crate::transform::Transformer;
use crate::{Result, WcsError};
use log::debug;
use serde::{Deserialize, Serialize};

/// Parameters of an image WCS
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WcsBuilder {
    /// Right ascension of the image centre in radians
    pub ref_ra: f64,
    /// Declination of the image centre in radians
    pub ref_de: f64,
    /// Image width in pixels
    pub width: f64,
    /// Image height in pixels
    pub height: f64,
    pub projection: ProjectionKind,
    pub xscale: f64,
    /// -1 because image rows run downwards
    pub yscale: f64,
    /// Angular size of a pixel in radians
    pub pixel_scale: f64,
    /// Anticlockwise rotation of the image in radians
    pub rotation: f64,
    /// Fail to build when the projection has no inverse
    pub require_inverse: bool,
}

impl Default for WcsBuilder {
    fn default() -> Self {
        WcsBuilder {
            ref_ra: 0.0,
            ref_de: 0.0,
            width: 0.0,
            height: 0.0,
            projection: ProjectionKind::Sin,
            xscale: 1.0,
            yscale: -1.0,
            pixel_scale: 0.0,
            rotation: 0.0,
            require_inverse: true,
        }
    }
}

impl WcsBuilder {
    /// Reads builder parameters from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Sets the pixel scale so that the image diagonal spans `fov` radians.
    pub fn set_pixel_scale_from_fov(&mut self, fov: f64) {
        self.pixel_scale = fov / self.width.hypot(self.height);
    }

    /// Projection centred on the reference point.
    ///
    /// Projections with a fixed centre are used as they are and only record
    /// the reference point.
    pub fn create_projection(&self) -> Result<Projection> {
        let kind = self.projection;
        if kind.is_fixed() {
            let mut proj = Projection::new(kind);
            proj.set_reference(self.ref_ra, self.ref_de);
            Ok(proj)
        } else {
            Projection::centered(kind, self.ref_ra, self.ref_de)
        }
    }

    pub fn build(&self) -> Result<Wcs> {
        let csys = CoordinateSystem::j2000();

        if self.width == 0.0 || self.height == 0.0 {
            return Err(WcsError::IllegalConfiguration(
                "zero width or height".to_string(),
            ));
        }
        if self.pixel_scale == 0.0 {
            return Err(WcsError::IllegalConfiguration("zero pixel scale".to_string()));
        }
        let xs = self.xscale * self.pixel_scale;
        let ys = self.yscale * self.pixel_scale;
        if xs == 0.0 || ys == 0.0 {
            return Err(WcsError::IllegalConfiguration(format!(
                "degenerate pixel scales ({}, {})",
                xs, ys
            )));
        }

        let proj = self.create_projection()?;
        if self.require_inverse {
            Transformer::inverse(proj.projecter()).map_err(|e| {
                WcsError::IllegalConfiguration(format!(
                    "projection {} does not support inverse function: {}",
                    self.projection, e
                ))
            })?;
        }

        // Where the requested centre lands relative to the projection's own centre
        let mut centre = rade_to_vector(self.ref_ra, self.ref_de);
        if let Some(rotater) = proj.rotater() {
            centre = rotater.rotate(&centre);
        }
        let c = proj.projecter().project(&centre);
        if !(c.x.is_finite() && c.y.is_finite()) {
            return Err(WcsError::IllegalConfiguration(format!(
                "reference point ({}, {}) has no position in the {} projection",
                self.ref_ra, self.ref_de, self.projection
            )));
        }

        let centring = Scaler::new(
            0.5 * self.width + c.x / xs,
            0.5 * self.height - c.y / ys,
            -1.0 / xs,
            0.0,
            0.0,
            1.0 / ys,
        );
        let (sin, cos) = self.rotation.sin_cos();
        let rotation = Scaler::new(0.0, 0.0, cos, sin, -sin, cos);
        let scaler = rotation.add(&centring);

        debug!(
            "Building {}x{} {} Wcs at ({}, {})",
            self.width, self.height, self.projection, self.ref_ra, self.ref_de
        );
        Wcs::new(csys, proj, scaler)
    }
}
