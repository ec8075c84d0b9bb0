//! Sky projections
//!
//! A [`Projecter`] maps a unit vector on the sphere to a point on the
//! projection plane and a [`Deprojecter`] maps it back. Which map is used is
//! chosen by a [`ProjectionKind`]; every kind projects about its own natural
//! centre, either the north pole or the point `(1, 0, 0)`. A [`Projection`]
//! adds the rotation that carries a requested reference point onto that
//! natural centre, plus an optional plane distortion.
//!
//! Plane points that have no position on the sky are returned as NaN; use
//! [`ProjectionKind::valid_position`] to test them.
//!
//! ```rust
//! use skywcs::coordinates::rade_to_vector;
//! use skywcs::{Projection, ProjectionKind};
//!
//! let kind: ProjectionKind = "tan".parse().unwrap();
//! let proj = Projection::centered(kind, 1.0, 0.5).unwrap();
//! let p = proj.project(&rade_to_vector(1.0, 0.5));
//! assert!(p.norm() < 1e-12);
//! ```

mod cylindrical;
mod healpix;
mod pseudocylindrical;
mod quadcube;
mod toast;
mod zenithal;

pub mod clip;
pub mod polygon;
pub mod straddle;

pub use polygon::Polygon;

use crate::constants::{HALF_PI, OUTLINE_SLACK, TAU};
use crate::transform::converter::Converter;
use crate::transform::distorter::{Distorter, PlaneDistortion};
use crate::transform::rotater::Rotater;
use crate::transform::Transformer;
use crate::{Result, WcsError};
use lazy_static::lazy_static;
use log::trace;
use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

type ShadowFn = fn(&Vector2<f64>) -> Vector2<f64>;

lazy_static! {
    /// Lowercase projection names and common aliases
    static ref REGISTRY: HashMap<String, ProjectionKind> = {
        let mut names: HashMap<String, ProjectionKind> = ProjectionKind::ALL
            .iter()
            .map(|kind| (kind.name().to_ascii_lowercase(), *kind))
            .collect();
        let aliases = [
            ("orthographic", ProjectionKind::Sin),
            ("gnomonic", ProjectionKind::Tan),
            ("plate carree", ProjectionKind::Car),
            ("cartesian", ProjectionKind::Car),
            ("aitoff", ProjectionKind::Ait),
            ("hammer-aitoff", ProjectionKind::Ait),
            ("zenithal equidistant", ProjectionKind::Arc),
            ("stereographic", ProjectionKind::Stg),
            ("toast", ProjectionKind::Toa),
            ("quadcube", ProjectionKind::Csc),
            ("sanson-flamsteed", ProjectionKind::Sfl),
            ("healpix", ProjectionKind::Hpx),
            ("zenithal equal area", ProjectionKind::Zea),
        ];
        for (alias, kind) in aliases {
            names.insert(alias.to_string(), kind);
        }
        names
    };
}

/// The supported projections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ProjectionKind {
    /// Orthographic
    Sin,
    /// Gnomonic
    Tan,
    /// Plate carrée
    Car,
    /// Hammer-Aitoff
    Ait,
    /// Zenithal equidistant
    Arc,
    /// Stereographic
    Stg,
    /// TOAST octahedral map
    Toa,
    /// COBE quadrilateralized spherical cube
    Csc,
    /// Sanson-Flamsteed
    Sfl,
    /// Gnomonic extended to the whole sphere
    Xtn,
    /// HEALPix
    Hpx,
    /// Lambert zenithal equal area
    Zea,
}

impl ProjectionKind {
    pub const ALL: [ProjectionKind; 12] = [
        ProjectionKind::Sin,
        ProjectionKind::Tan,
        ProjectionKind::Car,
        ProjectionKind::Ait,
        ProjectionKind::Arc,
        ProjectionKind::Stg,
        ProjectionKind::Toa,
        ProjectionKind::Csc,
        ProjectionKind::Sfl,
        ProjectionKind::Xtn,
        ProjectionKind::Hpx,
        ProjectionKind::Zea,
    ];

    /// Three letter name, as in FITS `CTYPE` keywords
    pub fn name(self) -> &'static str {
        match self {
            ProjectionKind::Sin => "Sin",
            ProjectionKind::Tan => "Tan",
            ProjectionKind::Car => "Car",
            ProjectionKind::Ait => "Ait",
            ProjectionKind::Arc => "Arc",
            ProjectionKind::Stg => "Stg",
            ProjectionKind::Toa => "Toa",
            ProjectionKind::Csc => "Csc",
            ProjectionKind::Sfl => "Sfl",
            ProjectionKind::Xtn => "Xtn",
            ProjectionKind::Hpx => "Hpx",
            ProjectionKind::Zea => "Zea",
        }
    }

    /// Whether the natural centre is the north pole (zenithal projections)
    pub fn is_zenithal(self) -> bool {
        matches!(
            self,
            ProjectionKind::Sin
                | ProjectionKind::Tan
                | ProjectionKind::Arc
                | ProjectionKind::Stg
                | ProjectionKind::Zea
                | ProjectionKind::Xtn
        )
    }

    /// Sky position `(ra, dec)` in radians that projections of this kind are
    /// tied to, for kinds that cannot be re-centred.
    pub fn fixed_point(self) -> Option<(f64, f64)> {
        match self {
            ProjectionKind::Hpx | ProjectionKind::Csc => Some((0.0, 0.0)),
            ProjectionKind::Toa => Some((0.0, HALF_PI)),
            _ => None,
        }
    }

    pub fn is_fixed(self) -> bool {
        self.fixed_point().is_some()
    }

    /// Period of the plane in x, 0 when there is none
    pub fn x_tiling(self) -> f64 {
        match self {
            ProjectionKind::Car | ProjectionKind::Hpx => TAU,
            _ => 0.0,
        }
    }

    /// Period of the plane in y, 0 when there is none
    pub fn y_tiling(self) -> f64 {
        match self {
            ProjectionKind::Car => TAU,
            _ => 0.0,
        }
    }

    /// Whether every (non-NaN) plane point has a sky position
    pub fn all_valid(self) -> bool {
        matches!(self, ProjectionKind::Stg | ProjectionKind::Xtn)
    }

    /// Whether a cell can wrap around a seam of the plane
    pub fn straddleable(self) -> bool {
        self.shadow_fn().is_some()
    }

    /// Is `p` inside the region of the plane the sky maps onto?
    pub fn valid_position(self, p: &Vector2<f64>) -> bool {
        if p.x.is_nan() || p.y.is_nan() {
            return false;
        }
        match self {
            ProjectionKind::Sin => p.norm_squared() <= 1.0 + OUTLINE_SLACK,
            ProjectionKind::Tan => p.x.is_finite() && p.y.is_finite(),
            ProjectionKind::Arc => p.norm() <= PI,
            ProjectionKind::Zea => p.norm_squared() <= 4.0,
            ProjectionKind::Car => cylindrical::valid_car(p),
            ProjectionKind::Ait => pseudocylindrical::valid_ait(p),
            ProjectionKind::Sfl => pseudocylindrical::valid_sfl(p),
            ProjectionKind::Hpx => healpix::valid_hpx(p),
            ProjectionKind::Csc => quadcube::valid_csc(p),
            ProjectionKind::Toa => toast::valid_toa(p),
            ProjectionKind::Stg | ProjectionKind::Xtn => true,
        }
    }

    /// Rectangle `(min_x, min_y, max_x, max_y)` straddle pieces are clipped to
    pub fn clip_region(self) -> Option<(f64, f64, f64, f64)> {
        match self {
            ProjectionKind::Car => Some((-PI, -HALF_PI, PI, HALF_PI)),
            _ => None,
        }
    }

    pub(crate) fn shadow_fn(self) -> Option<ShadowFn> {
        match self {
            ProjectionKind::Car => Some(cylindrical::shadow_car as ShadowFn),
            ProjectionKind::Ait => Some(pseudocylindrical::shadow_ait as ShadowFn),
            ProjectionKind::Sfl => Some(pseudocylindrical::shadow_sfl as ShadowFn),
            _ => None,
        }
    }

    /// The same sky position on the other side of the seam.
    pub fn shadow_point(self, x: f64, y: f64) -> Result<Vector2<f64>> {
        let shadow = self.shadow_fn().ok_or(WcsError::UnsupportedShadow(self))?;
        Ok(shadow(&Vector2::new(x, y)))
    }

    /// Projects a unit vector given relative to the natural centre.
    pub fn project(self, v: &Vector3<f64>) -> Vector2<f64> {
        match self {
            ProjectionKind::Sin => zenithal::project_sin(v),
            ProjectionKind::Tan => zenithal::project_tan(v),
            ProjectionKind::Xtn => zenithal::project_xtn(v),
            ProjectionKind::Arc => zenithal::project_arc(v),
            ProjectionKind::Stg => zenithal::project_stg(v),
            ProjectionKind::Zea => zenithal::project_zea(v),
            ProjectionKind::Car => cylindrical::project_car(v),
            ProjectionKind::Ait => pseudocylindrical::project_ait(v),
            ProjectionKind::Sfl => pseudocylindrical::project_sfl(v),
            ProjectionKind::Hpx => healpix::project_hpx(v),
            ProjectionKind::Csc => quadcube::project_csc(v),
            ProjectionKind::Toa => toast::project_toa(v),
        }
    }

    /// Inverse of [`ProjectionKind::project`]; NaN outside the valid region.
    pub fn deproject(self, p: &Vector2<f64>) -> Vector3<f64> {
        match self {
            ProjectionKind::Sin => zenithal::deproject_sin(p),
            ProjectionKind::Tan => zenithal::deproject_tan(p),
            ProjectionKind::Xtn => zenithal::deproject_xtn(p),
            ProjectionKind::Arc => zenithal::deproject_arc(p),
            ProjectionKind::Stg => zenithal::deproject_stg(p),
            ProjectionKind::Zea => zenithal::deproject_zea(p),
            ProjectionKind::Car => cylindrical::deproject_car(p),
            ProjectionKind::Ait => pseudocylindrical::deproject_ait(p),
            ProjectionKind::Sfl => pseudocylindrical::deproject_sfl(p),
            ProjectionKind::Hpx => healpix::deproject_hpx(p),
            ProjectionKind::Csc => quadcube::deproject_csc(p),
            ProjectionKind::Toa => toast::deproject_toa(p),
        }
    }

    /// Rotation carrying `(ra, de)` onto the natural centre, `None` for fixed kinds
    fn reference_rotater(self, ra: f64, de: f64) -> Result<Option<Rotater>> {
        if self.is_fixed() {
            Ok(None)
        } else if self.is_zenithal() {
            // North up, east towards +x
            Rotater::new("zyz", ra, HALF_PI - de, HALF_PI).map(Some)
        } else {
            Rotater::new("zy", ra, -de, 0.0).map(Some)
        }
    }
}

impl fmt::Display for ProjectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ProjectionKind {
    type Err = WcsError;

    fn from_str(s: &str) -> Result<Self> {
        REGISTRY
            .get(s.trim().to_ascii_lowercase().as_str())
            .copied()
            .ok_or_else(|| WcsError::UnknownProjection(s.to_string()))
    }
}

impl TryFrom<String> for ProjectionKind {
    type Error = WcsError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<ProjectionKind> for String {
    fn from(kind: ProjectionKind) -> String {
        kind.name().to_string()
    }
}

/// Forward projection stage: unit vector (3) to plane point (2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Projecter {
    kind: ProjectionKind,
}

impl Projecter {
    pub fn new(kind: ProjectionKind) -> Self {
        Projecter { kind }
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn project(&self, v: &Vector3<f64>) -> Vector2<f64> {
        self.kind.project(v)
    }

    pub fn deprojecter(&self) -> Deprojecter {
        Deprojecter { kind: self.kind }
    }

    pub fn valid_position(&self, p: &Vector2<f64>) -> bool {
        self.kind.valid_position(p)
    }

    pub fn shadow_point(&self, x: f64, y: f64) -> Result<Vector2<f64>> {
        self.kind.shadow_point(x, y)
    }

    /// See [`straddle::straddle`].
    pub fn straddle(&self, polygon: &Polygon) -> bool {
        straddle::straddle(self.kind, polygon)
    }

    /// See [`straddle::straddle_components`].
    pub fn straddle_components(&self, polygon: &Polygon) -> Result<Vec<Polygon>> {
        straddle::straddle_components(self.kind, polygon)
    }
}

impl Transformer for Projecter {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn input_dimension(&self) -> usize {
        3
    }

    fn output_dimension(&self) -> usize {
        2
    }

    fn apply(&self, input: &[f64], output: &mut [f64]) {
        let p = self.project(&Vector3::new(input[0], input[1], input[2]));
        output[0] = p.x;
        output[1] = p.y;
    }

    fn inverse(&self) -> Result<Box<dyn Transformer>> {
        Ok(Box::new(self.deprojecter()))
    }

    fn boxed_clone(&self) -> Box<dyn Transformer> {
        Box::new(*self)
    }
}

/// Inverse projection stage: plane point (2) to unit vector (3)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deprojecter {
    kind: ProjectionKind,
}

impl Deprojecter {
    pub fn new(kind: ProjectionKind) -> Self {
        Deprojecter { kind }
    }

    pub fn kind(&self) -> ProjectionKind {
        self.kind
    }

    pub fn deproject(&self, p: &Vector2<f64>) -> Vector3<f64> {
        self.kind.deproject(p)
    }
}

impl Transformer for Deprojecter {
    fn name(&self) -> &str {
        self.kind.name()
    }

    fn input_dimension(&self) -> usize {
        2
    }

    fn output_dimension(&self) -> usize {
        3
    }

    fn apply(&self, input: &[f64], output: &mut [f64]) {
        let v = self.deproject(&Vector2::new(input[0], input[1]));
        output.copy_from_slice(v.as_slice());
    }

    fn inverse(&self) -> Result<Box<dyn Transformer>> {
        Ok(Box::new(Projecter::new(self.kind)))
    }

    fn boxed_clone(&self) -> Box<dyn Transformer> {
        Box::new(*self)
    }
}

/// A projection about a chosen reference point
///
/// Sky vectors are rotated so the reference point lands on the natural
/// centre of the projecter, projected, and finally passed through the
/// optional plane distortion.
#[derive(Debug, Clone)]
pub struct Projection {
    rotater: Option<Rotater>,
    projecter: Projecter,
    distorter: Option<PlaneDistortion>,
    reference: Option<(f64, f64)>,
}

impl Projection {
    /// Projection about the natural centre of `kind`, without any rotation.
    ///
    /// Fixed kinds record their fixed point as the reference.
    pub fn new(kind: ProjectionKind) -> Self {
        Projection {
            rotater: None,
            projecter: Projecter::new(kind),
            distorter: None,
            reference: kind.fixed_point(),
        }
    }

    /// Projection rotated so that `(ra, de)` (radians) is its centre.
    pub fn centered(kind: ProjectionKind, ra: f64, de: f64) -> Result<Self> {
        if kind.is_fixed() {
            return Err(WcsError::IllegalConfiguration(format!(
                "{} projection cannot be re-centred",
                kind
            )));
        }
        trace!("{} projection centred on ({}, {})", kind, ra, de);
        Ok(Projection {
            rotater: kind.reference_rotater(ra, de)?,
            projecter: Projecter::new(kind),
            distorter: None,
            reference: Some((ra, de)),
        })
    }

    /// Records the reference point without moving the projection.
    pub fn set_reference(&mut self, ra: f64, de: f64) {
        self.reference = Some((ra, de));
    }

    pub fn with_distorter(mut self, distorter: Arc<dyn Distorter>) -> Self {
        self.distorter = Some(PlaneDistortion::new(distorter));
        self
    }

    pub fn kind(&self) -> ProjectionKind {
        self.projecter.kind()
    }

    pub fn rotater(&self) -> Option<&Rotater> {
        self.rotater.as_ref()
    }

    pub fn projecter(&self) -> &Projecter {
        &self.projecter
    }

    pub fn distorter(&self) -> Option<&PlaneDistortion> {
        self.distorter.as_ref()
    }

    /// Reference `(ra, de)` in radians, if one was recorded
    pub fn reference(&self) -> Option<(f64, f64)> {
        self.reference
    }

    /// The projection as a chain: rotater, projecter, distorter.
    pub fn converter(&self) -> Result<Converter> {
        let mut conv = Converter::new();
        conv.add_optional(self.rotater)?;
        conv.add(self.projecter)?;
        conv.add_optional(self.distorter.clone())?;
        Ok(conv)
    }

    pub fn project(&self, v: &Vector3<f64>) -> Vector2<f64> {
        let v = match &self.rotater {
            Some(r) => r.rotate(v),
            None => *v,
        };
        let p = self.projecter.project(&v);
        match &self.distorter {
            Some(d) => d.apply_point(&p),
            None => p,
        }
    }

    pub fn deproject(&self, p: &Vector2<f64>) -> Vector3<f64> {
        let p = match &self.distorter {
            Some(d) => d.inverse().apply_point(p),
            None => *p,
        };
        let v = self.projecter.deprojecter().deproject(&p);
        match &self.rotater {
            Some(r) => r.inverse().rotate(&v),
            None => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coordinates::{rade_to_vector, vector_to_rade};
    use crate::transform::distorter::RadialDistorter;
    use approx::assert_relative_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use rstest::rstest;

    #[rstest]
    #[case("sin", ProjectionKind::Sin)]
    #[case("TAN", ProjectionKind::Tan)]
    #[case(" Car ", ProjectionKind::Car)]
    #[case("toast", ProjectionKind::Toa)]
    #[case("HEALPix", ProjectionKind::Hpx)]
    #[case("gnomonic", ProjectionKind::Tan)]
    fn test_registry(#[case] name: &str, #[case] expected: ProjectionKind) {
        assert_eq!(name.parse::<ProjectionKind>().unwrap(), expected);
    }

    #[test]
    fn test_every_kind_parses_its_own_name() {
        for kind in ProjectionKind::ALL {
            assert_eq!(kind.to_string().parse::<ProjectionKind>().unwrap(), kind);
        }
        assert!(matches!(
            "mercator".parse::<ProjectionKind>(),
            Err(WcsError::UnknownProjection(name)) if name == "mercator"
        ));
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&ProjectionKind::Zea).unwrap();
        assert_eq!(json, "\"Zea\"");
        let kind: ProjectionKind = serde_json::from_str("\"stg\"").unwrap();
        assert_eq!(kind, ProjectionKind::Stg);
        assert!(serde_json::from_str::<ProjectionKind>("\"nope\"").is_err());
    }

    #[test]
    fn test_properties() {
        assert_eq!(ProjectionKind::Car.x_tiling(), TAU);
        assert_eq!(ProjectionKind::Car.y_tiling(), TAU);
        assert_eq!(ProjectionKind::Hpx.x_tiling(), TAU);
        assert_eq!(ProjectionKind::Hpx.y_tiling(), 0.0);
        assert_eq!(ProjectionKind::Tan.x_tiling(), 0.0);

        let straddling: Vec<_> = ProjectionKind::ALL.iter().filter(|k| k.straddleable()).collect();
        assert_eq!(
            straddling,
            vec![&ProjectionKind::Car, &ProjectionKind::Ait, &ProjectionKind::Sfl]
        );
        assert!(ProjectionKind::Stg.all_valid());
        assert!(!ProjectionKind::Sin.all_valid());
    }

    #[test]
    fn test_shadow_point() {
        let s = ProjectionKind::Car.shadow_point(3.0, 0.2).unwrap();
        assert_relative_eq!(s, Vector2::new(3.0 - TAU, 0.2));
        assert!(matches!(
            ProjectionKind::Tan.shadow_point(0.1, 0.1),
            Err(WcsError::UnsupportedShadow(ProjectionKind::Tan))
        ));
    }

    #[test]
    fn test_validity() {
        assert!(ProjectionKind::Sin.valid_position(&Vector2::new(0.6, 0.6)));
        assert!(!ProjectionKind::Sin.valid_position(&Vector2::new(0.8, 0.8)));
        assert!(!ProjectionKind::Stg.valid_position(&Vector2::new(f64::NAN, 0.0)));
        assert!(ProjectionKind::Xtn.valid_position(&Vector2::new(f64::INFINITY, 0.0)));
        assert!(!ProjectionKind::Tan.valid_position(&Vector2::new(f64::INFINITY, 0.0)));
        assert!(!ProjectionKind::Car.valid_position(&Vector2::new(3.5, 0.0)));
    }

    #[test]
    fn test_projecter_transformer() {
        let proj = Projecter::new(ProjectionKind::Stg);
        assert_eq!(proj.input_dimension(), 3);
        assert_eq!(proj.output_dimension(), 2);

        let v = rade_to_vector(0.4, 1.1);
        let p = proj.transform(v.as_slice()).unwrap();
        let back = Transformer::inverse(&proj).unwrap().transform(&p).unwrap();
        assert_relative_eq!(Vector3::from_column_slice(&back), v, epsilon = 1e-14);

        assert!(proj.transform(&[1.0, 0.0]).is_err());
        let dep = proj.deprojecter();
        assert_eq!(dep.input_dimension(), 2);
        assert_eq!(Transformer::inverse(&dep).unwrap().name(), "Stg");
    }

    #[rstest]
    #[case(ProjectionKind::Sin)]
    #[case(ProjectionKind::Tan)]
    #[case(ProjectionKind::Xtn)]
    #[case(ProjectionKind::Arc)]
    #[case(ProjectionKind::Stg)]
    #[case(ProjectionKind::Zea)]
    #[case(ProjectionKind::Car)]
    #[case(ProjectionKind::Ait)]
    #[case(ProjectionKind::Sfl)]
    fn test_centre_maps_to_origin(#[case] kind: ProjectionKind) {
        let (ra, de) = (3.7, -0.6);
        let proj = Projection::centered(kind, ra, de).unwrap();
        let centre = rade_to_vector(ra, de);

        let p = proj.project(&centre);
        assert_relative_eq!(p, Vector2::zeros(), epsilon = 1e-8);
        assert_relative_eq!(proj.deproject(&Vector2::zeros()), centre, epsilon = 1e-8);
        assert_eq!(proj.reference(), Some((ra, de)));
    }

    #[test]
    fn test_zenithal_orientation() {
        // A point slightly north of the centre lands at +y, one slightly
        // east at +x
        let proj = Projection::centered(ProjectionKind::Tan, 1.0, 0.3).unwrap();
        let north = proj.project(&rade_to_vector(1.0, 0.31));
        assert!(north.y > 0.0 && north.x.abs() < 1e-12);
        let east = proj.project(&rade_to_vector(1.01, 0.3));
        assert!(east.x > 0.0);
    }

    #[rstest]
    #[case(ProjectionKind::Sin, 1.2)]
    #[case(ProjectionKind::Tan, 1.2)]
    #[case(ProjectionKind::Xtn, 1.2)]
    #[case(ProjectionKind::Arc, 3.0)]
    #[case(ProjectionKind::Stg, 3.0)]
    #[case(ProjectionKind::Zea, 3.0)]
    #[case(ProjectionKind::Car, 3.0)]
    #[case(ProjectionKind::Ait, 3.0)]
    #[case(ProjectionKind::Sfl, 3.0)]
    fn test_centered_roundtrip(#[case] kind: ProjectionKind, #[case] radius: f64) {
        let (ra, de) = (0.8, 0.4);
        let proj = Projection::centered(kind, ra, de).unwrap();
        let centre = rade_to_vector(ra, de);

        let mut rng = StdRng::seed_from_u64(31);
        let mut tested = 0;
        while tested < 300 {
            let v = rade_to_vector(rng.gen::<f64>() * TAU, (rng.gen::<f64>() * 2.0 - 1.0).asin());
            if v.angle(&centre) > radius {
                continue;
            }
            let p = proj.project(&v);
            assert!(kind.valid_position(&p), "{} {:?}", kind, p);
            assert_relative_eq!(proj.deproject(&p), v, epsilon = 1e-7);
            tested += 1;
        }
    }

    #[rstest]
    #[case(ProjectionKind::Hpx)]
    #[case(ProjectionKind::Csc)]
    #[case(ProjectionKind::Toa)]
    fn test_fixed_projections(#[case] kind: ProjectionKind) {
        assert!(Projection::centered(kind, 0.1, 0.2).is_err());

        let mut proj = Projection::new(kind);
        assert!(proj.rotater().is_none());
        let (ra, de) = kind.fixed_point().unwrap();
        assert_eq!(proj.reference(), Some((ra, de)));

        proj.set_reference(0.1, 0.2);
        assert_eq!(proj.reference(), Some((0.1, 0.2)));

        let mut rng = StdRng::seed_from_u64(32);
        for _ in 0..300 {
            let v = rade_to_vector(rng.gen::<f64>() * TAU, (rng.gen::<f64>() * 2.0 - 1.0).asin());
            let p = proj.project(&v);
            assert!(kind.valid_position(&p));
            assert_relative_eq!(proj.deproject(&p), v, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_fixed_point_is_origin() {
        for kind in [ProjectionKind::Hpx, ProjectionKind::Csc, ProjectionKind::Toa] {
            let (ra, de) = kind.fixed_point().unwrap();
            let p = Projection::new(kind).project(&rade_to_vector(ra, de));
            assert_relative_eq!(p, Vector2::zeros(), epsilon = 1e-12);
        }
    }

    #[test]
    fn test_converter_matches_direct_path() {
        let proj = Projection::centered(ProjectionKind::Zea, 2.0, -0.3)
            .unwrap()
            .with_distorter(Arc::new(RadialDistorter::new(0.01, 0.0)));
        assert!(proj.distorter().is_some());

        let conv = proj.converter().unwrap();
        assert_eq!(conv.len(), 3);

        let v = rade_to_vector(2.1, -0.2);
        let direct = proj.project(&v);
        let chained = conv.transform(v.as_slice()).unwrap();
        assert_relative_eq!(direct, Vector2::from_column_slice(&chained), epsilon = 1e-14);

        let back = conv.inverse().unwrap().transform(&chained).unwrap();
        assert_relative_eq!(Vector3::from_column_slice(&back), v, epsilon = 1e-10);
        assert_relative_eq!(proj.deproject(&direct), v, epsilon = 1e-10);

        let (ra, de) = vector_to_rade(&proj.deproject(&Vector2::zeros()));
        assert_relative_eq!(ra, 2.0, epsilon = 1e-10);
        assert_relative_eq!(de, -0.3, epsilon = 1e-10);
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Projection>();
        assert_send_sync::<Projecter>();
        assert_send_sync::<ProjectionKind>();
    }
}
