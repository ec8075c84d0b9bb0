//! Celestial reference frames
//!
//! A [`CoordinateSystem`] describes how to get from J2000 equatorial
//! coordinates into a frame: first an optional sphere distortion, then an
//! optional rotation. Frames are looked up by name with
//! [`CoordinateSystem::factory`]:
//!
//! ```rust
//! use skywcs::CoordinateSystem;
//!
//! let gal = CoordinateSystem::factory("galactic").unwrap();
//! assert!(gal.is_rotation());
//!
//! let fk4 = CoordinateSystem::factory("B1950").unwrap();
//! assert!(!fk4.is_rotation());
//! ```

pub mod besselian;
pub mod inertial;
pub mod precession;

use crate::constants::{BESSELIAN_BASE_EPOCH, JULIAN_BASE_EPOCH};
use crate::transform::converter::Converter;
use crate::transform::distorter::SphereDistortion;
use crate::transform::rotater::Rotater;
use crate::{Result, WcsError};
use besselian::Fk4Distorter;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;

type FrameConstructor = fn() -> Result<CoordinateSystem>;

lazy_static! {
    /// Map from lowercase frame names to constructors
    static ref FRAMES: HashMap<&'static str, FrameConstructor> = {
        let pairs: [(&'static str, FrameConstructor); 7] = [
            ("j2000", || Ok(CoordinateSystem::j2000())),
            ("fk5", || Ok(CoordinateSystem::j2000())),
            ("icrs", || Ok(CoordinateSystem::icrs())),
            ("fk4", || CoordinateSystem::besselian(BESSELIAN_BASE_EPOCH)),
            ("ecliptic", || Ok(CoordinateSystem::ecliptic())),
            ("e2000", || Ok(CoordinateSystem::ecliptic())),
            ("galactic", || Ok(CoordinateSystem::galactic())),
        ];
        pairs.into_iter().collect()
    };

    /// `B1950`, `J2015.5`, `E1975` and friends
    static ref EPOCH_FRAME: Regex =
        Regex::new(r"(?i)^([BJE])(\d+(?:\.\d*)?)$").expect("epoch frame pattern compiles");
}

/// A celestial reference frame, relative to J2000 equatorial coordinates
#[derive(Debug, Clone)]
pub struct CoordinateSystem {
    name: String,
    description: String,
    rotater: Option<Rotater>,
    sphere_distorter: Option<SphereDistortion>,
}

impl CoordinateSystem {
    /// J2000 (FK5) mean equator and equinox, the frame everything is relative to
    pub fn j2000() -> Self {
        CoordinateSystem {
            name: "J2000".to_string(),
            description: "Mean equator and equinox of J2000.0 (FK5)".to_string(),
            rotater: None,
            sphere_distorter: None,
        }
    }

    /// The ICRS, treated as coincident with J2000
    pub fn icrs() -> Self {
        CoordinateSystem {
            name: "ICRS".to_string(),
            description: "International Celestial Reference System".to_string(),
            rotater: None,
            sphere_distorter: None,
        }
    }

    /// Mean ecliptic and equinox of J2000
    pub fn ecliptic() -> Self {
        CoordinateSystem {
            name: "Ecliptic".to_string(),
            description: "Mean ecliptic and equinox of J2000.0".to_string(),
            rotater: Some(inertial::ecliptic_rotater()),
            sphere_distorter: None,
        }
    }

    /// Mean ecliptic and equinox of a Julian epoch
    pub fn ecliptic_of_date(epoch: f64) -> Result<Self> {
        Ok(CoordinateSystem {
            name: format!("E{}", epoch),
            description: format!("Mean ecliptic and equinox of J{}", epoch),
            rotater: Some(inertial::ecliptic_of_date_rotater(epoch)?),
            sphere_distorter: None,
        })
    }

    /// IAU 1958 galactic coordinates
    pub fn galactic() -> Self {
        CoordinateSystem {
            name: "Galactic".to_string(),
            description: "IAU 1958 galactic coordinates".to_string(),
            rotater: Some(inertial::galactic_rotater()),
            sphere_distorter: None,
        }
    }

    /// FK4 mean equator and equinox of a Besselian epoch
    pub fn besselian(epoch: f64) -> Result<Self> {
        Ok(CoordinateSystem {
            name: format!("B{}", epoch),
            description: format!("FK4 mean equator and equinox of B{}", epoch),
            rotater: Some(precession::besselian_precession(epoch)?),
            sphere_distorter: Some(SphereDistortion::new(Arc::new(Fk4Distorter::new()))),
        })
    }

    /// FK5 mean equator and equinox of a Julian epoch
    pub fn julian(epoch: f64) -> Result<Self> {
        Ok(CoordinateSystem {
            name: format!("J{}", epoch),
            description: format!("FK5 mean equator and equinox of J{}", epoch),
            rotater: Some(precession::julian_precession(epoch)?),
            sphere_distorter: None,
        })
    }

    /// Resolves a frame by name (case-insensitive).
    ///
    /// Besides the fixed names, `B<epoch>` and `J<epoch>` select FK4 and FK5
    /// mean frames of any epoch, and `E<epoch>` the mean ecliptic of a Julian
    /// epoch.
    pub fn factory(name: &str) -> Result<Self> {
        let key = name.trim().to_lowercase();
        if let Some(ctor) = FRAMES.get(key.as_str()) {
            debug!("Resolved frame {} from registry", name);
            return ctor();
        }

        let caps = EPOCH_FRAME
            .captures(&key)
            .ok_or_else(|| WcsError::UnknownFrame(name.to_string()))?;
        let epoch: f64 = caps[2]
            .parse()
            .map_err(|_| WcsError::UnknownFrame(name.to_string()))?;
        debug!("Resolved frame {} as epoch {}", name, epoch);

        match (&caps[1], epoch == JULIAN_BASE_EPOCH) {
            ("b", _) => Self::besselian(epoch),
            ("e", true) => Ok(Self::ecliptic()),
            ("e", false) => Self::ecliptic_of_date(epoch),
            (_, true) => Ok(Self::j2000()),
            _ => Self::julian(epoch),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Rotation from J2000 into this frame, applied after the sphere distortion
    pub fn rotater(&self) -> Option<&Rotater> {
        self.rotater.as_ref()
    }

    /// Non-rotational correction from J2000, applied before the rotation
    pub fn sphere_distorter(&self) -> Option<&SphereDistortion> {
        self.sphere_distorter.as_ref()
    }

    /// Whether the frame differs from J2000 by a pure rotation
    pub fn is_rotation(&self) -> bool {
        self.sphere_distorter.is_none()
    }

    /// Converter taking J2000 unit vectors into this frame.
    pub fn from_j2000(&self) -> Result<Converter> {
        let mut conv = Converter::new();
        conv.add_optional(self.sphere_distorter.clone())?;
        conv.add_optional(self.rotater)?;
        Ok(conv)
    }

    /// Converter taking unit vectors in this frame back to J2000.
    pub fn to_j2000(&self) -> Result<Converter> {
        self.from_j2000()?.inverse()
    }

    /// Converter taking unit vectors from `self` into `other`.
    pub fn conversion_to(&self, other: &CoordinateSystem) -> Result<Converter> {
        let mut conv = self.to_j2000()?;
        conv.append(other.from_j2000()?)?;
        Ok(conv)
    }
}
