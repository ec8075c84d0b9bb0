//! Precession of the mean equator and equinox
//!
//! Both models return the rotation taking mean coordinates of the base epoch
//! into mean coordinates of the requested epoch.

use crate::constants::{ASEC2RAD, BESSELIAN_BASE_EPOCH, JULIAN_BASE_EPOCH};
use crate::transform::rotater::Rotater;
use crate::Result;

/// Besselian precession from B1950.0 to `epoch` (Besselian years).
///
/// Angles follow the Andoyer/Newcomb expansion in centuries from 1850
/// (`T0`, fixed at one century) and from 1950 (`T`).
pub fn besselian_precession(epoch: f64) -> Result<Rotater> {
    let t0 = (BESSELIAN_BASE_EPOCH - 1850.0) / 100.0;
    let t = (epoch - BESSELIAN_BASE_EPOCH) / 100.0;
    let tas2r = t * ASEC2RAD;

    // 2303.5548" is the leading rate of SLALIB PREBN, not the 2306.2181" of
    // the IAU 1976 Julian series
    let w = 2303.5548 + (1.39720 + 0.000059 * t0) * t0;
    let zeta = (w + (0.30242 - 0.000269 * t0 + 0.017996 * t) * t) * tas2r;
    let z = (w + (1.09478 + 0.000387 * t0 + 0.018324 * t) * t) * tas2r;
    let theta = (2005.1125
        + (-0.85294 - 0.000365 * t0) * t0
        + (-0.42647 - 0.000365 * t0 - 0.041802 * t) * t)
        * tas2r;

    Rotater::new("ZYZ", -zeta, theta, -z)
}

/// IAU 1976 precession from J2000.0 to `epoch` (Julian years).
pub fn julian_precession(epoch: f64) -> Result<Rotater> {
    let t = (epoch - JULIAN_BASE_EPOCH) / 100.0;
    let tas2r = t * ASEC2RAD;

    let zeta = (2306.2181 + (0.30188 + 0.017998 * t) * t) * tas2r;
    let z = (2306.2181 + (1.09468 + 0.018203 * t) * t) * tas2r;
    let theta = (2004.3109 + (-0.42665 - 0.041833 * t) * t) * tas2r;

    Rotater::new("ZYZ", -zeta, theta, -z)
}
