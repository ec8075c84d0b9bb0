//! Constants module for coordinate transformations

use std::f64::consts::PI;

// Angles
/// Arcseconds to radians conversion factor
pub const ASEC2RAD: f64 = 4.848_136_811_095_359_935_899_141_023_579_479_759_563_5e-6;
/// Tau (2*PI) for full circle
pub const TAU: f64 = 2.0 * PI;
/// Half of PI, a quarter turn
pub const HALF_PI: f64 = PI / 2.0;

// Epochs
/// Epoch of the Besselian precession base (B1950.0) as a year
pub const BESSELIAN_BASE_EPOCH: f64 = 1950.0;
/// Epoch of the Julian precession base (J2000.0) as a year
pub const JULIAN_BASE_EPOCH: f64 = 2000.0;
/// Length of the Besselian (tropical) year in days
pub const BESSELIAN_YEAR: f64 = 365.242_198_781;
/// Length of the Julian year in days
pub const JULIAN_YEAR: f64 = 365.25;
/// Modified Julian date of B1900.0
pub const B1900_MJD: f64 = 15_019.813_52;
/// Modified Julian date of J2000.0
pub const J2000_MJD: f64 = 51_544.5;

// Frames
/// Mean obliquity of the ecliptic at J2000.0 in arcseconds (IAU 1976)
pub const OBLIQUITY_J2000_ASEC: f64 = 84_381.448;

// Projections
/// Round-off allowed when testing a plane point against a projection's
/// outline; points projected onto the outline land just past it
pub const OUTLINE_SLACK: f64 = 1e-12;

// Straddle handling
/// A shadowed polygon must be smaller than this fraction of the original
/// polygon's area before it is considered to straddle a seam
pub const STRADDLE_AREA_RATIO: f64 = 0.9;
