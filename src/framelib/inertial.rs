use super::precession::julian_precession;
use crate::constants::{ASEC2RAD, JULIAN_BASE_EPOCH, OBLIQUITY_J2000_ASEC};
use crate::transform::rotater::Rotater;
use crate::Result;
use lazy_static::lazy_static;
use nalgebra::Matrix3;

// Static transformation matrices

// These are the rotations FROM J2000 equatorial TO the other system
lazy_static! {
    static ref EQ_TO_EC: Rotater = Rotater::from_matrix(elemental_x(OBLIQUITY_J2000_ASEC * ASEC2RAD));

    // IAU 1958 galactic system expressed in J2000 (Murray 1989)
    static ref EQ_TO_GAL: Rotater = Rotater::from_matrix(Matrix3::new(
        -0.0548755604162154, -0.8734370902348850, -0.4838350155487132,
        0.4941094278755837, -0.4448296299600112, 0.7469822444972189,
        -0.8676661490190047, -0.1980763734312015, 0.4559837761750669,
    ));
}

fn elemental_x(angle: f64) -> Matrix3<f64> {
    let (s, c) = angle.sin_cos();
    Matrix3::new(1.0, 0.0, 0.0, 0.0, c, s, 0.0, -s, c)
}

/// J2000 equatorial → J2000 mean ecliptic
pub fn ecliptic_rotater() -> Rotater {
    *EQ_TO_EC
}

/// IAU 1980 mean obliquity of the ecliptic at a Julian epoch, in radians
pub fn mean_obliquity(epoch: f64) -> f64 {
    let t = (epoch - JULIAN_BASE_EPOCH) / 100.0;
    (OBLIQUITY_J2000_ASEC + (-46.8150 + (-0.00059 + 0.001813 * t) * t) * t) * ASEC2RAD
}

/// J2000 equatorial → mean ecliptic and equinox of `epoch` (Julian years)
pub fn ecliptic_of_date_rotater(epoch: f64) -> Result<Rotater> {
    let precession = julian_precession(epoch)?;
    Ok(precession.add(&Rotater::from_matrix(elemental_x(mean_obliquity(epoch)))))
}

/// J2000 equatorial → galactic
pub fn galactic_rotater() -> Rotater {
    *EQ_TO_GAL
}
