//! A sky position tagged with the frame it was given in
//!
//! [`Position`] is meant for passing single positions between parts of a
//! program that think in different frames. Every conversion resolves the
//! frame through [`CoordinateSystem::factory`], so it is not the tool for
//! converting large arrays of points; build a [`Converter`] once instead.
//!
//! All angles are in degrees.

use super::{rade_to_vector, vector_to_rade};
use crate::framelib::CoordinateSystem;
use crate::transform::converter::Converter;
use crate::Result;
use nalgebra::Vector3;

const J2000: &str = "J2000";

/// Frame-tagged sky coordinate
#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    /// J2000 longitude and latitude
    coords: (f64, f64),
    /// Coordinates as given
    orig: (f64, f64),
    orig_frame: String,
}

impl Position {
    /// A position in the J2000 frame
    pub fn new(l: f64, b: f64) -> Self {
        Position {
            coords: (l, b),
            orig: (l, b),
            orig_frame: J2000.to_string(),
        }
    }

    /// A position given in a named frame.
    ///
    /// Fails with [`WcsError::UnknownFrame`](crate::WcsError::UnknownFrame)
    /// if the frame cannot be resolved.
    pub fn with_frame(l: f64, b: f64, frame: &str) -> Result<Self> {
        if is_j2000(frame) {
            return Ok(Position::new(l, b));
        }

        let csys = CoordinateSystem::factory(frame)?;
        let coords = convert(&csys.to_j2000()?, (l, b))?;
        Ok(Position {
            coords,
            orig: (l, b),
            orig_frame: frame.to_string(),
        })
    }

    /// Frame the position was originally given in
    pub fn frame(&self) -> &str {
        &self.orig_frame
    }

    /// Coordinates in the J2000 frame
    pub fn coordinates(&self) -> (f64, f64) {
        self.coords
    }

    /// Coordinates in a named frame.
    ///
    /// Asking for the original frame returns the original values unchanged.
    /// Longitudes of converted coordinates are in `[0, 360)`.
    pub fn coordinates_in(&self, frame: &str) -> Result<(f64, f64)> {
        if is_j2000(frame) {
            return Ok(self.coords);
        }
        if frame.trim().eq_ignore_ascii_case(self.orig_frame.trim()) {
            return Ok(self.orig);
        }

        let csys = CoordinateSystem::factory(frame)?;
        convert(&csys.from_j2000()?, self.coords)
    }
}

fn is_j2000(frame: &str) -> bool {
    frame.trim().eq_ignore_ascii_case(J2000)
}

fn convert(conv: &Converter, (l, b): (f64, f64)) -> Result<(f64, f64)> {
    let unit = rade_to_vector(l.to_radians(), b.to_radians());
    let out = conv.transform(unit.as_slice())?;
    let (lon, lat) = vector_to_rade(&Vector3::from_column_slice(&out));
    Ok((lon.to_degrees().rem_euclid(360.0), lat.to_degrees()))
}
