//! Polygons crossing the seam of a projection
//!
//! A cell near longitude 180° on a whole-sky projection is drawn with some
//! vertices at the far left of the plane and others at the far right. Such a
//! polygon is recognised by comparing its area with the area it has once its
//! negative-x vertices are replaced by their shadows on the positive side: a
//! genuinely straddling cell becomes much smaller. It can then be split into
//! one piece on each side of the seam.

use super::clip::{convex_area, rect_clip, MAX_CLIP_VERTICES};
use super::polygon::Polygon;
use super::ProjectionKind;
use crate::constants::STRADDLE_AREA_RATIO;
use crate::Result;
use log::trace;
use nalgebra::Vector2;

/// Does the polygon cross the seam of `kind`?
///
/// Always false for projections without a seam.
pub fn straddle(kind: ProjectionKind, polygon: &Polygon) -> bool {
    let shadow = match kind.shadow_fn() {
        Some(shadow) => shadow,
        None => return false,
    };

    let mut pos = false;
    let mut neg = false;
    for &x in polygon.xs() {
        if x > 0.0 {
            pos = true;
        } else if x < 0.0 {
            neg = true;
        }
    }
    if !(pos && neg) {
        return false;
    }

    let mut sx = Vec::with_capacity(polygon.len());
    let mut sy = Vec::with_capacity(polygon.len());
    for (&x, &y) in polygon.xs().iter().zip(polygon.ys()) {
        let p = if x >= 0.0 {
            Vector2::new(x, y)
        } else {
            shadow(&Vector2::new(x, y))
        };
        sx.push(p.x);
        sy.push(p.y);
    }

    let no_straddle = polygon.area();
    let have_straddle = convex_area(&sx, &sy);
    have_straddle < STRADDLE_AREA_RATIO * no_straddle
}

/// Splits a straddling polygon into its pieces on either side of the seam.
///
/// The first piece holds the material at non-negative x, the second the
/// material at negative x. Projections that clip (plate carrée) trim each
/// piece to the valid rectangle. Projections without a seam return the
/// polygon unchanged as the only piece.
pub fn straddle_components(kind: ProjectionKind, polygon: &Polygon) -> Result<Vec<Polygon>> {
    let shadow = match kind.shadow_fn() {
        Some(shadow) => shadow,
        None => return Ok(vec![polygon.clone()]),
    };

    let n = polygon.len();
    let mut positive = (Vec::with_capacity(n), Vec::with_capacity(n));
    let mut negative = (Vec::with_capacity(n), Vec::with_capacity(n));

    for (&x, &y) in polygon.xs().iter().zip(polygon.ys()) {
        let s = fix_shadow(x, shadow(&Vector2::new(x, y)));
        let (own, other) = if x < 0.0 {
            (&mut negative, &mut positive)
        } else {
            (&mut positive, &mut negative)
        };
        own.0.push(x);
        own.1.push(y);
        other.0.push(s.x);
        other.1.push(s.y);
    }

    let mut components = Vec::with_capacity(2);
    for (xs, ys) in [positive, negative] {
        let piece = match kind.clip_region() {
            Some((min_x, min_y, max_x, max_y)) => {
                let mut out_x = [0.0; MAX_CLIP_VERTICES];
                let mut out_y = [0.0; MAX_CLIP_VERTICES];
                let count = rect_clip(&xs, &ys, &mut out_x, &mut out_y, min_x, min_y, max_x, max_y)?;
                Polygon::new(out_x[..count].to_vec(), out_y[..count].to_vec())?
            }
            None => Polygon::new(xs, ys)?,
        };
        components.push(piece);
    }
    trace!(
        "{} straddle split into pieces of {} and {} vertices",
        kind,
        components[0].len(),
        components[1].len()
    );
    Ok(components)
}

/// Keeps a shadow on the opposite side of the seam when the point sits on it.
///
/// The seam is assumed symmetric in x.
fn fix_shadow(x: f64, mut shadow: Vector2<f64>) -> Vector2<f64> {
    if (x > 0.0 && shadow.x > 0.0) || (x < 0.0 && shadow.x < 0.0) {
        shadow.x = -shadow.x;
    }
    shadow
}
