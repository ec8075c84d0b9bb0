//! Sutherland-Hodgman clipping of convex polygons by an upright rectangle
//!
//! All buffers are caller-owned or fixed-size stack arrays, so clipping never
//! allocates and can run from any number of threads.

use crate::{Result, WcsError};

/// Capacity every output buffer of [`rect_clip`] must have
pub const MAX_CLIP_VERTICES: usize = 12;

/// Largest polygon [`rect_clip`] accepts
pub const MAX_CLIP_INPUT: usize = 8;

/// Area of a convex polygon, summed over the triangle fan from vertex 0.
///
/// Vertices may run in either direction; the closing vertex is not repeated.
pub fn convex_area(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    (1..n.saturating_sub(1))
        .map(|i| triangle_area(x[0], y[0], x[i], y[i], x[i + 1], y[i + 1]))
        .sum()
}

/// `½·sqrt(|X|²|Y|² − (X·Y)²)` for the two sides `X`, `Y` leaving vertex 0
fn triangle_area(x0: f64, y0: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let a = x0 - x1;
    let b = y0 - y1;
    let e = x0 - x2;
    let f = y0 - y2;

    let area = (a * a + b * b) * (e * e + f * f) - (a * e + b * f) * (a * e + b * f);
    if area <= 0.0 {
        // round-off
        0.0
    } else {
        area.sqrt() / 2.0
    }
}

/// Points on the dividing line count as inside.
fn in_plane(test: f64, divider: f64, keep_above: bool) -> bool {
    if keep_above {
        test >= divider
    } else {
        test <= divider
    }
}

/// Clips a polygon to the half-plane on one side of the vertical line `x = val`.
///
/// Passing the axes swapped clips by a horizontal line instead. Returns the
/// number of vertices written to `nx`, `ny`.
fn line_clip(
    x: &[f64],
    y: &[f64],
    nx: &mut [f64],
    ny: &mut [f64],
    val: f64,
    keep_above: bool,
) -> Result<usize> {
    let n = x.len();
    if n == 0 {
        return Ok(0);
    }

    let mut nout = 0;
    let mut push = |px: f64, py: f64| -> Result<()> {
        if nout >= nx.len() {
            return Err(WcsError::DimensionMismatch {
                expected: nx.len(),
                actual: nout + 1,
            });
        }
        nx[nout] = px;
        ny[nout] = py;
        nout += 1;
        Ok(())
    };

    let mut last = in_plane(x[n - 1], val, keep_above);
    for i in 0..n {
        let prev = if i == 0 { n - 1 } else { i - 1 };
        let inside = in_plane(x[i], val, keep_above);
        let crossing = || y[prev] + (y[i] - y[prev]) * (val - x[prev]) / (x[i] - x[prev]);

        match (last, inside) {
            (true, true) => push(x[i], y[i])?,
            (true, false) => {
                push(val, crossing())?;
                last = false;
            }
            (false, true) => {
                push(val, crossing())?;
                push(x[i], y[i])?;
                last = true;
            }
            (false, false) => {}
        }
    }
    Ok(nout)
}

/// Clips a convex polygon by the rectangle `[min_x, max_x] × [min_y, max_y]`.
///
/// The clipped outline is written to `out_x`, `out_y`, which must hold at
/// least [`MAX_CLIP_VERTICES`] values, and its vertex count is returned.
/// A polygon entirely outside the rectangle gives 0.
#[allow(clippy::too_many_arguments)]
pub fn rect_clip(
    x: &[f64],
    y: &[f64],
    out_x: &mut [f64],
    out_y: &mut [f64],
    min_x: f64,
    min_y: f64,
    max_x: f64,
    max_y: f64,
) -> Result<usize> {
    if x.len() != y.len() {
        return Err(WcsError::DimensionMismatch {
            expected: x.len(),
            actual: y.len(),
        });
    }
    if x.len() > MAX_CLIP_INPUT {
        return Err(WcsError::DimensionMismatch {
            expected: MAX_CLIP_INPUT,
            actual: x.len(),
        });
    }
    let capacity = out_x.len().min(out_y.len());
    if capacity < MAX_CLIP_VERTICES {
        return Err(WcsError::DimensionMismatch {
            expected: MAX_CLIP_VERTICES,
            actual: capacity,
        });
    }

    let mut rc_x0 = [0.0; MAX_CLIP_VERTICES];
    let mut rc_y0 = [0.0; MAX_CLIP_VERTICES];
    let mut rc_x1 = [0.0; MAX_CLIP_VERTICES];
    let mut rc_y1 = [0.0; MAX_CLIP_VERTICES];

    // The horizontal passes swap the axes
    let mut n = line_clip(x, y, &mut rc_x0, &mut rc_y0, min_x, true)?;
    if n > 0 {
        n = line_clip(&rc_x0[..n], &rc_y0[..n], &mut rc_x1, &mut rc_y1, max_x, false)?;
    }
    if n > 0 {
        n = line_clip(&rc_y1[..n], &rc_x1[..n], &mut rc_y0, &mut rc_x0, min_y, true)?;
    }
    if n > 0 {
        n = line_clip(&rc_y0[..n], &rc_x0[..n], out_y, out_x, max_y, false)?;
    }
    Ok(n)
}
