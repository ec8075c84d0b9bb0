//! Tessellated Octahedral Adaptive Subdivision Transform
//!
//! The sphere is split into eight octants, laid out on the square
//! `[-1, 1]²` with the north pole at the centre and the south pole at the
//! four corners. Each octant triangle is subdivided by halving its edges
//! (great-circle midpoints on the sphere, straight midpoints on the plane)
//! to a fixed depth; inside the final triangle the mapping is barycentric.
//! Forward and inverse walk the same subdivision, so they invert each
//! other exactly.

use super::zenithal::{nan_point, nan_vector};
use nalgebra::{Vector2, Vector3};

/// Number of subdivision levels below the octants
const DEPTH: usize = 6;

/// Slack when testing whether a point lies on a triangle
const EDGE_TOLERANCE: f64 = 1e-12;

#[derive(Debug, Clone, Copy)]
struct Triangle {
    sphere: [Vector3<f64>; 3],
    plane: [Vector2<f64>; 3],
}

impl Triangle {
    /// Top level triangle of the octant with the given signs.
    fn octant(sx: f64, sy: f64, north: bool) -> Self {
        let bx = Vector3::new(sx, 0.0, 0.0);
        let cy = Vector3::new(0.0, sy, 0.0);
        if north {
            Triangle {
                sphere: [Vector3::z(), bx, cy],
                plane: [Vector2::zeros(), Vector2::new(sx, 0.0), Vector2::new(0.0, sy)],
            }
        } else {
            Triangle {
                sphere: [-Vector3::z(), bx, cy],
                plane: [Vector2::new(sx, sy), Vector2::new(sx, 0.0), Vector2::new(0.0, sy)],
            }
        }
    }

    fn children(&self) -> [Triangle; 4] {
        let [a, b, c] = self.sphere;
        let [pa, pb, pc] = self.plane;
        let (ab, bc, ca) = ((a + b).normalize(), (b + c).normalize(), (c + a).normalize());
        let (pab, pbc, pca) = ((pa + pb) / 2.0, (pb + pc) / 2.0, (pc + pa) / 2.0);
        [
            Triangle { sphere: [a, ab, ca], plane: [pa, pab, pca] },
            Triangle { sphere: [ab, b, bc], plane: [pab, pb, pbc] },
            Triangle { sphere: [ca, bc, c], plane: [pca, pbc, pc] },
            Triangle { sphere: [ab, bc, ca], plane: [pab, pbc, pca] },
        ]
    }

    /// Weights of `v` in the basis of the three vertices, summing to one.
    fn sphere_weights(&self, v: &Vector3<f64>) -> Vector3<f64> {
        let [a, b, c] = self.sphere;
        let w = Vector3::new(v.dot(&b.cross(&c)), v.dot(&c.cross(&a)), v.dot(&a.cross(&b)));
        w / w.sum()
    }

    fn plane_weights(&self, p: &Vector2<f64>) -> Vector3<f64> {
        let [a, b, c] = self.plane;
        let det = (b.x - a.x) * (c.y - a.y) - (c.x - a.x) * (b.y - a.y);
        let wb = ((p.x - a.x) * (c.y - a.y) - (c.x - a.x) * (p.y - a.y)) / det;
        let wc = ((b.x - a.x) * (p.y - a.y) - (p.x - a.x) * (b.y - a.y)) / det;
        Vector3::new(1.0 - wb - wc, wb, wc)
    }
}

fn contains(weights: &Vector3<f64>) -> bool {
    weights.iter().all(|w| *w >= -EDGE_TOLERANCE)
}

/// Walks down the subdivision, keeping the child for which `weights` says the point is inside.
fn descend<F>(mut triangle: Triangle, weights: F) -> Triangle
where
    F: Fn(&Triangle) -> Vector3<f64>,
{
    for _ in 0..DEPTH {
        let children = triangle.children();
        triangle = children
            .iter()
            .copied()
            .find(|child| contains(&weights(child)))
            .unwrap_or(children[3]);
    }
    triangle
}

fn sign(c: f64) -> f64 {
    if c.is_sign_negative() && c != 0.0 {
        -1.0
    } else {
        1.0
    }
}

pub(crate) fn project_toa(v: &Vector3<f64>) -> Vector2<f64> {
    if v.iter().any(|c| c.is_nan()) {
        return nan_point();
    }
    let top = Triangle::octant(sign(v.x), sign(v.y), v.z >= 0.0);
    let leaf = descend(top, |t| t.sphere_weights(v));
    let w = leaf.sphere_weights(v);
    leaf.plane[0] * w.x + leaf.plane[1] * w.y + leaf.plane[2] * w.z
}

pub(crate) fn valid_toa(p: &Vector2<f64>) -> bool {
    p.x.abs() <= 1.0 && p.y.abs() <= 1.0
}

pub(crate) fn deproject_toa(p: &Vector2<f64>) -> Vector3<f64> {
    if !valid_toa(p) {
        return nan_vector();
    }
    let north = p.x.abs() + p.y.abs() <= 1.0;
    let top = Triangle::octant(sign(p.x), sign(p.y), north);
    let leaf = descend(top, |t| t.plane_weights(p));
    let w = leaf.plane_weights(p);
    (leaf.sphere[0] * w.x + leaf.sphere[1] * w.y + leaf.sphere[2] * w.z).normalize()
}
