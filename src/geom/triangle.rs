//! Triangle primitives.
//!
//! Free functions over triangle vertices: centroid, outward normal, area,
//! and the Möller–Trumbore ray–triangle intersection used for shadowing
//! and visibility queries.

use crate::Point;
use crate::Vector;

/// Centroid of the triangle (v0, v1, v2).
pub fn centroid(v0: Point, v1: Point, v2: Point) -> Point {
    Point::new(
        (v0.x + v1.x + v2.x) / 3.0,
        (v0.y + v1.y + v2.y) / 3.0,
        (v0.z + v1.z + v2.z) / 3.0,
    )
}

/// Unit normal of the triangle, following the right-hand rule on the
/// vertex order. Returns None for degenerate (collinear) vertices.
pub fn normal(v0: Point, v1: Point, v2: Point) -> Option<Vector> {
    (v1 - v0).cross(v2 - v0).normalize()
}

/// Area of the triangle (half the cross product length).
pub fn area(v0: Point, v1: Point, v2: Point) -> f64 {
    let cross = (v1 - v0).cross(v2 - v0);
    0.5 * cross.length()
}

/// Möller–Trumbore ray–triangle intersection.
///
/// Returns the parametric distance `t` along the (normalized) ray direction
/// if the ray hits the triangle at `t > eps`, otherwise None. The test is
/// two-sided: a closed surface blocks regardless of which side the ray
/// crosses. `eps` also rejects rays parallel to the triangle plane and
/// hits at the ray origin itself.
pub fn intersect(
    origin: Point,
    direction: Vector,
    v0: Point,
    v1: Point,
    v2: Point,
    eps: f64,
) -> Option<f64> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;

    let pvec = direction.cross(e2);
    let det = e1.dot(pvec);
    if det.abs() < eps {
        return None; // Ray parallel to the triangle plane
    }
    let inv_det = 1.0 / det;

    let tvec = origin - v0;
    let u = tvec.dot(pvec) * inv_det;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }

    let qvec = tvec.cross(e1);
    let v = direction.dot(qvec) * inv_det;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }

    let t = e2.dot(qvec) * inv_det;
    if t > eps { Some(t) } else { None }
}
