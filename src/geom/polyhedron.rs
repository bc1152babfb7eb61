//! Derived quantities of a closed triangular polyhedron.

use crate::geom::triangle;
use crate::{Point, Vector};

/// Signed volume of a closed triangular polyhedron.
///
/// Sum over faces of the signed tetrahedron volumes `((v0 × v1) · v2) / 6`.
/// Positive iff the face orientations are consistent and outward.
pub fn volume(nodes: &[Point], faces: &[[usize; 3]]) -> f64 {
    let mut vol = 0.0;
    for face in faces {
        let v0 = Vector::from(nodes[face[0]]);
        let v1 = Vector::from(nodes[face[1]]);
        let v2 = Vector::from(nodes[face[2]]);
        vol += v0.cross(v1).dot(v2) / 6.0;
    }
    vol
}

/// Radius of the sphere with the same volume.
pub fn equivalent_radius(volume: f64) -> f64 {
    (3.0 * volume / (4.0 * std::f64::consts::PI)).powf(1.0 / 3.0)
}

/// Sum of area-weighted outward normals.
///
/// Zero (to floating-point accuracy) for a closed mesh, which makes it a
/// cheap closedness diagnostic.
pub fn closedness_defect(nodes: &[Point], faces: &[[usize; 3]]) -> Vector {
    let mut sum = Vector::new(0.0, 0.0, 0.0);
    for face in faces {
        let (v0, v1, v2) = (nodes[face[0]], nodes[face[1]], nodes[face[2]]);
        // area * unit normal = half the cross product
        sum = sum + (v1 - v0).cross(v2 - v0) * 0.5;
    }
    sum
}

/// Mean facet area, used to scale closedness tolerances.
pub fn mean_area(nodes: &[Point], faces: &[[usize; 3]]) -> f64 {
    if faces.is_empty() {
        return 0.0;
    }
    let total: f64 = faces
        .iter()
        .map(|f| triangle::area(nodes[f[0]], nodes[f[1]], nodes[f[2]]))
        .sum();
    total / faces.len() as f64
}
