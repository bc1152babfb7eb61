//! Procedural closed triangular bodies.
//!
//! These builders return `(nodes, faces)` pairs with consistent outward
//! winding, ready for [`crate::FacetTable::new`]. They serve tests, examples
//! and quick experiments that do not want to load a mesh file.

use crate::Point;

/// Axis-aligned box of dimensions `(x, y, z)` split into 12 triangles.
///
/// The corner `(min(x), min(y), min(z))` is located at `origin`
/// (the coordinate origin if not given). All faces wind outward.
pub fn boxed(x: f64, y: f64, z: f64, origin: Option<(f64, f64, f64)>) -> (Vec<Point>, Vec<[usize; 3]>) {
    let (ox, oy, oz) = origin.unwrap_or((0.0, 0.0, 0.0));
    let nodes = vec![
        Point::new(ox, oy, oz),
        Point::new(ox + x, oy, oz),
        Point::new(ox + x, oy + y, oz),
        Point::new(ox, oy + y, oz),
        Point::new(ox, oy, oz + z),
        Point::new(ox + x, oy, oz + z),
        Point::new(ox + x, oy + y, oz + z),
        Point::new(ox, oy + y, oz + z),
    ];
    let faces = vec![
        // bottom (-z)
        [0, 3, 2],
        [0, 2, 1],
        // top (+z)
        [4, 5, 6],
        [4, 6, 7],
        // front (-y)
        [0, 1, 5],
        [0, 5, 4],
        // back (+y)
        [2, 3, 7],
        [2, 7, 6],
        // left (-x)
        [3, 0, 4],
        [3, 4, 7],
        // right (+x)
        [1, 2, 6],
        [1, 6, 5],
    ];
    (nodes, faces)
}

/// Regular octahedron with vertices at distance `radius` from `center`.
///
/// Its exact point symmetry makes it the reference body for zero-net-force
/// checks: opposite facets cancel each other identically.
pub fn octahedron(radius: f64, center: Option<(f64, f64, f64)>) -> (Vec<Point>, Vec<[usize; 3]>) {
    let (cx, cy, cz) = center.unwrap_or((0.0, 0.0, 0.0));
    let r = radius;
    let nodes = vec![
        Point::new(cx + r, cy, cz),
        Point::new(cx, cy + r, cz),
        Point::new(cx - r, cy, cz),
        Point::new(cx, cy - r, cz),
        Point::new(cx, cy, cz + r),
        Point::new(cx, cy, cz - r),
    ];
    let faces = vec![
        [0, 1, 4],
        [1, 2, 4],
        [2, 3, 4],
        [3, 0, 4],
        [1, 0, 5],
        [2, 1, 5],
        [3, 2, 5],
        [0, 3, 5],
    ];
    (nodes, faces)
}

/// Bi-lobed body: two unit-ish boxes separated by `gap` along +x.
///
/// The two lobes see each other across the gap, so the pair exhibits mutual
/// shadowing and mutual heating that no convex body has.
pub fn contact_binary(lobe: f64, gap: f64) -> (Vec<Point>, Vec<[usize; 3]>) {
    let (mut nodes, mut faces) = boxed(lobe, lobe, lobe, None);
    let (nodes_b, faces_b) = boxed(lobe, lobe, lobe, Some((lobe + gap, 0.0, 0.0)));
    let offset = nodes.len();
    nodes.extend(nodes_b);
    faces.extend(
        faces_b
            .into_iter()
            .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
    );
    (nodes, faces)
}
