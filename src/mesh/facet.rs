//! Facet table: per-face static geometry of the body.
//!
//! Built once from `(nodes, faces)` and immutable afterwards. Temperatures
//! and fluxes are simulation state and live outside this table.

use crate::geom::polyhedron;
use crate::geom::triangle;
use crate::{Point, Vector};
use anyhow::{Result, bail, ensure};
use serde::{Deserialize, Serialize};

/// Facet areas below this threshold are rejected at construction [m²].
const AREA_EPS: f64 = 1e-12;

/// One triangular face with its precomputed geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Facet {
    pub vertices: [Point; 3],
    pub center: Point,
    pub normal: Vector,
    pub area: f64,
}

/// All facets of a closed triangular polyhedron.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacetTable {
    nodes: Vec<Point>,
    faces: Vec<[usize; 3]>,
    facets: Vec<Facet>,
}

impl FacetTable {
    /// Builds the table from node positions and 0-based face indices.
    ///
    /// The vertex order of each face must yield an outward normal via
    /// `(v1 - v0) × (v2 - v0)`. Fails on an empty face list, out-of-range
    /// or duplicate node indices, and degenerate (zero-area) faces.
    pub fn new(nodes: Vec<Point>, faces: Vec<[usize; 3]>) -> Result<Self> {
        ensure!(!faces.is_empty(), "Mesh has no faces");

        let mut facets = Vec::with_capacity(faces.len());
        for (fi, face) in faces.iter().enumerate() {
            for &ni in face {
                ensure!(
                    ni < nodes.len(),
                    "Face {fi} references node {ni}, but the mesh has {} nodes",
                    nodes.len()
                );
            }
            if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                bail!("Face {fi} repeats a node index: {face:?}");
            }

            let (v0, v1, v2) = (nodes[face[0]], nodes[face[1]], nodes[face[2]]);
            let area = triangle::area(v0, v1, v2);
            ensure!(area > AREA_EPS, "Face {fi} is degenerate (area = {area:e})");
            let Some(normal) = triangle::normal(v0, v1, v2) else {
                bail!("Face {fi} is degenerate (collinear vertices)");
            };

            facets.push(Facet {
                vertices: [v0, v1, v2],
                center: triangle::centroid(v0, v1, v2),
                normal,
                area,
            });
        }

        Ok(Self {
            nodes,
            faces,
            facets,
        })
    }

    pub fn count(&self) -> usize {
        self.facets.len()
    }

    pub fn facet(&self, i: usize) -> &Facet {
        &self.facets[i]
    }

    pub fn facets(&self) -> &[Facet] {
        &self.facets
    }

    pub fn nodes(&self) -> &[Point] {
        &self.nodes
    }

    pub fn faces(&self) -> &[[usize; 3]] {
        &self.faces
    }

    /// Signed volume of the polyhedron [m³].
    pub fn volume(&self) -> f64 {
        polyhedron::volume(&self.nodes, &self.faces)
    }

    /// Radius of the equal-volume sphere [m].
    pub fn equivalent_radius(&self) -> f64 {
        polyhedron::equivalent_radius(self.volume())
    }

    /// Sum of area-weighted normals; near zero for a closed mesh.
    pub fn closedness_defect(&self) -> Vector {
        polyhedron::closedness_defect(&self.nodes, &self.faces)
    }

    /// Total surface area [m²].
    pub fn total_area(&self) -> f64 {
        self.facets.iter().map(|f| f.area).sum()
    }
}
