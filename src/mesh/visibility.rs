//! Facet-to-facet visibility.
//!
//! The precomputation finds, for every facet, the set of other facets it can
//! exchange radiation with: both centers above each other's horizon and the
//! connecting segment not blocked by a third facet. Each neighbor carries a
//! geometric coupling weight `cosθ_i · cosθ_j · A_j / (π d²)` used by the
//! flux assembler for both scattered sunlight and thermal re-emission.
//!
//! The same precomputed sets drive the run-time sun-shadow test: only facets
//! that can see facet `f` can possibly stand between `f` and the Sun.

use crate::Vector;
use crate::geom::ray::Ray;
use crate::mesh::facet::FacetTable;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Epsilon for the ray–triangle test (parallel rejection, origin hits).
const RAY_EPS: f64 = 1e-12;

/// Ray origins are lifted off the source facet by this fraction of the
/// target distance to avoid self-intersection.
const ORIGIN_LIFT: f64 = 1e-6;

/// Facets with area below this are skipped by the precompute [m²].
const DEGENERATE_AREA: f64 = 1e-10;

/// Sparse facet visibility graph in compressed-row form.
///
/// Row `i` lists the facets visible from facet `i` together with their
/// coupling weights. The graph is symmetric in membership and obeys the
/// reciprocity relation `w_ij · A_i = w_ji · A_j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityGraph {
    offsets: Vec<usize>,
    neighbors: Vec<usize>,
    weights: Vec<f64>,
}

/// One accepted pair produced by the parallel sweep.
struct Pair {
    i: usize,
    j: usize,
    /// cosθ_i · cosθ_j · A_j / (π d²)
    weight_ij: f64,
    /// cosθ_i · cosθ_j · A_i / (π d²)
    weight_ji: f64,
}

impl VisibilityGraph {
    /// Precomputes the visibility of all facet pairs.
    ///
    /// Pairs are tested in parallel; the result does not depend on the
    /// traversal order. O(N² · N) in the worst case.
    pub fn build(table: &FacetTable) -> Self {
        let n = table.count();

        let pairs: Vec<Pair> = (0..n)
            .into_par_iter()
            .flat_map_iter(|i| {
                let mut found = Vec::new();
                if table.facet(i).area < DEGENERATE_AREA {
                    log::warn!("Skipping degenerate facet {i} in visibility precompute");
                    return found.into_iter();
                }
                for j in (i + 1)..n {
                    if table.facet(j).area < DEGENERATE_AREA {
                        continue;
                    }
                    if let Some(pair) = test_pair(table, i, j) {
                        found.push(pair);
                    }
                }
                found.into_iter()
            })
            .collect();

        // Symmetric merge into CSR rows
        let mut rows: Vec<Vec<(usize, f64)>> = vec![Vec::new(); n];
        for p in &pairs {
            rows[p.i].push((p.j, p.weight_ij));
            rows[p.j].push((p.i, p.weight_ji));
        }
        for row in rows.iter_mut() {
            row.sort_by_key(|&(j, _)| j);
        }

        let mut offsets = Vec::with_capacity(n + 1);
        let mut neighbors = Vec::new();
        let mut weights = Vec::new();
        offsets.push(0);
        for row in rows {
            for (j, w) in row {
                neighbors.push(j);
                weights.push(w);
            }
            offsets.push(neighbors.len());
        }

        Self {
            offsets,
            neighbors,
            weights,
        }
    }

    pub fn facet_count(&self) -> usize {
        self.offsets.len() - 1
    }

    /// Total number of directed visibility entries.
    pub fn entry_count(&self) -> usize {
        self.neighbors.len()
    }

    /// Facets visible from facet `f`, sorted by index.
    pub fn neighbors(&self, f: usize) -> &[usize] {
        &self.neighbors[self.offsets[f]..self.offsets[f + 1]]
    }

    /// Coupling weights aligned with [`Self::neighbors`].
    pub fn weights(&self, f: usize) -> &[f64] {
        &self.weights[self.offsets[f]..self.offsets[f + 1]]
    }

    /// Sun-shadow test for facet `f` and a sun direction in the body frame.
    ///
    /// A facet is lit iff the sun is above its local horizon and no facet of
    /// its visible set blocks the sun ray. Only sunward neighbors can block;
    /// the blocking test is two-sided because the surface is opaque from
    /// both sides.
    pub fn is_illuminated(&self, table: &FacetTable, f: usize, sun_dir: Vector) -> bool {
        let Some(r_hat) = sun_dir.normalize() else {
            return false;
        };
        let facet = table.facet(f);
        if facet.normal.dot(r_hat) <= 0.0 {
            return false;
        }
        for &j in self.neighbors(f) {
            let blocker = table.facet(j);
            let towards = blocker.center - facet.center;
            if towards.dot(r_hat) <= 0.0 {
                continue; // behind the sun ray
            }
            let ray = Ray {
                origin: facet.center + facet.normal * (ORIGIN_LIFT * towards.length()),
                direction: r_hat,
            };
            let [v0, v1, v2] = blocker.vertices;
            if ray.intersect_triangle(v0, v1, v2, RAY_EPS).is_some() {
                return false;
            }
        }
        true
    }
}

/// Tests one unordered facet pair for mutual visibility.
fn test_pair(table: &FacetTable, i: usize, j: usize) -> Option<Pair> {
    let fi = table.facet(i);
    let fj = table.facet(j);

    let d = fj.center - fi.center;
    let dist = d.length();
    let d_hat = d.normalize()?;

    // Horizon check: each center in the positive half-space of the other
    let cos_i = d_hat.dot(fi.normal);
    let cos_j = -d_hat.dot(fj.normal);
    if cos_i <= 0.0 || cos_j <= 0.0 {
        return None;
    }

    // Occlusion check against every third facet
    let ray = Ray {
        origin: fi.center + fi.normal * (ORIGIN_LIFT * dist),
        direction: d_hat,
    };
    let limit = dist * (1.0 - ORIGIN_LIFT);
    for (k, fk) in table.facets().iter().enumerate() {
        if k == i || k == j {
            continue;
        }
        let [v0, v1, v2] = fk.vertices;
        if let Some(t) = ray.intersect_triangle(v0, v1, v2, RAY_EPS)
            && t < limit
        {
            return None;
        }
    }

    let base = cos_i * cos_j / (std::f64::consts::PI * dist * dist);
    Some(Pair {
        i,
        j,
        weight_ij: base * fj.area,
        weight_ji: base * fi.area,
    })
}
