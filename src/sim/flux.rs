//! Per-step radiative flux assembly.
//!
//! For every facet three incident fluxes are computed from the Sun position
//! and the previous step's surface temperatures:
//!
//! - direct solar flux, subject to the sun-shadow test,
//! - sunlight scattered once from visible neighbors (Lambertian),
//! - thermal infrared emitted by visible neighbors.
//!
//! Neighbor terms always read the previous step so the result is
//! independent of facet traversal order.

use crate::mesh::facet::FacetTable;
use crate::mesh::visibility::VisibilityGraph;
use crate::sim::params::ThermalParams;
use crate::sim::{AU, SIGMA_SB, SOLAR_CONSTANT};
use crate::Vector;
use rayon::prelude::*;

/// Incident flux triple of one facet [W/m²].
#[derive(Debug, Clone, Copy, Default)]
pub struct FacetFlux {
    /// Direct solar flux.
    pub sun: f64,
    /// Scattered (visible-band) flux from neighbors.
    pub scattered: f64,
    /// Thermal-infrared flux from neighbors.
    pub thermal: f64,
}

impl FacetFlux {
    /// Flux absorbed by the surface given its two albedos.
    pub fn absorbed(&self, bond_albedo: f64, thermal_albedo: f64) -> f64 {
        (1.0 - bond_albedo) * (self.sun + self.scattered) + (1.0 - thermal_albedo) * self.thermal
    }
}

/// Assembles the flux triples of all facets for one time step.
pub struct FluxAssembler<'a> {
    table: &'a FacetTable,
    visibility: &'a VisibilityGraph,
    params: &'a ThermalParams,
    /// When false, only the local horizon decides illumination.
    pub self_shadowing: bool,
    /// When false, scattered and thermal neighbor fluxes are zero.
    pub self_heating: bool,
    /// Solar flux at 1 au [W/m²].
    pub solar_constant: f64,
}

impl<'a> FluxAssembler<'a> {
    pub fn new(
        table: &'a FacetTable,
        visibility: &'a VisibilityGraph,
        params: &'a ThermalParams,
    ) -> Self {
        Self {
            table,
            visibility,
            params,
            self_shadowing: true,
            self_heating: true,
            solar_constant: SOLAR_CONSTANT,
        }
    }

    /// Direct solar flux on facet `f` for the Sun at `sun_body` [m].
    pub fn direct_solar(&self, f: usize, sun_body: Vector) -> f64 {
        let facet = self.table.facet(f);
        let to_sun = sun_body - Vector::from(facet.center);
        let dist = to_sun.length();
        let Some(r_hat) = to_sun.normalize() else {
            return 0.0;
        };

        let lit = if self.self_shadowing {
            self.visibility.is_illuminated(self.table, f, r_hat)
        } else {
            facet.normal.dot(r_hat) > 0.0
        };
        if !lit {
            return 0.0;
        }

        let scale = AU / dist;
        self.solar_constant * scale * scale * facet.normal.dot(r_hat)
    }

    /// Fills `out` with the flux triples of all facets.
    ///
    /// `surface_prev` holds the previous step's surface temperatures [K],
    /// one per facet; it feeds the thermal neighbor term only.
    pub fn assemble(&self, sun_body: Vector, surface_prev: &[f64], out: &mut Vec<FacetFlux>) {
        let n = self.table.count();
        debug_assert_eq!(surface_prev.len(), n);

        // Pass 1: direct solar flux of every facet
        let direct: Vec<f64> = (0..n)
            .into_par_iter()
            .map(|f| self.direct_solar(f, sun_body))
            .collect();

        // Pass 2: neighbor sums over the visibility graph
        (0..n)
            .into_par_iter()
            .map(|f| {
                let mut flux = FacetFlux {
                    sun: direct[f],
                    ..Default::default()
                };
                if self.self_heating {
                    let neighbors = self.visibility.neighbors(f);
                    let weights = self.visibility.weights(f);
                    for (&j, &w) in neighbors.iter().zip(weights) {
                        flux.scattered += w * self.params.material.bond_albedo.get(j) * direct[j];
                        let t_j = surface_prev[j];
                        flux.thermal +=
                            w * self.params.material.emissivity.get(j) * SIGMA_SB * t_j.powi(4);
                    }
                }
                flux
            })
            .collect_into_vec(out);
    }
}
