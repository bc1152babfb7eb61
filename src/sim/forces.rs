//! Thermal-recoil force and torque.
//!
//! Every facet emits thermally and recoils against its own radiation. For a
//! Lambertian emitter the momentum flux is 2/3 of the radiant flux divided
//! by the speed of light, directed against the outward normal. Summed over
//! the surface this gives the instantaneous body-frame force; the moment
//! about a reference point gives the torque. Averaged over a rotation they
//! are the Yarkovsky force and the YORP torque.

use crate::mesh::facet::FacetTable;
use crate::sim::params::PerFacet;
use crate::sim::{SIGMA_SB, SPEED_OF_LIGHT};
use crate::{Point, Vector};

/// Lambertian momentum fraction of the radiated flux.
const LAMBERT_FACTOR: f64 = 2.0 / 3.0;

/// Instantaneous body-frame recoil force [N] and torque [N m].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThermalRecoil {
    pub force: Vector,
    pub torque: Vector,
}

impl ThermalRecoil {
    pub fn zero() -> Self {
        Self {
            force: Vector::new(0.0, 0.0, 0.0),
            torque: Vector::new(0.0, 0.0, 0.0),
        }
    }
}

/// Integrates the recoil force and torque over the surface.
///
/// `surface` holds one surface temperature per facet [K]; `r_ref` is the
/// torque reference point, normally the center of mass.
pub fn thermal_recoil(
    table: &FacetTable,
    emissivity: &PerFacet<f64>,
    surface: &[f64],
    r_ref: Point,
) -> ThermalRecoil {
    let mut force = Vector::new(0.0, 0.0, 0.0);
    let mut torque = Vector::new(0.0, 0.0, 0.0);

    for (f, facet) in table.facets().iter().enumerate() {
        let t = surface[f];
        let magnitude = LAMBERT_FACTOR * emissivity.get(f) * SIGMA_SB * t.powi(4) * facet.area
            / SPEED_OF_LIGHT;
        let df = facet.normal * (-magnitude);
        force = force + df;
        torque = torque + (facet.center - r_ref).cross(df);
    }

    ThermalRecoil { force, torque }
}

/// Total thermally radiated power of the surface [W].
pub fn radiated_power(table: &FacetTable, emissivity: &PerFacet<f64>, surface: &[f64]) -> f64 {
    table
        .facets()
        .iter()
        .enumerate()
        .map(|(f, facet)| emissivity.get(f) * SIGMA_SB * surface[f].powi(4) * facet.area)
        .sum()
}

/// Running mean of recoil samples over one rotation cycle.
#[derive(Debug, Clone)]
pub struct CycleAccumulator {
    force_sum: Vector,
    torque_sum: Vector,
    samples: usize,
}

impl CycleAccumulator {
    pub fn new() -> Self {
        Self {
            force_sum: Vector::new(0.0, 0.0, 0.0),
            torque_sum: Vector::new(0.0, 0.0, 0.0),
            samples: 0,
        }
    }

    pub fn add(&mut self, sample: &ThermalRecoil) {
        self.force_sum = self.force_sum + sample.force;
        self.torque_sum = self.torque_sum + sample.torque;
        self.samples += 1;
    }

    pub fn samples(&self) -> usize {
        self.samples
    }

    /// Cycle-mean recoil, or None before the first sample.
    pub fn mean(&self) -> Option<ThermalRecoil> {
        if self.samples == 0 {
            return None;
        }
        let n = self.samples as f64;
        Some(ThermalRecoil {
            force: self.force_sum * (1.0 / n),
            torque: self.torque_sum * (1.0 / n),
        })
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for CycleAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
