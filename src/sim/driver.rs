//! Thermophysical model driver.
//!
//! Advances the coupled facet columns through the time grid: ephemeris
//! lookup, flux assembly from the previous slab, parallel column update,
//! recoil integration, optional recording. Only two temperature slabs are
//! ever alive; history retention is bounded by the save window.

use crate::Point;
use crate::mesh::facet::FacetTable;
use crate::mesh::visibility::VisibilityGraph;
use crate::sim::SOLAR_CONSTANT;
use crate::sim::ephemeris::Ephemeris;
use crate::sim::flux::{FacetFlux, FluxAssembler};
use crate::sim::forces::{self, CycleAccumulator};
use crate::sim::heat::{ColumnCoeffs, NewtonReport, step_column};
use crate::sim::params::ThermalParams;
use crate::sim::result::{DepthProfile, SavedStep, TpmResult, subsolar_point};
use anyhow::{Result, bail, ensure};
use rayon::prelude::*;
use std::ops::Range;
use std::sync::atomic::{AtomicBool, Ordering};

/// What to do when the surface Newton iteration does not converge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewtonPolicy {
    /// Abort the run (default).
    Strict,
    /// Keep the last Newton estimate and record a warning.
    Lenient,
}

/// Run configuration of the driver.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    pub newton_policy: NewtonPolicy,
    /// Test sun rays against visible neighbors; horizon-only when false.
    pub self_shadowing: bool,
    /// Include scattered and thermal neighbor fluxes.
    pub self_heating: bool,
    /// Solar flux at 1 au [W/m²].
    pub solar_constant: f64,
    /// Isothermal initial temperature of all columns [K], typically a
    /// radiative-equilibrium estimate.
    pub initial_temperature: f64,
    /// Step range to record, or None to record nothing.
    pub save: Option<Range<usize>>,
    /// Facets whose full depth profiles are recorded inside the window.
    pub record_facets: Vec<usize>,
    /// Torque reference point, normally the center of mass.
    pub torque_reference: Point,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            newton_policy: NewtonPolicy::Strict,
            self_shadowing: true,
            self_heating: true,
            solar_constant: SOLAR_CONSTANT,
            initial_temperature: 280.0,
            save: None,
            record_facets: Vec::new(),
            torque_reference: Point::new(0.0, 0.0, 0.0),
        }
    }
}

/// Drives one thermophysical model run over an immutable setup.
pub struct TpmDriver<'a> {
    table: &'a FacetTable,
    visibility: &'a VisibilityGraph,
    params: &'a ThermalParams,
    ephemeris: &'a Ephemeris,
    config: DriverConfig,
}

impl<'a> TpmDriver<'a> {
    pub fn new(
        table: &'a FacetTable,
        visibility: &'a VisibilityGraph,
        params: &'a ThermalParams,
        ephemeris: &'a Ephemeris,
        config: DriverConfig,
    ) -> Result<Self> {
        ensure!(
            params.n_face == table.count(),
            "Parameters cover {} facets but the mesh has {}",
            params.n_face,
            table.count()
        );
        ensure!(
            visibility.facet_count() == table.count(),
            "Visibility graph covers {} facets but the mesh has {}",
            visibility.facet_count(),
            table.count()
        );
        ensure!(
            ephemeris.len() >= params.n_steps,
            "Ephemeris has {} records but the time grid needs {}",
            ephemeris.len(),
            params.n_steps
        );
        ensure!(
            config.initial_temperature > 0.0,
            "Initial temperature must be positive"
        );
        for &f in &config.record_facets {
            ensure!(f < table.count(), "Recorded facet {f} is out of range");
        }
        Ok(Self {
            table,
            visibility,
            params,
            ephemeris,
            config,
        })
    }

    /// Runs the full time grid.
    pub fn run(&self) -> Result<TpmResult> {
        self.run_with_stop(None)
    }

    /// Runs the time grid, checking `stop` between steps.
    ///
    /// When the flag turns true the driver returns the partial result
    /// accumulated so far.
    pub fn run_with_stop(&self, stop: Option<&AtomicBool>) -> Result<TpmResult> {
        let n_face = self.table.count();
        let n_z = self.params.depth.n_z;

        let mut assembler = FluxAssembler::new(self.table, self.visibility, self.params);
        assembler.self_shadowing = self.config.self_shadowing;
        assembler.self_heating = self.config.self_heating;
        assembler.solar_constant = self.config.solar_constant;

        let coeffs: Vec<ColumnCoeffs> = (0..n_face)
            .map(|f| ColumnCoeffs {
                lambda: self.params.lambda(f),
                conduction: self.params.conduction(f),
                emissivity: self.params.material.emissivity.get(f),
            })
            .collect();

        let mut slab_old = vec![self.config.initial_temperature; n_face * n_z];
        let mut slab_new = vec![0.0; n_face * n_z];
        let mut surface = vec![self.config.initial_temperature; n_face];
        let mut fluxes: Vec<FacetFlux> = Vec::new();

        let mut result = TpmResult::empty();
        let mut accumulator = CycleAccumulator::new();
        let mut last_cycle_mean = None;
        let total_area = self.table.total_area();

        for n in 0..self.params.n_steps {
            if let Some(stop) = stop
                && stop.load(Ordering::Relaxed)
            {
                log::info!("Cancellation requested, stopping after {n} steps");
                result.warnings.push(format!("Run cancelled after {n} steps"));
                break;
            }

            let sun = self.ephemeris.sun(n);
            assembler.assemble(sun, &surface, &mut fluxes);

            // Each facet owns one chunk of the new slab; the old slab and
            // the fluxes are read-only here.
            let failed: Vec<(usize, NewtonReport)> = slab_new
                .par_chunks_mut(n_z)
                .enumerate()
                .map(|(f, column_new)| {
                    let column_old = &slab_old[f * n_z..(f + 1) * n_z];
                    let absorbed = fluxes[f].absorbed(
                        self.params.material.bond_albedo.get(f),
                        self.params.material.thermal_albedo.get(f),
                    );
                    let report = step_column(column_old, column_new, absorbed, &coeffs[f]);
                    (f, report)
                })
                .filter(|(_, report)| !report.converged)
                .collect();

            for (f, report) in failed {
                match self.config.newton_policy {
                    NewtonPolicy::Strict => bail!(
                        "Surface Newton iteration failed to converge at facet {f}, step {n} \
                         ({} iterations)",
                        report.iterations
                    ),
                    NewtonPolicy::Lenient => {
                        log::warn!("Newton not converged at facet {f}, step {n}; keeping estimate");
                        result
                            .warnings
                            .push(format!("Newton not converged at facet {f}, step {n}"));
                    }
                }
            }

            let t_min = slab_new.iter().copied().fold(f64::INFINITY, f64::min);
            if t_min <= 0.0 {
                bail!("Non-positive temperature {t_min} K at step {n}");
            }

            surface.clear();
            surface.extend(slab_new.iter().step_by(n_z));

            let recoil = forces::thermal_recoil(
                self.table,
                &self.params.material.emissivity,
                &surface,
                self.config.torque_reference,
            );
            accumulator.add(&recoil);
            if accumulator.samples() == self.params.steps_per_cycle {
                last_cycle_mean = accumulator.mean();
                accumulator.reset();
            }

            if self.config.save.as_ref().is_some_and(|w| w.contains(&n)) {
                let (lon, lat) = subsolar_point(sun);
                let mean_surface_t = surface
                    .iter()
                    .zip(self.table.facets())
                    .map(|(t, facet)| t * facet.area)
                    .sum::<f64>()
                    / total_area;
                result.steps.push(SavedStep {
                    step: n,
                    time_s: self.ephemeris.time(n),
                    solar_distance_m: sun.length(),
                    subsolar_lon_deg: lon,
                    subsolar_lat_deg: lat,
                    mean_surface_t,
                    recoil,
                });
                result.surface_temperature.push(surface.clone());
                for &f in &self.config.record_facets {
                    result.depth_profiles.push(DepthProfile {
                        step: n,
                        facet: f,
                        temperatures: slab_new[f * n_z..(f + 1) * n_z].to_vec(),
                    });
                }
            }

            result.completed_steps = n + 1;
            std::mem::swap(&mut slab_old, &mut slab_new);
        }

        result.cycle_mean = last_cycle_mean.or_else(|| accumulator.mean());
        result.final_surface = surface;
        Ok(result)
    }
}
