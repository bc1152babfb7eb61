//! Results of a thermophysical model run.
//!
//! The driver keeps only two temperature slabs alive; everything retained
//! for the caller is appended here step by step, limited to the requested
//! save window and facets.

use crate::Vector;
use crate::sim::forces::ThermalRecoil;

/// Scalars of one saved step.
#[derive(Debug, Clone, Copy)]
pub struct SavedStep {
    /// Step index on the driver's time grid.
    pub step: usize,
    /// Ephemeris time [s].
    pub time_s: f64,
    /// Heliocentric distance [m].
    pub solar_distance_m: f64,
    /// Sub-solar longitude in the body frame [deg].
    pub subsolar_lon_deg: f64,
    /// Sub-solar latitude in the body frame [deg].
    pub subsolar_lat_deg: f64,
    /// Area-weighted mean surface temperature [K].
    pub mean_surface_t: f64,
    /// Instantaneous recoil force [N] and torque [N m].
    pub recoil: ThermalRecoil,
}

/// One recorded subsurface profile.
#[derive(Debug, Clone)]
pub struct DepthProfile {
    pub step: usize,
    pub facet: usize,
    /// Temperatures surface-first [K].
    pub temperatures: Vec<f64>,
}

/// Everything a run hands back to the caller.
#[derive(Debug, Clone)]
pub struct TpmResult {
    /// Per-step scalars inside the save window.
    pub steps: Vec<SavedStep>,
    /// Surface temperatures of all facets per saved step [K].
    pub surface_temperature: Vec<Vec<f64>>,
    /// Depth profiles of the requested facets per saved step.
    pub depth_profiles: Vec<DepthProfile>,
    /// Mean recoil over the last completed rotation cycle: the Yarkovsky
    /// force and the YORP torque.
    pub cycle_mean: Option<ThermalRecoil>,
    /// Non-fatal findings accumulated during the run.
    pub warnings: Vec<String>,
    /// Number of steps actually advanced (smaller than the grid when the
    /// run was cancelled).
    pub completed_steps: usize,
    /// Final surface temperatures of all facets [K].
    pub final_surface: Vec<f64>,
}

impl TpmResult {
    pub(crate) fn empty() -> Self {
        Self {
            steps: Vec::new(),
            surface_temperature: Vec::new(),
            depth_profiles: Vec::new(),
            cycle_mean: None,
            warnings: Vec::new(),
            completed_steps: 0,
            final_surface: Vec::new(),
        }
    }

    /// True when the run stopped before the end of its time grid.
    pub fn is_partial(&self, n_steps: usize) -> bool {
        self.completed_steps < n_steps
    }
}

/// Sub-solar longitude/latitude [deg] of a body-frame sun position.
pub fn subsolar_point(sun_body: Vector) -> (f64, f64) {
    let lon = sun_body.dy.atan2(sun_body.dx).to_degrees();
    let r = sun_body.length();
    let lat = if r > 0.0 {
        (sun_body.dz / r).asin().to_degrees()
    } else {
        0.0
    };
    (lon, lat)
}
