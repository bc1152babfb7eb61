//! Thermophysical parameters and their per-facet resolution.
//!
//! Every material property can be a single uniform value or a per-facet
//! sequence. Resolution happens through one accessor so the hot loops never
//! branch on the representation twice. All derived quantities (skin depth,
//! thermal inertia, normalized grid steps, the stability coefficient) are
//! computed once at construction and validated there.

use anyhow::{Result, bail, ensure};

/// A quantity that is either uniform over the body or given per facet.
#[derive(Debug, Clone, PartialEq)]
pub enum PerFacet<T> {
    Uniform(T),
    Each(Vec<T>),
}

impl<T: Copy> PerFacet<T> {
    /// Value at facet `f`.
    pub fn get(&self, f: usize) -> T {
        match self {
            PerFacet::Uniform(v) => *v,
            PerFacet::Each(v) => v[f],
        }
    }

    /// True if the representation matches `n_face` facets.
    fn len_matches(&self, n_face: usize) -> bool {
        match self {
            PerFacet::Uniform(_) => true,
            PerFacet::Each(v) => v.len() == n_face,
        }
    }
}

/// Surface material properties, uniform or per facet.
#[derive(Debug, Clone)]
pub struct SurfaceMaterial {
    /// Bond albedo at visible wavelengths [-].
    pub bond_albedo: PerFacet<f64>,
    /// Albedo at thermal wavelengths [-].
    pub thermal_albedo: PerFacet<f64>,
    /// Thermal conductivity [W/(m K)]. Zero selects the zero-inertia limit.
    pub conductivity: PerFacet<f64>,
    /// Bulk density [kg/m³].
    pub density: PerFacet<f64>,
    /// Specific heat capacity [J/(kg K)].
    pub specific_heat: PerFacet<f64>,
    /// Thermal-infrared emissivity [-].
    pub emissivity: PerFacet<f64>,
}

/// Depth discretization of the conduction columns.
#[derive(Debug, Clone, Copy)]
pub struct DepthGrid {
    /// Maximum depth of the column [m].
    pub z_max: f64,
    /// Number of depth nodes (surface and bottom included).
    pub n_z: usize,
}

/// Time discretization, normalized by the rotation period.
#[derive(Debug, Clone, Copy)]
pub struct TimeGrid {
    /// Rotation period [s].
    pub rotation_period: f64,
    /// Start time in rotations.
    pub t_begin: f64,
    /// End time in rotations.
    pub t_end: f64,
    /// Time step in rotations.
    pub dt: f64,
}

/// Validated parameter set of one simulation run.
#[derive(Debug, Clone)]
pub struct ThermalParams {
    pub material: SurfaceMaterial,
    pub depth: DepthGrid,
    pub time: TimeGrid,
    /// Number of facets the per-facet fields were validated against.
    pub n_face: usize,
    /// Number of time steps covering `[t_begin, t_end)`.
    pub n_steps: usize,
    /// Time steps per rotation.
    pub steps_per_cycle: usize,
    // Derived, all resolved per facet
    skin_depth: PerFacet<f64>,
    thermal_inertia: PerFacet<f64>,
    /// Depth step in skin depths.
    dz: PerFacet<f64>,
    /// Stability coefficient dt / (4π dz²).
    lambda: PerFacet<f64>,
    /// Surface conduction coefficient k / (ℓ · dz) [W/(m² K)].
    conduction: PerFacet<f64>,
}

/// Warn when the stability coefficient gets this close to the limit.
const LAMBDA_WARN: f64 = 0.45;

impl ThermalParams {
    /// Validates and derives the full parameter set for `n_face` facets.
    pub fn new(
        material: SurfaceMaterial,
        depth: DepthGrid,
        time: TimeGrid,
        n_face: usize,
    ) -> Result<Self> {
        ensure!(n_face > 0, "Parameter set needs at least one facet");
        ensure!(depth.n_z >= 3, "Depth grid needs at least 3 nodes, got {}", depth.n_z);
        ensure!(depth.z_max > 0.0, "Maximum depth must be positive");
        ensure!(time.rotation_period > 0.0, "Rotation period must be positive");
        ensure!(time.dt > 0.0, "Time step must be positive");
        ensure!(
            time.t_end > time.t_begin,
            "End time {} must lie after start time {}",
            time.t_end,
            time.t_begin
        );

        for (name, field) in [
            ("bond albedo", &material.bond_albedo),
            ("thermal albedo", &material.thermal_albedo),
            ("conductivity", &material.conductivity),
            ("density", &material.density),
            ("specific heat", &material.specific_heat),
            ("emissivity", &material.emissivity),
        ] {
            ensure!(
                field.len_matches(n_face),
                "Per-facet {name} length does not match {n_face} facets"
            );
            for f in 0..n_face {
                let value = field.get(f);
                ensure!(value >= 0.0, "Negative {name} {value} at facet {f}");
            }
        }

        let n_steps = ((time.t_end - time.t_begin) / time.dt).round() as usize;
        ensure!(n_steps > 0, "Time grid contains no steps");
        let steps_per_cycle = (1.0 / time.dt).round().max(1.0) as usize;

        // Derived per-facet quantities. The representation stays uniform
        // when all inputs are uniform.
        let four_pi = 4.0 * std::f64::consts::PI;
        let derived = |f: usize| -> (f64, f64, f64, f64, f64) {
            let k = material.conductivity.get(f);
            let rho = material.density.get(f);
            let cp = material.specific_heat.get(f);
            if k == 0.0 {
                // Zero-inertia limit: no conduction, no stability constraint
                return (0.0, 0.0, 0.0, 0.0, 0.0);
            }
            let ell = (four_pi * time.rotation_period * k / (rho * cp)).sqrt();
            let gamma = (k * rho * cp).sqrt();
            let dz = (depth.z_max / ell) / (depth.n_z - 1) as f64;
            let lambda = time.dt / (four_pi * dz * dz);
            let conduction = k / (ell * dz);
            (ell, gamma, dz, lambda, conduction)
        };

        let uniform_material = matches!(material.conductivity, PerFacet::Uniform(_))
            && matches!(material.density, PerFacet::Uniform(_))
            && matches!(material.specific_heat, PerFacet::Uniform(_));

        let (skin_depth, thermal_inertia, dz, lambda, conduction) = if uniform_material {
            let (ell, gamma, dz, lam, cond) = derived(0);
            (
                PerFacet::Uniform(ell),
                PerFacet::Uniform(gamma),
                PerFacet::Uniform(dz),
                PerFacet::Uniform(lam),
                PerFacet::Uniform(cond),
            )
        } else {
            let mut ells = Vec::with_capacity(n_face);
            let mut gammas = Vec::with_capacity(n_face);
            let mut dzs = Vec::with_capacity(n_face);
            let mut lams = Vec::with_capacity(n_face);
            let mut conds = Vec::with_capacity(n_face);
            for f in 0..n_face {
                let (ell, gamma, dz, lam, cond) = derived(f);
                ells.push(ell);
                gammas.push(gamma);
                dzs.push(dz);
                lams.push(lam);
                conds.push(cond);
            }
            (
                PerFacet::Each(ells),
                PerFacet::Each(gammas),
                PerFacet::Each(dzs),
                PerFacet::Each(lams),
                PerFacet::Each(conds),
            )
        };

        for f in 0..n_face {
            let lam = lambda.get(f);
            if lam > 0.5 {
                bail!(
                    "Unstable time step: lambda = {lam:.4} > 0.5 at facet {f} \
                     (refine the time grid or coarsen the depth grid)"
                );
            }
            if lam > LAMBDA_WARN {
                log::warn!("Stability coefficient lambda = {lam:.4} at facet {f} is close to 0.5");
            }
        }

        Ok(Self {
            material,
            depth,
            time,
            n_face,
            n_steps,
            steps_per_cycle,
            skin_depth,
            thermal_inertia,
            dz,
            lambda,
            conduction,
        })
    }

    /// Thermal skin depth ℓ = √(4π P k / (ρ Cp)) at facet `f` [m].
    pub fn skin_depth(&self, f: usize) -> f64 {
        self.skin_depth.get(f)
    }

    /// Thermal inertia Γ = √(k ρ Cp) at facet `f` [J/(m² K s^½)].
    pub fn thermal_inertia(&self, f: usize) -> f64 {
        self.thermal_inertia.get(f)
    }

    /// Depth step at facet `f`, in skin depths.
    pub fn dz(&self, f: usize) -> f64 {
        self.dz.get(f)
    }

    /// Stability coefficient λ = Δt / (4π Δz²) at facet `f`.
    pub fn lambda(&self, f: usize) -> f64 {
        self.lambda.get(f)
    }

    /// Surface conduction coefficient k / (ℓ Δz) at facet `f` [W/(m² K)].
    pub fn conduction(&self, f: usize) -> f64 {
        self.conduction.get(f)
    }
}
