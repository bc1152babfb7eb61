//! 1-D heat conduction below one facet.
//!
//! Forward-Euler finite differences on the heat equation in normalized
//! coordinates: depth in thermal skin depths, time in rotation periods. The
//! surface node balances absorbed flux, conduction and thermal emission
//! through a Newton iteration; the bottom node is insulated.

use crate::sim::SIGMA_SB;

/// Maximum Newton iterations for the surface energy balance.
pub const NEWTON_MAX_ITER: usize = 20;

/// Relative convergence tolerance of the surface Newton iteration.
pub const NEWTON_TOL: f64 = 1e-10;

/// Per-facet coefficients of the column update.
#[derive(Debug, Clone, Copy)]
pub struct ColumnCoeffs {
    /// Stability coefficient λ = Δt / (4π Δz²); zero in the Γ = 0 limit.
    pub lambda: f64,
    /// Surface conduction coefficient k / (ℓ Δz) [W/(m² K)].
    pub conduction: f64,
    /// Thermal-infrared emissivity [-].
    pub emissivity: f64,
}

/// Outcome of one surface Newton solve.
#[derive(Debug, Clone, Copy)]
pub struct NewtonReport {
    pub iterations: usize,
    pub converged: bool,
}

/// Solves the surface energy balance for the new surface temperature.
///
/// Root of `flux + conduction · (t_below − T) − ε σ T⁴ = 0`, seeded with
/// `guess` (the previous surface temperature). Returns the final iterate
/// even when unconverged; the caller decides whether that is acceptable.
pub fn solve_surface(
    flux: f64,
    t_below: f64,
    guess: f64,
    conduction: f64,
    emissivity: f64,
) -> (f64, NewtonReport) {
    let mut t = guess;
    for it in 0..NEWTON_MAX_ITER {
        let t3 = t * t * t;
        let g = flux + conduction * (t_below - t) - emissivity * SIGMA_SB * t3 * t;
        let dg = -conduction - 4.0 * emissivity * SIGMA_SB * t3;
        if dg == 0.0 {
            // Zero emissivity with zero conduction leaves no balancing term
            return (
                t,
                NewtonReport {
                    iterations: it,
                    converged: false,
                },
            );
        }
        let t_new = t - g / dg;
        let done = (1.0 - t / t_new).abs() < NEWTON_TOL;
        t = t_new;
        if done {
            return (
                t,
                NewtonReport {
                    iterations: it + 1,
                    converged: true,
                },
            );
        }
    }
    (
        t,
        NewtonReport {
            iterations: NEWTON_MAX_ITER,
            converged: false,
        },
    )
}

/// Advances one facet column by one time step.
///
/// `old` and `new` are the two time slabs of this column, surface first.
/// `flux` is the absorbed flux at the surface [W/m²]. Interior nodes use
/// the explicit scheme, the bottom node copies its neighbor (insulation).
/// In the Γ = 0 limit (λ = 0, no conduction) the subsurface is left
/// untouched and the surface sits at instantaneous radiative equilibrium.
pub fn step_column(old: &[f64], new: &mut [f64], flux: f64, coeffs: &ColumnCoeffs) -> NewtonReport {
    let n = old.len();
    debug_assert_eq!(new.len(), n);
    debug_assert!(n >= 3);

    if coeffs.conduction == 0.0 {
        new[1..].copy_from_slice(&old[1..]);
        let (t_surface, report) = solve_surface(flux, old[0], old[0], 0.0, coeffs.emissivity);
        new[0] = t_surface;
        return report;
    }

    let lambda = coeffs.lambda;
    for i in 1..n - 1 {
        new[i] = (1.0 - 2.0 * lambda) * old[i] + lambda * (old[i + 1] + old[i - 1]);
    }

    let (t_surface, report) =
        solve_surface(flux, new[1], old[0], coeffs.conduction, coeffs.emissivity);
    new[0] = t_surface;
    new[n - 1] = new[n - 2];
    report
}
