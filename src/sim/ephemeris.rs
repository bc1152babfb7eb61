//! Sun ephemeris in the body-fixed frame.
//!
//! The driver consumes one Sun position per time step, materialized before
//! the time loop begins. Positions come from an external ephemeris service
//! in the general case; the circular generator below covers the common
//! uniformly rotating body on a fixed heliocentric distance.

use crate::Vector;
use anyhow::{Result, ensure};

/// Time-indexed Sun positions [m] in the body-fixed frame.
#[derive(Debug, Clone)]
pub struct Ephemeris {
    time_s: Vec<f64>,
    sun_body: Vec<Vector>,
}

impl Ephemeris {
    /// Wraps two parallel sequences; times must be strictly increasing.
    pub fn new(time_s: Vec<f64>, sun_body: Vec<Vector>) -> Result<Self> {
        ensure!(!time_s.is_empty(), "Ephemeris is empty");
        ensure!(
            time_s.len() == sun_body.len(),
            "Ephemeris columns disagree: {} times vs {} positions",
            time_s.len(),
            sun_body.len()
        );
        ensure!(
            time_s.windows(2).all(|w| w[1] > w[0]),
            "Ephemeris times are not strictly increasing"
        );
        Ok(Self { time_s, sun_body })
    }

    pub fn len(&self) -> usize {
        self.time_s.len()
    }

    pub fn is_empty(&self) -> bool {
        self.time_s.is_empty()
    }

    /// Time of record `n` [s].
    pub fn time(&self, n: usize) -> f64 {
        self.time_s[n]
    }

    /// Sun position of record `n` [m], body frame.
    pub fn sun(&self, n: usize) -> Vector {
        self.sun_body[n]
    }

    /// Ephemeris of a body rotating uniformly about +z with the Sun on a
    /// fixed distance in the equatorial plane.
    ///
    /// In the body frame the Sun then circles clockwise: at step `n` it sits
    /// at angle `-2π n / steps_per_cycle`, starting on +x. `n_steps` records
    /// are generated with spacing `period / steps_per_cycle`.
    pub fn circular_equatorial(
        distance_m: f64,
        period_s: f64,
        steps_per_cycle: usize,
        n_steps: usize,
    ) -> Result<Self> {
        ensure!(distance_m > 0.0, "Heliocentric distance must be positive");
        ensure!(period_s > 0.0, "Rotation period must be positive");
        ensure!(steps_per_cycle > 0 && n_steps > 0, "Step counts must be positive");

        let dt = period_s / steps_per_cycle as f64;
        let mut time_s = Vec::with_capacity(n_steps);
        let mut sun_body = Vec::with_capacity(n_steps);
        for n in 0..n_steps {
            let angle = -2.0 * std::f64::consts::PI * (n % steps_per_cycle) as f64
                / steps_per_cycle as f64;
            time_s.push(n as f64 * dt);
            sun_body.push(Vector::new(
                distance_m * angle.cos(),
                distance_m * angle.sin(),
                0.0,
            ));
        }
        Self::new(time_s, sun_body)
    }

    /// Ephemeris with the Sun pinned to one body-frame position.
    pub fn fixed(sun_body: Vector, dt_s: f64, n_steps: usize) -> Result<Self> {
        ensure!(dt_s > 0.0, "Time step must be positive");
        ensure!(n_steps > 0, "Step count must be positive");
        let time_s = (0..n_steps).map(|n| n as f64 * dt_s).collect();
        Self::new(time_s, vec![sun_body; n_steps])
    }
}
