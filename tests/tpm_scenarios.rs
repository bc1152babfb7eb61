use anyhow::Result;
use asterotherm::geom::shapes;
use asterotherm::io::snapshot::{read_snapshot, write_snapshot};
use asterotherm::io::tables;
use asterotherm::sim::driver::{DriverConfig, NewtonPolicy, TpmDriver};
use asterotherm::sim::ephemeris::Ephemeris;
use asterotherm::sim::params::{DepthGrid, PerFacet, SurfaceMaterial, ThermalParams, TimeGrid};
use asterotherm::sim::{AU, SIGMA_SB, SOLAR_CONSTANT};
use asterotherm::{FacetTable, Point, Vector, VisibilityGraph};

fn basalt_like(bond_albedo: f64) -> SurfaceMaterial {
    SurfaceMaterial {
        bond_albedo: PerFacet::Uniform(bond_albedo),
        thermal_albedo: PerFacet::Uniform(0.0),
        conductivity: PerFacet::Uniform(0.1),
        density: PerFacet::Uniform(1270.0),
        specific_heat: PerFacet::Uniform(600.0),
        emissivity: PerFacet::Uniform(1.0),
    }
}

/// Unit cube at 1 au, Sun fixed along +x in the body frame.
///
/// After ten rotations the sunward wall sits close to its radiative
/// equilibrium (1361 / σ)^¼ ≈ 393.6 K, the far wall has cooled deeply,
/// and the recoil force points away from the Sun.
#[test]
fn cube_under_fixed_sun_approaches_radiative_equilibrium() -> Result<()> {
    let (nodes, faces) = shapes::boxed(1.0, 1.0, 1.0, None);
    let table = FacetTable::new(nodes, faces)?;
    let visibility = VisibilityGraph::build(&table);

    let period = 3600.0;
    let steps_per_cycle = 72;
    let params = ThermalParams::new(
        basalt_like(0.0),
        DepthGrid { z_max: 0.1, n_z: 11 },
        TimeGrid {
            rotation_period: period,
            t_begin: 0.0,
            t_end: 10.0,
            dt: 1.0 / steps_per_cycle as f64,
        },
        table.count(),
    )?;
    let ephemeris = Ephemeris::fixed(
        Vector::new(AU, 0.0, 0.0),
        period / steps_per_cycle as f64,
        params.n_steps,
    )?;

    let config = DriverConfig {
        initial_temperature: 278.0,
        ..Default::default()
    };
    let driver = TpmDriver::new(&table, &visibility, &params, &ephemeris, config)?;
    let result = driver.run()?;
    assert_eq!(result.completed_steps, params.n_steps);

    let t_eq = (SOLAR_CONSTANT / SIGMA_SB).powf(0.25);
    for (f, &t) in result.final_surface.iter().enumerate() {
        let normal = table.facet(f).normal;
        if normal.dx > 0.5 {
            // Sunward wall: within a few kelvin of equilibrium, still
            // warming through the subsurface
            assert!((t - t_eq).abs() < 8.0, "facet {f}: {t} K vs {t_eq} K");
        } else {
            // Dark walls cool monotonically from the initial 278 K
            assert!(t < 210.0, "facet {f} too warm: {t} K");
            assert!(t > 50.0, "facet {f} unphysically cold: {t} K");
        }
    }

    // Recoil of the hot sunward wall dominates: net force away from the Sun
    let recoil = result.cycle_mean.expect("at least one full cycle");
    assert!(recoil.force.dx < 0.0);
    Ok(())
}

/// Rotating convex body: cycle-averaged emission balances absorption.
#[test]
fn rotating_octahedron_reaches_energy_balance() -> Result<()> {
    let (nodes, faces) = shapes::octahedron(50.0, None);
    let table = FacetTable::new(nodes, faces)?;
    let visibility = VisibilityGraph::build(&table);

    let period = 3600.0;
    let steps_per_cycle = 72;
    let n_cycles = 30;
    let params = ThermalParams::new(
        basalt_like(0.0),
        DepthGrid { z_max: 0.05, n_z: 11 },
        TimeGrid {
            rotation_period: period,
            t_begin: 0.0,
            t_end: n_cycles as f64,
            dt: 1.0 / steps_per_cycle as f64,
        },
        table.count(),
    )?;
    let ephemeris = Ephemeris::circular_equatorial(AU, period, steps_per_cycle, params.n_steps)?;

    let last_cycle = (params.n_steps - steps_per_cycle)..params.n_steps;
    let config = DriverConfig {
        save: Some(last_cycle.clone()),
        ..Default::default()
    };
    let driver = TpmDriver::new(&table, &visibility, &params, &ephemeris, config)?;
    let result = driver.run()?;
    assert_eq!(result.surface_temperature.len(), steps_per_cycle);

    let mut absorbed = 0.0;
    let mut emitted = 0.0;
    for (saved, row) in result.steps.iter().zip(&result.surface_temperature) {
        let sun = ephemeris.sun(saved.step);
        let r_hat = sun.normalize().unwrap();
        for (f, facet) in table.facets().iter().enumerate() {
            let mu = facet.normal.dot(r_hat).max(0.0);
            absorbed += SOLAR_CONSTANT * mu * facet.area;
            emitted += SIGMA_SB * row[f].powi(4) * facet.area;
        }
    }
    let ratio = emitted / absorbed;
    assert!((ratio - 1.0).abs() < 0.01, "emitted/absorbed = {ratio:.4}");
    Ok(())
}

/// Ryugu-like uniform parameter run producing all four result tables.
#[test]
fn uniform_run_exports_all_tables() -> Result<()> {
    let (nodes, faces) = shapes::octahedron(400.0, None);
    let table = FacetTable::new(nodes, faces)?;
    let visibility = VisibilityGraph::build(&table);

    let period = 7.63262 * 3600.0;
    let steps_per_cycle = 72;
    let params = ThermalParams::new(
        basalt_like(0.04),
        DepthGrid { z_max: 0.6, n_z: 41 },
        TimeGrid {
            rotation_period: period,
            t_begin: 0.0,
            t_end: 2.0,
            dt: 1.0 / steps_per_cycle as f64,
        },
        table.count(),
    )?;
    let ephemeris = Ephemeris::circular_equatorial(AU, period, steps_per_cycle, params.n_steps)?;

    let record_facets = vec![0usize, 4];
    let config = DriverConfig {
        save: Some(steps_per_cycle..2 * steps_per_cycle),
        record_facets: record_facets.clone(),
        ..Default::default()
    };
    let driver = TpmDriver::new(&table, &visibility, &params, &ephemeris, config)?;
    let result = driver.run()?;

    let dir = tempfile::tempdir()?;
    tables::write_all(dir.path(), &result)?;

    // physical_quantities.csv: header + one row per saved step
    let content = std::fs::read_to_string(dir.path().join("physical_quantities.csv"))?;
    assert_eq!(content.lines().count(), 1 + steps_per_cycle);
    assert!(content.starts_with("step,time_s,solar_distance_m"));

    // surface_temperature.csv: N_face columns
    let content = std::fs::read_to_string(dir.path().join("surface_temperature.csv"))?;
    assert_eq!(content.lines().count(), 1 + steps_per_cycle);
    let header_cols = content.lines().next().unwrap().split(',').count();
    assert_eq!(header_cols, table.count());

    // subsurface_temperature.csv: one row per (saved step, recorded facet),
    // n_z depth columns
    let content = std::fs::read_to_string(dir.path().join("subsurface_temperature.csv"))?;
    assert_eq!(
        content.lines().count(),
        1 + steps_per_cycle * record_facets.len()
    );
    let header_cols = content.lines().next().unwrap().split(',').count();
    assert_eq!(header_cols, 2 + params.depth.n_z);

    // thermal_force.csv: header + one row per saved step
    let content = std::fs::read_to_string(dir.path().join("thermal_force.csv"))?;
    assert_eq!(content.lines().count(), 1 + steps_per_cycle);
    Ok(())
}

/// Hemispheric parameter split: the high-inertia hemisphere smooths its
/// diurnal curve (smaller amplitude, higher cycle mean) at equal latitude.
#[test]
fn hemispheric_split_changes_diurnal_curves() -> Result<()> {
    let (nodes, faces) = shapes::octahedron(300.0, None);
    let table = FacetTable::new(nodes, faces)?;
    let visibility = VisibilityGraph::build(&table);
    let n = table.count();

    // Northern facets: dark, conductive crust; southern: brighter, rockier
    let split = |north: f64, south: f64| -> PerFacet<f64> {
        PerFacet::Each(
            (0..n)
                .map(|f| if table.facet(f).center.z > 0.0 { north } else { south })
                .collect(),
        )
    };
    let material = SurfaceMaterial {
        bond_albedo: split(0.04, 0.10),
        thermal_albedo: PerFacet::Uniform(0.0),
        conductivity: split(0.1, 0.3),
        density: PerFacet::Uniform(1270.0),
        specific_heat: PerFacet::Uniform(600.0),
        emissivity: split(1.0, 0.9),
    };

    let period = 7.63262 * 3600.0;
    let steps_per_cycle = 160;
    let n_cycles = 6;
    let params = ThermalParams::new(
        material,
        DepthGrid { z_max: 0.6, n_z: 41 },
        TimeGrid {
            rotation_period: period,
            t_begin: 0.0,
            t_end: n_cycles as f64,
            dt: 1.0 / steps_per_cycle as f64,
        },
        n,
    )?;
    let ephemeris = Ephemeris::circular_equatorial(AU, period, steps_per_cycle, params.n_steps)?;

    let config = DriverConfig {
        save: Some((params.n_steps - steps_per_cycle)..params.n_steps),
        ..Default::default()
    };
    let driver = TpmDriver::new(&table, &visibility, &params, &ephemeris, config)?;
    let result = driver.run()?;

    // Octahedron facets all sit at the same |latitude|, so the hemispheres
    // are directly comparable facet by facet.
    let stats = |f: usize| -> (f64, f64) {
        let series: Vec<f64> = result.surface_temperature.iter().map(|row| row[f]).collect();
        let mean = series.iter().sum::<f64>() / series.len() as f64;
        let amplitude = series.iter().cloned().fold(f64::MIN, f64::max)
            - series.iter().cloned().fold(f64::MAX, f64::min);
        (mean, amplitude)
    };

    for f in 0..n {
        if table.facet(f).center.z <= 0.0 {
            continue;
        }
        // Mirror facet in the southern hemisphere (same x, y footprint)
        let mirror = (0..n)
            .find(|&g| {
                let a = table.facet(f).center;
                let b = table.facet(g).center;
                (a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9 && (a.z + b.z).abs() < 1e-9
            })
            .expect("octahedron is mirror-symmetric");

        let (mean_north, amp_north) = stats(f);
        let (mean_south, amp_south) = stats(mirror);
        assert!(
            amp_south < amp_north - 10.0,
            "facet {f}/{mirror}: amplitudes {amp_north:.1} vs {amp_south:.1}"
        );
        assert!(
            mean_south > mean_north + 2.0,
            "facet {f}/{mirror}: means {mean_north:.1} vs {mean_south:.1}"
        );
    }
    Ok(())
}

/// Self-shadowing toggle: no effect on a convex body, real effect on a
/// bi-lobed one.
#[test]
fn self_shadowing_matters_only_for_nonconvex_bodies() -> Result<()> {
    let run = |nodes: Vec<Point>, faces: Vec<[usize; 3]>, self_shadowing: bool| -> Result<Vec<f64>> {
        let table = FacetTable::new(nodes, faces)?;
        let visibility = VisibilityGraph::build(&table);
        let period = 3600.0;
        let steps_per_cycle = 24;
        let params = ThermalParams::new(
            basalt_like(0.0),
            DepthGrid { z_max: 0.1, n_z: 11 },
            TimeGrid {
                rotation_period: period,
                t_begin: 0.0,
                t_end: 1.0,
                dt: 1.0 / steps_per_cycle as f64,
            },
            table.count(),
        )?;
        let ephemeris =
            Ephemeris::circular_equatorial(AU, period, steps_per_cycle, params.n_steps)?;
        let config = DriverConfig {
            self_shadowing,
            self_heating: false,
            ..Default::default()
        };
        let driver = TpmDriver::new(&table, &visibility, &params, &ephemeris, config)?;
        Ok(driver.run()?.final_surface)
    };

    // Convex: the horizon test alone decides illumination, so the toggle
    // changes nothing at all.
    let (nodes, faces) = shapes::octahedron(100.0, None);
    let with = run(nodes.clone(), faces.clone(), true)?;
    let without = run(nodes, faces, false)?;
    assert_eq!(with, without);

    // Bi-lobed: the lobes shadow each other at grazing sun angles.
    let (nodes, faces) = shapes::contact_binary(100.0, 40.0);
    let with = run(nodes.clone(), faces.clone(), true)?;
    let without = run(nodes, faces, false)?;
    assert!(
        with.iter().zip(&without).any(|(a, b)| (a - b).abs() > 1.0),
        "mutual shadowing changed no facet"
    );
    Ok(())
}

/// Zero thermal inertia: a lit facet sits at instantaneous radiative
/// equilibrium; dark facets trip the lenient Newton path.
#[test]
fn zero_inertia_limit_gives_instantaneous_equilibrium() -> Result<()> {
    let (nodes, faces) = shapes::octahedron(10.0, None);
    let table = FacetTable::new(nodes, faces)?;
    let visibility = VisibilityGraph::build(&table);

    let bond_albedo = 0.1;
    let mut material = basalt_like(bond_albedo);
    material.conductivity = PerFacet::Uniform(0.0);
    let period = 3600.0;
    let params = ThermalParams::new(
        material,
        DepthGrid { z_max: 0.1, n_z: 11 },
        TimeGrid {
            rotation_period: period,
            t_begin: 0.0,
            t_end: 2.0 / 24.0,
            dt: 1.0 / 24.0,
        },
        table.count(),
    )?;
    assert_eq!(params.n_steps, 2);
    let ephemeris = Ephemeris::fixed(Vector::new(AU, 0.0, 0.0), 150.0, 2)?;

    // Dark facets relax towards 0 K without conduction; Newton cannot meet
    // its tolerance there, so the strict policy would abort.
    let config = DriverConfig {
        newton_policy: NewtonPolicy::Lenient,
        ..Default::default()
    };
    let driver = TpmDriver::new(&table, &visibility, &params, &ephemeris, config)?;
    let result = driver.run()?;
    assert!(!result.warnings.is_empty());

    for (f, &t) in result.final_surface.iter().enumerate() {
        let mu = table.facet(f).normal.dot(Vector::new(1.0, 0.0, 0.0));
        if mu > 0.0 {
            let expected =
                ((1.0 - bond_albedo) * SOLAR_CONSTANT * mu / SIGMA_SB).powf(0.25);
            assert!(
                (t - expected).abs() < 1e-6,
                "facet {f}: {t} K vs {expected} K"
            );
        } else {
            assert!(t > 0.0 && t < 10.0, "facet {f}: {t} K");
        }
    }
    Ok(())
}

/// A reloaded snapshot drives the simulation to bit-identical state.
#[test]
fn snapshot_reload_reproduces_dynamic_state() -> Result<()> {
    let (nodes, faces) = shapes::contact_binary(50.0, 20.0);
    let table = FacetTable::new(nodes, faces)?;
    let visibility = VisibilityGraph::build(&table);

    let dir = tempfile::tempdir()?;
    let path = dir.path().join("mesh.snapshot.json");
    write_snapshot(&path, &table, &visibility)?;
    let (table2, visibility2) = read_snapshot(&path)?;

    let period = 3600.0;
    let steps_per_cycle = 24;
    let params = ThermalParams::new(
        basalt_like(0.1),
        DepthGrid { z_max: 0.1, n_z: 11 },
        TimeGrid {
            rotation_period: period,
            t_begin: 0.0,
            t_end: 1.0 / steps_per_cycle as f64,
            dt: 1.0 / steps_per_cycle as f64,
        },
        table.count(),
    )?;
    let ephemeris = Ephemeris::circular_equatorial(AU, period, steps_per_cycle, 1)?;

    let one_step = |table: &FacetTable, visibility: &VisibilityGraph| -> Result<Vec<f64>> {
        let driver =
            TpmDriver::new(table, visibility, &params, &ephemeris, DriverConfig::default())?;
        Ok(driver.run()?.final_surface)
    };

    let original = one_step(&table, &visibility)?;
    let reloaded = one_step(&table2, &visibility2)?;
    assert_eq!(original, reloaded);
    Ok(())
}

/// Bounded temperatures: no facet ever exceeds the subsolar equilibrium
/// temperature of its orbit.
#[test]
fn temperatures_stay_within_physical_bounds() -> Result<()> {
    let (nodes, faces) = shapes::contact_binary(100.0, 100.0);
    let table = FacetTable::new(nodes, faces)?;
    let visibility = VisibilityGraph::build(&table);

    let period = 3600.0;
    let steps_per_cycle = 72;
    let params = ThermalParams::new(
        basalt_like(0.0),
        DepthGrid { z_max: 0.1, n_z: 11 },
        TimeGrid {
            rotation_period: period,
            t_begin: 0.0,
            t_end: 5.0,
            dt: 1.0 / steps_per_cycle as f64,
        },
        table.count(),
    )?;
    let ephemeris = Ephemeris::circular_equatorial(AU, period, steps_per_cycle, params.n_steps)?;

    let config = DriverConfig {
        save: Some(0..params.n_steps),
        initial_temperature: 150.0,
        ..Default::default()
    };
    let driver = TpmDriver::new(&table, &visibility, &params, &ephemeris, config)?;
    let result = driver.run()?;

    // Self-heating adds at most a modest margin above the subsolar
    // equilibrium at 1 au.
    let t_ref = (SOLAR_CONSTANT / SIGMA_SB).powf(0.25) * 1.1;
    for row in &result.surface_temperature {
        for &t in row {
            assert!(t > 0.0 && t < t_ref, "temperature {t} K out of bounds");
        }
    }
    Ok(())
}
