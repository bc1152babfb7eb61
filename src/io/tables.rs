//! CSV export of run results.
//!
//! Four tables, one writer each, all with a leading header row. Numeric
//! fields are written with Rust's shortest round-trippable `f64` formatting,
//! so no precision is lost on re-import.

use crate::sim::result::TpmResult;
use anyhow::{Context, Result};
use std::path::Path;

/// Per-step scalars: time, geometry of the Sun, mean temperature, recoil.
pub fn write_physical_quantities(path: &Path, result: &TpmResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;

    writer.write_record([
        "step",
        "time_s",
        "solar_distance_m",
        "subsolar_lon_deg",
        "subsolar_lat_deg",
        "mean_surface_t_k",
        "force_x_n",
        "force_y_n",
        "force_z_n",
        "torque_x_nm",
        "torque_y_nm",
        "torque_z_nm",
    ])?;
    for step in &result.steps {
        writer.write_record([
            step.step.to_string(),
            step.time_s.to_string(),
            step.solar_distance_m.to_string(),
            step.subsolar_lon_deg.to_string(),
            step.subsolar_lat_deg.to_string(),
            step.mean_surface_t.to_string(),
            step.recoil.force.dx.to_string(),
            step.recoil.force.dy.to_string(),
            step.recoil.force.dz.to_string(),
            step.recoil.torque.dx.to_string(),
            step.recoil.torque.dy.to_string(),
            step.recoil.torque.dz.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Surface temperatures: one row per saved step, one column per facet.
pub fn write_surface_temperature(path: &Path, result: &TpmResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;

    let n_face = result
        .surface_temperature
        .first()
        .map_or(0, |row| row.len());
    writer.write_record((0..n_face).map(|f| format!("facet_{f}")))?;
    for row in &result.surface_temperature {
        writer.write_record(row.iter().map(|t| t.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}

/// Depth profiles of the recorded facets: one row per (step, facet).
pub fn write_subsurface_temperature(path: &Path, result: &TpmResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;

    let n_z = result
        .depth_profiles
        .first()
        .map_or(0, |p| p.temperatures.len());
    let mut header = vec!["step".to_string(), "facet".to_string()];
    header.extend((0..n_z).map(|i| format!("z_{i}")));
    writer.write_record(&header)?;

    for profile in &result.depth_profiles {
        let mut record = vec![profile.step.to_string(), profile.facet.to_string()];
        record.extend(profile.temperatures.iter().map(|t| t.to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Force and torque components per saved step.
pub fn write_thermal_force(path: &Path, result: &TpmResult) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create file: {}", path.display()))?;

    writer.write_record([
        "step",
        "time_s",
        "force_x_n",
        "force_y_n",
        "force_z_n",
        "torque_x_nm",
        "torque_y_nm",
        "torque_z_nm",
    ])?;
    for step in &result.steps {
        writer.write_record([
            step.step.to_string(),
            step.time_s.to_string(),
            step.recoil.force.dx.to_string(),
            step.recoil.force.dy.to_string(),
            step.recoil.force.dz.to_string(),
            step.recoil.torque.dx.to_string(),
            step.recoil.torque.dy.to_string(),
            step.recoil.torque.dz.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes all four tables under their standard names into `dir`.
pub fn write_all(dir: &Path, result: &TpmResult) -> Result<()> {
    write_physical_quantities(&dir.join("physical_quantities.csv"), result)?;
    write_surface_temperature(&dir.join("surface_temperature.csv"), result)?;
    write_subsurface_temperature(&dir.join("subsurface_temperature.csv"), result)?;
    write_thermal_force(&dir.join("thermal_force.csv"), result)?;
    Ok(())
}
