//! Simulation runner: ties together grid, near field, and beam profile.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use beamwright_core::beam::{beam_profile, Beamwidth};
use beamwright_core::fields::{receiver_field, wave_field};
use beamwright_core::grid::{build_grid, GridParams, SimulationGrid};
use beamwright_core::types::{ArrayConfig, ArrayMode, BeamProfile, FieldMap};
use beamwright_geometry::ElementLayout;

use crate::config::ResolvedJob;

/// Results from a simulation run.
pub struct SimulationOutput {
    pub grid: SimulationGrid,
    pub field: FieldMap,
    pub layout: ElementLayout,
    pub profile: BeamProfile,
}

/// Headline numbers of a beam profile.
#[derive(Debug, Serialize)]
pub struct BeamSummary {
    pub peak_deg: Option<f64>,
    pub half_power: Option<Beamwidth>,
    pub peak_sidelobe_db: Option<f64>,
}

impl BeamSummary {
    pub fn from_profile(profile: &BeamProfile) -> Self {
        Self {
            peak_deg: profile.peak().map(|(angle, _)| angle),
            half_power: profile.half_power_beamwidth(),
            peak_sidelobe_db: profile.peak_sidelobe_db(),
        }
    }
}

/// Check a resolved job without synthesising anything.
pub fn validate_job(job: &ResolvedJob) -> Result<SimulationGrid> {
    job.array.validate().context("Invalid array configuration")?;
    let grid = build_grid(&job.array, &grid_params(job)?).context("Invalid grid")?;
    Ok(grid)
}

fn grid_params(job: &ResolvedJob) -> Result<GridParams> {
    if job.auto_extent {
        let params = GridParams::fraunhofer(&job.array, job.grid.max_size, job.grid.max_points)?;
        println!(
            "Grid extent from Fraunhofer distance: ±{} m",
            params.size_x
        );
        Ok(params)
    } else {
        Ok(job.grid)
    }
}

/// Run a full simulation from a resolved job.
pub fn run_simulation(job: &ResolvedJob) -> Result<SimulationOutput> {
    let config = &job.array;
    let carrier = config.carrier()?;
    println!(
        "  {} array: N={}, f={:.4e} Hz, λ={:.4e} m, θ={}°, {} geometry",
        job.mode.name(),
        config.expected_count(job.mode),
        carrier.frequency,
        carrier.wavelength(),
        config.steering_deg,
        config.geometry.name()
    );

    let grid = validate_job(job)?;
    println!("  Grid: {}x{} points, dx={:.3e} m", grid.nx(), grid.ny(), grid.dx);

    let (field, layout) = match job.mode {
        ArrayMode::Emitter => wave_field(config, &grid, job.time)?,
        ArrayMode::Receiver => {
            let layout = config.receiver_layout()?;
            let field = receiver_field(config, &grid, layout.positions(), job.time)?;
            (field, layout)
        }
    };

    let profile = beam_profile(config, &layout, job.mode, &job.beam)
        .context("Beam profile computation failed")?;

    let summary = BeamSummary::from_profile(&profile);
    if let Some(peak) = summary.peak_deg {
        println!("  Beam peak: {:.2}°", peak);
    }
    if let Some(bw) = summary.half_power {
        println!(
            "  Half-power beamwidth: {:.2}° ({:.2}° to {:.2}°)",
            bw.width_deg(),
            bw.lower_deg,
            bw.upper_deg
        );
    }
    match summary.peak_sidelobe_db {
        Some(psl) => println!("  Peak sidelobe: {:.2} dB", psl),
        None => println!("  Peak sidelobe: none in visible region"),
    }

    Ok(SimulationOutput { grid, field, layout, profile })
}

fn create_file(path: &Path) -> Result<std::io::BufWriter<std::fs::File>> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(std::io::BufWriter::new(file))
}

fn write_header(file: &mut impl Write, title: &str, config: &ArrayConfig, mode: ArrayMode) -> Result<()> {
    writeln!(file, "# Beamwright — {}", title)?;
    writeln!(file, "# Version: {}", env!("CARGO_PKG_VERSION"))?;
    writeln!(
        file,
        "# mode={}, N={}, f={} Hz, c={} m/s, spacing={} m, steering={} deg, geometry={}",
        mode.name(),
        config.expected_count(mode),
        config.frequency,
        config.speed,
        config.element_spacing,
        config.steering_deg,
        config.geometry.name()
    )?;
    writeln!(file, "#")?;
    Ok(())
}

/// Write a near-field map to a CSV file, one row per grid point.
pub fn write_field_csv(
    field: &FieldMap,
    grid: &SimulationGrid,
    path: &Path,
    config: &ArrayConfig,
    mode: ArrayMode,
) -> Result<()> {
    let mut file = create_file(path)?;
    write_header(&mut file, "Near-Field Map", config, mode)?;
    writeln!(file, "# Grid: {}x{}, t={:e} s", field.nx(), field.ny(), field.time)?;
    writeln!(
        file,
        "# Extent: x=[{:.4}, {:.4}] y=[{:.4}, {:.4}] m",
        field.extent[0], field.extent[1], field.extent[2], field.extent[3],
    )?;
    writeln!(file, "x_m,y_m,amplitude")?;

    for ((iy, ix), value) in field.amplitude.indexed_iter() {
        writeln!(file, "{:.6e},{:.6e},{:.6e}", grid.x[ix], grid.y[iy], value)?;
    }
    file.flush()?;

    println!("Near-field map written to: {}", path.display());
    Ok(())
}

/// Write a beam profile to a CSV file.
pub fn write_beam_csv(
    profile: &BeamProfile,
    path: &Path,
    config: &ArrayConfig,
    mode: ArrayMode,
) -> Result<()> {
    let mut file = create_file(path)?;
    write_header(&mut file, "Beam Profile", config, mode)?;
    writeln!(file, "angle_deg,intensity_db")?;
    for (angle, level) in profile.angles_deg.iter().zip(&profile.intensity_db) {
        writeln!(file, "{:.4},{:.6}", angle, level)?;
    }
    file.flush()?;

    println!("Beam profile written to: {}", path.display());
    Ok(())
}

/// Write element positions and steering phases to a CSV file.
pub fn write_elements_csv(layout: &ElementLayout, path: &Path) -> Result<()> {
    let mut file = create_file(path)?;
    writeln!(file, "index,x_m,y_m,phase_rad")?;
    for (i, (pos, phase)) in layout.iter().enumerate() {
        writeln!(file, "{},{:.6e},{:.6e},{:.6}", i, pos[0], pos[1], phase)?;
    }
    file.flush()?;

    println!("Element layout written to: {}", path.display());
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    mode: ArrayMode,
    config: &'a ArrayConfig,
    summary: BeamSummary,
    elements: &'a ElementLayout,
    beam_profile: &'a BeamProfile,
}

/// Write configuration, beam summary and beam profile to a JSON file.
pub fn write_json(output: &SimulationOutput, job: &ResolvedJob, path: &Path) -> Result<()> {
    let report = JsonReport {
        mode: job.mode,
        config: &job.array,
        summary: BeamSummary::from_profile(&output.profile),
        elements: &output.layout,
        beam_profile: &output.profile,
    };
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| anyhow::anyhow!("JSON serialisation error: {}", e))?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, json)?;

    println!("Summary (JSON) written to: {}", path.display());
    Ok(())
}
