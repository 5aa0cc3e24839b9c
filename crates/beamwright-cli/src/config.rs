//! TOML configuration deserialisation for simulation jobs.
//!
//! A job names an optional preset via `scenario`; every explicit field in
//! `[array]`, `[grid]` and `[beam]` overrides the preset value.

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use beamwright_core::beam::BeamOptions;
use beamwright_core::grid::GridParams;
use beamwright_core::types::{ArrayConfig, ArrayMode, Medium};
use beamwright_core::window::Window;
use beamwright_geometry::{Geometry, SteeringLaw};

use crate::scenarios::{self, Scenario};

/// Top-level job configuration.
#[derive(Debug, Default, Deserialize)]
pub struct JobConfig {
    /// Preset to start from (see `beamwright-cli scenarios`).
    pub scenario: Option<String>,
    /// Snapshot time for the near-field map (s).
    #[serde(default)]
    pub time: f64,
    #[serde(default)]
    pub array: ArraySection,
    #[serde(default)]
    pub grid: GridSection,
    #[serde(default)]
    pub beam: BeamSection,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Array parameters from TOML. Unset fields fall back to the preset.
#[derive(Debug, Default, Deserialize)]
pub struct ArraySection {
    pub elements: Option<usize>,
    /// Carrier frequency in Hz.
    pub frequency: Option<f64>,
    /// Element pitch in m.
    pub spacing: Option<f64>,
    pub steering_deg: Option<f64>,
    /// Named propagation medium; ignored if `speed` is set.
    pub medium: Option<Medium>,
    /// Explicit propagation speed in m/s.
    pub speed: Option<f64>,
    /// "emitter" (default) or "receiver".
    pub mode: Option<ArrayMode>,
    /// Receiver count, defaults to `elements`.
    pub receivers: Option<usize>,
    /// Receiver pitch in m, defaults to `spacing`.
    pub receiver_spacing: Option<f64>,
    pub geometry: Option<Geometry>,
    pub steering: Option<SteeringLaw>,
}

/// Grid parameters from TOML.
#[derive(Debug, Default, Deserialize)]
pub struct GridSection {
    /// Half-width along x in m.
    pub size_x: Option<f64>,
    /// Half-height along y in m.
    pub size_y: Option<f64>,
    pub max_size: Option<f64>,
    pub max_points: Option<usize>,
    /// Size the grid from the Fraunhofer distance instead of `size_x`/`size_y`.
    #[serde(default)]
    pub auto_extent: bool,
}

/// Beam-profile parameters from TOML.
#[derive(Debug, Default, Deserialize)]
pub struct BeamSection {
    pub sweep_points: Option<usize>,
    pub window: Option<Window>,
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save the near-field map as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_field: bool,
    /// Whether to save the beam profile as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_beam: bool,
    /// Whether to save element positions and phases (default: false).
    #[serde(default)]
    pub save_elements: bool,
    /// Whether to also save a JSON summary with the beam profile (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_field: true,
            save_beam: true,
            save_elements: false,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}
fn default_true() -> bool {
    true
}

/// A job with presets and defaults applied.
#[derive(Debug, Clone)]
pub struct ResolvedJob {
    pub array: ArrayConfig,
    pub mode: ArrayMode,
    pub grid: GridParams,
    pub auto_extent: bool,
    pub beam: BeamOptions,
    pub time: f64,
}

impl JobConfig {
    /// Merge the preset (if any) with the explicit fields.
    pub fn resolve(&self) -> Result<ResolvedJob> {
        let preset: Option<&Scenario> = match &self.scenario {
            Some(name) => Some(scenarios::find(name).with_context(|| {
                format!(
                    "Unknown scenario '{}'. Valid names: {}",
                    name,
                    scenarios::names().join(", ")
                )
            })?),
            None => None,
        };

        let mut array = preset.map(Scenario::array_config).unwrap_or_default();
        let mut grid = preset.map(Scenario::grid_params).unwrap_or_default();

        let a = &self.array;
        if let Some(n) = a.elements {
            array.element_count = n;
            array.receiver_count = n;
        }
        if let Some(f) = a.frequency {
            array.frequency = f;
        }
        if let Some(d) = a.spacing {
            array.element_spacing = d;
            array.receiver_spacing = d;
        }
        if let Some(theta) = a.steering_deg {
            array.steering_deg = theta;
        }
        match (a.speed, a.medium) {
            (Some(c), _) => array.speed = c,
            (None, Some(medium)) => array.speed = medium.speed(),
            (None, None) => {}
        }
        if let Some(m) = a.receivers {
            array.receiver_count = m;
        }
        if let Some(d) = a.receiver_spacing {
            array.receiver_spacing = d;
        }
        if let Some(geometry) = a.geometry {
            array.geometry = geometry;
        }
        if let Some(law) = a.steering {
            array.steering_law = law;
        }

        let g = &self.grid;
        if let Some(s) = g.size_x {
            grid.size_x = s;
        }
        if let Some(s) = g.size_y {
            grid.size_y = s;
        }
        if let Some(s) = g.max_size {
            grid.max_size = s;
        }
        if let Some(p) = g.max_points {
            grid.max_points = p;
        }

        let mut beam = BeamOptions::default();
        if let Some(points) = self.beam.sweep_points {
            beam.sweep_points = points;
        }
        if let Some(window) = self.beam.window {
            beam.window = window;
        }

        let mut job = ResolvedJob {
            array,
            mode: a.mode.unwrap_or_default(),
            grid,
            auto_extent: g.auto_extent,
            beam,
            time: 0.0,
        };
        job.set_time(self.time)?;
        Ok(job)
    }
}

impl ResolvedJob {
    /// Set the near-field snapshot time, rejecting NaN and infinities.
    pub fn set_time(&mut self, t: f64) -> Result<()> {
        if !t.is_finite() {
            bail!("time must be finite, got {}", t);
        }
        self.time = t;
        Ok(())
    }
}

/// Parse a TOML job configuration from a string.
pub fn parse_config(content: &str) -> Result<JobConfig> {
    let config: JobConfig = toml::from_str(content)?;
    Ok(config)
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> Result<JobConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Failed to parse {}", path.display()))
}
