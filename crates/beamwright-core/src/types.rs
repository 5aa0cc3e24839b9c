//! Core types shared across the Beamwright framework.
//!
//! This module defines the value objects passed through the simulation
//! pipeline: the carrier and propagation medium, the array configuration,
//! and the containers for near-field maps and beam profiles. Everything here
//! is recomputed from scratch on each parameter change.

use std::f64::consts::PI;

use beamwright_geometry::{ElementLayout, Geometry, SteeringLaw};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::error::{SimulationError, SimulationResult};

/// Speed of sound in air at 20 °C (m/s).
pub const SPEED_OF_SOUND_AIR: f64 = 343.0;
/// Speed of sound in fresh water (m/s).
pub const SPEED_OF_SOUND_WATER: f64 = 1480.0;
/// Conventional speed of sound in soft tissue used by ultrasound scanners (m/s).
pub const SPEED_OF_SOUND_TISSUE: f64 = 1540.0;
/// Speed of light in vacuum (m/s).
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// Propagation medium, used to pick the wave speed for a scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Medium {
    Air,
    Water,
    SoftTissue,
    FreeSpace,
}

impl Medium {
    /// Propagation speed in this medium (m/s).
    pub fn speed(&self) -> f64 {
        match self {
            Medium::Air => SPEED_OF_SOUND_AIR,
            Medium::Water => SPEED_OF_SOUND_WATER,
            Medium::SoftTissue => SPEED_OF_SOUND_TISSUE,
            Medium::FreeSpace => SPEED_OF_LIGHT,
        }
    }
}

/// A monochromatic carrier travelling at a fixed speed.
///
/// Construction validates that the wavelength $\lambda = c/f$ is finite and
/// positive, so the derived quantities are always usable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Carrier {
    /// Frequency (Hz).
    pub frequency: f64,
    /// Propagation speed (m/s).
    pub speed: f64,
}

impl Carrier {
    pub fn new(frequency: f64, speed: f64) -> SimulationResult<Self> {
        if !(frequency.is_finite() && frequency > 0.0) {
            return Err(SimulationError::domain(format!(
                "frequency must be positive and finite, got {} Hz",
                frequency
            )));
        }
        if !(speed.is_finite() && speed > 0.0) {
            return Err(SimulationError::domain(format!(
                "propagation speed must be positive and finite, got {} m/s",
                speed
            )));
        }
        let carrier = Self { frequency, speed };
        let wavelength = carrier.wavelength();
        if !(wavelength.is_finite() && wavelength > 0.0) {
            return Err(SimulationError::domain(format!(
                "wavelength {} m is not representable for f={} Hz, c={} m/s",
                wavelength, frequency, speed
            )));
        }
        Ok(carrier)
    }

    /// Wavelength $\lambda = c / f$ (m).
    pub fn wavelength(&self) -> f64 {
        self.speed / self.frequency
    }

    /// Wave number $k = 2\pi / \lambda$ (rad/m).
    pub fn wavenumber(&self) -> f64 {
        2.0 * PI / self.wavelength()
    }

    /// Angular frequency $\omega = 2\pi f$ (rad/s).
    pub fn angular_frequency(&self) -> f64 {
        2.0 * PI * self.frequency
    }
}

/// Whether the array transmits or receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArrayMode {
    /// Transmit: the configured emitters radiate.
    #[default]
    Emitter,
    /// Receive beamforming over the configured receiver array.
    Receiver,
}

impl ArrayMode {
    pub fn name(&self) -> &'static str {
        match self {
            ArrayMode::Emitter => "emitter",
            ArrayMode::Receiver => "receiver",
        }
    }
}

/// Parameters describing a phased array and its carrier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrayConfig {
    /// Number of emitting elements.
    pub element_count: usize,
    /// Carrier frequency (Hz).
    pub frequency: f64,
    /// Element pitch for linear arrays (m).
    pub element_spacing: f64,
    /// Beam direction in degrees, measured from +y towards +x.
    pub steering_deg: f64,
    /// Element arrangement.
    #[serde(default)]
    pub geometry: Geometry,
    /// Propagation speed (m/s).
    pub speed: f64,
    /// How steering phases are derived.
    #[serde(default)]
    pub steering_law: SteeringLaw,
    /// Number of receiving elements.
    pub receiver_count: usize,
    /// Receiver pitch for linear arrays (m).
    pub receiver_spacing: f64,
}

impl Default for ArrayConfig {
    fn default() -> Self {
        Self {
            element_count: 8,
            frequency: 2000.0,
            element_spacing: 0.042875,
            steering_deg: 30.0,
            geometry: Geometry::Linear,
            speed: SPEED_OF_SOUND_AIR,
            steering_law: SteeringLaw::PlaneWave,
            receiver_count: 8,
            receiver_spacing: 0.042875,
        }
    }
}

impl ArrayConfig {
    /// The validated carrier for this configuration.
    pub fn carrier(&self) -> SimulationResult<Carrier> {
        Carrier::new(self.frequency, self.speed)
    }

    /// Wavelength $\lambda = c / f$ (m).
    pub fn wavelength(&self) -> SimulationResult<f64> {
        Ok(self.carrier()?.wavelength())
    }

    /// Check every parameter without synthesising anything.
    pub fn validate(&self) -> SimulationResult<()> {
        self.emitter_layout()?;
        self.receiver_layout()?;
        Ok(())
    }

    /// Steered emitter positions and phases.
    pub fn emitter_layout(&self) -> SimulationResult<ElementLayout> {
        let wavelength = self.wavelength()?;
        Ok(ElementLayout::steered(
            &self.geometry,
            self.element_count,
            self.element_spacing,
            &self.steering_law,
            self.steering_deg,
            wavelength,
        )?)
    }

    /// Steered receiver positions and phases.
    ///
    /// The receive array shares the emitter's geometry and steering law.
    pub fn receiver_layout(&self) -> SimulationResult<ElementLayout> {
        let wavelength = self.wavelength()?;
        Ok(ElementLayout::steered(
            &self.geometry,
            self.receiver_count,
            self.receiver_spacing,
            &self.steering_law,
            self.steering_deg,
            wavelength,
        )?)
    }

    /// Layout for the given mode.
    pub fn layout(&self, mode: ArrayMode) -> SimulationResult<ElementLayout> {
        match mode {
            ArrayMode::Emitter => self.emitter_layout(),
            ArrayMode::Receiver => self.receiver_layout(),
        }
    }

    /// Number of elements the given mode is expected to have.
    pub fn expected_count(&self, mode: ArrayMode) -> usize {
        match mode {
            ArrayMode::Emitter => self.element_count,
            ArrayMode::Receiver => self.receiver_count,
        }
    }
}

/// Instantaneous superposed wave amplitude on a simulation grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMap {
    /// Amplitude values, shape `(ny, nx)`: row `iy` holds the samples at
    /// `y[iy]`. Not normalised; with N unit sources values lie in `[-N, N]`.
    pub amplitude: Array2<f64>,
    /// Spatial extent: `[x_min, x_max, y_min, y_max]` in metres.
    pub extent: [f64; 4],
    /// Time instant of the snapshot (s).
    pub time: f64,
}

impl FieldMap {
    pub fn nx(&self) -> usize {
        self.amplitude.ncols()
    }

    pub fn ny(&self) -> usize {
        self.amplitude.nrows()
    }

    /// Smallest and largest amplitude in the map.
    pub fn range(&self) -> (f64, f64) {
        self.amplitude
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            })
    }
}

/// Far-field intensity as a function of observation angle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BeamProfile {
    /// Observation angles (degrees), ascending.
    pub angles_deg: Vec<f64>,
    /// Normalised intensity (dB), peak at exactly 0 dB.
    pub intensity_db: Vec<f64>,
}
