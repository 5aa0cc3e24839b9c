//! Built-in application presets.
//!
//! Each preset fixes the medium, carrier, element count, steering angle and
//! geometry. Element pitch is half a wavelength in the preset's medium.

use beamwright_core::grid::GridParams;
use beamwright_core::types::{ArrayConfig, Medium};
use beamwright_geometry::{Geometry, SteeringLaw};

/// A named starting point for a job.
#[derive(Debug, Clone, Copy)]
pub struct Scenario {
    pub name: &'static str,
    pub description: &'static str,
    pub medium: Medium,
    /// Carrier frequency (Hz).
    pub frequency: f64,
    pub elements: usize,
    pub steering_deg: f64,
    pub geometry: Geometry,
    pub steering: SteeringLaw,
    /// Grid half-extent (m).
    pub extent: f64,
}

pub const SCENARIOS: &[Scenario] = &[
    Scenario {
        name: "5g",
        description: "28 GHz millimetre-wave beamforming, 16 elements",
        medium: Medium::FreeSpace,
        frequency: 28e9,
        elements: 16,
        steering_deg: 45.0,
        geometry: Geometry::Linear,
        steering: SteeringLaw::PlaneWave,
        extent: 0.5,
    },
    Scenario {
        name: "ultrasound",
        description: "2 MHz diagnostic probe in soft tissue, 32 elements",
        medium: Medium::SoftTissue,
        frequency: 2e6,
        elements: 32,
        steering_deg: 30.0,
        geometry: Geometry::Linear,
        steering: SteeringLaw::PlaneWave,
        extent: 0.05,
    },
    Scenario {
        name: "tumor-ablation",
        description: "1.5 MHz focused curved transducer in soft tissue, 24 elements",
        medium: Medium::SoftTissue,
        frequency: 1.5e6,
        elements: 24,
        steering_deg: 0.0,
        geometry: Geometry::Curved { arc_radius: 0.03 },
        steering: SteeringLaw::Focused { distance: 0.08 },
        extent: 0.1,
    },
];

impl Scenario {
    pub fn wavelength(&self) -> f64 {
        self.medium.speed() / self.frequency
    }

    pub fn array_config(&self) -> ArrayConfig {
        let spacing = self.wavelength() / 2.0;
        ArrayConfig {
            element_count: self.elements,
            frequency: self.frequency,
            element_spacing: spacing,
            steering_deg: self.steering_deg,
            geometry: self.geometry,
            speed: self.medium.speed(),
            steering_law: self.steering,
            receiver_count: self.elements,
            receiver_spacing: spacing,
        }
    }

    pub fn grid_params(&self) -> GridParams {
        GridParams {
            size_x: self.extent,
            size_y: self.extent,
            ..Default::default()
        }
    }
}

/// Look up a preset by name (case-insensitive).
pub fn find(name: &str) -> Option<&'static Scenario> {
    SCENARIOS.iter().find(|s| s.name.eq_ignore_ascii_case(name))
}

pub fn names() -> Vec<&'static str> {
    SCENARIOS.iter().map(|s| s.name).collect()
}
