//! Far-field beam profiles (array factor in dB).
//!
//! For an observation direction $\hat{\mathbf{u}}(\theta) = (\sin\theta, \cos\theta)$
//! the transmit array factor is
//!
//! $$
//! AF_\text{tx}(\theta) = \sum_{n} w_n \exp\bigl(j(\phi_n - k\,\mathbf{p}_n \cdot \hat{\mathbf{u}})\bigr)
//! $$
//!
//! and the receive array factor applies the conjugate phases to the arriving
//! plane wave, $AF_\text{rx}(\theta) = \sum_m w_m \exp\bigl(j(k\,\mathbf{p}_m \cdot
//! \hat{\mathbf{u}} - \phi_m)\bigr)$. For a linear array with plane-wave
//! steering both reduce to the uniform linear array factor
//! $\sum_n \exp(j k d n (\sin\theta_s - \sin\theta))$, which peaks at
//! $\theta = \theta_s$. The phase difference uses $\sin\theta_s - \sin\theta$
//! rather than $\sin(\theta - \theta_s)$ so the profile matches the phase law
//! driving the near field; both forms peak at $\theta_s$. With plane-wave
//! steering on an arc the phases carry the full projection
//! $k\,\mathbf{p}_n \cdot \hat{\mathbf{u}}(\theta_s)$, so curved arrays
//! also peak at $\theta_s$.
//!
//! The magnitude is normalised to its peak, clipped at $10^{-10}$ (−200 dB)
//! and converted with $20\log_{10}$, so the peak is exactly 0 dB.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use beamwright_geometry::steering::direction;
use beamwright_geometry::ElementLayout;

use crate::error::{SimulationError, SimulationResult};
use crate::types::{ArrayConfig, ArrayMode, BeamProfile};
use crate::window::Window;

/// Number of observation angles in the default sweep.
pub const DEFAULT_SWEEP_POINTS: usize = 500;

/// Smallest normalised magnitude kept before the dB conversion.
pub const MAGNITUDE_FLOOR: f64 = 1e-10;

/// Lowest value a profile can contain (dB).
pub const DB_FLOOR: f64 = -200.0;

/// Options for beam-profile synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BeamOptions {
    /// Number of angles sampled uniformly over [-90°, 90°].
    #[serde(default = "default_sweep_points")]
    pub sweep_points: usize,
    /// Amplitude taper applied across the aperture.
    #[serde(default)]
    pub window: Window,
}

fn default_sweep_points() -> usize {
    DEFAULT_SWEEP_POINTS
}

impl Default for BeamOptions {
    fn default() -> Self {
        Self {
            sweep_points: DEFAULT_SWEEP_POINTS,
            window: Window::Uniform,
        }
    }
}

/// Observation angles: `points` samples from -90° to 90° inclusive.
pub fn sweep_angles(points: usize) -> Vec<f64> {
    match points {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => {
            let step = 180.0 / (points - 1) as f64;
            (0..points).map(|i| -90.0 + i as f64 * step).collect()
        }
    }
}

/// Complex array factor at a single observation angle.
///
/// # Arguments
/// * `layout` - Element positions and steering phases.
/// * `weights` - Amplitude weight per element (same length as `layout`).
/// * `k` - Wave number (rad/m).
/// * `mode` - Transmit or receive phase convention.
/// * `theta_deg` - Observation angle, measured from +y towards +x.
pub fn array_factor(
    layout: &ElementLayout,
    weights: &[f64],
    k: f64,
    mode: ArrayMode,
    theta_deg: f64,
) -> Complex64 {
    let u = direction(theta_deg);
    layout
        .iter()
        .zip(weights)
        .map(|((pos, phase), &w)| {
            let path = k * (pos[0] * u[0] + pos[1] * u[1]);
            let arg = match mode {
                ArrayMode::Emitter => phase - path,
                ArrayMode::Receiver => path - phase,
            };
            Complex64::from_polar(w, arg)
        })
        .sum()
}

/// Compute the normalised beam profile of `layout`.
///
/// `mode` selects the phase convention and the element count the layout is
/// checked against (`element_count` for emitters, `receiver_count` for
/// receivers).
///
/// # Errors
/// - [`SimulationError::Configuration`] if the layout size does not match
///   the configuration for `mode`.
/// - [`SimulationError::Domain`] for an invalid carrier, fewer than two sweep
///   points, or an array factor that vanishes at every angle.
pub fn beam_profile(
    config: &ArrayConfig,
    layout: &ElementLayout,
    mode: ArrayMode,
    options: &BeamOptions,
) -> SimulationResult<BeamProfile> {
    let expected = config.expected_count(mode);
    if layout.len() != expected {
        return Err(SimulationError::Configuration {
            what: "array elements",
            expected,
            found: layout.len(),
        });
    }
    if options.sweep_points < 2 {
        return Err(SimulationError::domain(format!(
            "beam sweep needs at least 2 angles, got {}",
            options.sweep_points
        )));
    }

    let k = config.carrier()?.wavenumber();
    let weights = options.window.weights(layout.len());
    let angles_deg = sweep_angles(options.sweep_points);

    let magnitudes: Vec<f64> = angles_deg
        .iter()
        .map(|&theta| array_factor(layout, &weights, k, mode, theta).norm())
        .collect();

    let peak = magnitudes.iter().cloned().fold(0.0_f64, f64::max);
    if !(peak.is_finite() && peak > 0.0) {
        return Err(SimulationError::domain(format!(
            "array factor vanishes over the sweep (peak magnitude {:e})",
            peak
        )));
    }

    let intensity_db = magnitudes
        .iter()
        .map(|&m| 20.0 * (m / peak).clamp(MAGNITUDE_FLOOR, 1.0).log10())
        .collect();

    let profile = BeamProfile { angles_deg, intensity_db };
    if let Some((angle, _)) = profile.peak() {
        log::debug!(
            "Beam profile ({}, {:?} window): N={}, θ_steer={}°, peak at {:.2}°",
            mode.name(),
            options.window,
            layout.len(),
            config.steering_deg,
            angle
        );
    }
    Ok(profile)
}

/// Build the layout for `mode` from the configuration and profile it.
pub fn beam_profile_for(
    config: &ArrayConfig,
    mode: ArrayMode,
    options: &BeamOptions,
) -> SimulationResult<BeamProfile> {
    let layout = config.layout(mode)?;
    beam_profile(config, &layout, mode, options)
}

/// Angular bounds of the half-power (−3 dB) region around the main lobe.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Beamwidth {
    /// Lower boundary angle (degrees).
    pub lower_deg: f64,
    /// Upper boundary angle (degrees).
    pub upper_deg: f64,
}

impl Beamwidth {
    pub fn width_deg(&self) -> f64 {
        self.upper_deg - self.lower_deg
    }
}

impl BeamProfile {
    pub fn len(&self) -> usize {
        self.angles_deg.len()
    }

    pub fn is_empty(&self) -> bool {
        self.angles_deg.is_empty()
    }

    /// Index of the first sample holding the maximum level.
    fn peak_index(&self) -> Option<usize> {
        let mut best: Option<usize> = None;
        for (i, &v) in self.intensity_db.iter().enumerate() {
            match best {
                Some(b) if self.intensity_db[b] >= v => {}
                _ => best = Some(i),
            }
        }
        best
    }

    /// Angle and level of the main-lobe peak.
    pub fn peak(&self) -> Option<(f64, f64)> {
        self.peak_index()
            .map(|i| (self.angles_deg[i], self.intensity_db[i]))
    }

    /// Boundary angles of the contiguous region around the peak whose level
    /// is at least 3 dB below the peak.
    ///
    /// Bounds are sample angles, so the resolution is the sweep step. If the
    /// main lobe reaches the end of the sweep the bound is the sweep edge.
    pub fn half_power_beamwidth(&self) -> Option<Beamwidth> {
        let peak = self.peak_index()?;
        let threshold = self.intensity_db[peak] - 3.0;
        let db = &self.intensity_db;

        let mut lower = peak;
        while lower > 0 && db[lower - 1] >= threshold {
            lower -= 1;
        }
        let mut upper = peak;
        while upper + 1 < db.len() && db[upper + 1] >= threshold {
            upper += 1;
        }

        Some(Beamwidth {
            lower_deg: self.angles_deg[lower],
            upper_deg: self.angles_deg[upper],
        })
    }

    /// Highest level outside the main lobe (dB), where the main lobe extends
    /// from the peak down to the first local minimum on either side.
    ///
    /// Returns `None` if the main lobe covers the whole sweep.
    pub fn peak_sidelobe_db(&self) -> Option<f64> {
        let peak = self.peak_index()?;
        let db = &self.intensity_db;

        let mut left = peak;
        while left > 0 && db[left - 1] <= db[left] {
            left -= 1;
        }
        let mut right = peak;
        while right + 1 < db.len() && db[right + 1] <= db[right] {
            right += 1;
        }

        db[..left]
            .iter()
            .chain(&db[right + 1..])
            .cloned()
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |a| a.max(v))))
    }
}
