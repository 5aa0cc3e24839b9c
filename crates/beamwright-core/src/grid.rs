//! Spatial sampling grid for near-field maps.
//!
//! The grid spacing resolves roughly ten samples per wavelength,
//! $\Delta x_0 = \lambda / 10$, which is enough to draw interference fringes
//! without aliasing. The spacing is then coarsened so that neither axis
//! exceeds `max_points` samples per unit of half-extent:
//!
//! $$\Delta x = \max\!\left(\frac{\lambda}{10},\ \frac{\max(s_x, s_y)}{N_\text{max}}\right)$$
//!
//! Half-extents are clamped to $[2\Delta x, s_\text{max}]$, and axes are
//! sampled half-open, `start + i·Δx` for `start + i·Δx < stop`.

use ndarray::{Array1, Array2};
use serde::{Deserialize, Serialize};

use beamwright_geometry::Geometry;

use crate::error::{SimulationError, SimulationResult};
use crate::types::ArrayConfig;

/// Samples per wavelength at the nominal spacing.
pub const SAMPLES_PER_WAVELENGTH: f64 = 10.0;

/// Requested extent and resolution limits for a grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridParams {
    /// Requested half-width along x (m).
    pub size_x: f64,
    /// Requested half-height along y (m).
    pub size_y: f64,
    /// Absolute cap on either half-extent (m).
    pub max_size: f64,
    /// Caps the number of samples along the longer half-extent.
    pub max_points: usize,
}

impl Default for GridParams {
    fn default() -> Self {
        Self {
            size_x: 2.0,
            size_y: 2.0,
            max_size: 100.0,
            max_points: 400,
        }
    }
}

impl GridParams {
    /// Size the grid from the array's Fraunhofer distance.
    ///
    /// Half-extent is $\lceil 8 L^2 / \lambda \rceil$ capped at `max_size`,
    /// where $L = (N-1)d$ is the aperture length: four times the far-field
    /// boundary $2L^2/\lambda$, so the map shows the transition from the
    /// near-field interference pattern into the steered beam.
    pub fn fraunhofer(
        config: &ArrayConfig,
        max_size: f64,
        max_points: usize,
    ) -> SimulationResult<Self> {
        let wavelength = config.wavelength()?;
        let aperture = config.element_count.saturating_sub(1) as f64 * config.element_spacing;
        let size = (2.0 * aperture * aperture / wavelength * 4.0)
            .ceil()
            .min(max_size);
        Ok(Self {
            size_x: size,
            size_y: size,
            max_size,
            max_points,
        })
    }
}

/// A rectangular lattice of sample points in the x-y plane.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationGrid {
    /// Sample positions along x (m), ascending.
    pub x: Array1<f64>,
    /// Sample positions along y (m), ascending.
    pub y: Array1<f64>,
    /// Spacing between adjacent samples (m).
    pub dx: f64,
    /// Carrier wavelength the grid was derived from (m).
    pub wavelength: f64,
}

impl SimulationGrid {
    pub fn nx(&self) -> usize {
        self.x.len()
    }

    pub fn ny(&self) -> usize {
        self.y.len()
    }

    /// Shape of the field arrays on this grid, `(ny, nx)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.ny(), self.nx())
    }

    /// Total number of sample points.
    pub fn len(&self) -> usize {
        self.nx() * self.ny()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Sampled extent `[x_min, x_max, y_min, y_max]` (m).
    pub fn extent(&self) -> [f64; 4] {
        let first_last = |a: &Array1<f64>| match (a.first(), a.last()) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => (0.0, 0.0),
        };
        let (x_min, x_max) = first_last(&self.x);
        let (y_min, y_max) = first_last(&self.y);
        [x_min, x_max, y_min, y_max]
    }

    /// Full coordinate arrays `(X, Y)`, each of shape `(ny, nx)`.
    pub fn meshgrid(&self) -> (Array2<f64>, Array2<f64>) {
        let shape = self.shape();
        let xx = Array2::from_shape_fn(shape, |(_, ix)| self.x[ix]);
        let yy = Array2::from_shape_fn(shape, |(iy, _)| self.y[iy]);
        (xx, yy)
    }
}

/// Build the sampling grid for an array configuration.
///
/// # Errors
/// [`SimulationError::Domain`] if the carrier is invalid, if the limits are
/// not positive, or if either axis ends up with no samples.
pub fn build_grid(config: &ArrayConfig, params: &GridParams) -> SimulationResult<SimulationGrid> {
    let wavelength = config.wavelength()?;

    if params.max_points == 0 {
        return Err(SimulationError::domain("max_points must be at least 1"));
    }
    for (name, value) in [
        ("size_x", params.size_x),
        ("size_y", params.size_y),
        ("max_size", params.max_size),
    ] {
        if !(value.is_finite() && value >= 0.0) {
            return Err(SimulationError::domain(format!(
                "{} must be finite and non-negative, got {}",
                name, value
            )));
        }
    }

    let dx_nominal = wavelength / SAMPLES_PER_WAVELENGTH;
    let dx_cap = params.size_x.max(params.size_y) / params.max_points as f64;
    let dx = dx_nominal.max(dx_cap);

    let size_x = clamp_half_extent(params.size_x, dx, params.max_size);
    let size_y = clamp_half_extent(params.size_y, dx, params.max_size);

    let x = arange(-size_x, size_x, dx);
    let y = match config.geometry {
        Geometry::Curved { .. } => arange(-size_y, size_y, dx),
        Geometry::Linear => arange(0.0, size_y, dx),
    };

    if x.is_empty() || y.is_empty() {
        return Err(SimulationError::domain(format!(
            "invalid grid: {}x{} samples (dx={:.3e} m, half-extents {:.3e} x {:.3e} m)",
            x.len(),
            y.len(),
            dx,
            size_x,
            size_y
        )));
    }

    log::debug!(
        "Grid: {}x{} points, dx={:.4e} m, λ={:.4e} m, extent ±{:.3} x {:.3} m ({})",
        x.len(),
        y.len(),
        dx,
        wavelength,
        size_x,
        size_y,
        config.geometry.name()
    );

    Ok(SimulationGrid { x, y, dx, wavelength })
}

/// Clamp a half-extent to `[2·dx, max_size]`.
///
/// The lower bound wins if the two conflict, so an axis always has room for
/// two samples.
fn clamp_half_extent(size: f64, dx: f64, max_size: f64) -> f64 {
    if size > max_size {
        log::warn!("Grid half-extent {} m clamped to max_size {} m", size, max_size);
    }
    size.min(max_size).max(2.0 * dx)
}

/// Half-open range `[start, stop)` with the given step.
fn arange(start: f64, stop: f64, step: f64) -> Array1<f64> {
    let span = (stop - start) / step;
    let n = if span.is_finite() && span > 0.0 {
        span.ceil() as usize
    } else {
        0
    };
    Array1::from_shape_fn(n, |i| start + i as f64 * step)
}
