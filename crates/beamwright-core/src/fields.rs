//! Near-field maps from superposed point-source wavefronts.
//!
//! Each element radiates a scalar wave $\cos(k r - \omega t + \phi)$ written
//! here with the time term folded into the phase. At grid point
//! $\mathbf{p}$ the field is
//!
//! $$
//! Z(\mathbf{p}, t) = \sum_{n=1}^{N} \cos\bigl(k\,|\mathbf{p} - \mathbf{p}_n|
//!     + \omega t + \phi_n\bigr)
//! $$
//!
//! with $k = 2\pi/\lambda$, $\omega = 2\pi f$ and $\phi_n$ the steering phase.
//! No attenuation or spreading loss is applied, so the map shows the raw
//! interference pattern. Cost is $O(N_\text{grid} \cdot N)$.

use ndarray::Array2;

use beamwright_geometry::ElementLayout;

use crate::error::{SimulationError, SimulationResult};
use crate::grid::SimulationGrid;
use crate::types::{ArrayConfig, Carrier, FieldMap};

/// Evaluate the superposed field of every element at one point.
pub fn field_at_point(point: &[f64; 2], layout: &ElementLayout, k: f64, omega_t: f64) -> f64 {
    layout
        .iter()
        .map(|(pos, phase)| {
            let dx = point[0] - pos[0];
            let dy = point[1] - pos[1];
            (k * (dx * dx + dy * dy).sqrt() + omega_t + phase).cos()
        })
        .sum()
}

/// Superpose the layout's wavefronts over every grid point.
fn superpose(grid: &SimulationGrid, layout: &ElementLayout, carrier: &Carrier, t: f64) -> FieldMap {
    let k = carrier.wavenumber();
    let omega_t = carrier.angular_frequency() * t;

    let amplitude = Array2::from_shape_fn(grid.shape(), |(iy, ix)| {
        field_at_point(&[grid.x[ix], grid.y[iy]], layout, k, omega_t)
    });

    FieldMap {
        amplitude,
        extent: grid.extent(),
        time: t,
    }
}

/// Compute the emitter array's near-field map at time `t`.
///
/// Returns the map together with the steered element layout so callers can
/// mark element positions on the plot.
pub fn wave_field(
    config: &ArrayConfig,
    grid: &SimulationGrid,
    t: f64,
) -> SimulationResult<(FieldMap, ElementLayout)> {
    let carrier = config.carrier()?;
    check_grid(grid)?;
    let layout = config.emitter_layout()?;

    let field = superpose(grid, &layout, &carrier, t);
    log::debug!(
        "Wave field: N={}, f={} Hz, θ={}°, {}x{} grid, t={:.3e} s",
        layout.len(),
        carrier.frequency,
        config.steering_deg,
        grid.nx(),
        grid.ny(),
        t
    );
    Ok((field, layout))
}

/// Compute the steered receive array's field pattern at time `t`.
///
/// Each receiver contributes $\cos(k|\mathbf{p} - \mathbf{r}_m| + \omega t + \phi_m)$,
/// with $\phi_m$ from the configuration's steering law applied to the given
/// receiver positions. By reciprocity this is the spatial sensitivity
/// pattern of the delay-and-sum receiver.
///
/// # Errors
/// [`SimulationError::Configuration`] if `receiver_positions` does not hold
/// exactly `config.receiver_count` entries.
pub fn receiver_field(
    config: &ArrayConfig,
    grid: &SimulationGrid,
    receiver_positions: &[[f64; 2]],
    t: f64,
) -> SimulationResult<FieldMap> {
    if receiver_positions.len() != config.receiver_count {
        return Err(SimulationError::Configuration {
            what: "receiver positions",
            expected: config.receiver_count,
            found: receiver_positions.len(),
        });
    }
    let carrier = config.carrier()?;
    check_grid(grid)?;
    let layout = ElementLayout::steer_positions(
        receiver_positions.to_vec(),
        &config.steering_law,
        config.steering_deg,
        carrier.wavelength(),
    )?;

    let field = superpose(grid, &layout, &carrier, t);
    log::debug!(
        "Receiver field: M={}, f={} Hz, θ={}°, {}x{} grid",
        layout.len(),
        carrier.frequency,
        config.steering_deg,
        grid.nx(),
        grid.ny()
    );
    Ok(field)
}

/// Field radiated by a single reference transmitter at `source`.
///
/// This is the incident wave a receive array samples: $\cos(k|\mathbf{p} -
/// \mathbf{s}| + \omega t)$ on every grid point.
pub fn reference_source_field(
    grid: &SimulationGrid,
    source: [f64; 2],
    carrier: &Carrier,
    t: f64,
) -> SimulationResult<FieldMap> {
    check_grid(grid)?;
    let layout = ElementLayout::from_parts(vec![source], vec![0.0])?;
    Ok(superpose(grid, &layout, carrier, t))
}

fn check_grid(grid: &SimulationGrid) -> SimulationResult<()> {
    if grid.is_empty() {
        return Err(SimulationError::domain("invalid grid: no sample points"));
    }
    Ok(())
}
