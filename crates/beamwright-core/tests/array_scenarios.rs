//! Integration tests for the full grid → near field → beam profile pipeline.
//!
//! ## Coverage
//! - Grid construction (monotonic axes, spacing, one-sided vs symmetric)
//! - Near-field maps (shape, bounds, single-element circular wavefronts)
//! - Beam profiles (0 dB peak, −200 dB floor, symmetry, steering accuracy)
//! - Receive beamforming and apodisation windows
//! - Determinism of repeated calls

use approx::{assert_abs_diff_eq, assert_relative_eq};

use beamwright_core::beam::{beam_profile, beam_profile_for, BeamOptions, DB_FLOOR};
use beamwright_core::fields::{receiver_field, reference_source_field, wave_field};
use beamwright_core::grid::{build_grid, GridParams, SimulationGrid};
use beamwright_core::types::{ArrayConfig, ArrayMode, Medium};
use beamwright_core::window::Window;
use beamwright_core::SimulationError;
use beamwright_geometry::steering::direction;
use beamwright_geometry::{Geometry, SteeringLaw};
use ndarray::Array1;

// ─────────────────────────────────────────────────────────────
// Helpers
// ─────────────────────────────────────────────────────────────

/// Eight-element air array at 2 kHz with quarter-wavelength pitch.
fn audio_array(steering_deg: f64) -> ArrayConfig {
    ArrayConfig {
        element_count: 8,
        frequency: 2000.0,
        element_spacing: 0.042875,
        steering_deg,
        speed: Medium::Air.speed(),
        ..Default::default()
    }
}

/// Half-wavelength array of `n` elements.
fn half_wave_array(n: usize, frequency: f64, medium: Medium, steering_deg: f64) -> ArrayConfig {
    let spacing = medium.speed() / frequency / 2.0;
    ArrayConfig {
        element_count: n,
        frequency,
        element_spacing: spacing,
        steering_deg,
        speed: medium.speed(),
        receiver_count: n,
        receiver_spacing: spacing,
        ..Default::default()
    }
}

fn small_params() -> GridParams {
    GridParams { size_x: 0.6, size_y: 0.6, max_size: 10.0, max_points: 200 }
}

fn sweep_step() -> f64 {
    180.0 / (BeamOptions::default().sweep_points - 1) as f64
}

// ─────────────────────────────────────────────────────────────
// Grid
// ─────────────────────────────────────────────────────────────

#[test]
fn test_grid_axes_are_strictly_increasing() {
    for geometry in [Geometry::Linear, Geometry::Curved { arc_radius: 0.3 }] {
        let config = ArrayConfig { geometry, ..audio_array(30.0) };
        let grid = build_grid(&config, &GridParams::default()).unwrap();
        assert!(grid.nx() >= 2 && grid.ny() >= 2);
        assert!(grid.x.iter().zip(grid.x.iter().skip(1)).all(|(a, b)| b > a));
        assert!(grid.y.iter().zip(grid.y.iter().skip(1)).all(|(a, b)| b > a));
        assert_relative_eq!(grid.x[1] - grid.x[0], grid.dx, max_relative = 1e-9);
    }
}

#[test]
fn test_higher_frequency_never_shrinks_grid() {
    let params = GridParams::default();
    let mut previous = 0;
    for frequency in [200.0, 500.0, 1000.0, 2000.0, 5000.0, 10_000.0, 50_000.0] {
        let config = ArrayConfig { frequency, ..audio_array(0.0) };
        let grid = build_grid(&config, &params).unwrap();
        assert!(grid.len() >= previous, "{} Hz: {} < {}", frequency, grid.len(), previous);
        assert!(grid.nx() <= 2 * params.max_points);
        previous = grid.len();
    }
}

#[test]
fn test_switching_geometry_changes_only_y_range() {
    let linear = audio_array(30.0);
    let curved = ArrayConfig { geometry: Geometry::Curved { arc_radius: 0.3 }, ..linear.clone() };
    let g_lin = build_grid(&linear, &small_params()).unwrap();
    let g_cur = build_grid(&curved, &small_params()).unwrap();
    assert_eq!(g_lin.x, g_cur.x);
    assert_eq!(g_lin.y[0], 0.0);
    assert!(g_cur.y[0] < 0.0);
    assert!(g_cur.ny() > g_lin.ny());
}

// ─────────────────────────────────────────────────────────────
// Near field
// ─────────────────────────────────────────────────────────────

#[test]
fn test_wave_field_is_finite_and_bounded() {
    let config = audio_array(30.0);
    let grid = build_grid(&config, &small_params()).unwrap();
    let (field, layout) = wave_field(&config, &grid, 2.5e-4).unwrap();
    assert_eq!((field.ny(), field.nx()), grid.shape());
    assert!(field.amplitude.iter().all(|v| v.is_finite()));
    let (lo, hi) = field.range();
    assert!(lo >= -8.0 - 1e-9 && hi <= 8.0 + 1e-9);
    assert_eq!(layout.len(), 8);
    assert_eq!(field.time, 2.5e-4);
}

#[test]
fn test_single_element_field_is_circular() {
    // One element at the origin: the field depends only on distance.
    let config = ArrayConfig { element_count: 1, ..audio_array(0.0) };
    let grid = build_grid(&config, &small_params()).unwrap();
    let (field, layout) = wave_field(&config, &grid, 0.0).unwrap();
    assert_eq!(layout.positions(), &[[0.0, 0.0]]);
    let k = config.carrier().unwrap().wavenumber();
    for ((iy, ix), value) in field.amplitude.indexed_iter() {
        let r = grid.x[ix].hypot(grid.y[iy]);
        assert_abs_diff_eq!(*value, (k * r).cos(), epsilon = 1e-9);
    }
}

#[test]
fn test_field_advances_with_time() {
    let config = audio_array(30.0);
    let grid = build_grid(&config, &small_params()).unwrap();
    let (t0, _) = wave_field(&config, &grid, 0.0).unwrap();
    // One full period later the snapshot repeats.
    let period = 1.0 / config.frequency;
    let (t1, _) = wave_field(&config, &grid, period).unwrap();
    for (a, b) in t0.amplitude.iter().zip(t1.amplitude.iter()) {
        assert_abs_diff_eq!(a, b, epsilon = 1e-6);
    }
}

#[test]
fn test_receiver_field_from_reference_source_geometry() {
    let config = half_wave_array(12, 40_000.0, Medium::Air, -25.0);
    let grid = build_grid(&config, &small_params()).unwrap();
    let receivers = config.receiver_layout().unwrap();
    let field = receiver_field(&config, &grid, receivers.positions(), 0.0).unwrap();
    assert_eq!(field.amplitude.dim(), grid.shape());

    let carrier = config.carrier().unwrap();
    let incident = reference_source_field(&grid, [0.0, 0.5], &carrier, 0.0).unwrap();
    assert_eq!(incident.amplitude.dim(), grid.shape());
}

#[test]
fn test_receiver_field_values_for_distinct_receive_array() {
    // Five receivers at 30 mm pitch against an eight-element emitter.
    let config = ArrayConfig {
        receiver_count: 5,
        receiver_spacing: 0.03,
        ..audio_array(25.0)
    };
    let grid = build_grid(&config, &small_params()).unwrap();
    let receivers = Geometry::Linear.positions(5, 0.03).unwrap();
    let t = 7.0e-5;
    let field = receiver_field(&config, &grid, &receivers, t).unwrap();

    let carrier = config.carrier().unwrap();
    let k = carrier.wavenumber();
    let omega_t = carrier.angular_frequency() * t;
    let u = direction(25.0);
    for (iy, ix) in [(0, 0), (10, 37), (grid.ny() - 1, grid.nx() / 2)] {
        let point = [grid.x[ix], grid.y[iy]];
        let expected: f64 = receivers
            .iter()
            .map(|r| {
                let dist = (point[0] - r[0]).hypot(point[1] - r[1]);
                let phase = k * (r[0] * u[0] + r[1] * u[1]);
                (k * dist + omega_t + phase).cos()
            })
            .sum();
        assert_abs_diff_eq!(field.amplitude[[iy, ix]], expected, epsilon = 1e-9);
    }
}

#[test]
fn test_receiver_field_is_coherent_along_steering_direction() {
    let config = ArrayConfig {
        receiver_count: 5,
        receiver_spacing: 0.03,
        ..audio_array(-35.0)
    };
    let carrier = config.carrier().unwrap();
    let far = 200.0;
    let u = direction(-35.0);
    let grid = SimulationGrid {
        x: Array1::from(vec![far * u[0]]),
        y: Array1::from(vec![far * u[1]]),
        dx: 1.0,
        wavelength: carrier.wavelength(),
    };
    let receivers = Geometry::Linear.positions(5, 0.03).unwrap();
    // Cancel the common path k·far with the time term.
    let t = -far / config.speed;
    let field = receiver_field(&config, &grid, &receivers, t).unwrap();
    assert!(field.amplitude[[0, 0]] > 0.99 * 5.0, "got {}", field.amplitude[[0, 0]]);

    // Off the steering direction the sum is no longer coherent.
    let off = direction(20.0);
    let grid = SimulationGrid {
        x: Array1::from(vec![far * off[0]]),
        y: Array1::from(vec![far * off[1]]),
        ..grid
    };
    let field = receiver_field(&config, &grid, &receivers, t).unwrap();
    assert!(field.amplitude[[0, 0]].abs() < 4.0, "got {}", field.amplitude[[0, 0]]);
}

#[test]
fn test_invalid_inputs_are_domain_errors() {
    let config = ArrayConfig { frequency: -1.0, ..audio_array(0.0) };
    assert!(matches!(
        build_grid(&config, &GridParams::default()),
        Err(SimulationError::Domain(_))
    ));

    let valid = audio_array(0.0);
    let grid = build_grid(&valid, &small_params()).unwrap();
    let bad_count = ArrayConfig { element_count: 0, ..valid };
    assert!(matches!(wave_field(&bad_count, &grid, 0.0), Err(SimulationError::Domain(_))));
}

// ─────────────────────────────────────────────────────────────
// Beam profile
// ─────────────────────────────────────────────────────────────

#[test]
fn test_beam_profile_peak_and_floor() {
    for steering in [-60.0, -10.0, 0.0, 30.0, 75.0] {
        let profile =
            beam_profile_for(&audio_array(steering), ArrayMode::Emitter, &BeamOptions::default())
                .unwrap();
        assert_eq!(profile.len(), 500);
        let (_, peak_db) = profile.peak().unwrap();
        assert_eq!(peak_db, 0.0);
        assert!(profile.intensity_db.iter().all(|&v| (DB_FLOOR..=0.0).contains(&v)));
    }
}

#[test]
fn test_broadside_profile_is_symmetric() {
    let profile =
        beam_profile_for(&audio_array(0.0), ArrayMode::Emitter, &BeamOptions::default()).unwrap();
    let n = profile.len();
    let (angle, _) = profile.peak().unwrap();
    assert!(angle.abs() <= sweep_step());
    for i in 0..n / 2 {
        let left = 10f64.powf(profile.intensity_db[i] / 20.0);
        let right = 10f64.powf(profile.intensity_db[n - 1 - i] / 20.0);
        assert_abs_diff_eq!(left, right, epsilon = 1e-9);
    }
}

#[test]
fn test_steered_peak_tracks_steering_angle() {
    let profile =
        beam_profile_for(&audio_array(30.0), ArrayMode::Emitter, &BeamOptions::default()).unwrap();
    let (angle, _) = profile.peak().unwrap();
    assert!((angle - 30.0).abs() <= sweep_step(), "peak at {angle}");
}

#[test]
fn test_millimetre_wave_array_steers_to_45_degrees() {
    let config = half_wave_array(16, 28e9, Medium::FreeSpace, 45.0);
    let profile = beam_profile_for(&config, ArrayMode::Emitter, &BeamOptions::default()).unwrap();
    let (angle, _) = profile.peak().unwrap();
    assert!((angle - 45.0).abs() <= sweep_step(), "peak at {angle}");

    let bw = profile.half_power_beamwidth().unwrap();
    assert!(bw.lower_deg < 45.0 && bw.upper_deg > 45.0);
    assert!(bw.width_deg() > 5.0 && bw.width_deg() < 12.0);
}

#[test]
fn test_receiver_profile_peaks_at_steering_angle() {
    let config = audio_array(-40.0);
    let profile = beam_profile_for(&config, ArrayMode::Receiver, &BeamOptions::default()).unwrap();
    let (angle, _) = profile.peak().unwrap();
    assert!((angle + 40.0).abs() <= sweep_step(), "peak at {angle}");
}

#[test]
fn test_uniform_sidelobes_near_minus_13_db() {
    let config = half_wave_array(16, 2000.0, Medium::Air, 0.0);
    let profile = beam_profile_for(&config, ArrayMode::Emitter, &BeamOptions::default()).unwrap();
    let psl = profile.peak_sidelobe_db().unwrap();
    assert!(psl > -14.0 && psl < -12.5, "PSL {psl}");
}

#[test]
fn test_hamming_window_suppresses_sidelobes() {
    let config = half_wave_array(16, 2000.0, Medium::Air, 0.0);
    let uniform =
        beam_profile_for(&config, ArrayMode::Emitter, &BeamOptions::default()).unwrap();
    let options = BeamOptions { window: Window::Hamming, ..Default::default() };
    let tapered = beam_profile_for(&config, ArrayMode::Emitter, &options).unwrap();

    assert!(tapered.peak_sidelobe_db().unwrap() < -30.0);
    let wide = tapered.half_power_beamwidth().unwrap().width_deg();
    let narrow = uniform.half_power_beamwidth().unwrap().width_deg();
    assert!(wide > narrow);
}

#[test]
fn test_single_element_profile_is_flat() {
    let config = ArrayConfig { element_count: 1, ..audio_array(30.0) };
    let profile = beam_profile_for(&config, ArrayMode::Emitter, &BeamOptions::default()).unwrap();
    assert!(profile.intensity_db.iter().all(|&v| v == 0.0));
}

#[test]
fn test_layout_of_wrong_size_is_configuration_error() {
    let config = audio_array(0.0);
    let other = ArrayConfig { element_count: 6, ..config.clone() };
    let layout = other.emitter_layout().unwrap();
    let result = beam_profile(&config, &layout, ArrayMode::Emitter, &BeamOptions::default());
    assert!(matches!(
        result,
        Err(SimulationError::Configuration { expected: 8, found: 6, .. })
    ));
}

#[test]
fn test_focused_curved_array_near_plane_wave_limit() {
    // A distant focus approaches plane-wave steering from the arc.
    let config = ArrayConfig {
        element_count: 24,
        frequency: 1.5e6,
        speed: Medium::SoftTissue.speed(),
        steering_deg: 20.0,
        geometry: Geometry::Curved { arc_radius: 0.01 },
        steering_law: SteeringLaw::Focused { distance: 5.0 },
        ..Default::default()
    };
    let profile = beam_profile_for(&config, ArrayMode::Emitter, &BeamOptions::default()).unwrap();
    let (angle, _) = profile.peak().unwrap();
    assert!((angle - 20.0).abs() <= 2.0 * sweep_step(), "peak at {angle}");
}

// ─────────────────────────────────────────────────────────────
// Determinism
// ─────────────────────────────────────────────────────────────

#[test]
fn test_repeated_calls_are_identical() {
    let config = ArrayConfig { geometry: Geometry::Curved { arc_radius: 0.25 }, ..audio_array(12.0) };
    let params = small_params();

    let g1 = build_grid(&config, &params).unwrap();
    let g2 = build_grid(&config, &params).unwrap();
    assert_eq!(g1.x, g2.x);
    assert_eq!(g1.y, g2.y);

    let (f1, l1) = wave_field(&config, &g1, 1e-4).unwrap();
    let (f2, l2) = wave_field(&config, &g2, 1e-4).unwrap();
    assert_eq!(f1.amplitude, f2.amplitude);
    assert_eq!(l1, l2);

    let options = BeamOptions::default();
    let p1 = beam_profile_for(&config, ArrayMode::Emitter, &options).unwrap();
    let p2 = beam_profile_for(&config, ArrayMode::Emitter, &options).unwrap();
    assert_eq!(p1.intensity_db, p2.intensity_db);
}
