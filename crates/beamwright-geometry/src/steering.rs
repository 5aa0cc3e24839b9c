//! Beam steering laws.
//!
//! A steering law assigns each element a phase offset $\phi_n$ such that
//! the per-element wavefronts $\cos(k r_n + \omega t + \phi_n)$ add
//! coherently in the chosen direction.
//!
//! - **Plane wave**: $\phi_n = k\,\mathbf{p}_n \cdot \hat{\mathbf{u}}(\theta_s)$,
//!   the element's path advance towards a distant point in the steering
//!   direction. For a linear array with pitch $d$ this is the progressive
//!   phase $n \cdot 2\pi d \sin\theta_s/\lambda$ with $n$ running
//!   symmetrically from $-(N-1)/2$ to $(N-1)/2$. For an arc of radius $R$ it
//!   is $k R \cos(\alpha_n - \theta_s)$: the depth term $k y_n \cos\theta_s$
//!   is needed because arc elements do not share a common y.
//! - **Focused**: $\phi_n = -k\,|\mathbf{p}_n - \mathbf{s}|$ with the focal
//!   point $\mathbf{s} = D(\sin\theta_s, \cos\theta_s)$, so every element's
//!   wave arrives at $\mathbf{s}$ in phase.

use serde::{Deserialize, Serialize};

use crate::layout::GeometryError;

/// How per-element steering phases are derived.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum SteeringLaw {
    /// Phase gradient along the steering direction (far-field steering).
    #[default]
    PlaneWave,
    /// Focus on a point at `distance` metres along the steering direction.
    Focused {
        /// Distance from the origin to the focal point (m).
        distance: f64,
    },
}

/// Unit vector for a direction measured from +y towards +x.
pub fn direction(angle_deg: f64) -> [f64; 2] {
    let theta = angle_deg.to_radians();
    [theta.sin(), theta.cos()]
}

/// Compute the steering phase offset (radians) of each element.
///
/// # Arguments
/// * `positions` - Element positions (m).
/// * `law` - Steering law.
/// * `steering_deg` - Beam direction in degrees.
/// * `wavelength` - Carrier wavelength (m).
pub fn phase_offsets(
    positions: &[[f64; 2]],
    law: &SteeringLaw,
    steering_deg: f64,
    wavelength: f64,
) -> Result<Vec<f64>, GeometryError> {
    if !(wavelength.is_finite() && wavelength > 0.0) {
        return Err(GeometryError::InvalidWavelength(wavelength));
    }
    if steering_deg.abs() > 90.0 {
        log::warn!(
            "Steering angle {:.1}° lies behind the array; the beam folds back into [-90°, 90°]",
            steering_deg
        );
    }

    let k = 2.0 * std::f64::consts::PI / wavelength;
    let phases = match *law {
        SteeringLaw::PlaneWave => {
            let u = direction(steering_deg);
            positions
                .iter()
                .map(|p| k * (p[0] * u[0] + p[1] * u[1]))
                .collect()
        }
        SteeringLaw::Focused { distance } => {
            if !(distance.is_finite() && distance > 0.0) {
                return Err(GeometryError::InvalidFocus(distance));
            }
            let u = direction(steering_deg);
            let focus = [distance * u[0], distance * u[1]];
            positions
                .iter()
                .map(|p| {
                    let dx = p[0] - focus[0];
                    let dy = p[1] - focus[1];
                    -k * (dx * dx + dy * dy).sqrt()
                })
                .collect()
        }
    };
    Ok(phases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Geometry;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    #[test]
    fn test_plane_wave_linear_progression() {
        // N=5, d=λ/4, θ=30°: dφ = 2π (λ/4) (1/2) / λ = π/4.
        let wavelength = 0.2;
        let positions = Geometry::Linear.positions(5, wavelength / 4.0).unwrap();
        let phases = phase_offsets(&positions, &SteeringLaw::PlaneWave, 30.0, wavelength).unwrap();
        let dphi = PI / 4.0;
        for (i, phase) in phases.iter().enumerate() {
            let n = i as f64 - 2.0;
            assert_abs_diff_eq!(*phase, dphi * n, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_default_law_is_plane_wave() {
        assert_eq!(SteeringLaw::default(), SteeringLaw::PlaneWave);
        assert_eq!(Geometry::default(), Geometry::Linear);
    }

    #[test]
    fn test_plane_wave_broadside_is_zero() {
        let positions = Geometry::Linear.positions(8, 0.05).unwrap();
        let phases = phase_offsets(&positions, &SteeringLaw::PlaneWave, 0.0, 0.17).unwrap();
        assert!(phases.iter().all(|p| *p == 0.0));
    }

    #[test]
    fn test_plane_wave_curved_projects_onto_steering_direction() {
        let radius = 0.4;
        let wavelength = 0.1;
        let steering: f64 = 25.0;
        let geometry = Geometry::Curved { arc_radius: radius };
        let positions = geometry.positions(5, 0.0).unwrap();
        let phases =
            phase_offsets(&positions, &SteeringLaw::PlaneWave, steering, wavelength).unwrap();

        let k = 2.0 * PI / wavelength;
        for (alpha, phase) in crate::layout::arc_angles(5).iter().zip(&phases) {
            let expected = k * radius * (alpha - steering.to_radians()).cos();
            assert_abs_diff_eq!(*phase, expected, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_focused_phases_align_at_focus() {
        let wavelength = 0.05;
        let k = 2.0 * PI / wavelength;
        let positions = Geometry::Curved { arc_radius: 0.3 }.positions(6, 0.0).unwrap();
        let law = SteeringLaw::Focused { distance: 1.2 };
        let phases = phase_offsets(&positions, &law, 10.0, wavelength).unwrap();

        let u = direction(10.0);
        let focus = [1.2 * u[0], 1.2 * u[1]];
        for (p, phase) in positions.iter().zip(&phases) {
            let r = ((p[0] - focus[0]).powi(2) + (p[1] - focus[1]).powi(2)).sqrt();
            assert_abs_diff_eq!(k * r + phase, 0.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_invalid_wavelength_and_focus() {
        let positions = vec![[0.0, 0.0]];
        assert!(matches!(
            phase_offsets(&positions, &SteeringLaw::PlaneWave, 0.0, 0.0),
            Err(GeometryError::InvalidWavelength(_))
        ));
        assert!(matches!(
            phase_offsets(&positions, &SteeringLaw::Focused { distance: 0.0 }, 0.0, 1.0),
            Err(GeometryError::InvalidFocus(_))
        ));
    }
}
