//! Element placement for linear and curved arrays.
//!
//! A [`Geometry`] turns an element count and spacing into an ordered list of
//! positions. An [`ElementLayout`] pairs those positions index-for-index with
//! the steering phase of each element, and is the single value every field
//! and beam computation consumes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::steering::{phase_offsets, SteeringLaw};

/// Half-width of the angular aperture spanned by a curved array (degrees).
pub const CURVED_HALF_APERTURE_DEG: f64 = 45.0;

/// Errors from layout construction.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("Array must contain at least one element")]
    NoElements,

    #[error("Element spacing must be positive and finite, got {0} m")]
    InvalidSpacing(f64),

    #[error("Arc radius must be positive and finite, got {0} m")]
    InvalidRadius(f64),

    #[error("Wavelength must be positive and finite, got {0} m")]
    InvalidWavelength(f64),

    #[error("Focal distance must be positive and finite, got {0} m")]
    InvalidFocus(f64),

    #[error("Layout has {positions} positions but {phases} phase offsets")]
    LengthMismatch { positions: usize, phases: usize },
}

/// Physical arrangement of the array elements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Geometry {
    /// Colinear elements on the x axis, centred on the origin.
    #[default]
    Linear,
    /// Elements on a circular arc about the origin, spanning ±45° about +y.
    Curved {
        /// Arc radius (m).
        arc_radius: f64,
    },
}

impl Geometry {
    pub fn name(&self) -> &'static str {
        match self {
            Geometry::Linear => "linear",
            Geometry::Curved { .. } => "curved",
        }
    }

    /// Compute element positions for this geometry.
    ///
    /// `spacing` is only used by [`Geometry::Linear`]; a curved array always
    /// spreads its elements over the fixed ±45° aperture.
    pub fn positions(&self, count: usize, spacing: f64) -> Result<Vec<[f64; 2]>, GeometryError> {
        if count == 0 {
            return Err(GeometryError::NoElements);
        }
        match *self {
            Geometry::Linear => {
                if !(spacing.is_finite() && spacing > 0.0) {
                    return Err(GeometryError::InvalidSpacing(spacing));
                }
                Ok(linear_positions(count, spacing))
            }
            Geometry::Curved { arc_radius } => {
                if !(arc_radius.is_finite() && arc_radius > 0.0) {
                    return Err(GeometryError::InvalidRadius(arc_radius));
                }
                Ok(arc_angles(count)
                    .into_iter()
                    .map(|alpha| [arc_radius * alpha.sin(), arc_radius * alpha.cos()])
                    .collect())
            }
        }
    }
}

/// Evenly spaced points from `-(N-1)d/2` to `(N-1)d/2` on the x axis.
fn linear_positions(count: usize, spacing: f64) -> Vec<[f64; 2]> {
    let centre = (count as f64 - 1.0) / 2.0;
    (0..count)
        .map(|n| [(n as f64 - centre) * spacing, 0.0])
        .collect()
}

/// Angular positions (radians) of the elements of a curved array.
///
/// A single element sits on the forward axis.
pub fn arc_angles(count: usize) -> Vec<f64> {
    let half = CURVED_HALF_APERTURE_DEG.to_radians();
    match count {
        0 => Vec::new(),
        1 => vec![0.0],
        _ => (0..count)
            .map(|n| -half + 2.0 * half * n as f64 / (count - 1) as f64)
            .collect(),
    }
}

/// Element positions paired with their steering phases.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ElementLayout {
    positions: Vec<[f64; 2]>,
    phases: Vec<f64>,
}

impl ElementLayout {
    /// Pair positions with phases. Both must have the same length.
    pub fn from_parts(positions: Vec<[f64; 2]>, phases: Vec<f64>) -> Result<Self, GeometryError> {
        if positions.len() != phases.len() {
            return Err(GeometryError::LengthMismatch {
                positions: positions.len(),
                phases: phases.len(),
            });
        }
        if positions.is_empty() {
            return Err(GeometryError::NoElements);
        }
        Ok(Self { positions, phases })
    }

    /// Lay out `count` elements and steer them towards `steering_deg`.
    ///
    /// # Arguments
    /// * `geometry` - Linear or curved arrangement.
    /// * `count` - Number of elements.
    /// * `spacing` - Element pitch for linear arrays (m).
    /// * `law` - How steering phases are derived.
    /// * `steering_deg` - Beam direction, measured from +y towards +x.
    /// * `wavelength` - Carrier wavelength (m).
    pub fn steered(
        geometry: &Geometry,
        count: usize,
        spacing: f64,
        law: &SteeringLaw,
        steering_deg: f64,
        wavelength: f64,
    ) -> Result<Self, GeometryError> {
        let positions = geometry.positions(count, spacing)?;
        Self::steer_positions(positions, law, steering_deg, wavelength)
    }

    /// Steer an arbitrary set of element positions.
    pub fn steer_positions(
        positions: Vec<[f64; 2]>,
        law: &SteeringLaw,
        steering_deg: f64,
        wavelength: f64,
    ) -> Result<Self, GeometryError> {
        let phases = phase_offsets(&positions, law, steering_deg, wavelength)?;
        Self::from_parts(positions, phases)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    pub fn positions(&self) -> &[[f64; 2]] {
        &self.positions
    }

    /// Steering phase of each element (radians).
    pub fn phases(&self) -> &[f64] {
        &self.phases
    }

    /// Iterate over `(position, phase)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&[f64; 2], f64)> + '_ {
        self.positions.iter().zip(self.phases.iter().copied())
    }
}
