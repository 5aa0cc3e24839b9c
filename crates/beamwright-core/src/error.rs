//! Errors raised by grid construction and field synthesis.

use beamwright_geometry::GeometryError;
use thiserror::Error;

/// Errors that can occur while building a grid or synthesising a field.
///
/// None of these are transient: the same inputs always fail the same way,
/// so callers should keep their previous result and report the error.
#[derive(Debug, Error)]
pub enum SimulationError {
    /// Physically invalid parameters, or a computation that would produce a
    /// degenerate (empty or NaN) result.
    #[error("Domain error: {0}")]
    Domain(String),

    /// Collections that must agree in length do not.
    #[error("Configuration error: expected {expected} {what}, found {found}")]
    Configuration {
        what: &'static str,
        expected: usize,
        found: usize,
    },
}

impl SimulationError {
    pub(crate) fn domain(msg: impl Into<String>) -> Self {
        Self::Domain(msg.into())
    }
}

impl From<GeometryError> for SimulationError {
    fn from(err: GeometryError) -> Self {
        match err {
            GeometryError::LengthMismatch { positions, phases } => Self::Configuration {
                what: "phase offsets",
                expected: positions,
                found: phases,
            },
            other => Self::Domain(other.to_string()),
        }
    }
}

pub type SimulationResult<T> = Result<T, SimulationError>;
