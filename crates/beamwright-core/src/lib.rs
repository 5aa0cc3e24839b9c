//! # Beamwright Core
//!
//! Numerical backbone of the Beamwright phased-array simulator. Given an
//! array configuration (element count, carrier, pitch, geometry and steering
//! angle) this crate builds a sampling grid, synthesises the instantaneous
//! near-field interference map, and computes normalised far-field beam
//! profiles for transmit and receive arrays.
//!
//! Every operation is a pure function of its inputs. Invalid parameters are
//! reported as [`SimulationError`] values, never as partially filled results.
//!
//! ## Modules
//!
//! - [`types`]: Carrier, array configuration and result containers.
//! - [`grid`]: Sampling-grid construction.
//! - [`fields`]: Near-field synthesis for emitters and receivers.
//! - [`beam`]: Far-field beam profiles and beam metrics.
//! - [`window`]: Amplitude tapers across the aperture.
//! - [`error`]: Error taxonomy.

pub mod beam;
pub mod error;
pub mod fields;
pub mod grid;
pub mod types;
pub mod window;

pub use beam::{beam_profile, beam_profile_for, BeamOptions, Beamwidth};
pub use error::{SimulationError, SimulationResult};
pub use fields::{receiver_field, reference_source_field, wave_field};
pub use grid::{build_grid, GridParams, SimulationGrid};
pub use types::{ArrayConfig, ArrayMode, BeamProfile, Carrier, FieldMap, Medium};
pub use window::Window;

pub use beamwright_geometry::{ElementLayout, Geometry, SteeringLaw};
