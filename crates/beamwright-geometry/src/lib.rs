//! # Beamwright Geometry
//!
//! Array geometry handling for the Beamwright framework. This crate provides:
//!
//! - **Element layouts** ([`layout`]): Positions of the transducers or
//!   antennas for linear and curved (arc) arrays.
//! - **Steering laws** ([`steering`]): Per-element phase offsets that point
//!   the main beam, either with a plane-wave phase gradient or by focusing
//!   on a point.
//!
//! All coordinates are in metres in the x-y plane. The array faces +y; angles
//! are measured from the +y axis towards +x, so an element on an arc at angle
//! α sits at `R·(sin α, cos α)`.

pub mod layout;
pub mod steering;

pub use layout::{ElementLayout, Geometry, GeometryError};
pub use steering::SteeringLaw;
