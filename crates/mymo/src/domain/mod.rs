//! Pure template resolution: marker regions, selections, and name substitution.

pub mod errors;
pub mod interpolate;
pub mod markers;
pub mod model;
pub mod resolve;
