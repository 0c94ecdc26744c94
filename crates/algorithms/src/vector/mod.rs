//! Vector measurements for drawn parcels
//!
//! - Area: planar (shoelace) or geodesic (spherical) polygon area
//! - Hectares: square meters to hectares
//! - Validity: simple (non self-intersecting) ring check

mod measurements;
mod validity;

pub use measurements::{area_hectares, polygon_area, AreaMethod, SQUARE_METERS_PER_HECTARE};
pub use validity::is_simple;
