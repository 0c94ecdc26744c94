//! # AgriSentinel Algorithms
//!
//! The arithmetic behind the NDVI map overlay and the parcel sizer.
//!
//! ## Modules
//!
//! - **imagery**: NDVI over whole bands, red/NIR band selection, the
//!   per-pixel NDVI shader and tile rasterisation
//! - **vector**: Polygon area (planar or geodesic) and hectare conversion,
//!   simple-polygon checks

pub mod imagery;
mod maybe_rayon;
pub mod vector;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::imagery::{
        ndvi, ndvi_value, render_tile, render_tile_projected, BandSelection, NdviShader,
        TileImage, NDVI_EPSILON,
    };
    pub use crate::vector::{area_hectares, polygon_area, AreaMethod};
    pub use agrisentinel_core::prelude::*;
}
