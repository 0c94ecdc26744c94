//! Imagery algorithms behind the NDVI overlay
//!
//! - Normalized difference / NDVI with an epsilon-guarded denominator
//! - Red/NIR band selection with fallbacks for short band sets
//! - The per-pixel NDVI shader
//! - Tile rasterisation at a decimated resolution

mod bands;
mod indices;
mod shader;
mod tile;

pub use bands::{BandSelection, PREFERRED_NIR_BAND, PREFERRED_RED_BAND};
pub use indices::{ndvi, ndvi_value, normalized_difference, NDVI_EPSILON};
pub use shader::NdviShader;
pub use tile::{render_tile, render_tile_projected, TileImage, DEFAULT_RESOLUTION};
