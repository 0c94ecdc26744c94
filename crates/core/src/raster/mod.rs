//! Raster data structures

mod bands;
mod element;
mod geotransform;
mod grid;

pub use bands::BandSet;
pub use element::RasterElement;
pub use geotransform::{Bounds, GeoTransform};
pub use grid::Raster;
