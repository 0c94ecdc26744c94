//! # AgriSentinel Core
//!
//! Core raster types and GeoTIFF decoding shared by the AgriSentinel crates.
//!
//! This crate provides:
//! - `Raster<T>`: Generic single-band raster grid
//! - `BandSet<T>`: Ordered, same-shaped bands decoded from one asset
//! - `GeoTransform`: Affine transformation for georeferencing
//! - `CRS`: Coordinate Reference System (EPSG code) read from GeoKeys
//! - Buffer-based GeoTIFF decoding (no filesystem or GDAL dependency)

pub mod crs;
pub mod error;
pub mod io;
pub mod raster;

pub use crs::CRS;
pub use error::{Error, Result};
pub use raster::{BandSet, GeoTransform, Raster, RasterElement};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::crs::CRS;
    pub use crate::error::{Error, Result};
    pub use crate::raster::{BandSet, GeoTransform, Raster, RasterElement};
}
