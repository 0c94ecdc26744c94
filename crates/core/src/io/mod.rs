//! I/O operations for reading and writing geospatial data
//!
//! All I/O is buffer-based: rasters arrive as bytes over HTTP or from a
//! host-provided asset directory, never through GDAL.

mod native;

pub use native::{
    read_bands_from_buffer, read_geotiff_from_buffer, write_bands_to_buffer, GeoTiffOptions,
};
