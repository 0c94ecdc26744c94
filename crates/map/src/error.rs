//! Error types for the map widget.

use thiserror::Error;

/// Errors surfaced by the map widget.
///
/// Raster loading never propagates these to the host; the loader logs them
/// and leaves the map without an overlay.
#[derive(Error, Debug)]
pub enum MapError {
    #[error("asset error: {0}")]
    Asset(#[from] agrisentinel_cloud::CloudError),

    #[error("raster error: {0}")]
    Raster(#[from] agrisentinel_core::Error),

    #[error("decode task failed: {0}")]
    DecodeTask(#[from] tokio::task::JoinError),

    #[error("invalid coordinate: lat={lat}, lon={lon}")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error("invalid parcel: {0}")]
    InvalidParcel(String),
}

/// Result alias for map operations.
pub type Result<T> = std::result::Result<T, MapError>;
