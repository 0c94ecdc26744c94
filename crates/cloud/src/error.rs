//! Error types for raster asset retrieval.

use thiserror::Error;

/// Errors produced while fetching a raster asset.
#[derive(Error, Debug)]
pub enum CloudError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} fetching {url}")]
    Status { status: u16, url: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid asset name: {0:?}")]
    InvalidAssetName(String),

    #[error("core error: {0}")]
    Core(#[from] agrisentinel_core::Error),
}

/// Result alias for asset operations.
pub type Result<T> = std::result::Result<T, CloudError>;
