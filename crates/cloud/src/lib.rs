//! # AgriSentinel Cloud
//!
//! Retrieval of named raster assets.
//!
//! A raster is addressed by file name only; an [`AssetSource`] resolves the
//! name to bytes, over HTTP (`{base_url}/{asset_dir}/{name}`) or from a
//! local directory. Decoding is delegated to `agrisentinel-core`. The
//! [`blocking`] module wraps the sources for callers without a runtime.

pub mod asset;
pub mod error;
pub mod http;

pub mod sync_api;

pub use asset::{
    fetch_bands, validate_asset_name, AssetSource, AssetSourceOptions, DirAssetSource,
    HttpAssetSource, DEFAULT_ASSET_DIR,
};
pub use error::{CloudError, Result};
pub use http::HttpClient;

/// Blocking API re-exported as `blocking` module.
pub mod blocking {
    pub use crate::sync_api::*;
}
