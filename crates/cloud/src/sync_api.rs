//! Blocking (synchronous) API.
//!
//! Wraps an async [`AssetSource`] with a Tokio runtime so callers don't need
//! to manage their own async runtime.

use agrisentinel_core::raster::{BandSet, RasterElement};

use crate::asset::{fetch_bands, AssetSource, AssetSourceOptions, HttpAssetSource};
use crate::error::{CloudError, Result};

fn current_thread_runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CloudError::Network(e.to_string()))
}

/// Blocking wrapper around any [`AssetSource`].
///
/// Uses an internal single-threaded Tokio runtime.
pub struct AssetSourceBlocking<S> {
    rt: tokio::runtime::Runtime,
    inner: S,
}

impl<S: AssetSource> AssetSourceBlocking<S> {
    pub fn new(inner: S) -> Result<Self> {
        Ok(Self {
            rt: current_thread_runtime()?,
            inner,
        })
    }

    /// Fetch raw bytes (blocking).
    pub fn fetch(&self, name: &str) -> Result<Vec<u8>> {
        self.rt.block_on(self.inner.fetch(name))
    }

    /// Fetch and decode (blocking).
    pub fn fetch_bands<T: RasterElement>(&self, name: &str) -> Result<BandSet<T>> {
        self.rt.block_on(fetch_bands(&self.inner, name))
    }

    pub fn source(&self) -> &S {
        &self.inner
    }
}

/// One-shot: fetch `{base_url}/{asset_dir}/{name}` and decode it.
pub fn read_asset<T: RasterElement>(
    base_url: &str,
    name: &str,
    options: AssetSourceOptions,
) -> Result<BandSet<T>> {
    let source = HttpAssetSource::new(base_url, options)?;
    AssetSourceBlocking::new(source)?.fetch_bands(name)
}
