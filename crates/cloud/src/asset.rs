//! Named raster assets and where their bytes come from.
//!
//! The map only ever refers to a raster by file name. An [`AssetSource`]
//! turns that name into bytes: [`HttpAssetSource`] resolves it against
//! `{base_url}/{asset_dir}/{name}` and [`DirAssetSource`] against a local
//! directory.

use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use agrisentinel_core::io::read_bands_from_buffer;
use agrisentinel_core::raster::{BandSet, RasterElement};
use futures::future::{BoxFuture, FutureExt};

use crate::error::{CloudError, Result};
use crate::http::HttpClient;

/// Directory under the base URL that holds raster assets.
pub const DEFAULT_ASSET_DIR: &str = "tifs";

/// Something that can produce the raw bytes of a named raster.
pub trait AssetSource: Send + Sync {
    /// Fetch the complete asset body.
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<u8>>>;

    /// Human-readable location of `name`, for logs.
    fn location(&self, name: &str) -> String;
}

/// Options for [`HttpAssetSource`].
#[derive(Debug, Clone)]
pub struct AssetSourceOptions {
    /// Path segment between the base URL and the file name.
    pub asset_dir: String,
    /// Per-request timeout (`None` waits indefinitely).
    pub request_timeout: Option<Duration>,
    /// Retries on transport failure (0 = a single attempt).
    pub max_retries: u32,
}

impl Default for AssetSourceOptions {
    fn default() -> Self {
        Self {
            asset_dir: DEFAULT_ASSET_DIR.to_string(),
            request_timeout: None,
            max_retries: 0,
        }
    }
}

/// Reject names that would escape the asset directory.
pub fn validate_asset_name(name: &str) -> Result<()> {
    let path = Path::new(name);
    let escapes = name.is_empty()
        || name.contains('\\')
        || path
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
    if escapes {
        return Err(CloudError::InvalidAssetName(name.to_string()));
    }
    Ok(())
}

/// Assets served over plain HTTP GET.
pub struct HttpAssetSource {
    client: HttpClient,
    base_url: String,
    asset_dir: String,
}

impl HttpAssetSource {
    pub fn new(base_url: &str, options: AssetSourceOptions) -> Result<Self> {
        let client = HttpClient::new(options.request_timeout, options.max_retries)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            asset_dir: options.asset_dir.trim_matches('/').to_string(),
        })
    }

    /// URL an asset name resolves to.
    pub fn url_for(&self, name: &str) -> String {
        if self.asset_dir.is_empty() {
            format!("{}/{}", self.base_url, name)
        } else {
            format!("{}/{}/{}", self.base_url, self.asset_dir, name)
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl AssetSource for HttpAssetSource {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
        async move {
            validate_asset_name(name)?;
            self.client.get_bytes(&self.url_for(name)).await
        }
        .boxed()
    }

    fn location(&self, name: &str) -> String {
        self.url_for(name)
    }
}

/// Assets read from a local directory.
#[derive(Debug, Clone)]
pub struct DirAssetSource {
    root: PathBuf,
}

impl DirAssetSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }
}

impl AssetSource for DirAssetSource {
    fn fetch<'a>(&'a self, name: &'a str) -> BoxFuture<'a, Result<Vec<u8>>> {
        async move {
            validate_asset_name(name)?;
            let path = self.path_for(name);
            let bytes = tokio::fs::read(&path).await?;
            tracing::debug!(path = %path.display(), bytes = bytes.len(), "read asset");
            Ok(bytes)
        }
        .boxed()
    }

    fn location(&self, name: &str) -> String {
        self.path_for(name).display().to_string()
    }
}

/// Fetch an asset and decode it as a multi-band GeoTIFF.
pub async fn fetch_bands<T: RasterElement>(
    source: &dyn AssetSource,
    name: &str,
) -> Result<BandSet<T>> {
    let bytes = source.fetch(name).await?;
    Ok(read_bands_from_buffer(&bytes)?)
}
