//! Widget configuration.
//!
//! Every field has a default, so an empty TOML document is a valid
//! configuration:
//!
//! ```toml
//! base_url = "https://agrisentinel.example"
//! resolution = 128
//! area_method = "planar"
//!
//! [bands]
//! red = 2
//! nir = 3
//! ```

use std::time::Duration;

use agrisentinel_algorithms::imagery::{BandSelection, DEFAULT_RESOLUTION};
use agrisentinel_algorithms::vector::AreaMethod;
use agrisentinel_cloud::{AssetSourceOptions, DEFAULT_ASSET_DIR};
use serde::{Deserialize, Serialize};

use crate::error::Result;

pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png";
pub const OSM_ATTRIBUTION: &str = "&copy; OpenStreetMap contributors";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    /// Origin serving the raster assets.
    pub base_url: String,
    /// Directory under `base_url` holding the rasters.
    pub asset_dir: String,
    /// Base layer URL template.
    pub tile_url: String,
    pub attribution: String,
    pub initial_zoom: f64,
    /// Zoom cap when fitting the viewport to an overlay.
    pub fit_max_zoom: f64,
    /// Shader samples per tile edge.
    pub resolution: usize,
    /// Overlay opacity in 0..=1.
    pub opacity: f64,
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub area_method: AreaMethod,
    /// Preferred red/NIR band indices before fallback.
    pub bands: BandSelection,
    /// Fetch timeout in milliseconds; unset means no timeout.
    pub request_timeout_ms: Option<u64>,
    pub max_retries: u32,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            asset_dir: DEFAULT_ASSET_DIR.to_string(),
            tile_url: OSM_TILE_URL.to_string(),
            attribution: OSM_ATTRIBUTION.to_string(),
            initial_zoom: 15.0,
            fit_max_zoom: 17.0,
            resolution: DEFAULT_RESOLUTION,
            opacity: 0.6,
            viewport_width: 1024,
            viewport_height: 500,
            area_method: AreaMethod::default(),
            bands: BandSelection::default(),
            request_timeout_ms: None,
            max_retries: 0,
        }
    }
}

impl MapConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Transport options for an HTTP asset source.
    pub fn asset_source_options(&self) -> AssetSourceOptions {
        AssetSourceOptions {
            asset_dir: self.asset_dir.clone(),
            request_timeout: self.request_timeout_ms.map(Duration::from_millis),
            max_retries: self.max_retries,
        }
    }
}
