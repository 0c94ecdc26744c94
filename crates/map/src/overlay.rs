//! The colorized NDVI layer.

use std::sync::Arc;

use agrisentinel_algorithms::imagery::{
    render_tile, render_tile_projected, BandSelection, NdviShader, TileImage,
};
use agrisentinel_core::raster::{BandSet, Bounds};
use agrisentinel_core::CRS;

/// A decoded raster drawn through the NDVI shader.
///
/// The band data is shared so a renderer can hold it while the map state
/// moves on.
#[derive(Debug, Clone)]
pub struct NdviOverlay {
    asset: String,
    bands: Arc<BandSet<f32>>,
    shader: NdviShader,
    resolution: usize,
    opacity: f64,
}

impl NdviOverlay {
    pub fn new(
        asset: impl Into<String>,
        bands: BandSet<f32>,
        selection: BandSelection,
        resolution: usize,
        opacity: f64,
    ) -> Self {
        Self {
            asset: asset.into(),
            bands: Arc::new(bands),
            shader: NdviShader::new(selection),
            resolution: resolution.max(1),
            opacity: opacity.clamp(0.0, 1.0),
        }
    }

    /// Asset name this overlay was loaded from.
    pub fn asset(&self) -> &str {
        &self.asset
    }

    pub fn bands(&self) -> &BandSet<f32> {
        &self.bands
    }

    pub fn shader(&self) -> &NdviShader {
        &self.shader
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.bands.crs()
    }

    /// Extent in the raster's CRS.
    pub fn bounds(&self) -> Bounds {
        self.bands.bounds()
    }

    /// Extent in lon/lat degrees.
    ///
    /// UTM rasters are reprojected; `None` without a CRS or when the CRS
    /// cannot be converted to lon/lat.
    pub fn geographic_bounds(&self) -> Option<Bounds> {
        let bounds = self.bounds();
        if !bounds.is_valid() {
            return None;
        }
        self.crs()?
            .bounds_to_wgs84(&bounds)
            .filter(|b| b.is_valid())
    }

    /// Render one map tile covering `extent` in lon/lat degrees.
    ///
    /// A raster without a CRS is assumed to be lon/lat already.
    pub fn render(&self, extent: &Bounds) -> TileImage {
        match self.crs().copied() {
            Some(crs) if !crs.is_geographic() => render_tile_projected(
                &self.bands,
                &self.shader,
                extent,
                self.resolution,
                |lon, lat| crs.from_wgs84(lon, lat),
            ),
            _ => render_tile(&self.bands, &self.shader, extent, self.resolution),
        }
    }

    /// Render the whole raster extent on its own grid.
    pub fn render_full(&self) -> TileImage {
        render_tile(&self.bands, &self.shader, &self.bounds(), self.resolution)
    }
}
