//! Rasterising an extent through the NDVI shader.
//!
//! The overlay is never rendered at the source resolution. Each map tile is
//! sampled on a coarse `resolution x resolution` grid and the host scales the
//! result up; a higher resolution is sharper but calls the shader more often.

use agrisentinel_colormap::Rgba;
use agrisentinel_core::raster::{BandSet, Bounds, RasterElement};

use super::shader::NdviShader;

/// Samples per tile edge when nothing else is configured.
pub const DEFAULT_RESOLUTION: usize = 64;

/// RGBA image, row-major, 4 bytes per pixel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl TileImage {
    /// Color of output pixel (x, y)
    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgba> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some(Rgba::new(self.rgba[i], self.rgba[i + 1], self.rgba[i + 2], self.rgba[i + 3]))
    }

    /// Whether every pixel is fully transparent
    pub fn is_blank(&self) -> bool {
        self.rgba.chunks_exact(4).all(|px| px[3] == 0)
    }
}

/// Render `extent` (in the raster's CRS) through `shader`.
///
/// Each output pixel takes the raster cell under its center; pixels outside
/// the raster are transparent. `resolution` is clamped to at least 1.
pub fn render_tile<T: RasterElement>(
    bands: &BandSet<T>,
    shader: &NdviShader,
    extent: &Bounds,
    resolution: usize,
) -> TileImage {
    render_tile_projected(bands, shader, extent, resolution, |x, y| Some((x, y)))
}

/// Render `extent` given in another CRS than the raster.
///
/// `to_raster` maps each sample center from the extent's CRS into the
/// raster's; samples it cannot map are transparent.
pub fn render_tile_projected<T, P>(
    bands: &BandSet<T>,
    shader: &NdviShader,
    extent: &Bounds,
    resolution: usize,
    to_raster: P,
) -> TileImage
where
    T: RasterElement,
    P: Fn(f64, f64) -> Option<(f64, f64)>,
{
    let res = resolution.max(1);
    let (rows, cols) = bands.shape();
    let transform = bands.transform();
    let step_x = extent.width() / res as f64;
    let step_y = extent.height() / res as f64;

    let mut rgba = Vec::with_capacity(res * res * 4);
    for i in 0..res {
        let y = extent.north - (i as f64 + 0.5) * step_y;
        for j in 0..res {
            let x = extent.west + (j as f64 + 0.5) * step_x;
            let cell = to_raster(x, y).map(|(rx, ry)| transform.geo_to_pixel(rx, ry));
            let color = match cell {
                Some((col, row))
                    if col >= 0.0 && row >= 0.0 && (col as usize) < cols && (row as usize) < rows =>
                {
                    shader.shade_cell(bands, row as usize, col as usize)
                }
                _ => Rgba::TRANSPARENT,
            };
            rgba.extend_from_slice(&color.to_array());
        }
    }

    TileImage {
        width: res,
        height: res,
        rgba,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imagery::BandSelection;
    use agrisentinel_colormap::NdviClass;
    use agrisentinel_core::GeoTransform;

    /// 2x2 raster over [0, 2] x [0, 2]: left column forest, right column bare
    fn bands() -> BandSet<f64> {
        // (red, nir) per pixel
        let data = [0.1, 0.9, 0.4, 0.4, 0.1, 0.9, 0.4, 0.4];
        let mut set = BandSet::from_interleaved(&data, 2, 2, 2).unwrap();
        set.set_georeference(GeoTransform::new(0.0, 2.0, 1.0, -1.0), None);
        set
    }

    fn shader() -> NdviShader {
        NdviShader::new(BandSelection { red: 0, nir: 1 })
    }

    #[test]
    fn test_full_extent() {
        let set = bands();
        let img = render_tile(&set, &shader(), &set.bounds(), 4);
        assert_eq!((img.width, img.height), (4, 4));
        assert_eq!(img.rgba.len(), 64);
        assert_eq!(img.pixel(0, 0), Some(NdviClass::Forest.color()));
        assert_eq!(img.pixel(3, 3), Some(NdviClass::BareGround.color()));
    }

    #[test]
    fn test_outside_is_transparent() {
        let set = bands();
        let far = Bounds::new(10.0, 10.0, 12.0, 12.0);
        let img = render_tile(&set, &shader(), &far, 8);
        assert!(img.is_blank());
    }

    #[test]
    fn test_half_overlap() {
        let set = bands();
        // right half of the tile hangs off the raster's east edge
        let extent = Bounds::new(1.0, 0.0, 3.0, 2.0);
        let img = render_tile(&set, &shader(), &extent, 2);
        assert_eq!(img.pixel(0, 0), Some(NdviClass::BareGround.color()));
        assert_eq!(img.pixel(1, 0), Some(Rgba::TRANSPARENT));
    }

    #[test]
    fn test_projected_extent() {
        let set = bands();
        // extent expressed in units ten times larger than the raster's
        let extent = Bounds::new(0.0, 0.0, 0.2, 0.2);
        let img =
            render_tile_projected(&set, &shader(), &extent, 2, |x, y| Some((x * 10.0, y * 10.0)));
        assert_eq!(img.pixel(0, 0), Some(NdviClass::Forest.color()));
        assert_eq!(img.pixel(1, 1), Some(NdviClass::BareGround.color()));

        let unmapped = render_tile_projected(&set, &shader(), &extent, 2, |_, _| None);
        assert!(unmapped.is_blank());
    }

    #[test]
    fn test_zero_resolution_clamped() {
        let set = bands();
        let img = render_tile(&set, &shader(), &set.bounds(), 0);
        assert_eq!((img.width, img.height), (1, 1));
    }
}
