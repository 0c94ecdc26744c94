//! Viewport: center, zoom and pixel size of the visible map.

use agrisentinel_core::raster::Bounds;

use crate::coord::GeoCoordinate;

/// Web-mercator tile edge in pixels.
const TILE_SIZE: f64 = 256.0;
/// Latitude limit of the web-mercator projection.
const MAX_LATITUDE: f64 = 85.051_128_779_806_6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub center: GeoCoordinate,
    pub zoom: f64,
    pub width_px: u32,
    pub height_px: u32,
}

impl Viewport {
    pub fn new(center: GeoCoordinate, zoom: f64, width_px: u32, height_px: u32) -> Self {
        Self {
            center,
            zoom,
            width_px,
            height_px,
        }
    }

    /// Center on `bounds` (lon/lat degrees) at the largest whole zoom that
    /// shows all of it, capped at `max_zoom`.
    ///
    /// Invalid or out-of-range bounds leave the viewport unchanged and
    /// return `false`.
    pub fn fit_bounds(&mut self, bounds: &Bounds, max_zoom: f64) -> bool {
        if !bounds.is_valid() {
            return false;
        }
        let (lon, lat) = bounds.center();
        let Ok(center) = GeoCoordinate::new(lat, lon) else {
            return false;
        };

        let dx = (bounds.east - bounds.west) / 360.0;
        let dy = (mercator_y(bounds.north) - mercator_y(bounds.south)).abs();
        let zoom_for = |extent: f64, px: u32| {
            if extent <= 0.0 {
                f64::INFINITY
            } else {
                (px as f64 / (TILE_SIZE * extent)).log2()
            }
        };
        let zoom = zoom_for(dx, self.width_px)
            .min(zoom_for(dy, self.height_px))
            .floor()
            .clamp(0.0, max_zoom);

        self.center = center;
        self.zoom = zoom;
        true
    }
}

/// Normalized web-mercator y in 0..=1 (north up).
fn mercator_y(lat: f64) -> f64 {
    let lat = lat.clamp(-MAX_LATITUDE, MAX_LATITUDE).to_radians();
    0.5 - (lat.tan() + 1.0 / lat.cos()).ln() / (2.0 * std::f64::consts::PI)
}
