//! Coordinate Reference System handling
//!
//! Only the EPSG code carried by a GeoTIFF's GeoKeyDirectory is tracked.
//! Geographic codes are lon/lat already; UTM codes are converted with the
//! formulas in [`utm`]. Anything else cannot be placed on a web map.

pub mod utm;

use crate::raster::Bounds;
use serde::{Deserialize, Serialize};
use std::fmt;

/// GeographicTypeGeoKey
const GEOGRAPHIC_TYPE_KEY: u16 = 2048;
/// ProjectedCSTypeGeoKey
const PROJECTED_CS_TYPE_KEY: u16 = 3072;
/// "user-defined" marker in GeoKeys
const USER_DEFINED: u16 = 32767;

/// Coordinate Reference System representation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CRS {
    epsg: u32,
    geographic: bool,
}

impl CRS {
    /// Create a CRS from an EPSG code
    pub fn from_epsg(code: u32) -> Self {
        Self {
            epsg: code,
            geographic: code == 4326 || (4000..5000).contains(&code),
        }
    }

    /// WGS84 geographic CRS (EPSG:4326)
    pub fn wgs84() -> Self {
        Self::from_epsg(4326)
    }

    /// Get the EPSG code
    pub fn epsg(&self) -> u32 {
        self.epsg
    }

    /// Whether coordinates are longitude/latitude degrees
    pub fn is_geographic(&self) -> bool {
        self.geographic
    }

    /// Parse a GeoKeyDirectory (tag 34735) as a flat `u16` array.
    ///
    /// Layout: `[version, revision, minor, count, (key_id, location, count, value)*]`.
    /// Only inline keys (location 0) are considered, which is where EPSG
    /// codes live.
    pub fn from_geo_keys(keys: &[u16]) -> Option<Self> {
        if keys.len() < 4 {
            return None;
        }
        let num_keys = keys[3] as usize;
        let mut geographic = None;
        let mut projected = None;

        for entry in keys[4..].chunks_exact(4).take(num_keys) {
            let (key_id, location, value) = (entry[0], entry[1], entry[3]);
            if location != 0 || value == 0 || value == USER_DEFINED {
                continue;
            }
            match key_id {
                PROJECTED_CS_TYPE_KEY => projected = Some(value),
                GEOGRAPHIC_TYPE_KEY => geographic = Some(value),
                _ => {}
            }
        }

        // A projected CRS also carries its base geographic CRS; the
        // projected code is the one coordinates are expressed in.
        projected
            .map(|code| CRS {
                epsg: code as u32,
                geographic: false,
            })
            .or_else(|| geographic.map(|code| CRS::from_epsg(code as u32)))
    }

    /// Convert a coordinate in this CRS to WGS84 (lon, lat).
    ///
    /// `None` when the CRS is neither geographic nor UTM.
    pub fn to_wgs84(&self, x: f64, y: f64) -> Option<(f64, f64)> {
        if self.geographic {
            return Some((x, y));
        }
        let (zone, north) = utm::parse_utm_epsg(self.epsg)?;
        Some(utm::utm_to_wgs84(x, y, zone, north))
    }

    /// Convert a WGS84 (lon, lat) coordinate into this CRS.
    pub fn from_wgs84(&self, lon: f64, lat: f64) -> Option<(f64, f64)> {
        if self.geographic {
            return Some((lon, lat));
        }
        let (zone, north) = utm::parse_utm_epsg(self.epsg)?;
        Some(utm::wgs84_to_utm(lon, lat, zone, north))
    }

    /// Envelope of `bounds` expressed in WGS84 degrees.
    ///
    /// Corners and edge midpoints are converted; UTM edges curve in lon/lat,
    /// so the corners alone can miss the extreme longitude.
    pub fn bounds_to_wgs84(&self, bounds: &Bounds) -> Option<Bounds> {
        if self.geographic {
            return Some(*bounds);
        }
        let (cx, cy) = bounds.center();
        let samples = [
            (bounds.west, bounds.south),
            (bounds.west, bounds.north),
            (bounds.east, bounds.south),
            (bounds.east, bounds.north),
            (cx, bounds.south),
            (cx, bounds.north),
            (bounds.west, cy),
            (bounds.east, cy),
        ];

        let mut out = Bounds::new(f64::MAX, f64::MAX, f64::MIN, f64::MIN);
        for (x, y) in samples {
            let (lon, lat) = self.to_wgs84(x, y)?;
            out.west = out.west.min(lon);
            out.south = out.south.min(lat);
            out.east = out.east.max(lon);
            out.north = out.north.max(lat);
        }
        Some(out)
    }

    /// Get a string identifier for this CRS
    pub fn identifier(&self) -> String {
        format!("EPSG:{}", self.epsg)
    }
}

impl fmt::Display for CRS {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier())
    }
}

impl Default for CRS {
    fn default() -> Self {
        Self::wgs84()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crs_epsg() {
        let crs = CRS::from_epsg(4326);
        assert_eq!(crs.epsg(), 4326);
        assert_eq!(crs.identifier(), "EPSG:4326");
        assert!(crs.is_geographic());
    }

    #[test]
    fn test_geo_keys_geographic() {
        let keys = [1, 1, 0, 2, 1024, 0, 1, 2, 2048, 0, 1, 4326];
        let crs = CRS::from_geo_keys(&keys).unwrap();
        assert_eq!(crs, CRS::wgs84());
    }

    #[test]
    fn test_geo_keys_projected_wins() {
        // UTM 30N declares both its base datum and the projected code
        let keys = [1, 1, 0, 3, 1024, 0, 1, 1, 2048, 0, 1, 4326, 3072, 0, 1, 32630];
        let crs = CRS::from_geo_keys(&keys).unwrap();
        assert_eq!(crs.epsg(), 32630);
        assert!(!crs.is_geographic());
    }

    #[test]
    fn test_utm_bounds_to_wgs84() {
        let crs = CRS::from_epsg(32630);
        let bounds = Bounds::new(440_000.0, 4_470_000.0, 445_000.0, 4_475_000.0);
        let wgs = crs.bounds_to_wgs84(&bounds).unwrap();
        assert!(wgs.is_valid());
        assert!(wgs.west > -3.8 && wgs.east < -3.6, "{:?}", wgs);
        assert!(wgs.south > 40.3 && wgs.north < 40.5, "{:?}", wgs);

        let (x, y) = crs.from_wgs84(-3.7037, 40.4168).unwrap();
        let (lon, lat) = crs.to_wgs84(x, y).unwrap();
        assert!((lon + 3.7037).abs() < 1e-6 && (lat - 40.4168).abs() < 1e-6);
    }

    #[test]
    fn test_unsupported_projection_has_no_wgs84_bounds() {
        let crs = CRS::from_epsg(3857);
        let bounds = Bounds::new(0.0, 0.0, 1.0, 1.0);
        assert!(crs.bounds_to_wgs84(&bounds).is_none());
        assert_eq!(CRS::wgs84().bounds_to_wgs84(&bounds), Some(bounds));
    }

    #[test]
    fn test_geo_keys_user_defined() {
        let keys = [1, 1, 0, 1, 2048, 0, 1, 32767];
        assert!(CRS::from_geo_keys(&keys).is_none());
        assert!(CRS::from_geo_keys(&[1, 1]).is_none());
    }
}
