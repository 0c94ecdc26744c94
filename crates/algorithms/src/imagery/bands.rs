//! Choosing which bands act as red and near-infrared.

use agrisentinel_core::raster::{BandSet, RasterElement};
use agrisentinel_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Sentinel-2 B4 (red) as a 0-based band index.
pub const PREFERRED_RED_BAND: usize = 3;
/// Sentinel-2 B8 (NIR) as a 0-based band index.
pub const PREFERRED_NIR_BAND: usize = 7;

/// Band indices used as the red and near-infrared inputs of the NDVI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandSelection {
    pub red: usize,
    pub nir: usize,
}

impl Default for BandSelection {
    fn default() -> Self {
        Self {
            red: PREFERRED_RED_BAND,
            nir: PREFERRED_NIR_BAND,
        }
    }
}

impl BandSelection {
    /// Resolve the preferred indices against a raster with `band_count` bands.
    ///
    /// A missing red band falls back to band 0 and a missing NIR band to the
    /// last band. With a single band both roles read band 0 and every pixel
    /// classifies as bare ground; that is accepted rather than rejected.
    pub fn resolve(preferred: BandSelection, band_count: usize) -> Result<Self> {
        if band_count == 0 {
            return Err(Error::NoBands);
        }
        let red = if preferred.red < band_count { preferred.red } else { 0 };
        let nir = if preferred.nir < band_count {
            preferred.nir
        } else {
            band_count - 1
        };
        Ok(Self { red, nir })
    }

    /// Resolve against a decoded band set.
    pub fn for_bands<T: RasterElement>(preferred: BandSelection, bands: &BandSet<T>) -> Result<Self> {
        Self::resolve(preferred, bands.len())
    }

    /// Whether the selection fell back to fewer than two distinct bands.
    pub fn is_degenerate(&self) -> bool {
        self.red == self.nir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sentinel2_stack() {
        let sel = BandSelection::resolve(BandSelection::default(), 13).unwrap();
        assert_eq!(sel, BandSelection { red: 3, nir: 7 });
        assert!(!sel.is_degenerate());
    }

    #[test]
    fn test_four_band_fallback() {
        // RGBN-like: red index 3 exists, NIR 7 does not -> last band
        let sel = BandSelection::resolve(BandSelection::default(), 4).unwrap();
        assert_eq!(sel, BandSelection { red: 3, nir: 3 });
    }

    #[test]
    fn test_three_band_fallback() {
        let sel = BandSelection::resolve(BandSelection::default(), 3).unwrap();
        assert_eq!(sel, BandSelection { red: 0, nir: 2 });
    }

    #[test]
    fn test_single_band() {
        let sel = BandSelection::resolve(BandSelection::default(), 1).unwrap();
        assert_eq!(sel, BandSelection { red: 0, nir: 0 });
        assert!(sel.is_degenerate());
    }

    #[test]
    fn test_no_bands() {
        assert!(matches!(
            BandSelection::resolve(BandSelection::default(), 0),
            Err(Error::NoBands)
        ));
    }
}
