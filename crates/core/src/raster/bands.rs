//! Multi-band rasters

use crate::crs::CRS;
use crate::error::{Error, Result};
use crate::raster::{Bounds, GeoTransform, Raster, RasterElement};

/// An ordered set of same-shaped bands decoded from one asset.
///
/// Band `i` is the `i`-th sample of each pixel in the source file (0-based).
/// All bands share one geotransform, CRS and no-data value.
#[derive(Debug, Clone)]
pub struct BandSet<T: RasterElement> {
    bands: Vec<Raster<T>>,
}

impl<T: RasterElement> BandSet<T> {
    /// Build a band set, checking that every band has the shape of the first.
    pub fn new(bands: Vec<Raster<T>>) -> Result<Self> {
        let first = bands.first().ok_or(Error::NoBands)?;
        let (er, ec) = first.shape();
        if let Some(bad) = bands.iter().find(|b| b.shape() != (er, ec)) {
            let (ar, ac) = bad.shape();
            return Err(Error::SizeMismatch { er, ec, ar, ac });
        }
        Ok(Self { bands })
    }

    /// Split pixel-interleaved samples (`RGBRGB...`) into bands.
    pub fn from_interleaved(data: &[T], rows: usize, cols: usize, samples: usize) -> Result<Self> {
        if samples == 0 || data.len() != rows * cols * samples {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        let bands = (0..samples)
            .map(|b| {
                let band: Vec<T> = data.iter().skip(b).step_by(samples).copied().collect();
                Raster::from_vec(band, rows, cols)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(bands)
    }

    /// Split band-sequential samples (`RRR...GGG...`) into bands.
    pub fn from_planar(data: &[T], rows: usize, cols: usize, samples: usize) -> Result<Self> {
        let plane = rows * cols;
        if samples == 0 || data.len() != plane * samples {
            return Err(Error::InvalidDimensions {
                width: cols,
                height: rows,
            });
        }
        let bands = data
            .chunks_exact(plane)
            .map(|chunk| Raster::from_vec(chunk.to_vec(), rows, cols))
            .collect::<Result<Vec<_>>>()?;
        Self::new(bands)
    }

    /// Number of bands (always at least one)
    pub fn len(&self) -> usize {
        self.bands.len()
    }

    /// Always false; kept for API symmetry with collections
    pub fn is_empty(&self) -> bool {
        self.bands.is_empty()
    }

    /// Whether band `index` exists
    pub fn has_band(&self, index: usize) -> bool {
        index < self.bands.len()
    }

    /// Band by 0-based index
    pub fn band(&self, index: usize) -> Option<&Raster<T>> {
        self.bands.get(index)
    }

    pub fn bands(&self) -> &[Raster<T>] {
        &self.bands
    }

    /// Dimensions as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.bands[0].shape()
    }

    pub fn transform(&self) -> &GeoTransform {
        self.bands[0].transform()
    }

    pub fn crs(&self) -> Option<&CRS> {
        self.bands[0].crs()
    }

    pub fn bounds(&self) -> Bounds {
        self.bands[0].bounds()
    }

    /// Apply georeferencing to every band
    pub fn set_georeference(&mut self, transform: GeoTransform, crs: Option<CRS>) {
        for band in &mut self.bands {
            band.set_transform(transform);
            band.set_crs(crs);
        }
    }

    /// Apply a no-data value to every band
    pub fn set_nodata(&mut self, nodata: Option<T>) {
        for band in &mut self.bands {
            band.set_nodata(nodata);
        }
    }

    /// One sample of one band; `None` for a missing band, out-of-range cell or no-data
    pub fn sample(&self, band: usize, row: usize, col: usize) -> Option<f64> {
        self.bands.get(band)?.sample(row, col)
    }

    /// Sample vector of a pixel, indexed by band
    pub fn pixel(&self, row: usize, col: usize) -> Vec<Option<f64>> {
        self.bands.iter().map(|b| b.sample(row, col)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interleaved_split() {
        // 1x2 pixels, 3 samples each
        let data = [1u16, 2, 3, 10, 20, 30];
        let set = BandSet::from_interleaved(&data, 1, 2, 3).unwrap();
        assert_eq!(set.len(), 3);
        assert_eq!(set.band(1).unwrap().get(0, 1).unwrap(), 20);
        assert_eq!(set.pixel(0, 0), vec![Some(1.0), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn test_planar_split() {
        let data = [1u16, 10, 2, 20];
        let set = BandSet::from_planar(&data, 1, 2, 2).unwrap();
        assert_eq!(set.band(0).unwrap().get(0, 1).unwrap(), 10);
        assert_eq!(set.band(1).unwrap().get(0, 0).unwrap(), 2);
    }

    #[test]
    fn test_empty_and_mismatched() {
        assert!(matches!(BandSet::<f32>::new(vec![]), Err(Error::NoBands)));
        let a = Raster::<f32>::new(2, 2);
        let b = Raster::<f32>::new(2, 3);
        assert!(matches!(BandSet::new(vec![a, b]), Err(Error::SizeMismatch { .. })));
    }

    #[test]
    fn test_missing_band_sample() {
        let set = BandSet::from_interleaved(&[5.0f32], 1, 1, 1).unwrap();
        assert_eq!(set.sample(0, 0, 0), Some(5.0));
        assert_eq!(set.sample(3, 0, 0), None);
        assert!(!set.has_band(1));
    }
}
