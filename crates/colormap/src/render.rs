//! NDVI-raster-to-RGBA rendering using the class palette.

use crate::classes::{classify, NdviClass};
use agrisentinel_core::raster::{Raster, RasterElement};
use serde::Serialize;

/// Convert an NDVI raster to an RGBA pixel buffer.
///
/// Returns a `Vec<u8>` of length `rows * cols * 4` in row-major order.
/// No-data cells (NaN or the raster's no-data value) are transparent.
pub fn classify_raster_to_rgba<T: RasterElement>(ndvi: &Raster<T>) -> Vec<u8> {
    let nodata = ndvi.nodata();
    let mut rgba = Vec::with_capacity(ndvi.len() * 4);

    for val in ndvi.data().iter() {
        let value = if val.is_nodata(nodata) { None } else { val.to_f64() };
        rgba.extend_from_slice(&classify(value).color().to_array());
    }

    rgba
}

/// Cell counts per class.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ClassCoverage {
    pub no_data: usize,
    pub bare_ground: usize,
    pub cultivated: usize,
    pub forest: usize,
}

impl ClassCoverage {
    /// Cells with a defined NDVI value.
    pub fn valid(&self) -> usize {
        self.bare_ground + self.cultivated + self.forest
    }

    /// Share of valid cells in `class`, in 0..=1. Zero when nothing is valid.
    pub fn fraction(&self, class: NdviClass) -> f64 {
        let valid = self.valid();
        if valid == 0 {
            return 0.0;
        }
        let count = match class {
            NdviClass::NoData => return 0.0,
            NdviClass::BareGround => self.bare_ground,
            NdviClass::Cultivated => self.cultivated,
            NdviClass::Forest => self.forest,
        };
        count as f64 / valid as f64
    }
}

/// Count NDVI cells per class.
pub fn class_coverage<T: RasterElement>(ndvi: &Raster<T>) -> ClassCoverage {
    let nodata = ndvi.nodata();
    let mut coverage = ClassCoverage::default();

    for val in ndvi.data().iter() {
        let value = if val.is_nodata(nodata) { None } else { val.to_f64() };
        match classify(value) {
            NdviClass::NoData => coverage.no_data += 1,
            NdviClass::BareGround => coverage.bare_ground += 1,
            NdviClass::Cultivated => coverage.cultivated += 1,
            NdviClass::Forest => coverage.forest += 1,
        }
    }

    coverage
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_ndvi() -> Raster<f64> {
        Raster::from_vec(vec![0.1, 0.4, 0.8, f64::NAN], 2, 2).unwrap()
    }

    #[test]
    fn rgba_buffer_layout() {
        let rgba = classify_raster_to_rgba(&sample_ndvi());
        assert_eq!(rgba.len(), 16); // 4 pixels * 4 bytes

        assert_eq!(&rgba[0..4], &[210, 180, 140, 180]);
        assert_eq!(&rgba[4..8], &[0, 255, 0, 180]);
        assert_eq!(&rgba[8..12], &[0, 100, 0, 200]);
        assert_eq!(&rgba[12..16], &[0, 0, 0, 0]);
    }

    #[test]
    fn explicit_nodata_is_transparent() {
        let mut r = Raster::from_vec(vec![-2.0f64, 0.9], 1, 2).unwrap();
        r.set_nodata(Some(-2.0));
        let rgba = classify_raster_to_rgba(&r);
        assert_eq!(&rgba[0..4], &[0, 0, 0, 0]);
        assert_eq!(&rgba[4..8], &[0, 100, 0, 200]);
    }

    #[test]
    fn coverage_counts() {
        let cov = class_coverage(&sample_ndvi());
        assert_eq!(
            cov,
            ClassCoverage {
                no_data: 1,
                bare_ground: 1,
                cultivated: 1,
                forest: 1
            }
        );
        assert!((cov.fraction(NdviClass::Forest) - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(cov.fraction(NdviClass::NoData), 0.0);
    }

    #[test]
    fn coverage_all_nodata() {
        let r = Raster::filled(2, 2, f64::NAN);
        let cov = class_coverage(&r);
        assert_eq!(cov.valid(), 0);
        assert_eq!(cov.fraction(NdviClass::Cultivated), 0.0);
    }
}
