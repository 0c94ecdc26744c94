//! Normalized difference vegetation index
//!
//! All functions use the same guarded formula as the per-pixel shader, so a
//! whole-raster NDVI and the overlay colors never disagree.

use ndarray::Array2;
use crate::maybe_rayon::*;
use agrisentinel_core::raster::{Raster, RasterElement};
use agrisentinel_core::{Error, Result};

/// Added to the denominator so `red = nir = 0` stays finite.
pub const NDVI_EPSILON: f64 = 1e-6;

/// NDVI of one pixel: `(nir - red) / (nir + red + ε)`.
///
/// `None` when either sample is missing.
pub fn ndvi_value(red: Option<f64>, nir: Option<f64>) -> Option<f64> {
    let (red, nir) = (red?, nir?);
    Some((nir - red) / (nir + red + NDVI_EPSILON))
}

/// Compute the guarded normalized difference between two bands:
///
/// `(band_a - band_b) / (band_a + band_b + ε)`
///
/// Pixels where either band is no-data are NaN in the output.
///
/// # Arguments
/// * `band_a` - Numerator positive band
/// * `band_b` - Numerator negative band
pub fn normalized_difference<T: RasterElement>(
    band_a: &Raster<T>,
    band_b: &Raster<T>,
) -> Result<Raster<f64>> {
    if band_a.shape() != band_b.shape() {
        return Err(Error::SizeMismatch {
            er: band_a.rows(),
            ec: band_a.cols(),
            ar: band_b.rows(),
            ac: band_b.cols(),
        });
    }

    let (rows, cols) = band_a.shape();

    let data: Vec<f64> = (0..rows)
        .into_par_iter()
        .flat_map(|row| {
            let mut row_data = vec![f64::NAN; cols];
            for (col, out) in row_data.iter_mut().enumerate() {
                // ndvi_value(red, nir) = (nir - red) / ..., so `a` plays NIR
                if let Some(v) = ndvi_value(band_b.sample(row, col), band_a.sample(row, col)) {
                    *out = v;
                }
            }
            row_data
        })
        .collect();

    let array = Array2::from_shape_vec((rows, cols), data).map_err(|e| Error::Other(e.to_string()))?;
    let mut output = band_a.with_same_meta(array)?;
    output.set_nodata(Some(f64::NAN));
    Ok(output)
}

/// Normalized Difference Vegetation Index
///
/// `NDVI = (NIR - Red) / (NIR + Red + ε)`
///
/// Values range from -1 to 1:
/// - Dense vegetation: 0.6 to 0.9
/// - Crops and sparse vegetation: 0.25 to 0.6
/// - Bare soil, water, built-up: below 0.25
///
/// # Arguments
/// * `nir` - Near-infrared band
/// * `red` - Red band
pub fn ndvi<T: RasterElement>(nir: &Raster<T>, red: &Raster<T>) -> Result<Raster<f64>> {
    normalized_difference(nir, red)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agrisentinel_core::GeoTransform;

    fn make_band(rows: usize, cols: usize, value: f64) -> Raster<f64> {
        let mut r = Raster::filled(rows, cols, value);
        r.set_transform(GeoTransform::new(0.0, rows as f64, 1.0, -1.0));
        r
    }

    #[test]
    fn test_ndvi_value_guarded() {
        // red = nir = 0 must not divide by zero
        let v = ndvi_value(Some(0.0), Some(0.0)).unwrap();
        assert_eq!(v, 0.0);
        assert!(ndvi_value(None, Some(0.5)).is_none());
        assert!(ndvi_value(Some(0.5), None).is_none());
    }

    #[test]
    fn test_ndvi() {
        let nir = make_band(5, 5, 0.5);
        let red = make_band(5, 5, 0.1);

        let result = ndvi(&nir, &red).unwrap();
        let val = result.get(2, 2).unwrap();

        let expected = (0.5 - 0.1) / (0.5 + 0.1 + NDVI_EPSILON);
        assert!(
            (val - expected).abs() < 1e-12,
            "Expected {}, got {}",
            expected,
            val
        );
        assert_eq!(result.transform(), nir.transform());
    }

    #[test]
    fn test_ndvi_water() {
        // Water: Red > NIR → negative NDVI
        let nir = make_band(3, 3, 0.05);
        let red = make_band(3, 3, 0.15);

        let val = ndvi(&nir, &red).unwrap().get(1, 1).unwrap();
        assert!(val < 0.0, "Water NDVI should be negative, got {}", val);
    }

    #[test]
    fn test_ndvi_integer_bands() {
        // Sentinel-2 L2A reflectance is stored as u16 (x 10 000)
        let nir = Raster::filled(2, 2, 3000u16);
        let red = Raster::filled(2, 2, 1000u16);
        let val = ndvi(&nir, &red).unwrap().get(0, 0).unwrap();
        assert!((val - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_nodata_propagates() {
        let mut nir = make_band(2, 2, 0.6);
        nir.set(0, 0, f64::NAN).unwrap();
        let red = make_band(2, 2, 0.2);

        let result = ndvi(&nir, &red).unwrap();
        assert!(result.get(0, 0).unwrap().is_nan());
        assert!(!result.get(1, 1).unwrap().is_nan());
    }

    #[test]
    fn test_size_mismatch() {
        let a = make_band(3, 3, 0.5);
        let b = make_band(3, 4, 0.5);
        assert!(matches!(ndvi(&a, &b), Err(Error::SizeMismatch { .. })));
    }
}
