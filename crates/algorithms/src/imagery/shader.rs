//! Per-pixel NDVI shader.

use agrisentinel_colormap::{classify, NdviClass, Rgba};
use agrisentinel_core::raster::{BandSet, RasterElement};

use super::bands::BandSelection;
use super::indices::ndvi_value;

/// Maps one pixel's band samples to an overlay color.
///
/// Configured once per raster load with the resolved red/NIR indices. Pure
/// and deterministic: the same samples always give the same color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NdviShader {
    selection: BandSelection,
}

impl NdviShader {
    pub fn new(selection: BandSelection) -> Self {
        Self { selection }
    }

    pub fn selection(&self) -> BandSelection {
        self.selection
    }

    /// NDVI of a sample vector indexed by band, `None` if red or NIR is missing.
    pub fn ndvi(&self, values: &[Option<f64>]) -> Option<f64> {
        let red = values.get(self.selection.red).copied().flatten();
        let nir = values.get(self.selection.nir).copied().flatten();
        ndvi_value(red, nir)
    }

    /// Vegetation class of a sample vector.
    pub fn class(&self, values: &[Option<f64>]) -> NdviClass {
        classify(self.ndvi(values))
    }

    /// Overlay color of a sample vector; transparent when a sample is missing.
    pub fn shade(&self, values: &[Option<f64>]) -> Rgba {
        self.class(values).color()
    }

    /// Overlay color as a CSS `rgba()` string.
    pub fn shade_css(&self, values: &[Option<f64>]) -> String {
        self.shade(values).to_css()
    }

    /// Overlay color of cell (row, col), reading only the two selected bands.
    pub fn shade_cell<T: RasterElement>(&self, bands: &BandSet<T>, row: usize, col: usize) -> Rgba {
        let red = bands.sample(self.selection.red, row, col);
        let nir = bands.sample(self.selection.nir, row, col);
        classify(ndvi_value(red, nir)).color()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s2_shader() -> NdviShader {
        NdviShader::new(BandSelection { red: 3, nir: 7 })
    }

    fn pixel(red: f64, nir: f64) -> Vec<Option<f64>> {
        let mut v = vec![Some(0.0); 8];
        v[3] = Some(red);
        v[7] = Some(nir);
        v
    }

    #[test]
    fn test_classes_from_samples() {
        let shader = s2_shader();
        // ndvi ≈ 0.0
        assert_eq!(shader.class(&pixel(0.3, 0.3)), NdviClass::BareGround);
        // ndvi ≈ 0.4
        assert_eq!(shader.class(&pixel(0.3, 0.7)), NdviClass::Cultivated);
        // ndvi ≈ 0.8
        assert_eq!(shader.class(&pixel(0.1, 0.9)), NdviClass::Forest);
    }

    #[test]
    fn test_missing_sample_is_transparent() {
        let shader = s2_shader();
        let mut values = pixel(0.1, 0.9);
        values[7] = None;
        assert_eq!(shader.shade(&values), Rgba::TRANSPARENT);
        assert_eq!(shader.shade_css(&values), "rgba(0,0,0,0)");
        // shorter than the selected indices
        assert_eq!(shader.shade(&[Some(1.0)]), Rgba::TRANSPARENT);
    }

    #[test]
    fn test_zero_reflectance_is_deterministic() {
        let shader = s2_shader();
        let a = shader.shade_css(&pixel(0.0, 0.0));
        let b = shader.shade_css(&pixel(0.0, 0.0));
        assert_eq!(a, b);
        assert_eq!(a, "rgba(210,180,140,0.7058823529411765)");
    }

    #[test]
    fn test_shade_cell_matches_shade() {
        let data: Vec<f32> = vec![0.1, 0.9, 0.3, 0.35];
        let bands = BandSet::from_interleaved(&data, 1, 2, 2).unwrap();
        let shader = NdviShader::new(BandSelection { red: 0, nir: 1 });
        for col in 0..2 {
            assert_eq!(
                shader.shade_cell(&bands, 0, col),
                shader.shade(&bands.pixel(0, col))
            );
        }
        assert_eq!(shader.shade_cell(&bands, 0, 0), NdviClass::Forest.color());
    }
}
