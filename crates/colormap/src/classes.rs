//! NDVI vegetation classes and their palette.

use serde::Serialize;

/// Upper bound (exclusive) of the bare-ground class.
pub const BARE_GROUND_MAX: f64 = 0.25;
/// Upper bound (exclusive) of the cultivated class.
pub const CULTIVATED_MAX: f64 = 0.60;

/// RGBA color with every channel in 0..=255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Fully transparent black (used for nodata).
    pub const TRANSPARENT: Self = Self::new(0, 0, 0, 0);

    /// Alpha as a 0..=1 fraction.
    pub fn alpha_fraction(&self) -> f64 {
        self.a as f64 / 255.0
    }

    /// CSS `rgba()` string with alpha scaled into 0..=1.
    ///
    /// Alpha uses the shortest float representation, so 180 renders as
    /// `0.7058823529411765` and 0 as `0`.
    pub fn to_css(&self) -> String {
        format!("rgba({},{},{},{})", self.r, self.g, self.b, self.alpha_fraction())
    }

    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Vegetation class of an NDVI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NdviClass {
    /// Undefined or NaN index
    NoData,
    /// NDVI below 0.25: bare soil, water, built-up
    BareGround,
    /// NDVI in [0.25, 0.60): crops and sparse vegetation
    Cultivated,
    /// NDVI of 0.60 and above: dense canopy
    Forest,
}

impl NdviClass {
    /// All classes in palette order, useful for legends.
    pub const ALL: &[NdviClass] = &[
        Self::NoData,
        Self::BareGround,
        Self::Cultivated,
        Self::Forest,
    ];

    /// Human-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::NoData => "No data",
            Self::BareGround => "Bare ground",
            Self::Cultivated => "Cultivated zone",
            Self::Forest => "Forest zone",
        }
    }

    /// Overlay color for the class.
    pub fn color(&self) -> Rgba {
        match self {
            Self::NoData => Rgba::TRANSPARENT,
            Self::BareGround => Rgba::new(210, 180, 140, 180), // #D2B48C
            Self::Cultivated => Rgba::new(0, 255, 0, 180),     // #00FF00
            Self::Forest => Rgba::new(0, 100, 0, 200),         // #006400
        }
    }
}

/// Classify a normalized-difference value.
///
/// `None` and NaN are [`NdviClass::NoData`]; everything else lands in one of
/// the three vegetation classes. Infinite values follow the comparisons, so
/// `-inf` is bare ground and `+inf` forest.
pub fn classify(value: Option<f64>) -> NdviClass {
    match value {
        None => NdviClass::NoData,
        Some(v) if v.is_nan() => NdviClass::NoData,
        Some(v) if v < BARE_GROUND_MAX => NdviClass::BareGround,
        Some(v) if v < CULTIVATED_MAX => NdviClass::Cultivated,
        Some(_) => NdviClass::Forest,
    }
}

/// One legend row for a host UI.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub class: NdviClass,
    pub label: &'static str,
    pub css: String,
}

/// Legend for the vegetation classes (no-data omitted, it is never drawn).
pub fn legend() -> Vec<LegendEntry> {
    NdviClass::ALL
        .iter()
        .filter(|c| **c != NdviClass::NoData)
        .map(|&class| LegendEntry {
            class,
            label: class.label(),
            css: class.color().to_css(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thresholds() {
        assert_eq!(classify(Some(-1.0)), NdviClass::BareGround);
        assert_eq!(classify(Some(0.0)), NdviClass::BareGround);
        assert_eq!(classify(Some(0.2499)), NdviClass::BareGround);
        assert_eq!(classify(Some(0.25)), NdviClass::Cultivated);
        assert_eq!(classify(Some(0.5999)), NdviClass::Cultivated);
        assert_eq!(classify(Some(0.60)), NdviClass::Forest);
        assert_eq!(classify(Some(1.0)), NdviClass::Forest);
    }

    #[test]
    fn undefined_is_transparent() {
        assert_eq!(classify(None), NdviClass::NoData);
        assert_eq!(classify(Some(f64::NAN)), NdviClass::NoData);
        assert_eq!(NdviClass::NoData.color(), Rgba::TRANSPARENT);
    }

    #[test]
    fn infinities_follow_comparisons() {
        assert_eq!(classify(Some(f64::NEG_INFINITY)), NdviClass::BareGround);
        assert_eq!(classify(Some(f64::INFINITY)), NdviClass::Forest);
    }

    #[test]
    fn css_strings() {
        assert_eq!(Rgba::TRANSPARENT.to_css(), "rgba(0,0,0,0)");
        assert_eq!(
            NdviClass::BareGround.color().to_css(),
            "rgba(210,180,140,0.7058823529411765)"
        );
        assert_eq!(
            NdviClass::Forest.color().to_css(),
            "rgba(0,100,0,0.7843137254901961)"
        );
        assert_eq!(Rgba::new(1, 2, 3, 255).to_css(), "rgba(1,2,3,1)");
    }

    #[test]
    fn legend_skips_nodata() {
        let entries = legend();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].label, "Bare ground");
        assert_eq!(entries[2].class, NdviClass::Forest);
    }

    #[test]
    fn class_serializes_snake_case() {
        let json = serde_json::to_string(&NdviClass::BareGround).unwrap();
        assert_eq!(json, "\"bare_ground\"");
    }
}
