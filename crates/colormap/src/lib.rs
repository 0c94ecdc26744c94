//! # AgriSentinel Colormap
//!
//! NDVI classification and raster-to-RGBA rendering.
//!
//! NDVI values fall into one of three vegetation classes (plus "no data"),
//! each with a fixed, partially transparent RGBA color meant to be drawn
//! over a base map. The main entry points are [`classify`] for a single
//! value and [`classify_raster_to_rgba`] for a whole NDVI raster.
//!
//! ## Usage
//!
//! ```ignore
//! use agrisentinel_colormap::{classify, NdviClass};
//!
//! let class = classify(Some(0.42));
//! assert_eq!(class, NdviClass::Cultivated);
//! assert_eq!(class.color().to_css(), "rgba(0,255,0,0.7058823529411765)");
//! ```

mod classes;
mod render;

pub use classes::{classify, legend, LegendEntry, NdviClass, Rgba, BARE_GROUND_MAX, CULTIVATED_MAX};
pub use render::{class_coverage, classify_raster_to_rgba, ClassCoverage};
