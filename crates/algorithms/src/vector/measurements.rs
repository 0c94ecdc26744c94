//! Geometric measurements: polygon area and hectares

use geo::{Area, ChamberlainDuquetteArea, Polygon};
use serde::{Deserialize, Serialize};

/// Square meters in one hectare.
pub const SQUARE_METERS_PER_HECTARE: f64 = 10_000.0;

/// How polygon area is measured.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AreaMethod {
    /// Spherical area of lon/lat coordinates, in square meters.
    ///
    /// Chamberlain & Duquette's approximation on the WGS84 equatorial
    /// radius, the same formula web mapping libraries report.
    #[default]
    Geodesic,
    /// Shoelace area in coordinate units squared. Only meaningful in square
    /// meters when the polygon is in a projected metric CRS.
    Planar,
}

/// Calculate the unsigned area of a polygon (holes subtracted).
pub fn polygon_area(polygon: &Polygon<f64>, method: AreaMethod) -> f64 {
    match method {
        AreaMethod::Geodesic => polygon.chamberlain_duquette_unsigned_area(),
        AreaMethod::Planar => polygon.unsigned_area(),
    }
}

/// Polygon area expressed in hectares.
pub fn area_hectares(polygon: &Polygon<f64>, method: AreaMethod) -> f64 {
    polygon_area(polygon, method) / SQUARE_METERS_PER_HECTARE
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use geo::{polygon, LineString};

    #[test]
    fn test_planar_rectangle_hectares() {
        // 200 m x 50 m = 10 000 m² = 1 ha
        let rect = polygon![
            (x: 0.0, y: 0.0),
            (x: 200.0, y: 0.0),
            (x: 200.0, y: 50.0),
            (x: 0.0, y: 50.0),
        ];
        assert_relative_eq!(polygon_area(&rect, AreaMethod::Planar), 10_000.0, epsilon = 1e-9);
        assert_relative_eq!(area_hectares(&rect, AreaMethod::Planar), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_planar_winding_does_not_matter() {
        let ccw = polygon![(x: 0.0, y: 0.0), (x: 10.0, y: 0.0), (x: 10.0, y: 10.0), (x: 0.0, y: 10.0)];
        let cw = polygon![(x: 0.0, y: 0.0), (x: 0.0, y: 10.0), (x: 10.0, y: 10.0), (x: 10.0, y: 0.0)];
        assert_eq!(
            polygon_area(&ccw, AreaMethod::Planar),
            polygon_area(&cw, AreaMethod::Planar)
        );
    }

    #[test]
    fn test_planar_hole_subtracted() {
        let poly = Polygon::new(
            LineString::from(vec![(0.0, 0.0), (100.0, 0.0), (100.0, 100.0), (0.0, 100.0), (0.0, 0.0)]),
            vec![LineString::from(vec![
                (10.0, 10.0), (20.0, 10.0), (20.0, 20.0), (10.0, 20.0), (10.0, 10.0),
            ])],
        );
        assert_relative_eq!(polygon_area(&poly, AreaMethod::Planar), 9_900.0, epsilon = 1e-9);
    }

    #[test]
    fn test_geodesic_small_square_at_equator() {
        // 0.001° x 0.001° at the equator is roughly 111.3 m x 110.6-111.3 m
        let square = polygon![
            (x: 0.0, y: 0.0),
            (x: 0.001, y: 0.0),
            (x: 0.001, y: 0.001),
            (x: 0.0, y: 0.001),
        ];
        let ha = area_hectares(&square, AreaMethod::Geodesic);
        assert!(ha > 1.23 && ha < 1.245, "got {} ha", ha);
    }

    #[test]
    fn test_geodesic_shrinks_with_latitude() {
        let at = |lat: f64| {
            polygon![
                (x: 0.0, y: lat),
                (x: 0.01, y: lat),
                (x: 0.01, y: lat + 0.01),
                (x: 0.0, y: lat + 0.01),
            ]
        };
        let equator = polygon_area(&at(0.0), AreaMethod::Geodesic);
        let north = polygon_area(&at(60.0), AreaMethod::Geodesic);
        assert_relative_eq!(north / equator, 0.5, epsilon = 0.01);
    }
}
