//! Simple-polygon check used by the drawing tool.

use geo::{Intersects, Line, Polygon};

/// Whether the exterior ring of `polygon` is simple: at least three distinct
/// vertices and no two non-adjacent edges touching.
pub fn is_simple(polygon: &Polygon<f64>) -> bool {
    let edges: Vec<Line<f64>> = polygon
        .exterior()
        .lines()
        .filter(|l| l.start != l.end)
        .collect();
    let n = edges.len();
    if n < 3 {
        return false;
    }

    for i in 0..n {
        for j in (i + 1)..n {
            // consecutive edges share a vertex; so do the first and last
            let adjacent = j == i + 1 || (i == 0 && j == n - 1);
            if adjacent {
                continue;
            }
            if edges[i].intersects(&edges[j]) {
                return false;
            }
        }
    }
    true
}
