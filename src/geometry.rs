//! Shared geodesic helpers
//!
//! All distances in the crate are great-circle (haversine). The model layer
//! works in kilometers; tracker thresholds are expressed in meters, so both
//! units are provided here.

use geo::{Closest, ClosestPoint, Distance, Haversine, LineString, Point};

/// Great-circle distance in kilometers
pub fn haversine_km(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.distance(a, b) / 1000.0
}

/// Great-circle distance in meters
pub fn haversine_m(a: Point<f64>, b: Point<f64>) -> f64 {
    Haversine.distance(a, b)
}

/// Nearest point on a polyline to the given point, with its haversine
/// distance in meters.
///
/// The projection itself is planar (degree space), which is accurate enough
/// at the city scale this crate operates on; the returned distance is
/// geodesic.
pub fn nearest_point_on_line(line: &LineString<f64>, point: Point<f64>) -> Option<(Point<f64>, f64)> {
    match line.closest_point(&point) {
        Closest::Intersection(p) | Closest::SinglePoint(p) => Some((p, haversine_m(point, p))),
        Closest::Indeterminate => None,
    }
}

/// Index of the polyline vertex nearest to the given point
pub fn nearest_vertex_index(line: &LineString<f64>, point: Point<f64>) -> Option<usize> {
    let mut nearest = None;
    let mut min_dist = f64::INFINITY;

    for (idx, coord) in line.coords().enumerate() {
        let dist = haversine_m(point, Point::from(*coord));
        if dist < min_dist {
            min_dist = dist;
            nearest = Some(idx);
        }
    }

    nearest
}
