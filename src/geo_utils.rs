//! # Geographic Utilities
//!
//! Geometry primitives shared by every stage of the trail pipeline.
//!
//! ## Overview
//!
//! | Function | Description |
//! |----------|-------------|
//! | [`haversine_distance`] | Great-circle distance between two points, in kilometers |
//! | [`interpolate`] | Linear lat/lon interpolation between two points |
//! | [`polyline_length`] | Total length of a polyline in kilometers |
//! | [`compute_bounds`] | Bounding box of a set of points |
//! | [`compute_center`] | Centroid of a set of points |
//!
//! ## Example
//!
//! ```rust
//! use trail_progress::{GeoPoint, geo_utils};
//!
//! let track = vec![
//!     GeoPoint::new(-15.9340, -50.1400),  // Cidade de Goiás
//!     GeoPoint::new(-15.9200, -50.1300),
//!     GeoPoint::new(-15.9100, -50.1150),
//! ];
//!
//! let length = geo_utils::polyline_length(&track);
//! println!("Track length: {:.2} km", length);
//!
//! let bounds = geo_utils::compute_bounds(&track).unwrap();
//! println!("Bounds: {:.4} to {:.4}", bounds.min_lat, bounds.max_lat);
//! ```
//!
//! ## Algorithm Notes
//!
//! ### Haversine Formula
//!
//! Distances use the haversine great-circle formula on a sphere of radius
//! 6371 km. The intermediate `sqrt(h)` is clamped to 1 before `asin`, since
//! rounding can push it slightly above 1 for antipodal points.
//!
//! ### Interpolation
//!
//! [`interpolate`] works on latitude and longitude independently. At trail
//! scale (segments of a few hundred meters) the error against a true
//! great-circle interpolation is negligible.

use geo::{BoundingRect, Coord, LineString};

use crate::{Bounds, GeoPoint};

/// Mean Earth radius used by [`haversine_distance`].
pub const EARTH_RADIUS_KM: f64 = 6371.0;

// =============================================================================
// Distance Functions
// =============================================================================

/// Calculate the great-circle distance between two points using the Haversine formula.
///
/// # Arguments
///
/// * `a` - First point
/// * `b` - Second point
///
/// # Returns
///
/// Distance in kilometers. Symmetric, and zero for equal points. Non-finite
/// input propagates as NaN; callers filter such points upstream.
///
/// # Example
///
/// ```rust
/// use trail_progress::{GeoPoint, geo_utils};
///
/// let a = GeoPoint::new(0.0, 0.0);
/// let b = GeoPoint::new(0.0, 1.0);
///
/// let distance = geo_utils::haversine_distance(&a, &b);
/// assert!((distance - 111.195).abs() < 0.01); // one degree at the equator
/// ```
#[inline]
pub fn haversine_distance(a: &GeoPoint, b: &GeoPoint) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let dlat = (b.latitude - a.latitude).to_radians();
    let dlng = (b.longitude - a.longitude).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlng / 2.0).sin().powi(2);

    2.0 * EARTH_RADIUS_KM * h.sqrt().clamp(0.0, 1.0).asin()
}

/// Point at `fraction` of the way from `start` to `end`.
///
/// Latitude and longitude are interpolated independently. A fraction of 0
/// returns `start`, 1 returns `end`; values outside [0, 1] extrapolate.
#[inline]
pub fn interpolate(start: &GeoPoint, end: &GeoPoint, fraction: f64) -> GeoPoint {
    GeoPoint::new(
        start.latitude + (end.latitude - start.latitude) * fraction,
        start.longitude + (end.longitude - start.longitude) * fraction,
    )
}

/// Calculate the total length of a polyline.
///
/// # Arguments
///
/// * `points` - Slice of points forming the polyline
///
/// # Returns
///
/// Total length in kilometers. Empty or single-point polylines return 0.0.
pub fn polyline_length(points: &[GeoPoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }

    points
        .windows(2)
        .map(|w| haversine_distance(&w[0], &w[1]))
        .sum()
}

// =============================================================================
// Bounding Box Functions
// =============================================================================

/// Compute the bounding box of a set of points.
///
/// # Arguments
///
/// * `points` - Slice of points, typically a flattened trail
///
/// # Returns
///
/// A [`Bounds`] over the finite points. Non-finite points are ignored, and
/// `None` is returned when nothing finite is left so the map layer can skip
/// fitting.
///
/// # Example
///
/// ```rust
/// use trail_progress::{GeoPoint, geo_utils};
///
/// let track = vec![
///     GeoPoint::new(-15.95, -50.14),
///     GeoPoint::new(-15.90, -50.10),
///     GeoPoint::new(-15.92, -50.12),
/// ];
///
/// let bounds = geo_utils::compute_bounds(&track).unwrap();
/// assert_eq!(bounds.min_lat, -15.95);
/// assert_eq!(bounds.max_lat, -15.90);
/// assert_eq!(bounds.min_lng, -50.14);
/// assert_eq!(bounds.max_lng, -50.10);
/// ```
pub fn compute_bounds(points: &[GeoPoint]) -> Option<Bounds> {
    let line: LineString<f64> = points
        .iter()
        .filter(|p| p.is_finite())
        .map(|p| Coord { x: p.longitude, y: p.latitude })
        .collect();

    let rect = line.bounding_rect()?;

    Some(Bounds {
        min_lat: rect.min().y,
        max_lat: rect.max().y,
        min_lng: rect.min().x,
        max_lng: rect.max().x,
    })
}

/// Compute the arithmetic centroid of a set of points.
///
/// Returns (0, 0) for empty input. Not meaningful for sets crossing the
/// antimeridian, which trails in scope never do.
pub fn compute_center(points: &[GeoPoint]) -> GeoPoint {
    if points.is_empty() {
        return GeoPoint::new(0.0, 0.0);
    }

    let sum_lat: f64 = points.iter().map(|p| p.latitude).sum();
    let sum_lng: f64 = points.iter().map(|p| p.longitude).sum();
    let n = points.len() as f64;

    GeoPoint::new(sum_lat / n, sum_lng / n)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use geo::{Distance, Haversine, Point};

    fn approx_eq(a: f64, b: f64, epsilon: f64) -> bool {
        (a - b).abs() < epsilon
    }

    #[test]
    fn test_haversine_distance_same_point() {
        let p = GeoPoint::new(-15.9340, -50.1400);
        assert_eq!(haversine_distance(&p, &p), 0.0);
    }

    #[test]
    fn test_haversine_distance_one_degree_equator() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 1.0);
        assert!(approx_eq(haversine_distance(&a, &b), 111.19, 0.01));
    }

    #[test]
    fn test_haversine_distance_symmetric() {
        let a = GeoPoint::new(-15.9340, -50.1400);
        let b = GeoPoint::new(-16.3280, -48.9530);
        assert_eq!(haversine_distance(&a, &b), haversine_distance(&b, &a));
    }

    #[test]
    fn test_haversine_distance_antipodal_is_finite() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(0.0, 180.0);
        let d = haversine_distance(&a, &b);
        assert!(d.is_finite());
        assert!(approx_eq(d, std::f64::consts::PI * EARTH_RADIUS_KM, 1e-6));
    }

    #[test]
    fn test_haversine_distance_agrees_with_geo() {
        // geo uses a 6371.0088 km mean radius, so allow a small relative gap
        let a = GeoPoint::new(-15.9340, -50.1400);
        let b = GeoPoint::new(-15.4570, -49.5890);
        let ours = haversine_distance(&a, &b);
        let reference = Haversine::distance(
            Point::new(a.longitude, a.latitude),
            Point::new(b.longitude, b.latitude),
        ) / 1000.0;
        assert!(approx_eq(ours, reference, reference * 1e-5));
    }

    #[test]
    fn test_haversine_distance_nan_propagates() {
        let a = GeoPoint::new(f64::NAN, 0.0);
        let b = GeoPoint::new(0.0, 0.0);
        assert!(haversine_distance(&a, &b).is_nan());
        assert!(haversine_distance(&b, &GeoPoint::new(0.0, f64::INFINITY)).is_nan());
    }

    #[test]
    fn test_polyline_length_with_nan_is_nan() {
        // Must not collapse to a half circumference (~20015 km)
        let track = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(f64::NAN, 0.5), GeoPoint::new(0.0, 1.0)];
        assert!(polyline_length(&track).is_nan());
    }

    #[test]
    fn test_triangle_inequality() {
        let a = GeoPoint::new(-15.9340, -50.1400);
        let b = GeoPoint::new(-15.7000, -49.8000);
        let c = GeoPoint::new(-15.4570, -49.5890);
        let direct = haversine_distance(&a, &c);
        let via = haversine_distance(&a, &b) + haversine_distance(&b, &c);
        assert!(direct <= via + 1e-9);
    }

    #[test]
    fn test_interpolate_midpoint() {
        let a = GeoPoint::new(0.0, 0.0);
        let b = GeoPoint::new(2.0, 4.0);
        let mid = interpolate(&a, &b, 0.5);
        assert_eq!(mid, GeoPoint::new(1.0, 2.0));
        assert_eq!(interpolate(&a, &b, 0.0), a);
        assert_eq!(interpolate(&a, &b, 1.0), b);
    }

    #[test]
    fn test_polyline_length_empty_and_single() {
        assert_eq!(polyline_length(&[]), 0.0);
        assert_eq!(polyline_length(&[GeoPoint::new(1.0, 1.0)]), 0.0);
    }

    #[test]
    fn test_polyline_length_two_points() {
        let track = vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)];
        assert!(approx_eq(polyline_length(&track), 111.19, 0.01));
    }

    #[test]
    fn test_compute_bounds_skips_non_finite() {
        let track = vec![
            GeoPoint::new(-15.95, -50.14),
            GeoPoint::new(f64::NAN, 10.0),
            GeoPoint::new(-15.90, -50.10),
        ];
        let bounds = compute_bounds(&track).unwrap();
        assert_eq!(bounds.min_lat, -15.95);
        assert_eq!(bounds.max_lng, -50.10);
    }

    #[test]
    fn test_compute_bounds_empty() {
        assert!(compute_bounds(&[]).is_none());
    }

    #[test]
    fn test_compute_center() {
        let track = vec![GeoPoint::new(-15.90, -50.10), GeoPoint::new(-15.92, -50.12)];
        let center = compute_center(&track);
        assert!(approx_eq(center.latitude, -15.91, 0.001));
        assert!(approx_eq(center.longitude, -50.11, 0.001));
    }

    #[test]
    fn test_compute_center_empty() {
        let center = compute_center(&[]);
        assert_eq!(center, GeoPoint::new(0.0, 0.0));
    }
}
