//! Path flattening and distance accumulation.
//!
//! Walks each polyline of a path independently and produces the ordered list
//! of [`Segment`]s used by completion mapping, plus the flattened point list
//! used by checkpoint projection and partitioning.

use crate::geo_utils::haversine_distance;
use crate::GeoPoint;

/// A consecutive point pair within one polyline.
///
/// Segments never cross a polyline boundary and are recomputed on every call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: GeoPoint,
    pub end: GeoPoint,
    /// Great-circle length in kilometers
    pub distance_km: f64,
}

/// Accumulated distance over a whole path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathDistance {
    /// Sum of every segment distance
    pub total_distance_km: f64,
    /// All segments of polyline 1, then polyline 2, and so on
    pub segments: Vec<Segment>,
}

/// Compute per-pair distances across every polyline.
///
/// Polylines with fewer than 2 points contribute no segments. Polylines are
/// neither reordered nor joined, so the gap between the end of one polyline
/// and the start of the next adds nothing to the total.
///
/// # Example
///
/// ```rust
/// use trail_progress::{GeoPoint, distance::accumulate};
///
/// let path = vec![
///     vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)],
///     vec![GeoPoint::new(5.0, 5.0)],
/// ];
///
/// let acc = accumulate(&path);
/// assert_eq!(acc.segments.len(), 1);
/// assert!((acc.total_distance_km - 111.19).abs() < 0.01);
/// ```
pub fn accumulate<P: AsRef<[GeoPoint]>>(polylines: &[P]) -> PathDistance {
    let mut segments = Vec::new();
    let mut total_distance_km = 0.0;

    for line in polylines {
        for pair in line.as_ref().windows(2) {
            let distance_km = haversine_distance(&pair[0], &pair[1]);
            total_distance_km += distance_km;
            segments.push(Segment {
                start: pair[0],
                end: pair[1],
                distance_km,
            });
        }
    }

    PathDistance { total_distance_km, segments }
}

/// Concatenate every polyline's points in polyline order.
pub fn flatten_points<P: AsRef<[GeoPoint]>>(polylines: &[P]) -> Vec<GeoPoint> {
    let capacity = polylines.iter().map(|l| l.as_ref().len()).sum();
    let mut points = Vec::with_capacity(capacity);
    for line in polylines {
        points.extend_from_slice(line.as_ref());
    }
    points
}

/// Cumulative distance (km) from the first flattened point to each point.
///
/// The step between the last point of one polyline and the first point of
/// the next is zero, matching [`accumulate`]. Non-finite points keep their
/// slot with the running value so far, and the next finite point is measured
/// from the last finite one in the same polyline.
pub fn cumulative_distances<P: AsRef<[GeoPoint]>>(polylines: &[P]) -> Vec<f64> {
    let mut out = Vec::new();
    let mut running = 0.0;

    for line in polylines {
        let mut last_finite: Option<&GeoPoint> = None;
        for p in line.as_ref() {
            if p.is_finite() {
                if let Some(prev) = last_finite {
                    running += haversine_distance(prev, p);
                }
                last_finite = Some(p);
            }
            out.push(running);
        }
    }

    out
}
