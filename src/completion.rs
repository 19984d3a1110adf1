//! Completion-to-geometry mapping.
//!
//! Turns an abstract progress ratio ("8 of 13 sections done") into a target
//! distance and then into the polyline traveled so far.
//!
//! ## Zero target
//!
//! A target of 0 km (or anything non-positive, or NaN) produces an **empty**
//! path, not a single start point. Callers that want a "you are here" marker at
//! 0% draw it from the first checkpoint instead.

use crate::distance::Segment;
use crate::geo_utils::interpolate;
use crate::GeoPoint;

/// Progress ratio supplied by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompletionSpec {
    pub completed_count: u32,
    pub total_count: u32,
}

impl CompletionSpec {
    pub fn new(completed_count: u32, total_count: u32) -> Self {
        Self { completed_count, total_count }
    }

    /// `completed / total` clamped to [0, 1]; 0 when `total_count` is 0.
    pub fn fraction(&self) -> f64 {
        if self.total_count == 0 {
            return 0.0;
        }
        (self.completed_count as f64 / self.total_count as f64).clamp(0.0, 1.0)
    }

    /// Distance (km) corresponding to this ratio of `total_distance_km`.
    pub fn target_distance_km(&self, total_distance_km: f64) -> f64 {
        total_distance_km * self.fraction()
    }
}

/// Build the polyline covering the first `target_distance_km` of the path.
///
/// Segments are consumed in order. Whole segments contribute their end point;
/// the segment where the target falls is split by linear interpolation. The
/// first segment's start point opens the path.
///
/// Returns an empty list when the target is not positive or there are no
/// segments. A target at or beyond the total length yields every segment's
/// end point.
///
/// # Example
///
/// ```rust
/// use trail_progress::{GeoPoint, distance::accumulate, completion::build_completed_path};
///
/// let path = vec![vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)]];
/// let acc = accumulate(&path);
///
/// let half = build_completed_path(&acc.segments, acc.total_distance_km / 2.0);
/// assert_eq!(half.len(), 2);
/// assert!((half[1].longitude - 0.5).abs() < 1e-9);
/// ```
pub fn build_completed_path(segments: &[Segment], target_distance_km: f64) -> Vec<GeoPoint> {
    let mut points = Vec::new();
    if target_distance_km.is_nan() || target_distance_km <= 0.0 {
        return points;
    }

    // Summed in the same order as `accumulate`, so a target equal to the
    // total consumes every segment whole.
    let mut covered = 0.0;

    for segment in segments {
        if covered >= target_distance_km {
            break;
        }

        if points.is_empty() {
            points.push(segment.start);
        }

        if covered + segment.distance_km <= target_distance_km {
            points.push(segment.end);
            covered += segment.distance_km;
        } else {
            let fraction = (target_distance_km - covered) / segment.distance_km;
            points.push(interpolate(&segment.start, &segment.end, fraction));
            covered = target_distance_km;
        }
    }

    points
}
