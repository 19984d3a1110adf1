//! Checkpoint projection and marker snapping.
//!
//! ## Ordered projection
//!
//! [`project_checkpoints`] matches checkpoints to path indices in traversal
//! order. The search for each checkpoint starts at the index found for the
//! previous one, so the returned sequence never decreases even when a later
//! checkpoint lies geometrically closer to an earlier part of the path (loops,
//! out-and-back sections).
//!
//! **Precondition:** checkpoints are supplied in path order, start to end.
//! There is no general way to verify this, so it is not checked.
//!
//! ## Unordered snapping
//!
//! [`PathIndex`] answers "which path point is nearest to this marker" for
//! markers with no ordering relation to the trail (establishments, services).
//! It is backed by an R-tree over the flattened path.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use crate::distance::{cumulative_distances, flatten_points};
use crate::geo_utils::haversine_distance;
use crate::{Checkpoint, GeoPoint};

/// Project checkpoints onto the flattened path, one index per finite checkpoint.
///
/// Checkpoints with non-finite coordinates are skipped and produce no output
/// entry, so the result may be shorter than the input. Use
/// [`project_checkpoints_aligned`] to keep positions aligned.
///
/// Ties go to the first minimal point in scan order. With an empty path every
/// checkpoint projects to index 0.
///
/// # Example
///
/// ```rust
/// use trail_progress::{Checkpoint, GeoPoint, checkpoints::project_checkpoints};
///
/// let path: Vec<GeoPoint> = (0..=4).map(|i| GeoPoint::new(0.0, i as f64 * 0.01)).collect();
/// let checkpoints = vec![
///     Checkpoint::new(0.0, 0.0, "Start"),
///     Checkpoint::new(0.0, 0.021, "Middle"),
///     Checkpoint::new(0.0, 0.04, "End"),
/// ];
///
/// assert_eq!(project_checkpoints(&checkpoints, &path), vec![0, 2, 4]);
/// ```
pub fn project_checkpoints(checkpoints: &[Checkpoint], flattened: &[GeoPoint]) -> Vec<usize> {
    project_checkpoints_aligned(checkpoints, flattened)
        .into_iter()
        .flatten()
        .collect()
}

/// Like [`project_checkpoints`] but aligned 1:1 with the input.
///
/// Non-finite checkpoints yield `None` and do not advance the search start.
pub fn project_checkpoints_aligned(
    checkpoints: &[Checkpoint],
    flattened: &[GeoPoint],
) -> Vec<Option<usize>> {
    let mut last_index = 0;

    checkpoints
        .iter()
        .map(|checkpoint| {
            if !checkpoint.is_finite() {
                return None;
            }
            last_index = nearest_index_from(&checkpoint.location(), flattened, last_index);
            Some(last_index)
        })
        .collect()
}

/// Index of the point in `points[from..]` nearest to `target`.
///
/// Returns `from` when the suffix is empty.
fn nearest_index_from(target: &GeoPoint, points: &[GeoPoint], from: usize) -> usize {
    let mut best_index = from;
    let mut best_distance = f64::INFINITY;

    for (offset, point) in points.iter().skip(from).enumerate() {
        let d = haversine_distance(target, point);
        // Strict comparison keeps the first minimum
        if d < best_distance {
            best_distance = d;
            best_index = from + offset;
        }
    }

    best_index
}

// =============================================================================
// R-tree Indexed Path for Marker Snapping
// =============================================================================

/// A path point with its flattened index, in scaled planar coordinates.
#[derive(Debug, Clone, Copy)]
struct IndexedPoint {
    idx: usize,
    y: f64,
    x: f64,
}

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.y, self.x])
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dy = self.y - point[0];
        let dx = self.x - point[1];
        dy * dy + dx * dx
    }
}

/// Result of snapping a marker to the trail.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnappedMarker {
    /// Index into the flattened path
    pub path_index: usize,
    /// The path point itself
    pub point: GeoPoint,
    /// Great-circle distance from the marker to `point`, in km
    pub offset_km: f64,
    /// Distance along the trail from its first point to `point`, in km
    pub along_trail_km: f64,
}

/// Nearest-point index over a flattened path.
///
/// Longitudes are scaled by the cosine of the path's mean latitude so the
/// planar R-tree metric tracks ground distance at trail scale. The reported
/// offset is always recomputed with the haversine formula.
pub struct PathIndex {
    tree: RTree<IndexedPoint>,
    points: Vec<GeoPoint>,
    cumulative_km: Vec<f64>,
    lng_scale: f64,
}

impl PathIndex {
    /// Build an index over a multi-polyline path. Non-finite points are left
    /// out of the tree but keep their flattened index slot.
    pub fn new<P: AsRef<[GeoPoint]>>(polylines: &[P]) -> Self {
        let points = flatten_points(polylines);
        let cumulative_km = cumulative_distances(polylines);

        let finite: Vec<&GeoPoint> = points.iter().filter(|p| p.is_finite()).collect();
        let mean_lat = if finite.is_empty() {
            0.0
        } else {
            finite.iter().map(|p| p.latitude).sum::<f64>() / finite.len() as f64
        };
        let lng_scale = mean_lat.to_radians().cos().max(0.1);

        let indexed: Vec<IndexedPoint> = points
            .iter()
            .enumerate()
            .filter(|(_, p)| p.is_finite())
            .map(|(idx, p)| IndexedPoint {
                idx,
                y: p.latitude,
                x: p.longitude * lng_scale,
            })
            .collect();

        Self {
            tree: RTree::bulk_load(indexed),
            points,
            cumulative_km,
            lng_scale,
        }
    }

    /// Number of indexed path points.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// Snap a marker to its nearest path point.
    ///
    /// Returns `None` for non-finite markers or an empty path.
    pub fn snap(&self, marker: &GeoPoint) -> Option<SnappedMarker> {
        if !marker.is_finite() {
            return None;
        }

        let query = [marker.latitude, marker.longitude * self.lng_scale];
        let nearest = self.tree.nearest_neighbor(&query)?;
        let point = self.points[nearest.idx];

        Some(SnappedMarker {
            path_index: nearest.idx,
            point,
            offset_km: haversine_distance(marker, &point),
            along_trail_km: self.cumulative_km[nearest.idx],
        })
    }

    /// Snap every marker, keeping input alignment.
    pub fn snap_all(&self, markers: &[GeoPoint]) -> Vec<Option<SnappedMarker>> {
        markers.iter().map(|m| self.snap(m)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<GeoPoint> {
        (0..n).map(|i| GeoPoint::new(-15.9, -50.1 + i as f64 * 0.001)).collect()
    }

    #[test]
    fn test_projection_in_order() {
        let path = line(11);
        let checkpoints = vec![
            Checkpoint::new(-15.9, -50.1, "A"),
            Checkpoint::new(-15.9001, -50.095, "B"),
            Checkpoint::new(-15.9, -50.09, "C"),
        ];
        assert_eq!(project_checkpoints(&checkpoints, &path), vec![0, 5, 10]);
    }

    #[test]
    fn test_projection_never_goes_backwards() {
        let path = line(11);
        // Second checkpoint is nearest to index 2, but must not go before 6
        let checkpoints = vec![
            Checkpoint::new(-15.9, -50.094, "A"),
            Checkpoint::new(-15.9, -50.098, "B"),
        ];
        let indices = project_checkpoints(&checkpoints, &path);
        assert_eq!(indices, vec![6, 6]);
    }

    #[test]
    fn test_projection_loop_prefers_later_pass() {
        // Out and back: the return leg revisits the same points
        let mut path = line(6);
        let mut back = line(6);
        back.reverse();
        path.extend(back);
        let checkpoints = vec![
            Checkpoint::new(-15.9, -50.095, "Turnaround"),
            Checkpoint::new(-15.9, -50.1, "Finish"),
        ];
        let indices = project_checkpoints(&checkpoints, &path);
        assert_eq!(indices[0], 5);
        assert_eq!(indices[1], 11);
    }

    #[test]
    fn test_ties_pick_first() {
        let p = GeoPoint::new(0.0, 0.0);
        let path = vec![p, p, p];
        let checkpoints = vec![Checkpoint::new(0.0, 0.0, "A")];
        assert_eq!(project_checkpoints(&checkpoints, &path), vec![0]);
    }

    #[test]
    fn test_non_finite_checkpoints_skipped() {
        let path = line(5);
        let checkpoints = vec![
            Checkpoint::new(f64::NAN, -50.1, "bad"),
            Checkpoint::new(-15.9, -50.096, "good"),
            Checkpoint::new(-15.9, f64::INFINITY, "bad"),
        ];
        assert_eq!(project_checkpoints(&checkpoints, &path), vec![4]);
        assert_eq!(
            project_checkpoints_aligned(&checkpoints, &path),
            vec![None, Some(4), None]
        );
    }

    #[test]
    fn test_empty_path_defaults_to_zero() {
        let checkpoints = vec![Checkpoint::new(0.0, 0.0, "A"), Checkpoint::new(1.0, 1.0, "B")];
        assert_eq!(project_checkpoints(&checkpoints, &[]), vec![0, 0]);
    }

    #[test]
    fn test_path_index_snap() {
        let path = vec![line(11)];
        let index = PathIndex::new(&path);
        assert_eq!(index.len(), 11);

        let snapped = index.snap(&GeoPoint::new(-15.901, -50.0969)).unwrap();
        assert_eq!(snapped.path_index, 3);
        assert!(snapped.offset_km > 0.1 && snapped.offset_km < 0.2);
        assert!((snapped.along_trail_km - crate::geo_utils::polyline_length(&path[0][..4])).abs() < 1e-9);
    }

    #[test]
    fn test_path_index_rejects_non_finite() {
        let index = PathIndex::new(&[line(3)]);
        assert!(index.snap(&GeoPoint::new(f64::NAN, 0.0)).is_none());
    }

    #[test]
    fn test_path_index_empty() {
        let empty: Vec<Vec<GeoPoint>> = vec![];
        let index = PathIndex::new(&empty);
        assert!(index.is_empty());
        assert!(index.snap(&GeoPoint::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn test_path_index_non_finite_point_keeps_slot() {
        let points = vec![
            GeoPoint::new(-15.9, -50.100),
            GeoPoint::new(f64::NAN, -50.099),
            GeoPoint::new(-15.9, -50.098),
            GeoPoint::new(-15.9, -50.097),
        ];
        let index = PathIndex::new(&[points.clone()]);
        assert_eq!(index.len(), 3);

        let snapped = index.snap(&GeoPoint::new(-15.9, -50.097)).unwrap();
        assert_eq!(snapped.path_index, 3);
        let expected = haversine_distance(&points[0], &points[2]) + haversine_distance(&points[2], &points[3]);
        assert!((snapped.along_trail_km - expected).abs() < 1e-9);
        assert!(snapped.along_trail_km < 0.5);
    }

    #[test]
    fn test_path_index_snap_all_aligned() {
        let index = PathIndex::new(&[line(11)]);
        let markers = vec![
            GeoPoint::new(-15.8995, -50.099),
            GeoPoint::new(f64::NAN, -50.095),
            GeoPoint::new(-15.9005, -50.091),
        ];
        let snapped = index.snap_all(&markers);
        assert_eq!(snapped.len(), 3);
        assert_eq!(snapped[0].map(|s| s.path_index), Some(1));
        assert!(snapped[1].is_none());
        assert_eq!(snapped[2].map(|s| s.path_index), Some(9));
        assert!(snapped[0].unwrap().along_trail_km < snapped[2].unwrap().along_trail_km);
    }
}
