//! # Trail Progress
//!
//! Geometry behind the trail map of the Caminho de Cora dashboard.
//!
//! Given a trail path (one or more polylines), its checkpoints and a progress
//! ratio, this library computes:
//! - the completed sub-path ("distance traveled so far"),
//! - the projection of each checkpoint onto the path, in traversal order,
//! - a partition of the path into named, colored segments between checkpoints.
//!
//! Everything here is pure and synchronous. Fetching the data and drawing the
//! map belong to the caller; see [`render::TrailRenderer`] for the seam.
//!
//! ## Features
//!
//! - **`serde`** - GeoJSON track ingestion and GeoJSON export of views
//! - **`parallel`** - Build independent views with rayon
//! - **`full`** - Enable all features
//!
//! ## Quick Start
//!
//! ```rust
//! use trail_progress::{
//!     Checkpoint, CompletionSpec, GeoPoint, SegmentLabels, TrailConfig, TrailInput, TrailPath,
//!     TrailView,
//! };
//!
//! let path = TrailPath::single(vec![GeoPoint::new(0.0, 0.0), GeoPoint::new(0.0, 1.0)]);
//! let input = TrailInput {
//!     path,
//!     checkpoints: vec![
//!         Checkpoint::new(0.0, 0.0, "Start"),
//!         Checkpoint::new(0.0, 1.0, "End"),
//!     ],
//!     completion: CompletionSpec::new(1, 2),
//!     labels: SegmentLabels::new(["Trecho 1"]),
//! };
//!
//! let view = TrailView::build(&input, &TrailConfig::default());
//! println!(
//!     "{:.1} of {:.1} km, {} segments",
//!     view.target_distance_km,
//!     view.total_distance_km,
//!     view.partition.len()
//! );
//! ```

pub mod geo_utils;

// Path flattening and per-segment distances
pub mod distance;
pub use distance::{accumulate, flatten_points, PathDistance, Segment};

// Progress ratio to completed sub-path
pub mod completion;
pub use completion::{build_completed_path, CompletionSpec};

// Checkpoint projection and marker snapping
pub mod checkpoints;
pub use checkpoints::{project_checkpoints, project_checkpoints_aligned, PathIndex, SnappedMarker};

// Segment partition and labelling
pub mod partition;
pub use partition::{
    partition_path, partition_segments, NamedSegment, Partition, SegmentLabels, SegmentStyle,
    TrailSegment,
};

// Render-ready view assembly
pub mod view;
pub use view::{build_views, CheckpointMarker, TrailConfig, TrailInput, TrailView};

#[cfg(feature = "parallel")]
pub use view::build_views_parallel;

// Renderer lifecycle seam
pub mod render;
pub use render::{RenderSession, TrailRenderer};

pub mod error;
pub use error::{Result, TrailError};

// GeoJSON ingestion and export
#[cfg(feature = "serde")]
pub mod geojson_io;

#[cfg(feature = "serde")]
pub use geojson_io::{parse_checkpoints, parse_track_document};

// ============================================================================
// Core Types
// ============================================================================

/// A geographic coordinate in decimal degrees.
///
/// # Example
/// ```
/// use trail_progress::GeoPoint;
/// let point = GeoPoint::new(-15.9340, -50.1400); // Cidade de Goiás
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a new point.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Both coordinates are finite numbers. This is the only check the
    /// geometry pipeline applies.
    pub fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }

    /// Finite and within the WGS84 latitude/longitude range.
    pub fn is_valid(&self) -> bool {
        self.is_finite()
            && self.latitude >= -90.0
            && self.latitude <= 90.0
            && self.longitude >= -180.0
            && self.longitude <= 180.0
    }
}

/// Bounding box of a path, used to fit the map view.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl Bounds {
    /// Get the center point of the bounds.
    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }
}

/// A full trail track: one or more polylines, possibly disjoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrailPath {
    /// Track name from the source document, if any
    pub name: Option<String>,
    pub polylines: Vec<Vec<GeoPoint>>,
}

impl TrailPath {
    pub fn new(polylines: Vec<Vec<GeoPoint>>) -> Self {
        Self { name: None, polylines }
    }

    /// A path made of a single polyline.
    pub fn single(points: Vec<GeoPoint>) -> Self {
        Self::new(vec![points])
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// All points in polyline order.
    pub fn flatten(&self) -> Vec<GeoPoint> {
        flatten_points(&self.polylines)
    }

    pub fn point_count(&self) -> usize {
        self.polylines.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    /// Total length in kilometers.
    pub fn length_km(&self) -> f64 {
        accumulate(&self.polylines).total_distance_km
    }

    pub fn bounds(&self) -> Option<Bounds> {
        geo_utils::compute_bounds(&self.flatten())
    }
}

/// A named point of interest along the trail.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Checkpoint {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub tooltip: Option<String>,
}

impl Checkpoint {
    pub fn new(latitude: f64, longitude: f64, name: impl Into<String>) -> Self {
        Self {
            latitude,
            longitude,
            name: name.into(),
            tooltip: None,
        }
    }

    pub fn with_tooltip(mut self, tooltip: impl Into<String>) -> Self {
        self.tooltip = Some(tooltip.into());
        self
    }

    pub fn location(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub fn is_finite(&self) -> bool {
        self.location().is_finite()
    }
}

/// Per-segment completion flag from the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentStatus {
    #[cfg_attr(feature = "serde", serde(default))]
    pub completed: bool,
}

impl SegmentStatus {
    pub fn completed() -> Self {
        Self { completed: true }
    }

    pub fn pending() -> Self {
        Self { completed: false }
    }
}

impl From<bool> for SegmentStatus {
    fn from(completed: bool) -> Self {
        Self { completed }
    }
}

// ============================================================================
// Tests
// ============================================================================
