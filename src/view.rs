//! Render-ready trail view.
//!
//! [`TrailView::build`] runs the whole pipeline (accumulate, complete,
//! project, partition) over one trail and collects everything a map layer
//! needs to draw it.

use log::{debug, warn};

use crate::checkpoints::project_checkpoints_aligned;
use crate::completion::{build_completed_path, CompletionSpec};
use crate::distance::{accumulate, flatten_points};
use crate::geo_utils::compute_bounds;
use crate::partition::{partition_path, Partition, SegmentLabels, SegmentStyle};
use crate::{Bounds, Checkpoint, GeoPoint, TrailPath};

/// Configuration for view assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailConfig {
    /// Colors and tooltip wording for segments
    pub style: SegmentStyle,
    /// Drop path points with NaN/infinite coordinates before any distance
    /// is computed. When false they are kept, the total distance comes out
    /// NaN and the completed path is empty. Default: true
    pub skip_non_finite_points: bool,
}

impl Default for TrailConfig {
    fn default() -> Self {
        Self {
            style: SegmentStyle::default(),
            skip_non_finite_points: true,
        }
    }
}

/// Everything the dashboard supplies for one trail.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrailInput {
    pub path: TrailPath,
    /// Checkpoints in path order, start to end
    pub checkpoints: Vec<Checkpoint>,
    pub completion: CompletionSpec,
    pub labels: SegmentLabels,
}

/// A checkpoint placed on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckpointMarker {
    pub name: String,
    /// Checkpoint tooltip, or its name when none was given
    pub tooltip: String,
    /// Where the checkpoint itself is
    pub location: GeoPoint,
    /// Index of the path point it projected to
    pub path_index: usize,
}

/// Render-ready description of one trail.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailView {
    pub name: Option<String>,
    /// The full track, polylines kept apart
    pub full_path: Vec<Vec<GeoPoint>>,
    /// Traveled portion, see [`build_completed_path`]
    pub completed_path: Vec<GeoPoint>,
    pub partition: Partition,
    /// Finite checkpoints with their projected path index
    pub markers: Vec<CheckpointMarker>,
    pub total_distance_km: f64,
    pub target_distance_km: f64,
    /// Clamped completion ratio in [0, 1]
    pub completion_fraction: f64,
    /// Bounds of the full path; `None` for an empty path
    pub bounds: Option<Bounds>,
}

impl TrailView {
    /// Run the pipeline for one trail.
    ///
    /// Never fails: empty paths, missing checkpoints and invalid coordinates
    /// all degrade to an emptier view.
    pub fn build(input: &TrailInput, config: &TrailConfig) -> Self {
        let full_path: Vec<Vec<GeoPoint>> = if config.skip_non_finite_points {
            input
                .path
                .polylines
                .iter()
                .map(|line| line.iter().copied().filter(GeoPoint::is_finite).collect())
                .collect()
        } else {
            input.path.polylines.clone()
        };

        let dropped = input.path.point_count() - full_path.iter().map(Vec::len).sum::<usize>();
        if dropped > 0 {
            warn!("[TrailView] Dropped {} non-finite path points", dropped);
        }

        let accumulated = accumulate(&full_path);
        let completion_fraction = input.completion.fraction();
        let target_distance_km = input.completion.target_distance_km(accumulated.total_distance_km);
        let completed_path = build_completed_path(&accumulated.segments, target_distance_km);

        let flattened = flatten_points(&full_path);
        let projected = project_checkpoints_aligned(&input.checkpoints, &flattened);

        let markers: Vec<CheckpointMarker> = input
            .checkpoints
            .iter()
            .zip(&projected)
            .filter_map(|(checkpoint, index)| {
                index.map(|path_index| CheckpointMarker {
                    name: checkpoint.name.clone(),
                    tooltip: checkpoint.tooltip.clone().unwrap_or_else(|| checkpoint.name.clone()),
                    location: checkpoint.location(),
                    path_index,
                })
            })
            .collect();

        if markers.len() < input.checkpoints.len() {
            debug!(
                "[TrailView] Skipped {} checkpoints with invalid coordinates",
                input.checkpoints.len() - markers.len()
            );
        }

        let indices: Vec<usize> = markers.iter().map(|m| m.path_index).collect();
        let partition = partition_path(&indices, &flattened, &input.labels, &config.style);

        debug!(
            "[TrailView] {} points, {} segments, {:.2}/{:.2} km, {} partitions ({})",
            flattened.len(),
            accumulated.segments.len(),
            target_distance_km,
            accumulated.total_distance_km,
            partition.len(),
            if partition.is_fallback() { "fallback" } else { "geometric" }
        );

        Self {
            name: input.path.name.clone(),
            bounds: compute_bounds(&flattened),
            full_path,
            completed_path,
            partition,
            markers,
            total_distance_km: accumulated.total_distance_km,
            target_distance_km,
            completion_fraction,
        }
    }

    /// Whether the progress ratio is full.
    pub fn is_complete(&self) -> bool {
        self.completion_fraction >= 1.0
    }
}

/// Build views for several trails in order.
pub fn build_views(inputs: &[TrailInput], config: &TrailConfig) -> Vec<TrailView> {
    inputs.iter().map(|input| TrailView::build(input, config)).collect()
}

/// Build views for several trails using rayon. Output order matches input.
#[cfg(feature = "parallel")]
pub fn build_views_parallel(inputs: &[TrailInput], config: &TrailConfig) -> Vec<TrailView> {
    use rayon::prelude::*;

    log::info!("[TrailView] Building {} views in parallel", inputs.len());
    inputs
        .par_iter()
        .map(|input| TrailView::build(input, config))
        .collect()
}
