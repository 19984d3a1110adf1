//! Segment partition and labelling.
//!
//! Consecutive checkpoint indices cut the flattened path into named trail
//! segments. Each segment gets a completion flag, a display color and a
//! tooltip from caller-supplied status data.
//!
//! The result is a tagged [`Partition`]: [`Partition::Geometric`] when the path
//! was sliced between checkpoints, [`Partition::Fallback`] when no checkpoints
//! were available and only the named list could be produced.

use crate::{GeoPoint, SegmentStatus};

/// Styling for labelled segments.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentStyle {
    /// Colors for completed segments, cycled by segment index.
    /// Default: eight distinct hues
    pub palette: Vec<String>,
    /// Flat color for segments never traveled. Default: "#9ca3af"
    pub not_completed_color: String,
    /// Appended as "{name} - {suffix}" to tooltips of segments never traveled.
    /// Default: "Nunca percorrido"
    pub never_traveled_suffix: String,
}

impl Default for SegmentStyle {
    fn default() -> Self {
        Self {
            palette: [
                "#16a34a", "#2563eb", "#d97706", "#9333ea",
                "#dc2626", "#0891b2", "#65a30d", "#db2777",
            ]
            .iter()
            .map(|c| c.to_string())
            .collect(),
            not_completed_color: "#9ca3af".to_string(),
            never_traveled_suffix: "Nunca percorrido".to_string(),
        }
    }
}

impl SegmentStyle {
    fn color_for(&self, index: usize, completed: bool) -> String {
        if completed && !self.palette.is_empty() {
            self.palette[index % self.palette.len()].clone()
        } else {
            self.not_completed_color.clone()
        }
    }

    fn tooltip_for(&self, name: &str, completed: bool, custom: Option<&str>) -> String {
        match custom {
            Some(text) if !text.is_empty() => text.to_string(),
            _ if completed => name.to_string(),
            _ => format!("{} - {}", name, self.never_traveled_suffix),
        }
    }
}

/// Caller-supplied labels, all indexed by segment position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SegmentLabels {
    /// Display names; the number of names bounds the number of segments
    pub names: Vec<String>,
    /// Completion flags; missing entries count as not completed
    pub status: Vec<SegmentStatus>,
    /// Tooltip overrides; missing or empty entries are synthesized
    pub tooltips: Vec<String>,
}

impl SegmentLabels {
    pub fn new<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Self {
            names: names.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: Vec<SegmentStatus>) -> Self {
        self.status = status;
        self
    }

    pub fn with_tooltips<S: Into<String>>(mut self, tooltips: impl IntoIterator<Item = S>) -> Self {
        self.tooltips = tooltips.into_iter().map(Into::into).collect();
        self
    }

    fn is_completed(&self, index: usize) -> bool {
        self.status.get(index).map_or(false, |s| s.completed)
    }

    fn tooltip_override(&self, index: usize) -> Option<&str> {
        self.tooltips.get(index).map(String::as_str)
    }
}

/// A drawable segment between two checkpoints.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailSegment {
    /// Stable identifier, "segment-{index}"
    pub id: String,
    /// Position in the label lists
    pub index: usize,
    pub name: String,
    /// Path points from one checkpoint to the next, both ends included
    pub points: Vec<GeoPoint>,
    pub completed: bool,
    pub color: String,
    pub tooltip: String,
}

/// A named segment without geometry (no checkpoints to cut the path).
#[derive(Debug, Clone, PartialEq)]
pub struct NamedSegment {
    pub id: String,
    pub index: usize,
    pub name: String,
    pub completed: bool,
    pub color: String,
    pub tooltip: String,
}

/// How the path was partitioned.
#[derive(Debug, Clone, PartialEq)]
pub enum Partition {
    /// Path sliced between consecutive checkpoints
    Geometric(Vec<TrailSegment>),
    /// No checkpoints: one entry per name, nothing to draw
    Fallback(Vec<NamedSegment>),
}

impl Partition {
    pub fn is_fallback(&self) -> bool {
        matches!(self, Partition::Fallback(_))
    }

    pub fn len(&self) -> usize {
        match self {
            Partition::Geometric(segments) => segments.len(),
            Partition::Fallback(named) => named.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drawable segments; empty in fallback mode.
    pub fn segments(&self) -> &[TrailSegment] {
        match self {
            Partition::Geometric(segments) => segments,
            Partition::Fallback(_) => &[],
        }
    }
}

fn segment_id(index: usize) -> String {
    format!("segment-{}", index)
}

/// Slice the flattened path between consecutive checkpoint indices.
///
/// At most `min(names, indices - 1)` segments are considered; slices with
/// fewer than 2 points after clamping are dropped. Excess names or gaps are
/// ignored.
///
/// # Example
///
/// ```rust
/// use trail_progress::{GeoPoint, SegmentStatus};
/// use trail_progress::partition::{partition_segments, SegmentLabels, SegmentStyle};
///
/// let path: Vec<GeoPoint> = (0..5).map(|i| GeoPoint::new(0.0, i as f64)).collect();
/// let labels = SegmentLabels::new(["Trecho 1", "Trecho 2"])
///     .with_status(vec![SegmentStatus::completed()]);
///
/// let segments = partition_segments(&[0, 2, 4], &path, &labels, &SegmentStyle::default());
/// assert_eq!(segments.len(), 2);
/// assert_eq!(segments[0].points.len(), 3);
/// assert_eq!(segments[1].tooltip, "Trecho 2 - Nunca percorrido");
/// ```
pub fn partition_segments(
    checkpoint_indices: &[usize],
    flattened: &[GeoPoint],
    labels: &SegmentLabels,
    style: &SegmentStyle,
) -> Vec<TrailSegment> {
    let gaps = checkpoint_indices.len().saturating_sub(1);
    let count = labels.names.len().min(gaps);
    let mut segments = Vec::with_capacity(count);

    if flattened.is_empty() {
        return segments;
    }
    let last = flattened.len() - 1;

    for i in 0..count {
        let start = checkpoint_indices[i].min(last);
        let end = checkpoint_indices[i + 1].min(last);
        if end <= start {
            continue;
        }

        let completed = labels.is_completed(i);
        let name = &labels.names[i];
        segments.push(TrailSegment {
            id: segment_id(i),
            index: i,
            name: name.clone(),
            points: flattened[start..=end].to_vec(),
            completed,
            color: style.color_for(i, completed),
            tooltip: style.tooltip_for(name, completed, labels.tooltip_override(i)),
        });
    }

    segments
}

/// Degraded listing used when no checkpoints are available.
pub fn fallback_segments(labels: &SegmentLabels, style: &SegmentStyle) -> Vec<NamedSegment> {
    labels
        .names
        .iter()
        .enumerate()
        .map(|(i, name)| {
            let completed = labels.is_completed(i);
            NamedSegment {
                id: segment_id(i),
                index: i,
                name: name.clone(),
                completed,
                color: style.color_for(i, completed),
                tooltip: style.tooltip_for(name, completed, labels.tooltip_override(i)),
            }
        })
        .collect()
}

/// Pick the partition mode: geometric when any checkpoint projected,
/// fallback otherwise.
pub fn partition_path(
    checkpoint_indices: &[usize],
    flattened: &[GeoPoint],
    labels: &SegmentLabels,
    style: &SegmentStyle,
) -> Partition {
    if checkpoint_indices.is_empty() {
        Partition::Fallback(fallback_segments(labels, style))
    } else {
        Partition::Geometric(partition_segments(checkpoint_indices, flattened, labels, style))
    }
}
