//! GeoJSON ingestion and export.
//!
//! Track documents come from the CMS as GeoJSON: each feature is a named
//! track whose geometry is a `LineString` or `MultiLineString`. Positions are
//! `[longitude, latitude, ...]` and are transposed to [`GeoPoint`] here, so
//! nothing downstream ever sees lon/lat order.

use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use log::{debug, warn};
use serde_json::{Map, Value as JsonValue};

use crate::error::{Result, TrailError};
use crate::partition::Partition;
use crate::view::TrailView;
use crate::{Checkpoint, GeoPoint, TrailPath};

impl From<serde_json::Error> for TrailError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

impl From<geojson::Error> for TrailError {
    fn from(e: geojson::Error) -> Self {
        Self::GeoJson(e.to_string())
    }
}

/// Parse a GeoJSON document into one [`TrailPath`] per track.
///
/// Accepts a FeatureCollection, a single Feature or a bare Geometry.
/// Features without geometry are skipped. Non-finite positions are dropped
/// with a warning. Finite positions outside the WGS84 range are kept but
/// logged. Positions with fewer than two values are rejected.
///
/// # Example
///
/// ```rust
/// use trail_progress::parse_track_document;
///
/// let doc = r#"{
///     "type": "Feature",
///     "properties": { "name": "Caminho de Cora" },
///     "geometry": { "type": "LineString", "coordinates": [[-50.14, -15.93], [-50.13, -15.92]] }
/// }"#;
///
/// let tracks = parse_track_document(doc).unwrap();
/// assert_eq!(tracks[0].name.as_deref(), Some("Caminho de Cora"));
/// assert_eq!(tracks[0].polylines[0][0].latitude, -15.93);
/// ```
pub fn parse_track_document(document: &str) -> Result<Vec<TrailPath>> {
    let geojson: GeoJson = document.parse()?;

    let tracks: Vec<TrailPath> = match geojson {
        GeoJson::FeatureCollection(collection) => collection
            .features
            .iter()
            .filter_map(|feature| feature_to_path(feature).transpose())
            .collect::<Result<Vec<_>>>()?,
        GeoJson::Feature(feature) => feature_to_path(&feature)?.into_iter().collect(),
        GeoJson::Geometry(geometry) => vec![TrailPath::new(geometry_polylines(&geometry, "")?)],
    };

    debug!(
        "[GeoJson] Parsed {} tracks ({} points)",
        tracks.len(),
        tracks.iter().map(TrailPath::point_count).sum::<usize>()
    );

    Ok(tracks)
}

/// Parse a JSON array of `{ latitude, longitude, name, tooltip? }`.
pub fn parse_checkpoints(document: &str) -> Result<Vec<Checkpoint>> {
    Ok(serde_json::from_str(document)?)
}

fn feature_to_path(feature: &Feature) -> Result<Option<TrailPath>> {
    let Some(geometry) = feature.geometry.as_ref() else {
        return Ok(None);
    };

    let name = feature
        .properties
        .as_ref()
        .and_then(|props| props.get("name"))
        .and_then(JsonValue::as_str);

    let polylines = geometry_polylines(geometry, name.unwrap_or(""))?;
    let path = TrailPath::new(polylines);

    Ok(Some(match name {
        Some(name) => path.with_name(name),
        None => path,
    }))
}

fn geometry_polylines(geometry: &Geometry, track: &str) -> Result<Vec<Vec<GeoPoint>>> {
    match &geometry.value {
        Value::LineString(line) => Ok(vec![positions_to_points(line, track)?]),
        Value::MultiLineString(lines) => lines
            .iter()
            .map(|line| positions_to_points(line, track))
            .collect(),
        Value::GeometryCollection(geometries) => {
            let mut polylines = Vec::new();
            for inner in geometries {
                polylines.extend(geometry_polylines(inner, track)?);
            }
            Ok(polylines)
        }
        other => Err(TrailError::UnsupportedGeometry(geometry_type(other).to_string())),
    }
}

fn geometry_type(value: &Value) -> &'static str {
    match value {
        Value::Point(_) => "Point",
        Value::MultiPoint(_) => "MultiPoint",
        Value::LineString(_) => "LineString",
        Value::MultiLineString(_) => "MultiLineString",
        Value::Polygon(_) => "Polygon",
        Value::MultiPolygon(_) => "MultiPolygon",
        Value::GeometryCollection(_) => "GeometryCollection",
    }
}

fn positions_to_points(positions: &[Vec<f64>], track: &str) -> Result<Vec<GeoPoint>> {
    let mut points = Vec::with_capacity(positions.len());
    let mut skipped = 0;
    let mut out_of_range = 0;

    for position in positions {
        if position.len() < 2 {
            return Err(TrailError::InvalidPosition {
                track: track.to_string(),
                len: position.len(),
            });
        }
        // [lon, lat] -> (lat, lon)
        let point = GeoPoint::new(position[1], position[0]);
        if point.is_finite() {
            if !point.is_valid() {
                out_of_range += 1;
            }
            points.push(point);
        } else {
            skipped += 1;
        }
    }

    if skipped > 0 {
        warn!("[GeoJson] Skipped {} non-finite positions in track '{}'", skipped, track);
    }
    if out_of_range > 0 {
        // usually swapped axes upstream
        warn!(
            "[GeoJson] {} positions outside lat/lon range in track '{}'",
            out_of_range, track
        );
    }

    Ok(points)
}

// =============================================================================
// Export
// =============================================================================

fn point_coords(p: &GeoPoint) -> Vec<f64> {
    vec![p.longitude, p.latitude]
}

fn line_coords(points: &[GeoPoint]) -> Vec<Vec<f64>> {
    points.iter().map(point_coords).collect()
}

fn make_feature(value: Value, props: Map<String, JsonValue>) -> Feature {
    Feature {
        bbox: None,
        geometry: Some(Geometry::new(value)),
        id: None,
        properties: Some(props),
        foreign_members: None,
    }
}

fn layer_props(layer: &str) -> Map<String, JsonValue> {
    let mut props = Map::new();
    props.insert("layer".to_string(), JsonValue::String(layer.to_string()));
    props
}

impl TrailView {
    /// Render this view as a GeoJSON FeatureCollection.
    ///
    /// Every feature carries a `layer` property: `path`, `completed`,
    /// `segment` or `checkpoint`. Segments also carry `id`, `name`, `color`,
    /// `tooltip` and `completed`. Empty geometries are left out. Fallback
    /// partitions have no geometry and produce no segment features.
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let mut features = Vec::new();

        let drawable: Vec<Vec<Vec<f64>>> = self
            .full_path
            .iter()
            .filter(|line| line.len() >= 2)
            .map(|line| line_coords(line))
            .collect();
        if !drawable.is_empty() {
            let mut props = layer_props("path");
            if let Some(name) = &self.name {
                props.insert("name".to_string(), JsonValue::String(name.clone()));
            }
            props.insert("distanceKm".to_string(), JsonValue::from(self.total_distance_km));
            features.push(make_feature(Value::MultiLineString(drawable), props));
        }

        if self.completed_path.len() >= 2 {
            let mut props = layer_props("completed");
            props.insert("distanceKm".to_string(), JsonValue::from(self.target_distance_km));
            features.push(make_feature(Value::LineString(line_coords(&self.completed_path)), props));
        }

        if let Partition::Geometric(segments) = &self.partition {
            for segment in segments {
                let mut props = layer_props("segment");
                props.insert("id".to_string(), JsonValue::String(segment.id.clone()));
                props.insert("name".to_string(), JsonValue::String(segment.name.clone()));
                props.insert("color".to_string(), JsonValue::String(segment.color.clone()));
                props.insert("tooltip".to_string(), JsonValue::String(segment.tooltip.clone()));
                props.insert("completed".to_string(), JsonValue::Bool(segment.completed));
                features.push(make_feature(Value::LineString(line_coords(&segment.points)), props));
            }
        }

        for marker in &self.markers {
            let mut props = layer_props("checkpoint");
            props.insert("name".to_string(), JsonValue::String(marker.name.clone()));
            props.insert("tooltip".to_string(), JsonValue::String(marker.tooltip.clone()));
            props.insert("pathIndex".to_string(), JsonValue::from(marker.path_index as u64));
            features.push(make_feature(Value::Point(point_coords(&marker.location)), props));
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transposes_lon_lat() {
        let doc = r#"{"type":"LineString","coordinates":[[-50.1,-15.9],[-50.0,-15.8,720.0]]}"#;
        let tracks = parse_track_document(doc).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].polylines[0][0], GeoPoint::new(-15.9, -50.1));
        assert_eq!(tracks[0].polylines[0][1], GeoPoint::new(-15.8, -50.0));
    }

    #[test]
    fn test_multilinestring_keeps_parts() {
        let doc = r#"{
            "type": "FeatureCollection",
            "features": [
                {"type":"Feature","properties":{"name":"Cora"},"geometry":{
                    "type":"MultiLineString",
                    "coordinates":[[[0,0],[1,0]],[[2,0],[3,0],[4,0]]]}},
                {"type":"Feature","properties":{},"geometry":null}
            ]
        }"#;
        let tracks = parse_track_document(doc).unwrap();
        assert_eq!(tracks.len(), 1);
        assert_eq!(tracks[0].name.as_deref(), Some("Cora"));
        assert_eq!(tracks[0].polylines.len(), 2);
        assert_eq!(tracks[0].polylines[1].len(), 3);
    }

    #[test]
    fn test_out_of_range_positions_kept() {
        // [lat, lon] written in the wrong order: 120 is not a latitude
        let doc = r#"{"type":"LineString","coordinates":[[-15.9,120.0],[-15.8,120.1],[-50.1,-15.9]]}"#;
        let tracks = parse_track_document(doc).unwrap();
        let points = &tracks[0].polylines[0];
        assert_eq!(points.len(), 3);
        assert!(!points[0].is_valid());
        assert!(points[2].is_valid());
    }

    #[test]
    fn test_rejects_points() {
        let doc = r#"{"type":"Point","coordinates":[0,0]}"#;
        let err = parse_track_document(doc).unwrap_err();
        assert!(matches!(err, TrailError::UnsupportedGeometry(ref t) if t == "Point"));
    }

    #[test]
    fn test_rejects_short_positions() {
        let doc = r#"{"type":"Feature","properties":{"name":"x"},
            "geometry":{"type":"LineString","coordinates":[[0,0],[1]]}}"#;
        let err = parse_track_document(doc);
        assert!(err.is_err());
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(matches!(parse_track_document("{not json"), Err(TrailError::GeoJson(_))));
    }

    #[test]
    fn test_parse_checkpoints() {
        let doc = r#"[
            {"latitude": -15.93, "longitude": -50.14, "name": "Cidade de Goiás"},
            {"latitude": -15.45, "longitude": -49.58, "name": "Jaraguá", "tooltip": "Pousada"}
        ]"#;
        let checkpoints = parse_checkpoints(doc).unwrap();
        assert_eq!(checkpoints.len(), 2);
        assert_eq!(checkpoints[0].tooltip, None);
        assert_eq!(checkpoints[1].tooltip.as_deref(), Some("Pousada"));
    }

    #[test]
    fn test_parse_checkpoints_missing_field() {
        let doc = r#"[{"latitude": -15.93, "name": "x"}]"#;
        assert!(matches!(parse_checkpoints(doc), Err(TrailError::Json(_))));
    }
}
