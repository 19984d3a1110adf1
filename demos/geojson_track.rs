//! Parse a GeoJSON track, build the view and export it back as GeoJSON.
//!
//! Run with: cargo run --example geojson_track --features serde

use trail_progress::{
    parse_checkpoints, parse_track_document, CompletionSpec, SegmentLabels, TrailConfig,
    TrailInput, TrailView,
};

const TRACK: &str = r#"{
  "type": "FeatureCollection",
  "features": [{
    "type": "Feature",
    "properties": { "name": "Etapa 1" },
    "geometry": {
      "type": "LineString",
      "coordinates": [
        [-50.1400, -15.9340], [-50.1350, -15.9300], [-50.1300, -15.9260],
        [-50.1250, -15.9220], [-50.1200, -15.9180], [-50.1150, -15.9140]
      ]
    }
  }]
}"#;

const CHECKPOINTS: &str = r#"[
  { "latitude": -15.9340, "longitude": -50.1400, "name": "Largada" },
  { "latitude": -15.9260, "longitude": -50.1300, "name": "Mirante" },
  { "latitude": -15.9140, "longitude": -50.1150, "name": "Chegada" }
]"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut tracks = parse_track_document(TRACK)?;
    let checkpoints = parse_checkpoints(CHECKPOINTS)?;

    let input = TrailInput {
        path: tracks.remove(0),
        checkpoints,
        completion: CompletionSpec::new(1, 2),
        labels: SegmentLabels::new(["Largada - Mirante", "Mirante - Chegada"]),
    };

    let view = TrailView::build(&input, &TrailConfig::default());
    let collection = view.to_feature_collection();

    println!("{}", serde_json::to_string_pretty(&collection)?);
    Ok(())
}
