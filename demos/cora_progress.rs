//! Progress over a short stretch of the Caminho de Cora.
//!
//! Run with: cargo run --example cora_progress

use trail_progress::{
    Checkpoint, CompletionSpec, GeoPoint, PathIndex, Partition, SegmentLabels, SegmentStatus,
    TrailConfig, TrailInput, TrailPath, TrailView,
};

fn main() {
    // Two disjoint polylines, as tracks exported from the CMS often are
    let first: Vec<GeoPoint> = (0..30)
        .map(|i| GeoPoint::new(-15.9340 + i as f64 * 0.0008, -50.1400 + i as f64 * 0.0012))
        .collect();
    let second: Vec<GeoPoint> = (0..20)
        .map(|i| GeoPoint::new(-15.9100 + i as f64 * 0.0010, -50.1040 + i as f64 * 0.0009))
        .collect();
    let path = TrailPath::new(vec![first.clone(), second.clone()]).with_name("Caminho de Cora");

    let input = TrailInput {
        checkpoints: vec![
            Checkpoint::new(first[0].latitude, first[0].longitude, "Cidade de Goiás"),
            Checkpoint::new(first[15].latitude, first[15].longitude, "Calcilândia"),
            Checkpoint::new(second[0].latitude, second[0].longitude, "Jeroaquara"),
            Checkpoint::new(second[19].latitude, second[19].longitude, "Itaberaí")
                .with_tooltip("Fim da etapa"),
        ],
        completion: CompletionSpec::new(2, 3),
        labels: SegmentLabels::new(["Goiás - Calcilândia", "Calcilândia - Jeroaquara", "Jeroaquara - Itaberaí"])
            .with_status(vec![SegmentStatus::completed(), SegmentStatus::completed()]),
        path,
    };

    let view = TrailView::build(&input, &TrailConfig::default());

    println!("Trail: {}", view.name.as_deref().unwrap_or("(unnamed)"));
    println!(
        "Distance: {:.2} of {:.2} km ({:.0}%)",
        view.target_distance_km,
        view.total_distance_km,
        view.completion_fraction * 100.0
    );
    println!("Completed path: {} points\n", view.completed_path.len());

    match &view.partition {
        Partition::Geometric(segments) => {
            for segment in segments {
                println!(
                    "  {:<28} {:>3} points  {}  {}",
                    segment.name,
                    segment.points.len(),
                    segment.color,
                    segment.tooltip
                );
            }
        }
        Partition::Fallback(named) => {
            println!("No checkpoints, listing {} segments without geometry", named.len());
        }
    }

    // Snap an establishment near the trail
    let index = PathIndex::new(&view.full_path);
    let pousada = GeoPoint::new(-15.9150, -50.1110);
    if let Some(snapped) = index.snap(&pousada) {
        println!(
            "\nPousada: {:.2} km from the trail, at km {:.2}",
            snapped.offset_km, snapped.along_trail_km
        );
    }
}
