//! Errors raised at the crate's edges.
//!
//! The geometry core never fails; it degrades silently on odd input. Only
//! document ingestion and the rendering seam can reject something.

/// Errors from ingestion adapters and renderers.
#[derive(Debug, thiserror::Error)]
pub enum TrailError {
    #[error("Invalid JSON: {0}")]
    Json(String),
    #[error("Invalid GeoJSON: {0}")]
    GeoJson(String),
    #[error("Unsupported geometry '{0}' (expected LineString or MultiLineString)")]
    UnsupportedGeometry(String),
    #[error("Invalid position in track '{track}': expected [lon, lat], got {len} values")]
    InvalidPosition { track: String, len: usize },
    #[error("Renderer failed: {0}")]
    Render(String),
}

/// Result alias for fallible edge operations.
pub type Result<T> = std::result::Result<T, TrailError>;
