pub mod geojson;

// Re-exports for convenience
pub use geojson::{Feature, FeatureCollection, Geometry, PropertyValue, SearchResponse};
