//! # Canopy
//!
//! Viewport-driven spatial fetch coordination and incremental map-layer
//! synchronization for large geolocated point inventories.
//!
//! The crate turns the visible map region into bounded spatial queries
//! (splitting wide views into a 3x3 tile grid to respect the service's
//! result cap), executes them concurrently with per-tile failure
//! degradation, folds the results into one aggregate, and keeps the map
//! engine's data source and layer set in step through an initialize-once /
//! replace-in-place state machine. A debouncing scheduler with a generation
//! counter decides when cycles run and keeps stale results off the screen.

pub mod core;
pub mod data;
pub mod fetch;
pub mod layer;
pub mod prelude;
pub mod query;
pub mod regions;
pub mod scheduler;
pub mod session;

// Re-export public API
pub use crate::core::{
    config::{Endpoints, FetchConfig, LayerConfig, SchedulerConfig, ViewerConfig},
    geo::{GeoBounds, LatLng, ScreenPoint},
    viewport::Viewport,
};

pub use crate::data::geojson::{Feature, FeatureCollection, PropertyValue};

pub use crate::query::{
    builder::{plan_queries, TileQuery},
    filter::{FilterState, GenusDimension},
};

pub use crate::fetch::{
    aggregate::{AggregateResult, Aggregator},
    executor::run_cycle,
    service::{FilterOptions, HttpInventoryService, OverviewService, SpatialService, TileResult},
};

pub use crate::layer::{
    engine::{ClusterOptions, LayerEvent, MapEngine},
    sync::{ApplyOutcome, LayerState, LayerSynchronizer},
};

pub use crate::scheduler::{CycleUpdate, FetchScheduler, FetchTrigger, SessionUpdate};
pub use crate::session::{MapSession, SessionState};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum CanopyError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Service error: {0}")]
    Service(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),
}

/// Error type alias for convenience
pub type Error = CanopyError;
