pub mod aggregate;
pub mod executor;
pub mod service;

// Re-exports for convenience
pub use aggregate::{AggregateResult, Aggregator};
pub use executor::run_cycle;
pub use service::{
    FilterOptions, HttpInventoryService, OverviewService, SpatialService, TileResult,
};
