pub mod config;
pub mod geo;
pub mod viewport;

// Re-exports for convenience
pub use config::{Endpoints, FetchConfig, LayerConfig, SchedulerConfig, ViewerConfig};
pub use geo::{GeoBounds, LatLng, ScreenPoint};
pub use viewport::Viewport;
