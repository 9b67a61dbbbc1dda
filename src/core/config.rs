//! Configuration for fetch planning, scheduling, and layer synchronization
//!
//! Grouped the way the pipeline consumes it: `FetchConfig` feeds the query
//! planner, `SchedulerConfig` the debounce logic, and `LayerConfig` the
//! layer synchronizer. `ViewerConfig` bundles everything for a session.

use crate::layer::engine::ClusterOptions;

/// Tuning for converting a viewport into spatial queries
#[derive(Debug, Clone, PartialEq)]
pub struct FetchConfig {
    /// Per-request result ceiling passed to the query service
    pub result_cap: u32,
    /// Zoom level at or above which queries ask for the complete result set.
    /// Below it, wide views accept the cap and trade completeness for volume.
    pub return_all_min_zoom: f64,
    /// Grid dimension used when a capped view is split into sub-tiles
    /// (3 yields the 3x3 / 9-tile partition)
    pub partition_steps: u32,
    /// Pixel inset applied to each viewport edge before deriving bounds
    pub margin_px: f64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            result_cap: 4000,
            return_all_min_zoom: 12.0,
            partition_steps: 3,
            margin_px: 24.0,
        }
    }
}

/// Tuning for when fetch cycles are allowed to start
#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    /// Quiet period after the last move-end event before a cycle starts.
    /// Filter changes are discrete actions and bypass the debounce.
    pub move_end_quiet_ms: u64,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            move_end_quiet_ms: 500,
        }
    }
}

/// Tuning for the rendered point layer set
#[derive(Debug, Clone, PartialEq)]
pub struct LayerConfig {
    /// Identifier of the GeoJSON data source owned by the synchronizer
    pub source_id: String,
    /// Clustering behavior of the source
    pub cluster: ClusterOptions,
    /// Minimum zoom at which clicking an individual point selects it
    pub select_min_zoom: f64,
}

impl Default for LayerConfig {
    fn default() -> Self {
        Self {
            source_id: "inventory-points".to_string(),
            cluster: ClusterOptions::default(),
            select_min_zoom: 14.0,
        }
    }
}

/// Endpoints of the consumed backend services
#[derive(Debug, Clone, PartialEq)]
pub struct Endpoints {
    /// Spatial query service (bounded point search)
    pub search_url: String,
    /// Overview service (distinct filter option lists)
    pub overview_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            search_url: "https://api.example.com/trees/search".to_string(),
            overview_url: "https://api.example.com/trees/overview".to_string(),
        }
    }
}

/// Complete configuration for one map session
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ViewerConfig {
    pub fetch: FetchConfig,
    pub scheduler: SchedulerConfig,
    pub layer: LayerConfig,
    pub endpoints: Endpoints,
}
