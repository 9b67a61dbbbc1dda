//! Interface boundary to the underlying map engine
//!
//! The engine renders; this crate coordinates. Everything the synchronizer
//! needs from the renderer is expressed through [`MapEngine`], so production
//! adapters and test doubles plug in the same way.

use crate::core::geo::LatLng;
use crate::core::viewport::Viewport;
use crate::data::geojson::{Feature, FeatureCollection};
use crate::Result;

/// Clustering behavior for the point data source
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterOptions {
    pub enabled: bool,
    /// Cluster radius in pixels
    pub radius: u32,
    /// Zoom level above which points stop clustering
    pub max_zoom: f64,
}

impl Default for ClusterOptions {
    fn default() -> Self {
        Self {
            enabled: true,
            radius: 50,
            max_zoom: 14.0,
        }
    }
}

/// Roles of the visual layers the synchronizer creates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerKind {
    /// Every point, drawn under the cluster symbols
    BasePoints,
    /// Circle per cluster
    ClusterCircles,
    /// Point-count label per cluster
    ClusterCounts,
    /// Individual points that did not cluster
    UnclusteredPoints,
}

impl std::fmt::Display for LayerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerKind::BasePoints => write!(f, "points"),
            LayerKind::ClusterCircles => write!(f, "clusters"),
            LayerKind::ClusterCounts => write!(f, "cluster-count"),
            LayerKind::UnclusteredPoints => write!(f, "unclustered"),
        }
    }
}

/// Which features of the source a layer draws
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureSubset {
    All,
    Clusters,
    Unclustered,
}

/// Declarative description of one visual layer
#[derive(Debug, Clone, PartialEq)]
pub struct LayerSpec {
    pub id: String,
    pub source: String,
    pub kind: LayerKind,
    pub subset: FeatureSubset,
}

/// Event kinds the engine forwards from named layers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    MouseEnter,
    MouseLeave,
}

/// A (layer, event kind) subscription the engine must forward to
/// [`crate::layer::sync::LayerSynchronizer::handle_event`]
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EventBinding {
    pub layer: String,
    pub kind: EventKind,
}

impl EventBinding {
    pub fn new(layer: impl Into<String>, kind: EventKind) -> Self {
        Self {
            layer: layer.into(),
            kind,
        }
    }
}

/// A layer interaction forwarded by the engine
#[derive(Debug, Clone)]
pub enum LayerEvent {
    /// A cluster symbol was clicked
    ClusterClicked { cluster_id: u64, at: LatLng },
    /// An individual (unclustered) point was clicked
    PointClicked { feature: Feature },
    /// The pointer entered an interactive layer
    PointerEntered,
    /// The pointer left an interactive layer
    PointerLeft,
}

/// Seam to the underlying map renderer.
///
/// The synchronizer is the sole writer of the source and layer set, and all
/// calls happen on the thread that owns the session. Adding a layer that
/// already exists is a fatal error in real engines; the synchronizer's state
/// machine guarantees it is never attempted, and implementations are free to
/// return an error if it somehow is.
pub trait MapEngine {
    /// Whether the visual style is fully loaded (false mid style-swap)
    fn is_style_loaded(&self) -> bool;

    /// Whether a data source with this id already exists
    fn has_source(&self, id: &str) -> bool;

    /// Creates the GeoJSON data source with initial contents
    fn add_geojson_source(
        &mut self,
        id: &str,
        data: &FeatureCollection,
        cluster: &ClusterOptions,
    ) -> Result<()>;

    /// Replaces the source's contents in place
    fn set_geojson_data(&mut self, id: &str, data: &FeatureCollection) -> Result<()>;

    /// Creates one visual layer
    fn add_layer(&mut self, spec: &LayerSpec) -> Result<()>;

    /// Subscribes to a layer event, to be forwarded as a [`LayerEvent`]
    fn bind(&mut self, binding: &EventBinding) -> Result<()>;

    /// Current viewport snapshot
    fn viewport(&self) -> Viewport;

    /// The zoom level at which the given cluster expands into children
    fn cluster_expansion_zoom(&self, source: &str, cluster_id: u64) -> Result<f64>;

    /// Animates the camera to the given center and zoom
    fn ease_to(&mut self, center: LatLng, zoom: f64);

    /// Switches the pointer cursor on or off over interactive layers
    fn set_pointer_cursor(&mut self, pointer: bool);
}
