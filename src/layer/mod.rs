pub mod engine;
pub mod sync;

// Re-exports for convenience
pub use engine::{
    ClusterOptions, EventBinding, EventKind, FeatureSubset, LayerEvent, LayerKind, LayerSpec,
    MapEngine,
};
pub use sync::{ApplyOutcome, LayerState, LayerSynchronizer};
