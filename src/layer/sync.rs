use crate::core::config::LayerConfig;
use crate::data::geojson::Feature;
use crate::fetch::aggregate::AggregateResult;
use crate::layer::engine::{
    EventBinding, EventKind, FeatureSubset, LayerEvent, LayerKind, LayerSpec, MapEngine,
};
use crate::Result;
use fxhash::FxHashSet;

/// Lifecycle of the rendered data layer set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerState {
    Uninitialized,
    Initialized,
}

/// What an [`LayerSynchronizer::apply`] call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// First result: source, layers, and bindings were created
    Initialized,
    /// Source contents replaced in place
    Replaced,
    /// Style reload in progress; the update was dropped, not queued
    SkippedStyleLoading,
}

/// Keeps the engine's data source and layer set in step with fetch results.
///
/// Two states. The transition Uninitialized -> Initialized happens on the
/// first aggregate applied after the map is ready: it creates the clustered
/// source, the four visual layers, and the four interaction bindings,
/// exactly once. Every later aggregate only replaces the source's contents;
/// layers and bindings are never recreated, which structurally rules out the
/// duplicate-layer-add that real engines treat as fatal.
pub struct LayerSynchronizer {
    config: LayerConfig,
    state: LayerState,
    bindings: FxHashSet<EventBinding>,
}

impl LayerSynchronizer {
    pub fn new(config: LayerConfig) -> Self {
        Self {
            config,
            state: LayerState::Uninitialized,
            bindings: FxHashSet::default(),
        }
    }

    pub fn state(&self) -> LayerState {
        self.state
    }

    /// Interaction bindings registered so far
    pub fn bindings(&self) -> &FxHashSet<EventBinding> {
        &self.bindings
    }

    /// Applies one cycle's aggregate to the engine.
    ///
    /// If the engine's style is mid-reload the update is skipped rather than
    /// queued; the next scheduling event re-applies state once the style
    /// finishes loading.
    pub fn apply(
        &mut self,
        engine: &mut dyn MapEngine,
        result: &AggregateResult,
    ) -> Result<ApplyOutcome> {
        if !engine.is_style_loaded() {
            log::debug!("style reload in progress, dropping layer update");
            return Ok(ApplyOutcome::SkippedStyleLoading);
        }

        if self.state == LayerState::Uninitialized && !engine.has_source(&self.config.source_id) {
            self.initialize(engine, result)?;
            self.state = LayerState::Initialized;
            log::info!(
                "layer set initialized with {} features",
                result.collection.len()
            );
            return Ok(ApplyOutcome::Initialized);
        }

        // The source exists (either we created it, or it survived from a
        // previous life of this synchronizer): only replace its data.
        self.state = LayerState::Initialized;
        engine.set_geojson_data(&self.config.source_id, &result.collection)?;
        Ok(ApplyOutcome::Replaced)
    }

    /// Reacts to a forwarded layer interaction. Returns the feature to
    /// expose as selected, if the event selected one.
    pub fn handle_event(
        &mut self,
        engine: &mut dyn MapEngine,
        event: LayerEvent,
    ) -> Result<Option<Feature>> {
        match event {
            LayerEvent::ClusterClicked { cluster_id, at } => {
                let zoom = engine.cluster_expansion_zoom(&self.config.source_id, cluster_id)?;
                engine.ease_to(at, zoom);
                Ok(None)
            }
            LayerEvent::PointClicked { feature } => {
                // Individual selection only makes sense once points are
                // visually separated.
                if engine.viewport().zoom >= self.config.select_min_zoom {
                    Ok(Some(feature))
                } else {
                    Ok(None)
                }
            }
            LayerEvent::PointerEntered => {
                engine.set_pointer_cursor(true);
                Ok(None)
            }
            LayerEvent::PointerLeft => {
                engine.set_pointer_cursor(false);
                Ok(None)
            }
        }
    }

    fn initialize(&mut self, engine: &mut dyn MapEngine, result: &AggregateResult) -> Result<()> {
        engine.add_geojson_source(
            &self.config.source_id,
            &result.collection,
            &self.config.cluster,
        )?;

        for spec in self.layer_specs() {
            engine.add_layer(&spec)?;
        }

        let cluster_layer = self.layer_id(LayerKind::ClusterCircles);
        let point_layer = self.layer_id(LayerKind::UnclusteredPoints);
        let bindings = [
            EventBinding::new(cluster_layer.clone(), EventKind::Click),
            EventBinding::new(point_layer, EventKind::Click),
            EventBinding::new(cluster_layer.clone(), EventKind::MouseEnter),
            EventBinding::new(cluster_layer, EventKind::MouseLeave),
        ];
        for binding in bindings {
            if self.bindings.insert(binding.clone()) {
                engine.bind(&binding)?;
            }
        }

        Ok(())
    }

    fn layer_id(&self, kind: LayerKind) -> String {
        format!("{}-{}", self.config.source_id, kind)
    }

    fn layer_specs(&self) -> [LayerSpec; 4] {
        let source = self.config.source_id.clone();
        [
            LayerSpec {
                id: self.layer_id(LayerKind::BasePoints),
                source: source.clone(),
                kind: LayerKind::BasePoints,
                subset: FeatureSubset::All,
            },
            LayerSpec {
                id: self.layer_id(LayerKind::ClusterCircles),
                source: source.clone(),
                kind: LayerKind::ClusterCircles,
                subset: FeatureSubset::Clusters,
            },
            LayerSpec {
                id: self.layer_id(LayerKind::ClusterCounts),
                source: source.clone(),
                kind: LayerKind::ClusterCounts,
                subset: FeatureSubset::Clusters,
            },
            LayerSpec {
                id: self.layer_id(LayerKind::UnclusteredPoints),
                source,
                kind: LayerKind::UnclusteredPoints,
                subset: FeatureSubset::Unclustered,
            },
        ]
    }
}
