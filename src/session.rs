//! Session context and UI-facing facade
//!
//! [`SessionState`] is the shared context object replacing ad-hoc global
//! state: the UI (or engine glue) writes the viewport and filter, the
//! scheduler reads one snapshot per cycle. [`MapSession`] owns the engine,
//! the synchronizer, and the scheduler, and exposes the surface the UI
//! collaborator consumes: the aggregate count, the selected feature, the
//! filter option lists, and the selection / fly-to callbacks.

use crate::core::config::ViewerConfig;
use crate::core::geo::LatLng;
use crate::core::viewport::Viewport;
use crate::data::geojson::Feature;
use crate::fetch::service::{FilterOptions, OverviewService, SpatialService};
use crate::layer::engine::{LayerEvent, MapEngine};
use crate::layer::sync::{ApplyOutcome, LayerSynchronizer};
use crate::query::filter::{FilterState, GenusDimension};
use crate::regions::Region;
use crate::scheduler::{FetchScheduler, FetchTrigger, SessionUpdate};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Shared session context: viewport and filter state with explicit
/// ownership. Writers are the UI and the engine glue; the scheduler only
/// ever takes an atomic snapshot of both at cycle start.
#[derive(Debug)]
pub struct SessionState {
    inner: Mutex<(Viewport, FilterState)>,
}

impl SessionState {
    pub fn new(viewport: Viewport) -> Self {
        Self {
            inner: Mutex::new((viewport, FilterState::default())),
        }
    }

    pub fn set_viewport(&self, viewport: Viewport) {
        self.inner.lock().expect("session state poisoned").0 = viewport;
    }

    pub fn update_filter(&self, update: impl FnOnce(&mut FilterState)) {
        update(&mut self.inner.lock().expect("session state poisoned").1);
    }

    /// One coherent snapshot of viewport and filter
    pub fn snapshot(&self) -> (Viewport, FilterState) {
        self.inner.lock().expect("session state poisoned").clone()
    }
}

/// Owns one map's fetch pipeline end to end.
///
/// Results cross back from background fetch tasks over a channel; the
/// owner drains it by calling [`MapSession::pump`] from its event loop
/// (each frame, or after any await point). Updates carrying a stale
/// generation are dropped there, never applied.
pub struct MapSession<E, S>
where
    E: MapEngine,
    S: SpatialService + OverviewService + 'static,
{
    engine: E,
    sync: LayerSynchronizer,
    state: Arc<SessionState>,
    scheduler: FetchScheduler<S>,
    service: Arc<S>,
    updates_tx: UnboundedSender<SessionUpdate>,
    updates_rx: UnboundedReceiver<SessionUpdate>,
    options: FilterOptions,
    total_count: u64,
    selected: Option<Feature>,
    map_ready: bool,
}

impl<E, S> MapSession<E, S>
where
    E: MapEngine,
    S: SpatialService + OverviewService + 'static,
{
    pub fn new(engine: E, service: Arc<S>, config: ViewerConfig) -> Self {
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let state = Arc::new(SessionState::new(engine.viewport()));
        let scheduler = FetchScheduler::new(
            service.clone(),
            state.clone(),
            config.fetch.clone(),
            &config.scheduler,
            updates_tx.clone(),
        );

        Self {
            engine,
            sync: LayerSynchronizer::new(config.layer),
            state,
            scheduler,
            service,
            updates_tx,
            updates_rx,
            options: FilterOptions::default(),
            total_count: 0,
            selected: None,
            map_ready: false,
        }
    }

    /// Engine glue: the map finished loading. Fires the initial fetch cycle
    /// and the initial filter-options fetch, once.
    pub fn notify_map_ready(&mut self) {
        if self.map_ready {
            return;
        }
        self.map_ready = true;
        self.state.set_viewport(self.engine.viewport());
        self.scheduler.trigger(FetchTrigger::MapReady);
        self.refresh_filter_options();
    }

    /// Engine glue: the viewport stopped moving. Debounced by the scheduler.
    pub fn notify_move_end(&mut self) {
        if !self.map_ready {
            return;
        }
        self.state.set_viewport(self.engine.viewport());
        self.scheduler.trigger(FetchTrigger::MoveEnd);
    }

    /// UI callback: switch the active genus dimension. Clears the dependent
    /// genus and species selections and refreshes the option lists.
    pub fn select_genus_dimension(&mut self, dimension: Option<GenusDimension>) {
        self.state.update_filter(|filter| {
            filter.dimension = dimension;
            filter.genus = None;
            filter.species = None;
        });
        self.refresh_filter_options();
        self.scheduler.trigger(FetchTrigger::FilterChanged);
    }

    /// UI callback: pick a genus (clears any species selection)
    pub fn select_genus(&mut self, genus: Option<String>) {
        self.state.update_filter(|filter| {
            filter.genus = genus;
            filter.species = None;
        });
        self.scheduler.trigger(FetchTrigger::FilterChanged);
    }

    /// UI callback: pick a species under the current genus
    pub fn select_species(&mut self, species: Option<String>) {
        self.state.update_filter(|filter| filter.species = species);
        self.scheduler.trigger(FetchTrigger::FilterChanged);
    }

    /// UI callback: animate the camera to a named region. The fetch follows
    /// from the engine's move-end notification once the camera settles.
    pub fn fly_to_region(&mut self, region: &Region) {
        self.fly_to(region.center, region.zoom);
    }

    /// Animates the camera to an arbitrary position
    pub fn fly_to(&mut self, center: LatLng, zoom: f64) {
        self.engine.ease_to(center, zoom);
    }

    /// Engine glue: a bound layer interaction fired
    pub fn handle_layer_event(&mut self, event: LayerEvent) {
        match self.sync.handle_event(&mut self.engine, event) {
            Ok(Some(feature)) => self.selected = Some(feature),
            Ok(None) => {}
            Err(error) => log::warn!("layer interaction failed: {}", error),
        }
    }

    /// Drains pending updates and applies the current-generation ones to
    /// the layer synchronizer. Returns how many updates were applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(update) = self.updates_rx.try_recv() {
            match update {
                SessionUpdate::Cycle(cycle) => {
                    if cycle.generation != self.scheduler.current_generation() {
                        log::debug!(
                            "dropping stale cycle {} (current {})",
                            cycle.generation,
                            self.scheduler.current_generation()
                        );
                        continue;
                    }
                    match self.sync.apply(&mut self.engine, &cycle.result) {
                        Ok(ApplyOutcome::SkippedStyleLoading) => {}
                        Ok(_) => {
                            self.total_count = cycle.result.total_count;
                            applied += 1;
                        }
                        Err(error) => log::warn!("layer update failed: {}", error),
                    }
                }
                SessionUpdate::Options(options) => {
                    self.options = options;
                    applied += 1;
                }
            }
        }
        applied
    }

    /// Total count of the last applied aggregate, for the overlay
    pub fn total_count(&self) -> u64 {
        self.total_count
    }

    /// Property bag of the most recently selected feature
    pub fn selected_feature(&self) -> Option<&Feature> {
        self.selected.as_ref()
    }

    /// Latest filter option lists (may arrive before or after point data)
    pub fn filter_options(&self) -> &FilterOptions {
        &self.options
    }

    /// Snapshot of the current filter selections
    pub fn filter(&self) -> FilterState {
        self.state.snapshot().1
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Kicks off a background refresh of the filter option lists. A failed
    /// or malformed overview response degrades to empty lists.
    fn refresh_filter_options(&mut self) {
        let dimension = self.state.snapshot().1.dimension;
        let service = self.service.clone();
        let updates = self.updates_tx.clone();
        tokio::spawn(async move {
            let options = match service.fetch_options(dimension).await {
                Ok(options) => options,
                Err(error) => {
                    log::warn!("overview fetch failed, options cleared: {}", error);
                    FilterOptions::default()
                }
            };
            let _ = updates.send(SessionUpdate::Options(options));
        });
    }
}
