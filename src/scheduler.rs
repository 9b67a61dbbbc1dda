//! Decides when fetch cycles run
//!
//! The scheduler is the single coordination point between UI events and the
//! fetch pipeline. Map-ready and filter changes start a cycle immediately;
//! move-end events are debounced so only the last event of a movement burst
//! starts one. Every cycle is stamped with a generation from an atomic
//! counter; the session drops results whose generation is no longer current,
//! so a slow stale cycle can never overwrite a newer cycle's display.

use crate::core::config::{FetchConfig, SchedulerConfig};
use crate::fetch::aggregate::AggregateResult;
use crate::fetch::executor::run_cycle;
use crate::fetch::service::{FilterOptions, SpatialService};
use crate::query::builder::plan_queries;
use crate::session::SessionState;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

/// Reasons a fetch cycle starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchTrigger {
    /// The map finished loading (fires one initial cycle)
    MapReady,
    /// The viewport stopped moving (debounced)
    MoveEnd,
    /// A filter selection changed (immediate)
    FilterChanged,
}

/// One cycle's progress or completion, delivered to the session's pump
#[derive(Debug)]
pub struct CycleUpdate {
    /// Generation the cycle was started with
    pub generation: u64,
    /// In-progress aggregate in canonical tile order
    pub result: AggregateResult,
    pub completed_tiles: usize,
    pub total_tiles: usize,
}

impl CycleUpdate {
    /// Whether every tile of the cycle has reported
    pub fn is_final(&self) -> bool {
        self.completed_tiles == self.total_tiles
    }
}

/// Messages delivered back to the owning session. Point data and filter
/// options travel on the same channel and may arrive in either order.
#[derive(Debug)]
pub enum SessionUpdate {
    Cycle(CycleUpdate),
    Options(FilterOptions),
}

/// Starts fetch cycles in response to triggers and streams their results
/// back over an unbounded channel
pub struct FetchScheduler<S: SpatialService + 'static> {
    service: Arc<S>,
    state: Arc<SessionState>,
    config: FetchConfig,
    quiet: Duration,
    generation: Arc<AtomicU64>,
    debounce_seq: Arc<AtomicU64>,
    updates: UnboundedSender<SessionUpdate>,
}

impl<S: SpatialService + 'static> Clone for FetchScheduler<S> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            state: self.state.clone(),
            config: self.config.clone(),
            quiet: self.quiet,
            generation: self.generation.clone(),
            debounce_seq: self.debounce_seq.clone(),
            updates: self.updates.clone(),
        }
    }
}

impl<S: SpatialService + 'static> FetchScheduler<S> {
    pub fn new(
        service: Arc<S>,
        state: Arc<SessionState>,
        config: FetchConfig,
        scheduler_config: &SchedulerConfig,
        updates: UnboundedSender<SessionUpdate>,
    ) -> Self {
        Self {
            service,
            state,
            config,
            quiet: Duration::from_millis(scheduler_config.move_end_quiet_ms),
            generation: Arc::new(AtomicU64::new(0)),
            debounce_seq: Arc::new(AtomicU64::new(0)),
            updates,
        }
    }

    /// Generation of the most recently started cycle. Results carrying an
    /// older generation are stale.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Reacts to one scheduling event
    pub fn trigger(&self, trigger: FetchTrigger) {
        match trigger {
            FetchTrigger::MapReady | FetchTrigger::FilterChanged => self.start_cycle(),
            FetchTrigger::MoveEnd => self.schedule_debounced(),
        }
    }

    /// Starts a cycle after the quiet period, unless another move-end
    /// supersedes this one first
    fn schedule_debounced(&self) {
        let token = self.debounce_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let scheduler = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(scheduler.quiet).await;
            if scheduler.debounce_seq.load(Ordering::SeqCst) == token {
                scheduler.start_cycle();
            } else {
                log::debug!("move-end superseded within quiet window, cycle discarded");
            }
        });
    }

    /// Snapshots viewport and filter, plans the tile queries, and runs the
    /// cycle in the background. Snapshots are taken here, at cycle start, so
    /// a request and its response always describe the same selection even if
    /// the UI changes state mid-flight.
    fn start_cycle(&self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let (viewport, filter) = self.state.snapshot();
        let queries = plan_queries(&viewport, &filter, &self.config);
        log::debug!(
            "fetch cycle {} started ({} tiles, zoom {:.1})",
            generation,
            queries.len(),
            viewport.zoom
        );

        let service = self.service.clone();
        let updates = self.updates.clone();
        tokio::spawn(async move {
            let total = queries.len();
            run_cycle(service.as_ref(), &queries, |result, completed, total_tiles| {
                let _ = updates.send(SessionUpdate::Cycle(CycleUpdate {
                    generation,
                    result,
                    completed_tiles: completed,
                    total_tiles,
                }));
            })
            .await;
            log::debug!("fetch cycle {} complete ({} tiles)", generation, total);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{LatLng, ScreenPoint};
    use crate::core::viewport::Viewport;
    use crate::fetch::service::TileResult;
    use crate::query::builder::TileQuery;
    use crate::Result;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::sync::mpsc;

    struct CountingService {
        queries: Mutex<Vec<TileQuery>>,
    }

    impl CountingService {
        fn new() -> Self {
            Self {
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl SpatialService for CountingService {
        async fn fetch_tile(&self, query: &TileQuery) -> Result<TileResult> {
            self.queries.lock().unwrap().push(query.clone());
            Ok(TileResult::default())
        }
    }

    fn viewport(center: LatLng, zoom: f64) -> Viewport {
        Viewport::new(center, zoom, ScreenPoint::new(1024.0, 768.0))
    }

    fn scheduler(
        service: Arc<CountingService>,
        state: Arc<SessionState>,
    ) -> (
        FetchScheduler<CountingService>,
        mpsc::UnboundedReceiver<SessionUpdate>,
    ) {
        let (tx, rx) = mpsc::unbounded_channel();
        let scheduler = FetchScheduler::new(
            service,
            state,
            FetchConfig::default(),
            &SchedulerConfig::default(),
            tx,
        );
        (scheduler, rx)
    }

    #[tokio::test(start_paused = true)]
    async fn test_move_end_burst_debounces_to_one_cycle() {
        let service = Arc::new(CountingService::new());
        let state = Arc::new(SessionState::new(viewport(LatLng::new(10.0, 10.0), 14.0)));
        let (scheduler, _rx) = scheduler(service.clone(), state.clone());

        // A burst of move-end events, each updating the viewport. Only the
        // last one may start a cycle.
        for i in 0..5 {
            state.set_viewport(viewport(LatLng::new(10.0 + i as f64, 10.0), 14.0));
            scheduler.trigger(FetchTrigger::MoveEnd);
        }
        let last_center = LatLng::new(43.6532, -79.3832);
        state.set_viewport(viewport(last_center, 14.0));
        scheduler.trigger(FetchTrigger::MoveEnd);

        // Let the quiet period elapse and the cycle finish.
        tokio::time::sleep(Duration::from_millis(2000)).await;

        let queries = service.queries.lock().unwrap();
        assert_eq!(queries.len(), 1, "burst must collapse into one cycle");
        assert!(
            queries[0].bounds.contains(&last_center),
            "cycle must use the viewport of the last move-end"
        );
        assert_eq!(scheduler.current_generation(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_filter_change_is_immediate() {
        let service = Arc::new(CountingService::new());
        let state = Arc::new(SessionState::new(viewport(
            LatLng::new(43.65, -79.38),
            14.0,
        )));
        let (scheduler, _rx) = scheduler(service.clone(), state.clone());

        scheduler.trigger(FetchTrigger::FilterChanged);
        // No quiet period: one tick is enough for the spawned cycle to run.
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(service.queries.lock().unwrap().len(), 1);
        assert_eq!(scheduler.current_generation(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_wide_view_fans_out_into_nine_tiles() {
        let service = Arc::new(CountingService::new());
        let state = Arc::new(SessionState::new(viewport(LatLng::new(43.65, -79.38), 9.0)));
        let (scheduler, mut rx) = scheduler(service.clone(), state.clone());

        scheduler.trigger(FetchTrigger::MapReady);
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert_eq!(service.queries.lock().unwrap().len(), 9);

        // One progress update per tile, all stamped with generation 1.
        let mut updates = 0;
        while let Ok(update) = rx.try_recv() {
            if let SessionUpdate::Cycle(cycle) = update {
                assert_eq!(cycle.generation, 1);
                assert_eq!(cycle.total_tiles, 9);
                updates += 1;
                if updates == 9 {
                    assert!(cycle.is_final());
                }
            }
        }
        assert_eq!(updates, 9);
    }
}
