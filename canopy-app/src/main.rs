//! Headless driver for the canopy fetch pipeline.
//!
//! Runs the full bounds -> query -> fetch -> aggregate -> sync loop against
//! a logging map engine, so the pipeline can be exercised without a real
//! renderer. Service endpoints come from `CANOPY_SEARCH_URL` /
//! `CANOPY_OVERVIEW_URL`; without a reachable backend the tiles simply
//! degrade to empty and the run still completes.

use canopy::prelude::*;
use std::time::Duration;

/// Map engine stand-in that logs every structural call instead of drawing
struct LoggingEngine {
    viewport: Viewport,
    sources: Vec<String>,
}

impl LoggingEngine {
    fn new() -> Self {
        Self {
            viewport: Viewport::new(HOME_CENTER, HOME_ZOOM, ScreenPoint::new(1280.0, 800.0)),
            sources: Vec::new(),
        }
    }
}

impl MapEngine for LoggingEngine {
    fn is_style_loaded(&self) -> bool {
        true
    }

    fn has_source(&self, id: &str) -> bool {
        self.sources.iter().any(|s| s == id)
    }

    fn add_geojson_source(
        &mut self,
        id: &str,
        data: &FeatureCollection,
        cluster: &ClusterOptions,
    ) -> canopy::Result<()> {
        log::info!(
            "engine: add source '{}' ({} features, cluster radius {})",
            id,
            data.len(),
            cluster.radius
        );
        self.sources.push(id.to_string());
        Ok(())
    }

    fn set_geojson_data(&mut self, id: &str, data: &FeatureCollection) -> canopy::Result<()> {
        log::info!("engine: replace '{}' data ({} features)", id, data.len());
        Ok(())
    }

    fn add_layer(&mut self, spec: &LayerSpec) -> canopy::Result<()> {
        log::info!("engine: add layer '{}' ({:?})", spec.id, spec.kind);
        Ok(())
    }

    fn bind(&mut self, binding: &EventBinding) -> canopy::Result<()> {
        log::info!("engine: bind {:?} on '{}'", binding.kind, binding.layer);
        Ok(())
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn cluster_expansion_zoom(&self, _source: &str, _cluster_id: u64) -> canopy::Result<f64> {
        Ok(self.viewport.zoom + 2.0)
    }

    fn ease_to(&mut self, center: LatLng, zoom: f64) {
        log::info!("engine: ease to ({:.4}, {:.4}) z{:.1}", center.lat, center.lng, zoom);
        self.viewport.center = center;
        self.viewport.zoom = zoom;
    }

    fn set_pointer_cursor(&mut self, _pointer: bool) {}
}

async fn pump_until_idle<E, S>(session: &mut MapSession<E, S>)
where
    E: MapEngine,
    S: SpatialService + OverviewService + 'static,
{
    for _ in 0..20 {
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.pump();
    }
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let mut config = ViewerConfig::default();
    if let Ok(url) = std::env::var("CANOPY_SEARCH_URL") {
        config.endpoints.search_url = url;
    }
    if let Ok(url) = std::env::var("CANOPY_OVERVIEW_URL") {
        config.endpoints.overview_url = url;
    }

    let service = Arc::new(HttpInventoryService::new(&config.endpoints));
    let mut session = MapSession::new(LoggingEngine::new(), service, config);

    log::info!("map ready, fetching initial view");
    session.notify_map_ready();
    pump_until_idle(&mut session).await;
    println!(
        "initial view: {} features visible, {} genera listed",
        session.total_count(),
        session.filter_options().botanical_genera.len()
    );

    let ontario = region_by_name("Ontario").expect("region table");
    log::info!("flying to {}", ontario.name);
    session.fly_to_region(ontario);
    session.notify_move_end();
    pump_until_idle(&mut session).await;
    println!("{}: {} features visible", ontario.name, session.total_count());

    session.select_genus_dimension(Some(GenusDimension::Botanical));
    session.select_genus(Some("Acer".to_string()));
    pump_until_idle(&mut session).await;
    println!("Acer only: {} features visible", session.total_count());
}
