//! Prelude module for common canopy types and traits
//!
//! Re-exports the most commonly used types for easy importing with
//! `use canopy::prelude::*;`

pub use crate::core::{
    config::{Endpoints, FetchConfig, LayerConfig, SchedulerConfig, ViewerConfig},
    geo::{GeoBounds, LatLng, ScreenPoint},
    viewport::Viewport,
};

pub use crate::data::geojson::{
    Feature, FeatureCollection, Geometry, PropertyValue, SearchResponse,
};

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
    engine::{
        ClusterOptions, EventBinding, EventKind, FeatureSubset, LayerEvent, LayerKind, LayerSpec,
        MapEngine,
    },
    sync::{ApplyOutcome, LayerState, LayerSynchronizer},
};

pub use crate::regions::{region_by_name, Region, HOME_CENTER, HOME_ZOOM, PROVINCES};

pub use crate::scheduler::{CycleUpdate, FetchScheduler, FetchTrigger, SessionUpdate};
pub use crate::session::{MapSession, SessionState};

pub use crate::{Error as CanopyError, Result};

pub use std::{
    sync::Arc,
    time::{Duration, Instant},
};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
