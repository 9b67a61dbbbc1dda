use crate::core::config::FetchConfig;
use crate::core::geo::GeoBounds;
use crate::core::viewport::Viewport;
use crate::query::filter::FilterState;

/// A fully-specified spatial query for one tile of a fetch cycle.
/// Constructed fresh per tile per cycle and immutable afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct TileQuery {
    pub bounds: GeoBounds,
    pub limit: u32,
    pub return_all: bool,
    pub filter: FilterState,
}

impl TileQuery {
    /// Builds the query for one tile. Pure and deterministic: the same
    /// bounds, zoom, filter snapshot, and config always produce the same
    /// query.
    pub fn build(bounds: GeoBounds, zoom: f64, filter: &FilterState, config: &FetchConfig) -> Self {
        Self {
            bounds,
            limit: config.result_cap,
            return_all: zoom >= config.return_all_min_zoom,
            filter: filter.clone(),
        }
    }

    /// Query-string parameters in the order the service documents them.
    /// Filter parameters are appended only when their preconditions hold:
    /// genus needs a dimension and a value, species additionally needs the
    /// genus filter to be present.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("min_lat", self.bounds.min_lat.to_string()),
            ("max_lat", self.bounds.max_lat.to_string()),
            ("min_lng", self.bounds.min_lng.to_string()),
            ("max_lng", self.bounds.max_lng.to_string()),
            ("limit", self.limit.to_string()),
            ("return_all", self.return_all.to_string()),
            ("count", "true".to_string()),
            ("count_only", "false".to_string()),
        ];

        if let Some((dimension, genus)) = self.filter.genus_selection() {
            params.push((dimension.genus_field(), genus.to_string()));
            if let Some((dimension, species)) = self.filter.species_selection() {
                params.push((dimension.species_field(), species.to_string()));
            }
        }

        params
    }
}

/// Plans the tile queries for one fetch cycle from a viewport snapshot.
///
/// Zoomed-in views (at or above the return-all threshold) fetch a single
/// uncapped tile. Wide views are capped, so the margin-inset rectangle is
/// split into the configured grid and each sub-tile queried separately to
/// recover coverage a single capped request would truncate.
pub fn plan_queries(
    viewport: &Viewport,
    filter: &FilterState,
    config: &FetchConfig,
) -> Vec<TileQuery> {
    let bounds = viewport.visible_bounds(config.margin_px);
    let tiles = if viewport.zoom >= config.return_all_min_zoom {
        vec![bounds]
    } else {
        bounds.partition(config.partition_steps)
    };

    tiles
        .into_iter()
        .map(|tile| TileQuery::build(tile, viewport.zoom, filter, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geo::{LatLng, ScreenPoint};
    use crate::query::filter::GenusDimension;

    fn bounds() -> GeoBounds {
        GeoBounds::new(43.58, 43.73, -79.51, -79.29)
    }

    fn params_map(query: &TileQuery) -> std::collections::HashMap<&'static str, String> {
        query.params().into_iter().collect()
    }

    #[test]
    fn test_genus_without_species() {
        let filter = FilterState {
            dimension: Some(GenusDimension::Botanical),
            genus: Some("Acer".to_string()),
            species: None,
        };
        let query = TileQuery::build(bounds(), 13.0, &filter, &FetchConfig::default());
        let params = params_map(&query);

        assert_eq!(params.get("botanical_genus").map(String::as_str), Some("Acer"));
        assert!(!params.contains_key("botanical_species"));
        assert!(!params.contains_key("common_species"));
    }

    #[test]
    fn test_species_without_genus_is_ignored() {
        let filter = FilterState {
            dimension: None,
            genus: None,
            species: Some("Acer pseudoplatanus".to_string()),
        };
        let query = TileQuery::build(bounds(), 13.0, &filter, &FetchConfig::default());
        let params = params_map(&query);

        assert!(!params.contains_key("botanical_genus"));
        assert!(!params.contains_key("common_genus"));
        assert!(!params.contains_key("botanical_species"));
        assert!(!params.contains_key("common_species"));
    }

    #[test]
    fn test_species_field_follows_dimension() {
        let filter = FilterState {
            dimension: Some(GenusDimension::Common),
            genus: Some("Maple".to_string()),
            species: Some("Sugar Maple".to_string()),
        };
        let query = TileQuery::build(bounds(), 13.0, &filter, &FetchConfig::default());
        let params = params_map(&query);

        assert_eq!(params.get("common_genus").map(String::as_str), Some("Maple"));
        assert_eq!(
            params.get("common_species").map(String::as_str),
            Some("Sugar Maple")
        );
        assert!(!params.contains_key("botanical_species"));
    }

    #[test]
    fn test_return_all_gated_by_zoom() {
        let config = FetchConfig::default();
        let filter = FilterState::default();

        let wide = TileQuery::build(bounds(), config.return_all_min_zoom - 1.0, &filter, &config);
        let close = TileQuery::build(bounds(), config.return_all_min_zoom, &filter, &config);

        assert!(!wide.return_all);
        assert!(close.return_all);
        assert_eq!(wide.limit, config.result_cap);
    }

    #[test]
    fn test_base_params_always_present() {
        let query = TileQuery::build(
            bounds(),
            13.0,
            &FilterState::default(),
            &FetchConfig::default(),
        );
        let params = params_map(&query);

        for key in [
            "min_lat", "max_lat", "min_lng", "max_lng", "limit", "return_all", "count",
            "count_only",
        ] {
            assert!(params.contains_key(key), "missing {}", key);
        }
        assert_eq!(params.get("count").map(String::as_str), Some("true"));
        assert_eq!(params.get("count_only").map(String::as_str), Some("false"));
    }

    #[test]
    fn test_plan_splits_wide_views_only() {
        let config = FetchConfig::default();
        let filter = FilterState::default();
        let size = ScreenPoint::new(1024.0, 768.0);

        let wide = Viewport::new(LatLng::new(43.65, -79.38), 9.0, size);
        let close = Viewport::new(LatLng::new(43.65, -79.38), 14.0, size);

        let wide_queries = plan_queries(&wide, &filter, &config);
        let close_queries = plan_queries(&close, &filter, &config);

        assert_eq!(wide_queries.len(), 9);
        assert!(wide_queries.iter().all(|q| !q.return_all));

        assert_eq!(close_queries.len(), 1);
        assert!(close_queries[0].return_all);
    }
}
