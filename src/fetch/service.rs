use crate::core::config::Endpoints;
use crate::data::geojson::{Feature, SearchResponse};
use crate::query::builder::TileQuery;
use crate::query::filter::GenusDimension;
use crate::{CanopyError, Result};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reqwest::Client;
use std::collections::HashMap;

/// Shared HTTP client with a custom User-Agent so the query service doesn't
/// reject anonymous requests. Building the client once avoids the cost of
/// TLS and connection pool setup for every tile.
pub(crate) static HTTP_CLIENT: Lazy<Client> = Lazy::new(|| {
    Client::builder()
        .user_agent("canopy/0.1 (+https://github.com/example/canopy)")
        .build()
        .expect("failed to build reqwest client")
});

/// One tile's worth of service data: the features inside the tile's bounds
/// and the service-reported total for that region
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileResult {
    pub features: Vec<Feature>,
    pub count: u64,
}

impl TileResult {
    pub fn new(features: Vec<Feature>, count: u64) -> Self {
        Self { features, count }
    }
}

impl From<SearchResponse> for TileResult {
    fn from(response: SearchResponse) -> Self {
        let count = response.effective_count();
        Self {
            features: response.features,
            count,
        }
    }
}

/// Distinct filter values enumerated by the overview service, cleaned for
/// display (blank and whitespace-only entries removed)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterOptions {
    pub botanical_genera: Vec<String>,
    pub common_genera: Vec<String>,
}

impl FilterOptions {
    /// Builds options from the raw overview payload, a JSON object mapping
    /// dimension keys to arrays of strings
    pub fn from_raw(raw: HashMap<String, Vec<String>>) -> Self {
        let mut options = Self::default();
        for (key, values) in raw {
            let cleaned = Self::cleaned(values);
            if key == GenusDimension::Botanical.overview_key() {
                options.botanical_genera = cleaned;
            } else if key == GenusDimension::Common.overview_key() {
                options.common_genera = cleaned;
            }
        }
        options
    }

    /// The option list for one dimension
    pub fn genera(&self, dimension: GenusDimension) -> &[String] {
        match dimension {
            GenusDimension::Botanical => &self.botanical_genera,
            GenusDimension::Common => &self.common_genera,
        }
    }

    fn cleaned(values: Vec<String>) -> Vec<String> {
        values
            .into_iter()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .collect()
    }
}

/// Spatial query service seam: anything that can resolve one tile query
/// into features and a count. The production implementation speaks HTTP;
/// tests substitute scripted doubles.
#[async_trait]
pub trait SpatialService: Send + Sync {
    /// Fetches the features for one tile query
    async fn fetch_tile(&self, query: &TileQuery) -> Result<TileResult>;
}

/// Overview service seam: enumerates distinct filter option values
#[async_trait]
pub trait OverviewService: Send + Sync {
    /// Fetches the option lists, optionally narrowed to one dimension
    async fn fetch_options(&self, dimension: Option<GenusDimension>) -> Result<FilterOptions>;
}

/// HTTP implementation of both service seams
#[derive(Debug, Clone)]
pub struct HttpInventoryService {
    search_url: String,
    overview_url: String,
}

impl HttpInventoryService {
    pub fn new(endpoints: &Endpoints) -> Self {
        Self {
            search_url: endpoints.search_url.clone(),
            overview_url: endpoints.overview_url.clone(),
        }
    }
}

#[async_trait]
impl SpatialService for HttpInventoryService {
    async fn fetch_tile(&self, query: &TileQuery) -> Result<TileResult> {
        log::debug!(
            "fetching tile [{:.5},{:.5}]x[{:.5},{:.5}] return_all={}",
            query.bounds.min_lat,
            query.bounds.max_lat,
            query.bounds.min_lng,
            query.bounds.max_lng,
            query.return_all
        );

        let response = HTTP_CLIENT
            .get(&self.search_url)
            .query(&query.params())
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(CanopyError::Service(format!("HTTP {}", response.status())).into());
        }

        let body: SearchResponse = response.json().await?;
        Ok(TileResult::from(body))
    }
}

#[async_trait]
impl OverviewService for HttpInventoryService {
    async fn fetch_options(&self, dimension: Option<GenusDimension>) -> Result<FilterOptions> {
        let mut request = HTTP_CLIENT.get(&self.overview_url);
        if let Some(dimension) = dimension {
            request = request.query(&[("dimension", dimension.overview_key())]);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(CanopyError::Service(format!("HTTP {}", response.status())).into());
        }

        let raw: HashMap<String, Vec<String>> = response.json().await?;
        Ok(FilterOptions::from_raw(raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_options_filtered() {
        let mut raw = HashMap::new();
        raw.insert(
            "botanical_genus".to_string(),
            vec![
                "Acer".to_string(),
                "".to_string(),
                "   ".to_string(),
                " Quercus ".to_string(),
            ],
        );
        raw.insert(
            "common_genus".to_string(),
            vec!["Maple".to_string(), "\t".to_string()],
        );
        raw.insert("unrelated".to_string(), vec!["ignored".to_string()]);

        let options = FilterOptions::from_raw(raw);
        assert_eq!(options.botanical_genera, vec!["Acer", "Quercus"]);
        assert_eq!(options.common_genera, vec!["Maple"]);
        assert_eq!(
            options.genera(GenusDimension::Botanical),
            &["Acer".to_string(), "Quercus".to_string()]
        );
    }

    #[test]
    fn test_tile_result_from_response_without_count() {
        let response: SearchResponse = serde_json::from_str(
            r#"{"features": [{"type": "Feature", "geometry": {"type": "Point", "coordinates": [0.0, 0.0]}}]}"#,
        )
        .unwrap();

        let result = TileResult::from(response);
        assert_eq!(result.count, 1);
        assert_eq!(result.features.len(), 1);
    }
}
