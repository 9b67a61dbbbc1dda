use crate::fetch::aggregate::{AggregateResult, Aggregator};
use crate::fetch::service::{SpatialService, TileResult};
use crate::query::builder::TileQuery;
use futures::stream::{FuturesUnordered, StreamExt};

/// Runs the tile queries of one fetch cycle against the spatial service and
/// returns the completed aggregate.
///
/// Tiles are issued concurrently and folded as they complete, so
/// `on_progress` fires in completion order (once per tile, with the
/// in-progress aggregate, the number of completed tiles, and the total).
/// The final aggregate's feature ordering is still the canonical tile order
/// of the query list. A failed tile degrades to an empty result for this
/// cycle; the next cycle simply re-attempts it.
pub async fn run_cycle<S>(
    service: &S,
    queries: &[TileQuery],
    mut on_progress: impl FnMut(AggregateResult, usize, usize),
) -> AggregateResult
where
    S: SpatialService + ?Sized,
{
    let total = queries.len();
    let mut aggregator = Aggregator::new(total);

    let mut in_flight: FuturesUnordered<_> = queries
        .iter()
        .enumerate()
        .map(|(index, query)| async move { (index, fetch_tile_lenient(service, query).await) })
        .collect();

    while let Some((index, result)) = in_flight.next().await {
        aggregator.insert(index, result);
        on_progress(aggregator.snapshot(), aggregator.completed(), total);
    }

    aggregator.snapshot()
}

/// Fetches one tile, normalizing every failure (network error, non-success
/// status, malformed body) into an empty result. Errors go to the operator
/// log, never to the caller.
async fn fetch_tile_lenient<S>(service: &S, query: &TileQuery) -> TileResult
where
    S: SpatialService + ?Sized,
{
    match service.fetch_tile(query).await {
        Ok(result) => result,
        Err(error) => {
            log::warn!("tile fetch failed, treating tile as empty: {}", error);
            TileResult::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::FetchConfig;
    use crate::core::geo::GeoBounds;
    use crate::data::geojson::Feature;
    use crate::query::filter::FilterState;
    use crate::Result;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Service double that fails on selected tile indices and otherwise
    /// returns one feature per tile, delayed so completion order differs
    /// from issuance order.
    struct ScriptedService {
        failing: Vec<usize>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl SpatialService for ScriptedService {
        async fn fetch_tile(&self, query: &TileQuery) -> Result<TileResult> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            // The tile's min_lat encodes its index (see `queries` below).
            let index = query.bounds.min_lat as usize;
            if self.failing.contains(&index) {
                return Err("HTTP 502 Bad Gateway".into());
            }
            tokio::time::sleep(std::time::Duration::from_millis(
                ((9 - index) * 10) as u64,
            ))
            .await;
            Ok(TileResult::new(
                vec![Feature::point(index as f64, 0.0)],
                1,
            ))
        }
    }

    fn queries(count: usize) -> Vec<TileQuery> {
        let config = FetchConfig::default();
        (0..count)
            .map(|i| {
                TileQuery::build(
                    GeoBounds::new(i as f64, i as f64 + 1.0, 0.0, 1.0),
                    13.0,
                    &FilterState::default(),
                    &config,
                )
            })
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_tiles_degrade_to_empty() {
        let service = ScriptedService {
            failing: vec![1, 3],
            calls: AtomicUsize::new(0),
        };
        let queries = queries(5);

        let mut progress_calls = 0;
        let result = run_cycle(&service, &queries, |_, completed, total| {
            progress_calls += 1;
            assert!(completed <= total);
        })
        .await;

        assert_eq!(service.calls.load(Ordering::SeqCst), 5);
        assert_eq!(progress_calls, 5);
        assert_eq!(result.total_count, 3);
        assert_eq!(result.collection.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_final_order_is_canonical_despite_completion_order() {
        let service = ScriptedService {
            failing: Vec::new(),
            calls: AtomicUsize::new(0),
        };
        // Delays are inversely proportional to the index, so the last tile
        // completes first.
        let queries = queries(4);

        let result = run_cycle(&service, &queries, |_, _, _| {}).await;

        let lats: Vec<f64> = result
            .collection
            .features
            .iter()
            .map(|f| f.position().unwrap().lat)
            .collect();
        assert_eq!(lats, vec![0.0, 1.0, 2.0, 3.0]);
    }

    #[tokio::test]
    async fn test_empty_query_list() {
        let service = ScriptedService {
            failing: Vec::new(),
            calls: AtomicUsize::new(0),
        };

        let result = run_cycle(&service, &[], |_, _, _| {}).await;
        assert_eq!(result.total_count, 0);
        assert!(result.collection.is_empty());
    }
}
