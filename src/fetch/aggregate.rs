use crate::data::geojson::FeatureCollection;
use crate::fetch::service::TileResult;

/// The merged outcome of one fetch cycle. Built once per cycle and
/// superseded entirely by the next cycle's aggregate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregateResult {
    pub collection: FeatureCollection,
    pub total_count: u64,
}

/// Folds per-tile results into the cycle's aggregate.
///
/// Tiles are slotted by their canonical index (the emission order of the
/// bounds partition), so snapshots always list features in canonical tile
/// order no matter which tile completed first. Features are concatenated
/// without identity dedup: overlapping tiles at shared boundaries may
/// double-count a feature that sits exactly on an edge. That is a known,
/// accepted limitation of this design.
#[derive(Debug)]
pub struct Aggregator {
    slots: Vec<Option<TileResult>>,
}

impl Aggregator {
    pub fn new(tile_count: usize) -> Self {
        Self {
            slots: vec![None; tile_count],
        }
    }

    /// Records one tile's result. Out-of-range indices are ignored; a slot
    /// written twice keeps the later result.
    pub fn insert(&mut self, index: usize, result: TileResult) {
        if let Some(slot) = self.slots.get_mut(index) {
            *slot = Some(result);
        } else {
            log::debug!("ignoring tile result for out-of-range index {}", index);
        }
    }

    /// Number of tiles that have reported so far
    pub fn completed(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn total(&self) -> usize {
        self.slots.len()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|slot| slot.is_some())
    }

    /// The in-progress aggregate over the tiles completed so far, in
    /// canonical tile order. Callers may snapshot after every tile for
    /// progressive rendering or once at the end for the full set.
    pub fn snapshot(&self) -> AggregateResult {
        let mut features = Vec::new();
        let mut total_count = 0;
        for slot in self.slots.iter().flatten() {
            features.extend(slot.features.iter().cloned());
            total_count += slot.count;
        }
        AggregateResult {
            collection: FeatureCollection::new(features),
            total_count,
        }
    }
}
