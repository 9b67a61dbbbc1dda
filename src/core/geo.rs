use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Default for ScreenPoint {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Geographic rectangle bounding one spatial query. Immutable once computed;
/// a fetch cycle derives one instance (or one per sub-tile when partitioned).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoBounds {
    pub min_lat: f64,
    pub max_lat: f64,
    pub min_lng: f64,
    pub max_lng: f64,
}

impl GeoBounds {
    pub fn new(min_lat: f64, max_lat: f64, min_lng: f64, max_lng: f64) -> Self {
        Self {
            min_lat,
            max_lat,
            min_lng,
            max_lng,
        }
    }

    /// Creates bounds from a south-west and a north-east corner
    pub fn from_corners(south_west: LatLng, north_east: LatLng) -> Self {
        Self::new(
            south_west.lat,
            north_east.lat,
            south_west.lng,
            north_east.lng,
        )
    }

    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    pub fn lng_span(&self) -> f64 {
        self.max_lng - self.min_lng
    }

    /// Gets the center point of the bounds
    pub fn center(&self) -> LatLng {
        LatLng::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lng + self.max_lng) / 2.0,
        )
    }

    /// Checks if the bounds are valid (min <= max)
    pub fn is_valid(&self) -> bool {
        self.min_lat <= self.max_lat && self.min_lng <= self.max_lng
    }

    /// Gets the area of the bounds in square degrees
    pub fn area(&self) -> f64 {
        if !self.is_valid() {
            0.0
        } else {
            self.lat_span() * self.lng_span()
        }
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.min_lat
            && point.lat <= self.max_lat
            && point.lng >= self.min_lng
            && point.lng <= self.max_lng
    }

    /// Gets the intersection of two bounds, if any
    pub fn intersection(&self, other: &GeoBounds) -> Option<GeoBounds> {
        let candidate = GeoBounds::new(
            self.min_lat.max(other.min_lat),
            self.max_lat.min(other.max_lat),
            self.min_lng.max(other.min_lng),
            self.max_lng.min(other.max_lng),
        );
        if candidate.is_valid() {
            Some(candidate)
        } else {
            None
        }
    }

    /// Splits the bounds into a `steps` x `steps` grid of sub-tiles that
    /// exactly tile the parent rectangle: adjacent tiles share an edge value
    /// bit-for-bit, with no gaps or overlaps. Tiles are emitted row-major,
    /// bottom row first; within a row, west to east. `steps <= 1` yields the
    /// bounds unchanged.
    pub fn partition(&self, steps: u32) -> Vec<GeoBounds> {
        if steps <= 1 {
            return vec![*self];
        }

        let n = steps as usize;
        // Shared edge vectors guarantee contiguity: tile (r, c) ends exactly
        // where tile (r+1, c) and tile (r, c+1) begin.
        let lat_edges = Self::edges(self.min_lat, self.max_lat, n);
        let lng_edges = Self::edges(self.min_lng, self.max_lng, n);

        let mut tiles = Vec::with_capacity(n * n);
        for row in 0..n {
            for col in 0..n {
                tiles.push(GeoBounds::new(
                    lat_edges[row],
                    lat_edges[row + 1],
                    lng_edges[col],
                    lng_edges[col + 1],
                ));
            }
        }
        tiles
    }

    fn edges(min: f64, max: f64, n: usize) -> Vec<f64> {
        let span = max - min;
        (0..=n)
            .map(|i| {
                if i == n {
                    max
                } else {
                    min + span * i as f64 / n as f64
                }
            })
            .collect()
    }
}
