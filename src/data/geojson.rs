use crate::core::geo::LatLng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One attribute value carried by a point feature. The set of keys varies
/// per deployment, so properties are a typed map rather than a fixed record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropertyValue {
    String(String),
    Number(f64),
    Null,
}

impl PropertyValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }
}

/// Point geometry. The inventory service only ever returns points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Geometry {
    Point { coordinates: [f64; 2] },
}

impl Geometry {
    /// Geographic position of the point (GeoJSON orders lng, lat)
    pub fn position(&self) -> LatLng {
        match self {
            Geometry::Point { coordinates } => LatLng::new(coordinates[1], coordinates[0]),
        }
    }
}

/// A single inventory record: a point plus its backend-defined attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct Feature {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<serde_json::Value>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<HashMap<String, PropertyValue>>,
}

impl Feature {
    /// Creates a bare point feature
    pub fn point(lat: f64, lng: f64) -> Self {
        Self {
            id: None,
            geometry: Some(Geometry::Point {
                coordinates: [lng, lat],
            }),
            properties: None,
        }
    }

    /// Geographic position of the feature, if it has a geometry
    pub fn position(&self) -> Option<LatLng> {
        self.geometry.as_ref().map(Geometry::position)
    }

    /// String property lookup into the attribute bag
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.as_ref()?.get(key)?.as_str()
    }
}

/// Ordered sequence of features, serialized as a GeoJSON FeatureCollection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub struct FeatureCollection {
    pub features: Vec<Feature>,
}

impl FeatureCollection {
    pub fn new(features: Vec<Feature>) -> Self {
        Self { features }
    }

    pub fn empty() -> Self {
        Self {
            features: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Default for FeatureCollection {
    fn default() -> Self {
        Self::empty()
    }
}

/// Wire shape of a spatial search response: a FeatureCollection extended
/// with an optional total count (and an echo of the applied limit). Unknown
/// fields, including the `type` tag, are tolerated.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub features: Vec<Feature>,
    #[serde(default)]
    pub count: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
}

impl SearchResponse {
    /// Total count, falling back to the feature array length when the
    /// service omits `count`
    pub fn effective_count(&self) -> u64 {
        self.count.unwrap_or(self.features.len() as u64)
    }
}
