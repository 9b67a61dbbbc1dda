//! Named fly-to shortcuts and the home camera position.
//! The inventory is country-wide; these are the reference regions the UI
//! offers as one-click destinations.

use crate::core::geo::LatLng;

/// Camera position covering the whole inventory
pub const HOME_CENTER: LatLng = LatLng {
    lat: 56.1304,
    lng: -106.3468,
};
pub const HOME_ZOOM: f64 = 4.0;

/// A named camera destination
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub name: &'static str,
    pub center: LatLng,
    pub zoom: f64,
}

/// Province shortcuts, west to east
pub const PROVINCES: [Region; 10] = [
    Region {
        name: "British Columbia",
        center: LatLng {
            lat: 53.7267,
            lng: -127.6476,
        },
        zoom: 5.0,
    },
    Region {
        name: "Alberta",
        center: LatLng {
            lat: 53.9333,
            lng: -116.5765,
        },
        zoom: 5.0,
    },
    Region {
        name: "Saskatchewan",
        center: LatLng {
            lat: 52.9399,
            lng: -106.4509,
        },
        zoom: 5.0,
    },
    Region {
        name: "Manitoba",
        center: LatLng {
            lat: 53.7609,
            lng: -98.8139,
        },
        zoom: 5.0,
    },
    Region {
        name: "Ontario",
        center: LatLng {
            lat: 51.2538,
            lng: -85.3232,
        },
        zoom: 5.0,
    },
    Region {
        name: "Quebec",
        center: LatLng {
            lat: 52.9399,
            lng: -73.5491,
        },
        zoom: 5.0,
    },
    Region {
        name: "New Brunswick",
        center: LatLng {
            lat: 46.5653,
            lng: -66.4619,
        },
        zoom: 6.0,
    },
    Region {
        name: "Nova Scotia",
        center: LatLng {
            lat: 44.6820,
            lng: -63.7443,
        },
        zoom: 6.0,
    },
    Region {
        name: "Prince Edward Island",
        center: LatLng {
            lat: 46.5107,
            lng: -63.4168,
        },
        zoom: 7.0,
    },
    Region {
        name: "Newfoundland and Labrador",
        center: LatLng {
            lat: 53.1355,
            lng: -57.6604,
        },
        zoom: 5.0,
    },
];

/// Looks up a region by name (case-insensitive)
pub fn region_by_name(name: &str) -> Option<&'static Region> {
    PROVINCES
        .iter()
        .find(|region| region.name.eq_ignore_ascii_case(name))
}
