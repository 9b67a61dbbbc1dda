use crate::core::geo::{GeoBounds, LatLng, ScreenPoint};
use serde::{Deserialize, Serialize};

/// Web Mercator projection constants (EPSG:3857)
const EARTH_RADIUS: f64 = 6378137.0;

/// A read-only snapshot of the current map view: center, zoom, and screen
/// dimensions. The viewport is owned and mutated by the map engine / UI; the
/// fetch pipeline only ever reads snapshots of it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the map view in geographical coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: ScreenPoint,
}

impl Viewport {
    /// Creates a new viewport snapshot
    pub fn new(center: LatLng, zoom: f64, size: ScreenPoint) -> Self {
        Self { center, zoom, size }
    }

    /// Projects a LatLng to world pixel coordinates at the given zoom level
    /// using the standard Web Mercator projection (EPSG:3857)
    pub fn project(&self, lat_lng: &LatLng, zoom: f64) -> ScreenPoint {
        let scale = 256.0 * 2_f64.powf(zoom);

        let x = lat_lng.lng.to_radians() * EARTH_RADIUS;
        let y = ((std::f64::consts::PI / 4.0 + lat_lng.lat.to_radians() / 2.0)
            .tan()
            .ln())
            * EARTH_RADIUS;

        let world = 2.0 * std::f64::consts::PI * EARTH_RADIUS;
        let pixel_x = (x + std::f64::consts::PI * EARTH_RADIUS) / world * scale;
        let pixel_y = (-y + std::f64::consts::PI * EARTH_RADIUS) / world * scale;

        ScreenPoint::new(pixel_x, pixel_y)
    }

    /// Unprojects world pixel coordinates back to LatLng at the given zoom
    /// level (inverse Web Mercator)
    pub fn unproject(&self, pixel: &ScreenPoint, zoom: f64) -> LatLng {
        let scale = 256.0 * 2_f64.powf(zoom);
        let world = 2.0 * std::f64::consts::PI * EARTH_RADIUS;

        let x = (pixel.x / scale) * world - std::f64::consts::PI * EARTH_RADIUS;
        let y = std::f64::consts::PI * EARTH_RADIUS - (pixel.y / scale) * world;

        let lng = x / EARTH_RADIUS * 180.0 / std::f64::consts::PI;
        let lat = (2.0 * (y / EARTH_RADIUS).exp().atan() - std::f64::consts::PI / 2.0)
            * 180.0
            / std::f64::consts::PI;

        LatLng::new(lat, lng)
    }

    /// Converts container pixel coordinates (origin at the top-left of the
    /// viewport) back to geographical coordinates
    pub fn pixel_to_lat_lng(&self, pixel: &ScreenPoint) -> LatLng {
        let center_world = self.project(&self.center, self.zoom);
        let world = ScreenPoint::new(
            center_world.x + pixel.x - self.size.x / 2.0,
            center_world.y + pixel.y - self.size.y / 2.0,
        );
        self.unproject(&world, self.zoom)
    }

    /// Computes the geographic rectangle covering the visible area inset by
    /// `margin_px` pixels on each side, so features right at the screen edge
    /// are excluded and neighboring half-loaded tiles don't flicker in.
    ///
    /// A degenerate viewport (zero width or height) yields a valid zero-area
    /// rectangle rather than an error.
    pub fn visible_bounds(&self, margin_px: f64) -> GeoBounds {
        // Clamp the inset so a viewport narrower than twice the margin still
        // produces a valid (possibly zero-area) rectangle.
        let inset_x = margin_px.max(0.0).min(self.size.x / 2.0);
        let inset_y = margin_px.max(0.0).min(self.size.y / 2.0);

        let north_west = self.pixel_to_lat_lng(&ScreenPoint::new(inset_x, inset_y));
        let south_east =
            self.pixel_to_lat_lng(&ScreenPoint::new(self.size.x - inset_x, self.size.y - inset_y));

        GeoBounds::new(
            south_east.lat,
            north_west.lat,
            north_west.lng,
            south_east.lng,
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, ScreenPoint::new(800.0, 600.0))
    }
}
