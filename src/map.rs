//! Map markers derived from the filtered snapshot.
//!
//! Each visible event becomes a circle whose radius grows with magnitude and
//! whose color encodes the depth tier. Markers are rebuilt from scratch every
//! frame.

use crate::feed::Feature;
use crate::stats::{self, DepthBucket};
use crate::ui::formatters::{format_depth, format_local_time, format_magnitude};
use ratatui::style::Color;

/// Smallest marker radius.
pub const MARKER_FLOOR_RADIUS: f64 = 4.0;

/// Radius units per magnitude unit.
pub const MARKER_SCALE: f64 = 3.0;

/// Initial map center (latitude, longitude).
pub const MAP_CENTER: (f64, f64) = (20.0, 0.0);

impl DepthBucket {
    /// Fixed marker color for this tier.
    pub fn color(self) -> Color {
        match self {
            DepthBucket::Shallow => Color::Rgb(0x00, 0xC8, 0x51),
            DepthBucket::Intermediate => Color::Rgb(0xFF, 0xBB, 0x33),
            DepthBucket::Deep => Color::Rgb(0xFF, 0x44, 0x44),
        }
    }
}

/// Marker radius for a magnitude.
pub fn marker_radius(magnitude: Option<f64>) -> f64 {
    let scaled = magnitude.filter(|m| !m.is_nan()).unwrap_or(0.0) * MARKER_SCALE;
    scaled.max(MARKER_FLOOR_RADIUS)
}

/// Depth tier used for coloring. Unknown depth draws as shallow.
pub fn marker_tier(depth_km: Option<f64>) -> DepthBucket {
    depth_km
        .and_then(DepthBucket::classify)
        .unwrap_or(DepthBucket::Shallow)
}

/// One circle on the map.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker<'a> {
    /// Source event.
    pub feature: &'a Feature,
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Radius in marker units.
    pub radius: f64,
    /// Depth tier.
    pub tier: DepthBucket,
}

impl<'a> Marker<'a> {
    /// Build a marker, or `None` when the event has no position.
    pub fn from_feature(feature: &'a Feature) -> Option<Self> {
        let position = feature.position?;
        Some(Self {
            feature,
            longitude: position.longitude,
            latitude: position.latitude,
            radius: marker_radius(feature.magnitude),
            tier: marker_tier(position.depth_km),
        })
    }

    /// Fill color.
    pub fn color(&self) -> Color {
        self.tier.color()
    }

    /// Popup contents for this marker.
    pub fn popup(&self) -> Popup {
        let feature = self.feature;
        let magnitude = match (&feature.mag_type, feature.magnitude) {
            (Some(kind), Some(_)) => format!("{} {}", format_magnitude(feature.magnitude), kind),
            _ => format_magnitude(feature.magnitude),
        };

        Popup {
            title: feature.place.clone(),
            magnitude,
            depth: format_depth(feature.numeric_depth()),
            time: format_local_time(feature.time_ms),
            tsunami: feature.tsunami,
        }
    }
}

/// Markers for every event at or above `threshold` that has a position.
pub fn build_markers(snapshot: &[Feature], threshold: f64) -> Vec<Marker<'_>> {
    snapshot
        .iter()
        .filter(|f| stats::passes_threshold(f, threshold))
        .filter_map(Marker::from_feature)
        .collect()
}

/// Deepest zoom level.
pub const MAX_ZOOM: f64 = 16.0;

/// Visible region of the world map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Latitude at the center of the view.
    pub center_lat: f64,
    /// Longitude at the center of the view.
    pub center_lon: f64,
    /// 1.0 shows the whole world; each doubling halves the span.
    pub zoom: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        let mut viewport = Self {
            center_lat: MAP_CENTER.0,
            center_lon: MAP_CENTER.1,
            zoom: 1.0,
        };
        viewport.clamp();
        viewport
    }
}

impl Viewport {
    fn half_lon(&self) -> f64 {
        180.0 / self.zoom
    }

    fn half_lat(&self) -> f64 {
        90.0 / self.zoom
    }

    /// Longitude bounds for the canvas.
    pub fn x_bounds(&self) -> [f64; 2] {
        [self.center_lon - self.half_lon(), self.center_lon + self.half_lon()]
    }

    /// Latitude bounds for the canvas.
    pub fn y_bounds(&self) -> [f64; 2] {
        [self.center_lat - self.half_lat(), self.center_lat + self.half_lat()]
    }

    /// Move by a fraction of the visible span (positive is north/east).
    pub fn pan(&mut self, north: f64, east: f64) {
        self.center_lat += north * self.half_lat();
        self.center_lon += east * self.half_lon();
        self.clamp();
    }

    /// Halve the visible span.
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 2.0).min(MAX_ZOOM);
        self.clamp();
    }

    /// Double the visible span.
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 2.0).max(1.0);
        self.clamp();
    }

    /// Center the view on a point.
    pub fn center_on(&mut self, lat: f64, lon: f64) {
        self.center_lat = lat;
        self.center_lon = lon;
        self.clamp();
    }

    /// Back to the whole world.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    // The view never leaves the -180..180 / -90..90 rectangle.
    fn clamp(&mut self) {
        let half_lat = self.half_lat();
        let half_lon = self.half_lon();
        self.center_lat = self.center_lat.clamp(-90.0 + half_lat, 90.0 - half_lat);
        self.center_lon = self.center_lon.clamp(-180.0 + half_lon, 180.0 - half_lon);
    }
}

/// Text shown when a marker is inspected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Popup {
    /// Place description.
    pub title: String,
    /// Formatted magnitude.
    pub magnitude: String,
    /// Formatted depth.
    pub depth: String,
    /// Local origin time.
    pub time: String,
    /// Show the tsunami warning line.
    pub tsunami: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::tests::quake;

    #[test]
    fn radius_has_a_floor() {
        assert_eq!(marker_radius(Some(0.5)), MARKER_FLOOR_RADIUS);
        assert_eq!(marker_radius(None), MARKER_FLOOR_RADIUS);
        assert_eq!(marker_radius(Some(-1.0)), MARKER_FLOOR_RADIUS);
        assert_eq!(marker_radius(Some(5.0)), 15.0);
    }

    #[test]
    fn color_follows_depth_tier() {
        assert_eq!(marker_tier(Some(10.0)).color(), Color::Rgb(0x00, 0xC8, 0x51));
        assert_eq!(marker_tier(Some(75.0)).color(), Color::Rgb(0xFF, 0xBB, 0x33));
        assert_eq!(marker_tier(Some(300.0)).color(), Color::Rgb(0xFF, 0x44, 0x44));
        assert_eq!(marker_tier(None), DepthBucket::Shallow);
    }

    #[test]
    fn events_without_position_are_not_drawn() {
        let mut hidden = quake("hidden", Some(6.0), Some(10.0));
        hidden.position = None;
        let snapshot = vec![
            quake("a", Some(5.0), Some(120.0)),
            hidden,
            quake("small", Some(1.0), Some(5.0)),
        ];

        let markers = build_markers(&snapshot, 2.0);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].feature.id, "a");
        assert_eq!(markers[0].tier, DepthBucket::Deep);
        assert_eq!(markers[0].radius, 15.0);
    }

    #[test]
    fn viewport_stays_on_the_world() {
        let mut viewport = Viewport::default();
        assert_eq!(viewport.x_bounds(), [-180.0, 180.0]);
        assert_eq!(viewport.y_bounds(), [-90.0, 90.0]);

        viewport.pan(1.0, 1.0);
        assert_eq!(viewport.x_bounds(), [-180.0, 180.0]);

        viewport.zoom_in();
        viewport.center_on(MAP_CENTER.0, MAP_CENTER.1);
        assert_eq!(viewport.y_bounds(), [-25.0, 65.0]);

        viewport.center_on(89.0, 179.0);
        assert_eq!(viewport.y_bounds(), [0.0, 90.0]);
        assert_eq!(viewport.x_bounds(), [0.0, 180.0]);

        for _ in 0..10 {
            viewport.zoom_in();
        }
        assert_eq!(viewport.zoom, MAX_ZOOM);
        viewport.reset();
        assert_eq!(viewport.zoom, 1.0);
    }

    #[test]
    fn popup_flags_tsunami() {
        let mut feature = quake("t", Some(7.1), Some(25.0));
        feature.tsunami = true;
        feature.mag_type = Some("mww".to_string());

        let popup = Marker::from_feature(&feature).unwrap().popup();
        assert_eq!(popup.title, "Place t");
        assert_eq!(popup.magnitude, "7.1 mww");
        assert_eq!(popup.depth, "25.0 km");
        assert!(popup.tsunami);
    }
}
