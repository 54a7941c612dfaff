//! Earthquake records and the GeoJSON shapes they are decoded from.

use serde::Deserialize;

/// Where an event happened.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Longitude in degrees.
    pub longitude: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Hypocenter depth in kilometers, when reported.
    pub depth_km: Option<f64>,
}

/// One earthquake from the feed.
#[derive(Debug, Clone, PartialEq)]
pub struct Feature {
    /// Event identifier, unique within one fetch.
    pub id: String,
    /// Location, absent when the feed carries no usable geometry.
    pub position: Option<Position>,
    /// Magnitude, absent when not yet computed.
    pub magnitude: Option<f64>,
    /// Magnitude type (ml, mb, mww, ...).
    pub mag_type: Option<String>,
    /// Place description.
    pub place: String,
    /// Origin time in epoch milliseconds.
    pub time_ms: i64,
    /// Whether a tsunami flag was raised.
    pub tsunami: bool,
    /// Event detail page.
    pub url: Option<String>,
}

impl Feature {
    /// Magnitude when it is a usable number.
    pub fn numeric_magnitude(&self) -> Option<f64> {
        self.magnitude.filter(|m| !m.is_nan())
    }

    /// Depth when it is a usable number.
    pub fn numeric_depth(&self) -> Option<f64> {
        self.position
            .and_then(|p| p.depth_km)
            .filter(|d| !d.is_nan())
    }

    pub(crate) fn from_raw(raw: RawFeature, index: usize) -> Self {
        let properties = raw.properties.unwrap_or_default();
        let position = raw
            .geometry
            .and_then(|g| g.coordinates)
            .and_then(|coords| {
                let longitude = coords.first().copied().flatten()?;
                let latitude = coords.get(1).copied().flatten()?;
                Some(Position {
                    longitude,
                    latitude,
                    depth_km: coords.get(2).copied().flatten(),
                })
            });

        Self {
            id: raw.id.unwrap_or_else(|| format!("feature-{}", index)),
            position,
            magnitude: properties.mag,
            mag_type: properties.mag_type,
            place: properties
                .place
                .unwrap_or_else(|| "Unknown location".to_string()),
            time_ms: properties.time.unwrap_or(0),
            tsunami: properties.tsunami.map(TsunamiFlag::is_set).unwrap_or(false),
            url: properties.url,
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFeatureCollection {
    #[serde(default)]
    pub(crate) features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawFeature {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
    #[serde(default)]
    properties: Option<RawProperties>,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(default)]
    coordinates: Option<Vec<Option<f64>>>,
}

#[derive(Debug, Default, Deserialize)]
struct RawProperties {
    #[serde(default)]
    mag: Option<f64>,
    #[serde(default, rename = "magType")]
    mag_type: Option<String>,
    #[serde(default)]
    place: Option<String>,
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    tsunami: Option<TsunamiFlag>,
    #[serde(default)]
    url: Option<String>,
}

/// The feed encodes the tsunami flag as 0/1; some mirrors send a boolean.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(untagged)]
enum TsunamiFlag {
    Int(i64),
    Bool(bool),
}

impl TsunamiFlag {
    fn is_set(self) -> bool {
        match self {
            TsunamiFlag::Int(v) => v != 0,
            TsunamiFlag::Bool(v) => v,
        }
    }
}
