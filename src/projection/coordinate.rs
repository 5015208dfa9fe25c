use serde::{Deserialize, Serialize};

/// Represents a coordinate in either geographic degrees or planar meters
///
/// Serialized as a `[x, y]` pair, the way GeoJSON writes positions.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct Coordinate {
    pub x: f64,
    pub y: f64,
}

impl Coordinate {
    /// Creates a new 2D coordinate
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Creates a coordinate from longitude/latitude in degrees (WGS84)
    pub fn from_lonlat(lon: f64, lat: f64) -> Self {
        Self::new(lon, lat)
    }

    /// Longitude, when the coordinate is geographic
    pub fn lon(&self) -> f64 {
        self.x
    }

    /// Latitude, when the coordinate is geographic
    pub fn lat(&self) -> f64 {
        self.y
    }

    /// Returns true if both components are finite numbers
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance, meaningful for planar coordinates
    pub fn distance(&self, other: Coordinate) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

impl From<[f64; 2]> for Coordinate {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<Coordinate> for [f64; 2] {
    fn from(value: Coordinate) -> Self {
        [value.x, value.y]
    }
}
