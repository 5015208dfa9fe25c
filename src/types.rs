//! Core data types for ndvi-zone-codec

use serde::{Deserialize, Serialize};

use crate::geometry::Ring;
use crate::projection::Coordinate;

/// Shared geographic anchor of a batch, in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 2]", into = "[f64; 2]")]
pub struct ReferencePoint {
    pub lon: f64,
    pub lat: f64,
}

impl ReferencePoint {
    /// Creates a reference point from longitude/latitude in degrees
    pub fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Rounds both components through `f32`, the precision of the wire header
    ///
    /// Anchoring a batch at the wire-precision point gives the receiver the
    /// exact grid origin the sender used.
    pub fn to_wire_precision(&self) -> Self {
        Self::new(self.lon as f32 as f64, self.lat as f32 as f64)
    }

    /// The point as a geographic coordinate
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::from_lonlat(self.lon, self.lat)
    }
}

impl From<[f64; 2]> for ReferencePoint {
    fn from(value: [f64; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<ReferencePoint> for [f64; 2] {
    fn from(value: ReferencePoint) -> Self {
        [value.lon, value.lat]
    }
}

/// Query area of a detection run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Creates a bounding box
    pub fn new(min_lon: f64, min_lat: f64, max_lon: f64, max_lat: f64) -> Self {
        Self {
            min_lon,
            min_lat,
            max_lon,
            max_lat,
        }
    }

    /// Centroid of the box, the default reference point of a batch
    pub fn centroid(&self) -> ReferencePoint {
        ReferencePoint::new(
            (self.min_lon + self.max_lon) / 2.0,
            (self.min_lat + self.max_lat) / 2.0,
        )
    }
}

/// Grid-cell coordinates relative to the reference point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "[i32; 2]", into = "[i32; 2]")]
pub struct GridOffset {
    pub dx: i32,
    pub dy: i32,
}

impl GridOffset {
    /// Creates an offset
    pub fn new(dx: i32, dy: i32) -> Self {
        Self { dx, dy }
    }
}

impl From<[i32; 2]> for GridOffset {
    fn from(value: [i32; 2]) -> Self {
        Self::new(value[0], value[1])
    }
}

impl From<GridOffset> for [i32; 2] {
    fn from(value: GridOffset) -> Self {
        [value.dx, value.dy]
    }
}

/// One vegetation zone as carried on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    pub mean_ndvi: f64,
    pub area_ha: f64,
    /// Closed ring in grid space, closing vertex included
    pub offsets: Vec<GridOffset>,
}

impl Zone {
    /// Creates a zone
    pub fn new(mean_ndvi: f64, area_ha: f64, offsets: Vec<GridOffset>) -> Self {
        Self {
            mean_ndvi,
            area_ha,
            offsets,
        }
    }
}

/// Reference point plus zones in transmission order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Batch {
    pub reference: ReferencePoint,
    pub zones: Vec<Zone>,
}

impl Batch {
    /// Creates a batch
    pub fn new(reference: ReferencePoint, zones: Vec<Zone>) -> Self {
        Self { reference, zones }
    }

    /// Number of zones
    pub fn len(&self) -> usize {
        self.zones.len()
    }

    /// Returns true if the batch carries no zones
    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }
}

/// Zone as produced by the detection pipeline, before snapping
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedZone {
    /// Exterior ring in `(lon, lat)` degrees
    pub polygon: Vec<Coordinate>,
    pub mean_ndvi: f64,
    pub area_m2: f64,
}

/// Output of one detection run: the query area and its zones
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionRun {
    pub bbox: BoundingBox,
    pub zones: Vec<DetectedZone>,
}

/// Decoded zone with its geographic polygon restored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconstructedZone {
    pub mean_ndvi: f64,
    pub area_ha: f64,
    pub offsets: Vec<GridOffset>,
    /// Absent when the zone carried no offsets
    pub polygon: Option<Ring>,
}
