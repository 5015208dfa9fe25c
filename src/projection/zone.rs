//! UTM zone selection
//!
//! The planar frame of a batch is the UTM zone picked from its reference
//! point. Which zone gets picked is configuration: the standard 6° rule works
//! anywhere, longitude bands pin a whole operating region to a fixed zone.

use serde::{Deserialize, Serialize};

use crate::projection::{epsg, Coordinate};

/// A UTM zone: number 1..=60 plus hemisphere
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UtmZone {
    pub number: u8,
    pub north: bool,
}

impl UtmZone {
    /// Creates a zone, clamping the number into 1..=60
    pub fn new(number: u8, north: bool) -> Self {
        Self {
            number: number.clamp(1, 60),
            north,
        }
    }

    /// Standard zone containing a geographic coordinate
    pub fn containing(coord: Coordinate) -> Self {
        let number = ((coord.lon() + 180.0) / 6.0).floor() as i64 + 1;
        Self::new(number.clamp(1, 60) as u8, coord.lat() >= 0.0)
    }

    /// EPSG code of the WGS84 / UTM CRS for this zone
    pub fn epsg(&self) -> u16 {
        let base = if self.north {
            epsg::UTM_NORTH_BASE
        } else {
            epsg::UTM_SOUTH_BASE
        };
        base + self.number as u16
    }

    /// Central meridian in degrees
    pub fn central_meridian(&self) -> f64 {
        (self.number as f64 - 1.0) * 6.0 - 180.0 + 3.0
    }
}

/// Longitude band mapped onto a fixed zone; `min_lon` inclusive, `max_lon` exclusive
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LongitudeBand {
    pub min_lon: f64,
    pub max_lon: f64,
    pub zone: UtmZone,
}

impl LongitudeBand {
    fn contains(&self, lon: f64) -> bool {
        lon >= self.min_lon && lon < self.max_lon
    }
}

/// Rule picking the projection zone from a reference point
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum ZoneRule {
    /// `floor((lon + 180) / 6) + 1`, hemisphere from latitude sign
    Standard,
    /// First matching band wins, the fallback covers everything else
    Bands {
        bands: Vec<LongitudeBand>,
        fallback: UtmZone,
    },
}

impl ZoneRule {
    /// Two-zone rule for Kenya: 36N west of 39°E, 37N otherwise
    pub fn kenya() -> Self {
        ZoneRule::Bands {
            bands: vec![LongitudeBand {
                min_lon: 33.0,
                max_lon: 39.0,
                zone: UtmZone::new(36, true),
            }],
            fallback: UtmZone::new(37, true),
        }
    }

    /// Selects the zone for a geographic reference point
    pub fn select(&self, reference: Coordinate) -> UtmZone {
        match self {
            ZoneRule::Standard => UtmZone::containing(reference),
            ZoneRule::Bands { bands, fallback } => bands
                .iter()
                .find(|band| band.contains(reference.lon()))
                .map(|band| band.zone)
                .unwrap_or(*fallback),
        }
    }
}

impl Default for ZoneRule {
    fn default() -> Self {
        ZoneRule::Standard
    }
}
