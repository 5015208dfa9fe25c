//! UTM projection through the pure-Rust `geodesy` crate

use geodesy::prelude::*;

use crate::error::{Error, Result};
use crate::projection::{Coordinate, Projection, UtmZone};

/// Transverse Mercator of one UTM zone on the WGS84 ellipsoid
pub struct GeodesyProjection {
    context: Minimal,
    op: OpHandle,
    zone: UtmZone,
}

impl GeodesyProjection {
    /// Creates a projection from a geodesy operator definition
    pub fn new(definition: &str, zone: UtmZone) -> Result<Self> {
        let mut context = Minimal::new();
        let op = context
            .op(definition)
            .map_err(|e| Error::Projection(format!("Failed to create projection '{}': {}", definition, e)))?;

        Ok(Self { context, op, zone })
    }

    /// Creates the projection for a UTM zone
    pub fn utm(zone: UtmZone) -> Result<Self> {
        let hemisphere = if zone.north { "" } else { " south" };
        Self::new(
            &format!("utm zone={} ellps=WGS84{}", zone.number, hemisphere),
            zone,
        )
    }

    /// Zone this projection was created for
    pub fn zone(&self) -> UtmZone {
        self.zone
    }
}

impl Projection for GeodesyProjection {
    fn to_planar(&self, geo: Coordinate) -> Result<Coordinate> {
        if !geo.is_finite() || geo.lat().abs() > 90.0 {
            return Err(Error::Projection(format!(
                "Invalid geographic coordinate ({}, {})",
                geo.lon(),
                geo.lat()
            )));
        }

        let mut data = [Coor2D::geo(geo.lat(), geo.lon())];
        self.context
            .apply(self.op, Fwd, &mut data)
            .map_err(|e| Error::Projection(format!("Transformation failed: {}", e)))?;

        let [x, y] = data[0].0;
        if !x.is_finite() || !y.is_finite() {
            return Err(Error::Projection(format!(
                "Coordinate ({}, {}) is outside the projection domain",
                geo.lon(),
                geo.lat()
            )));
        }

        Ok(Coordinate::new(x, y))
    }

    fn to_geographic(&self, planar: Coordinate) -> Result<Coordinate> {
        if !planar.is_finite() {
            return Err(Error::Projection(format!(
                "Invalid planar coordinate ({}, {})",
                planar.x, planar.y
            )));
        }

        let mut data = [Coor2D([planar.x, planar.y])];
        self.context
            .apply(self.op, Inv, &mut data)
            .map_err(|e| Error::Projection(format!("Inverse transformation failed: {}", e)))?;

        let [lon, lat] = data[0].0;
        if !lon.is_finite() || !lat.is_finite() {
            return Err(Error::Projection(format!(
                "Planar coordinate ({}, {}) is outside the projection domain",
                planar.x, planar.y
            )));
        }

        Ok(Coordinate::from_lonlat(lon.to_degrees(), lat.to_degrees()))
    }
}
