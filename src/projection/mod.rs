//! Geographic ↔ planar projection
//!
//! Grid snapping happens in a conformal, meter-based plane. The plane of a
//! batch is a UTM zone chosen from the reference point by a [`ZoneRule`];
//! the actual math comes from either the pure-Rust [`GeodesyProjection`] or,
//! with the `proj` feature, the PROJ library through [`Transformer`].

pub mod coordinate;
pub mod geodesy;
#[cfg(feature = "proj")]
pub mod transformer;
pub mod zone;

pub use coordinate::Coordinate;
pub use self::geodesy::GeodesyProjection;
#[cfg(feature = "proj")]
pub use transformer::Transformer;
pub use zone::{LongitudeBand, UtmZone, ZoneRule};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// EPSG codes used by the crate
pub mod epsg {
    /// WGS84 geographic
    pub const WGS84: u16 = 4326;
    /// WGS84 / UTM north zones are `32600 + zone`
    pub const UTM_NORTH_BASE: u16 = 32600;
    /// WGS84 / UTM south zones are `32700 + zone`
    pub const UTM_SOUTH_BASE: u16 = 32700;
}

/// Conversion between geographic degrees and planar meters
pub trait Projection {
    /// Projects a `(lon, lat)` coordinate into planar meters
    fn to_planar(&self, geo: Coordinate) -> Result<Coordinate>;

    /// Unprojects planar meters back into `(lon, lat)`
    fn to_geographic(&self, planar: Coordinate) -> Result<Coordinate>;
}

/// Which implementation performs the projection math
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionBackend {
    /// `geodesy` crate, no system libraries needed
    #[default]
    Geodesy,
    /// PROJ library (requires the `proj` cargo feature)
    Proj,
}

impl ProjectionBackend {
    /// Creates a projection for the given zone
    pub fn create(&self, zone: UtmZone) -> Result<Box<dyn Projection>> {
        match self {
            ProjectionBackend::Geodesy => Ok(Box::new(GeodesyProjection::utm(zone)?)),
            #[cfg(feature = "proj")]
            ProjectionBackend::Proj => Ok(Box::new(Transformer::utm(zone)?)),
            #[cfg(not(feature = "proj"))]
            ProjectionBackend::Proj => Err(crate::error::Error::Projection(
                "PROJ backend requested but the crate was built without the `proj` feature"
                    .to_string(),
            )),
        }
    }
}
