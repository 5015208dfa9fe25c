use crate::error::{Error, Result};
use crate::projection::{epsg, Coordinate, Projection, UtmZone};
use proj::Proj;

/// PROJ-backed transformation between WGS84 and a projected CRS
pub struct Transformer {
    forward: Proj,
    inverse: Proj,
    to_epsg: u16,
}

impl Transformer {
    /// Creates a transformer from WGS84 to the given projected EPSG code
    pub fn new(to_epsg: u16) -> Result<Self> {
        let geographic = format!("EPSG:{}", epsg::WGS84);
        let projected = format!("EPSG:{}", to_epsg);

        let forward = Proj::new_known_crs(&geographic, &projected, None)
            .map_err(|e| Error::Projection(format!("Failed to create projection: {}", e)))?;
        let inverse = Proj::new_known_crs(&projected, &geographic, None)
            .map_err(|e| Error::Projection(format!("Failed to create inverse projection: {}", e)))?;

        Ok(Self {
            forward,
            inverse,
            to_epsg,
        })
    }

    /// Creates the transformer for a UTM zone
    pub fn utm(zone: UtmZone) -> Result<Self> {
        Self::new(zone.epsg())
    }

    /// Returns the target EPSG code
    pub fn to_epsg(&self) -> u16 {
        self.to_epsg
    }
}

impl Projection for Transformer {
    // Known-CRS pipelines are normalized for visualization: always (lon, lat).
    fn to_planar(&self, geo: Coordinate) -> Result<Coordinate> {
        let result = self
            .forward
            .convert((geo.lon(), geo.lat()))
            .map_err(|e| Error::Projection(format!("Transformation failed: {}", e)))?;

        Ok(Coordinate::new(result.0, result.1))
    }

    fn to_geographic(&self, planar: Coordinate) -> Result<Coordinate> {
        let result = self
            .inverse
            .convert((planar.x, planar.y))
            .map_err(|e| Error::Projection(format!("Inverse transformation failed: {}", e)))?;

        Ok(Coordinate::from_lonlat(result.0, result.1))
    }
}
