//! Planar grid anchored at a batch reference point
//!
//! A [`GridFrame`] fixes everything a batch shares: the projection zone, the
//! planar position of the reference point and the grid spacing. Snapping,
//! offset encoding and polygon reconstruction all go through the same frame,
//! so a vertex snapped on one side lands in the same cell on the other.

pub mod offsets;
pub mod snap;

pub use offsets::{offsets_to_polygon, to_offsets};
pub use snap::snap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Field, Result};
use crate::projection::{Coordinate, Projection, ProjectionBackend, UtmZone, ZoneRule};
use crate::types::{GridOffset, ReferencePoint};

/// Default grid spacing in meters
pub const DEFAULT_SPACING_M: f64 = 100.0;

/// Grid spacing and projection settings shared by sender and receiver
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    pub spacing_m: f64,
    pub zone_rule: ZoneRule,
    pub backend: ProjectionBackend,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            spacing_m: DEFAULT_SPACING_M,
            zone_rule: ZoneRule::Standard,
            backend: ProjectionBackend::Geodesy,
        }
    }
}

impl GridConfig {
    /// Checks that the spacing is usable
    pub fn validate(&self) -> Result<()> {
        if !self.spacing_m.is_finite() || self.spacing_m <= 0.0 {
            return Err(Error::Config(format!(
                "grid spacing must be a positive number of meters, got {}",
                self.spacing_m
            )));
        }
        Ok(())
    }
}

/// Projection plus projected reference point for one batch
pub struct GridFrame {
    reference: ReferencePoint,
    origin: Coordinate,
    spacing_m: f64,
    zone: UtmZone,
    projection: Box<dyn Projection>,
}

impl GridFrame {
    /// Prepares the frame: selects the zone and projects the reference point once
    pub fn new(reference: ReferencePoint, config: &GridConfig) -> Result<Self> {
        config.validate()?;

        let zone = config.zone_rule.select(reference.coordinate());
        let projection = config.backend.create(zone)?;
        let origin = projection.to_planar(reference.coordinate())?;

        Ok(Self {
            reference,
            origin,
            spacing_m: config.spacing_m,
            zone,
            projection,
        })
    }

    /// Reference point the grid is anchored at
    pub fn reference(&self) -> ReferencePoint {
        self.reference
    }

    /// Projection zone of the frame
    pub fn zone(&self) -> UtmZone {
        self.zone
    }

    /// Grid spacing in meters
    pub fn spacing_m(&self) -> f64 {
        self.spacing_m
    }

    /// Nearest grid cell of a geographic coordinate, ties rounded away from zero
    pub fn cell_of(&self, geo: Coordinate) -> Result<GridOffset> {
        let planar = self.projection.to_planar(geo)?;
        let dx = ((planar.x - self.origin.x) / self.spacing_m).round();
        let dy = ((planar.y - self.origin.y) / self.spacing_m).round();

        Ok(GridOffset::new(to_cell_index(dx)?, to_cell_index(dy)?))
    }

    /// Geographic position of a grid cell
    pub fn point_at(&self, cell: GridOffset) -> Result<Coordinate> {
        let planar = Coordinate::new(
            self.origin.x + cell.dx as f64 * self.spacing_m,
            self.origin.y + cell.dy as f64 * self.spacing_m,
        );
        self.projection.to_geographic(planar)
    }

    /// Grid cells of every vertex, in input order
    pub fn cells_of(&self, polygon: &[Coordinate]) -> Result<Vec<GridOffset>> {
        polygon.iter().map(|&vertex| self.cell_of(vertex)).collect()
    }
}

fn to_cell_index(value: f64) -> Result<i32> {
    if !value.is_finite() || value < i32::MIN as f64 || value > i32::MAX as f64 {
        return Err(Error::range(Field::Offset, value));
    }
    Ok(value as i32)
}

/// Fails with a range error naming `vertex` if the cell does not fit the i16 wire field
pub(crate) fn check_wire_range(cell: GridOffset, vertex: usize) -> Result<()> {
    for value in [cell.dx, cell.dy] {
        if i16::try_from(value).is_err() {
            return Err(Error::range(Field::Offset, value as f64).at_vertex(vertex));
        }
    }
    Ok(())
}
