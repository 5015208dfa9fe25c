//! Conversion between grid-aligned rings and integer cell offsets

use crate::error::Result;
use crate::geometry::Ring;
use crate::grid::{check_wire_range, GridConfig, GridFrame};
use crate::types::{GridOffset, ReferencePoint};

impl GridFrame {
    /// Cell offsets of every vertex, in ring order
    ///
    /// Each offset must fit a signed 16-bit wire field.
    pub fn to_offsets(&self, ring: &Ring) -> Result<Vec<GridOffset>> {
        ring.points()
            .iter()
            .enumerate()
            .map(|(i, &vertex)| {
                let cell = self.cell_of(vertex).map_err(|e| e.at_vertex(i))?;
                check_wire_range(cell, i)?;
                Ok(cell)
            })
            .collect()
    }

    /// Geographic ring for a sequence of cell offsets
    ///
    /// Returns `None` for an empty sequence. The ring is closed if the last
    /// offset differs from the first.
    pub fn offsets_to_polygon(&self, offsets: &[GridOffset]) -> Result<Option<Ring>> {
        if offsets.is_empty() {
            return Ok(None);
        }

        let points = offsets
            .iter()
            .map(|&cell| self.point_at(cell))
            .collect::<Result<Vec<_>>>()?;

        Ring::new(points).map(Some)
    }
}

/// Encodes a grid-aligned ring as cell offsets from `reference`
pub fn to_offsets(ring: &Ring, reference: ReferencePoint, config: &GridConfig) -> Result<Vec<GridOffset>> {
    GridFrame::new(reference, config)?.to_offsets(ring)
}

/// Rebuilds the geographic ring of a zone from its offsets
pub fn offsets_to_polygon(
    reference: ReferencePoint,
    offsets: &[GridOffset],
    config: &GridConfig,
) -> Result<Option<Ring>> {
    GridFrame::new(reference, config)?.offsets_to_polygon(offsets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, Field};
    use crate::projection::{Coordinate, GeodesyProjection, Projection, UtmZone};

    fn reference() -> ReferencePoint {
        ReferencePoint::new(36.295, 4.227)
    }

    fn offsets(raw: &[[i32; 2]]) -> Vec<GridOffset> {
        raw.iter().map(|&[dx, dy]| GridOffset::new(dx, dy)).collect()
    }

    #[test]
    fn test_grid_round_trip() {
        let config = GridConfig::default();
        let input = offsets(&[[0, 0], [3, 0], [3, 2], [0, 2], [0, 0]]);

        let ring = offsets_to_polygon(reference(), &input, &config).unwrap().unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(to_offsets(&ring, reference(), &config).unwrap(), input);
    }

    #[test]
    fn test_reconstructed_spacing_in_meters() {
        let config = GridConfig::default();
        let ring = offsets_to_polygon(reference(), &offsets(&[[0, 0], [3, 0], [3, 2]]), &config)
            .unwrap()
            .unwrap();

        let tm = GeodesyProjection::utm(UtmZone::new(37, true)).unwrap();
        let a = tm.to_planar(ring.points()[0]).unwrap();
        let b = tm.to_planar(ring.points()[1]).unwrap();
        let c = tm.to_planar(ring.points()[2]).unwrap();
        assert!((a.distance(b) - 300.0).abs() < 1e-3);
        assert!((b.distance(c) - 200.0).abs() < 1e-3);
    }

    #[test]
    fn test_open_sequence_is_closed() {
        let config = GridConfig::default();
        let ring = offsets_to_polygon(reference(), &offsets(&[[0, 0], [3, 0], [3, 2], [0, 2]]), &config)
            .unwrap()
            .unwrap();
        assert_eq!(ring.len(), 5);
        assert_eq!(ring.points()[0], ring.points()[4]);
    }

    #[test]
    fn test_orientation_is_preserved() {
        let config = GridConfig::default();
        let clockwise = offsets(&[[0, 0], [0, 2], [3, 2], [3, 0], [0, 0]]);
        let ring = offsets_to_polygon(reference(), &clockwise, &config).unwrap().unwrap();
        assert_eq!(to_offsets(&ring, reference(), &config).unwrap(), clockwise);
    }

    #[test]
    fn test_empty_offsets_have_no_polygon() {
        let result = offsets_to_polygon(reference(), &[], &GridConfig::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_degenerate_offsets_fail() {
        let result = offsets_to_polygon(reference(), &offsets(&[[0, 0], [1, 0]]), &GridConfig::default());
        assert!(matches!(result, Err(Error::Geometry { .. })));
    }

    #[test]
    fn test_offset_outside_i16_is_range_error() {
        let config = GridConfig {
            spacing_m: 1.0,
            ..GridConfig::default()
        };
        let ring = Ring::new(vec![
            Coordinate::from_lonlat(36.295, 4.227),
            Coordinate::from_lonlat(36.80, 4.227),
            Coordinate::from_lonlat(36.80, 4.30),
        ])
        .unwrap();
        // vertex 0 is the reference itself, vertex 1 is ~56 km east
        let result = to_offsets(&ring, reference(), &config);
        assert!(matches!(
            result,
            Err(Error::Range {
                field: Field::Offset,
                vertex: Some(1),
                ..
            })
        ));
    }
}
