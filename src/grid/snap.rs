//! Grid snapping of polygon rings

use crate::error::{Error, Result};
use crate::geometry::{distinct_cells, has_proper_crossing, merge_repeated, signed_area2, Ring};
use crate::grid::{check_wire_range, GridConfig, GridFrame};
use crate::projection::Coordinate;
use crate::types::{GridOffset, ReferencePoint};

impl GridFrame {
    /// Grid cells of a snapped ring, with consecutive repeats merged
    ///
    /// Fails with a range error when a vertex lands outside the 16-bit offset
    /// range. Fails with a geometry error when the input ring is degenerate,
    /// when snapping collapses it below 3 distinct cells or onto a line, or
    /// when the snapped edges cross each other.
    pub fn snap_cells(&self, polygon: &[Coordinate]) -> Result<Vec<GridOffset>> {
        let ring = Ring::new(polygon.to_vec())?;
        let cells = self.cells_of(ring.points())?;
        for (i, &cell) in cells.iter().enumerate() {
            check_wire_range(cell, i)?;
        }
        let cells = merge_repeated(&cells);

        let distinct = distinct_cells(&cells);
        if distinct < 3 {
            return Err(Error::geometry(format!(
                "ring collapsed to {} distinct grid cells after snapping",
                distinct
            )));
        }

        if signed_area2(&cells) == 0 {
            return Err(Error::geometry("snapped ring has zero area"));
        }

        if has_proper_crossing(&cells) {
            return Err(Error::geometry("snapped ring intersects itself"));
        }

        Ok(cells)
    }

    /// Moves every vertex onto the nearest grid intersection
    pub fn snap(&self, polygon: &[Coordinate]) -> Result<Ring> {
        let points = self
            .snap_cells(polygon)?
            .into_iter()
            .map(|cell| self.point_at(cell))
            .collect::<Result<Vec<_>>>()?;

        Ring::new(points)
    }
}

/// Snaps a geographic ring onto the grid anchored at `reference`
pub fn snap(polygon: &[Coordinate], reference: ReferencePoint, config: &GridConfig) -> Result<Ring> {
    GridFrame::new(reference, config)?.snap(polygon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Field;

    fn frame() -> GridFrame {
        GridFrame::new(ReferencePoint::new(36.295, 4.227), &GridConfig::default()).unwrap()
    }

    /// Geographic ring whose vertices sit `jitter` meters off the given cells
    fn jittered(frame: &GridFrame, cells: &[[i32; 2]], jitter: f64) -> Vec<Coordinate> {
        cells
            .iter()
            .map(|&[dx, dy]| {
                let exact = frame.point_at(GridOffset::new(dx, dy)).unwrap();
                // ~1 m of longitude/latitude near the equator is 9e-6 degrees
                Coordinate::from_lonlat(exact.lon() + jitter * 9e-6, exact.lat() - jitter * 9e-6)
            })
            .collect()
    }

    #[test]
    fn test_snaps_to_nearest_cells() {
        let frame = frame();
        let polygon = jittered(&frame, &[[0, 0], [3, 0], [3, 2], [0, 2]], 20.0);
        let cells = frame.snap_cells(&polygon).unwrap();
        assert_eq!(
            cells,
            vec![
                GridOffset::new(0, 0),
                GridOffset::new(3, 0),
                GridOffset::new(3, 2),
                GridOffset::new(0, 2),
                GridOffset::new(0, 0),
            ]
        );
    }

    #[test]
    fn test_snapped_vertices_lie_on_grid() {
        let frame = frame();
        let polygon = jittered(&frame, &[[1, 1], [5, 1], [5, 4], [1, 4]], 30.0);
        let ring = frame.snap(&polygon).unwrap();

        assert_eq!(ring.len(), 5);
        for (vertex, expected) in ring.points().iter().zip([[1, 1], [5, 1], [5, 4], [1, 4], [1, 1]]) {
            let exact = frame.point_at(GridOffset::new(expected[0], expected[1])).unwrap();
            assert!((vertex.lon() - exact.lon()).abs() < 1e-9);
            assert!((vertex.lat() - exact.lat()).abs() < 1e-9);
        }
    }

    #[test]
    fn test_snapping_is_idempotent() {
        let frame = frame();
        let polygon = jittered(&frame, &[[0, 0], [7, 1], [4, 6]], 35.0);
        let once = frame.snap(&polygon).unwrap();
        let twice = frame.snap(once.points()).unwrap();
        assert_eq!(
            frame.cells_of(once.points()).unwrap(),
            frame.cells_of(twice.points()).unwrap()
        );
    }

    #[test]
    fn test_collapse_is_a_geometry_error() {
        let frame = frame();
        // A 20 m triangle fits in one 100 m cell
        let tiny = jittered(&frame, &[[0, 0], [0, 0], [0, 0]], 0.0);
        let polygon = vec![
            tiny[0],
            Coordinate::from_lonlat(tiny[0].lon() + 18e-5, tiny[0].lat()),
            Coordinate::from_lonlat(tiny[0].lon(), tiny[0].lat() + 18e-5),
        ];
        let result = frame.snap(&polygon);
        assert!(matches!(result, Err(Error::Geometry { .. })));
    }

    #[test]
    fn test_merges_repeated_cells() {
        let frame = frame();
        let mut polygon = jittered(&frame, &[[0, 0], [4, 0], [4, 3], [0, 3]], 0.0);
        // A vertex 10 m from the second corner snaps into the same cell
        polygon.insert(2, Coordinate::from_lonlat(polygon[1].lon() + 9e-5, polygon[1].lat()));
        let cells = frame.snap_cells(&polygon).unwrap();
        assert_eq!(cells.len(), 5);
    }

    #[test]
    fn test_self_intersection_is_rejected() {
        let frame = frame();
        let bow_tie = jittered(&frame, &[[0, 0], [4, 4], [4, 0], [0, 4]], 0.0);
        assert!(matches!(frame.snap(&bow_tie), Err(Error::Geometry { .. })));
    }

    #[test]
    fn test_collinear_snap_is_a_geometry_error() {
        let frame = frame();
        // three cells on one row, middle vertex pushed 30 m off the line
        let mut polygon = jittered(&frame, &[[0, 0], [3, 0], [6, 0]], 0.0);
        polygon[1] = Coordinate::from_lonlat(polygon[1].lon(), polygon[1].lat() + 30.0 * 9e-6);
        let result = frame.snap_cells(&polygon);
        assert!(matches!(result, Err(Error::Geometry { .. })));
        assert!(result.unwrap_err().to_string().contains("zero area"));
    }

    #[test]
    fn test_wide_ring_on_fine_grid_is_range_error() {
        let config = GridConfig {
            spacing_m: 0.0003,
            ..GridConfig::default()
        };
        let frame = GridFrame::new(ReferencePoint::new(36.2, 4.2), &config).unwrap();
        let polygon = vec![
            Coordinate::from_lonlat(33.2, 4.0),
            Coordinate::from_lonlat(39.2, 4.0),
            Coordinate::from_lonlat(39.2, 4.4),
            Coordinate::from_lonlat(36.2, 3.6),
            Coordinate::from_lonlat(33.2, 4.4),
        ];
        assert!(matches!(
            frame.snap_cells(&polygon),
            Err(Error::Range {
                field: Field::Offset,
                vertex: Some(0),
                ..
            })
        ));
    }

    #[test]
    fn test_free_function_matches_frame() {
        let reference = ReferencePoint::new(36.295, 4.227);
        let frame = frame();
        let polygon = jittered(&frame, &[[0, 0], [2, 0], [2, 2]], 12.0);
        let a = snap(&polygon, reference, &GridConfig::default()).unwrap();
        let b = frame.snap(&polygon).unwrap();
        assert_eq!(a, b);
    }
}
