//! Closed polygon rings and grid-space validity checks

use std::collections::HashSet;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::projection::Coordinate;
use crate::types::GridOffset;

/// Closed exterior ring: at least 3 distinct vertices, last vertex equals first
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ring {
    points: Vec<Coordinate>,
}

impl Ring {
    /// Validates the vertices and closes the ring if needed
    pub fn new(mut points: Vec<Coordinate>) -> Result<Self> {
        if let Some(bad) = points.iter().find(|p| !p.is_finite()) {
            return Err(Error::geometry(format!(
                "non-finite vertex ({}, {})",
                bad.x, bad.y
            )));
        }

        let distinct: HashSet<(u64, u64)> = points
            .iter()
            .map(|p| (p.x.to_bits(), p.y.to_bits()))
            .collect();
        if distinct.len() < 3 {
            return Err(Error::geometry(format!(
                "ring has {} distinct vertices, at least 3 are required",
                distinct.len()
            )));
        }

        if points.first() != points.last() {
            points.push(points[0]);
        }

        Ok(Self { points })
    }

    /// Vertices including the closing duplicate
    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    /// Number of vertices including the closing duplicate
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; a valid ring has at least four stored vertices
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Consumes the ring and returns its vertices
    pub fn into_points(self) -> Vec<Coordinate> {
        self.points
    }
}

/// Number of distinct grid cells in an offset sequence
pub fn distinct_cells(cells: &[GridOffset]) -> usize {
    cells.iter().collect::<HashSet<_>>().len()
}

/// Drops consecutive repeats so no edge has zero length
pub fn merge_repeated(cells: &[GridOffset]) -> Vec<GridOffset> {
    let mut merged: Vec<GridOffset> = Vec::with_capacity(cells.len());
    for &cell in cells {
        if merged.last() != Some(&cell) {
            merged.push(cell);
        }
    }
    merged
}

fn orientation(a: GridOffset, b: GridOffset, c: GridOffset) -> i64 {
    let abx = b.dx as i64 - a.dx as i64;
    let aby = b.dy as i64 - a.dy as i64;
    let acx = c.dx as i64 - a.dx as i64;
    let acy = c.dy as i64 - a.dy as i64;
    // differences span 33 bits, their products need i128
    (abx as i128 * acy as i128 - aby as i128 * acx as i128).signum() as i64
}

/// Twice the signed shoelace area of a closed cell ring, positive when counter-clockwise
pub fn signed_area2(ring: &[GridOffset]) -> i128 {
    ring.windows(2)
        .map(|edge| {
            let (a, b) = (edge[0], edge[1]);
            a.dx as i128 * b.dy as i128 - b.dx as i128 * a.dy as i128
        })
        .sum()
}

/// Returns true if two non-adjacent edges of a closed cell ring cross properly
///
/// Touching and collinear overlaps are not counted; they stay renderable and
/// show up regularly once thin features are quantized.
pub fn has_proper_crossing(ring: &[GridOffset]) -> bool {
    if ring.len() < 5 {
        return false;
    }

    let edges = ring.len() - 1;
    for i in 0..edges {
        let (a, b) = (ring[i], ring[i + 1]);
        for j in (i + 2)..edges {
            if i == 0 && j == edges - 1 {
                continue;
            }
            let (c, d) = (ring[j], ring[j + 1]);

            let o1 = orientation(a, b, c);
            let o2 = orientation(a, b, d);
            let o3 = orientation(c, d, a);
            let o4 = orientation(c, d, b);

            if o1 * o2 < 0 && o3 * o4 < 0 {
                return true;
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells(raw: &[[i32; 2]]) -> Vec<GridOffset> {
        raw.iter().map(|&[dx, dy]| GridOffset::new(dx, dy)).collect()
    }

    #[test]
    fn test_ring_closes_open_input() {
        let ring = Ring::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(1.0, 1.0),
        ])
        .unwrap();
        assert_eq!(ring.len(), 4);
        assert_eq!(ring.points().first(), ring.points().last());
    }

    #[test]
    fn test_ring_keeps_closed_input() {
        let ring = Ring::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(1.0, 1.0),
            Coordinate::new(0.0, 0.0),
        ])
        .unwrap();
        assert_eq!(ring.len(), 4);
    }

    #[test]
    fn test_ring_rejects_degenerate() {
        let result = Ring::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(1.0, 0.0),
            Coordinate::new(0.0, 0.0),
        ]);
        assert!(matches!(result, Err(Error::Geometry { .. })));
        assert!(Ring::new(Vec::new()).is_err());
    }

    #[test]
    fn test_ring_rejects_non_finite() {
        let result = Ring::new(vec![
            Coordinate::new(0.0, 0.0),
            Coordinate::new(f64::NAN, 0.0),
            Coordinate::new(1.0, 1.0),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_merge_repeated() {
        let merged = merge_repeated(&cells(&[[0, 0], [0, 0], [1, 0], [1, 0], [1, 1], [0, 0]]));
        assert_eq!(merged, cells(&[[0, 0], [1, 0], [1, 1], [0, 0]]));
    }

    #[test]
    fn test_distinct_cells() {
        assert_eq!(distinct_cells(&cells(&[[0, 0], [1, 0], [0, 0]])), 2);
        assert_eq!(distinct_cells(&[]), 0);
    }

    #[test]
    fn test_square_is_simple() {
        let square = cells(&[[0, 0], [3, 0], [3, 2], [0, 2], [0, 0]]);
        assert!(!has_proper_crossing(&square));
    }

    #[test]
    fn test_bow_tie_crosses() {
        let bow_tie = cells(&[[0, 0], [2, 2], [2, 0], [0, 2], [0, 0]]);
        assert!(has_proper_crossing(&bow_tie));
    }

    #[test]
    fn test_crossing_test_with_extreme_cells() {
        let wide = cells(&[[i32::MIN, 0], [i32::MAX, 0], [i32::MAX, 1], [0, -1], [i32::MIN, 1], [i32::MIN, 0]]);
        assert!(has_proper_crossing(&wide));

        let square = cells(&[[i32::MIN, i32::MIN], [i32::MAX, i32::MIN], [i32::MAX, i32::MAX], [i32::MIN, i32::MAX], [i32::MIN, i32::MIN]]);
        assert!(!has_proper_crossing(&square));
    }

    #[test]
    fn test_signed_area() {
        assert_eq!(signed_area2(&cells(&[[0, 0], [3, 0], [3, 2], [0, 2], [0, 0]])), 12);
        assert_eq!(signed_area2(&cells(&[[0, 0], [0, 2], [3, 2], [3, 0], [0, 0]])), -12);
        assert_eq!(signed_area2(&cells(&[[0, 0], [2, 0], [4, 0], [0, 0]])), 0);
        assert_eq!(signed_area2(&[]), 0);
    }

    #[test]
    fn test_touching_spike_is_not_a_crossing() {
        let spike = cells(&[[0, 0], [4, 0], [4, 4], [2, 0], [0, 4], [0, 0]]);
        assert!(!has_proper_crossing(&spike));
    }
}
