//! Delta and zigzag coding of offset sequences
//!
//! The first vertex of a zone is stored raw; every following vertex is the
//! difference to its predecessor, zigzag-mapped so small negative steps stay
//! small unsigned numbers.

use crate::error::{Error, Field, Result};
use crate::types::GridOffset;

/// Maps a signed 16-bit value onto an unsigned one: 0, -1, 1, -2 → 0, 1, 2, 3
pub fn zigzag_encode(value: i16) -> u16 {
    ((value << 1) ^ (value >> 15)) as u16
}

/// Inverse of [`zigzag_encode`]
pub fn zigzag_decode(value: u16) -> i16 {
    ((value >> 1) as i16) ^ -((value & 1) as i16)
}

/// Offset sequence split into its raw first vertex and zigzagged deltas
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeltaRing {
    pub first: Option<[i16; 2]>,
    pub deltas: Vec<[u16; 2]>,
}

impl DeltaRing {
    /// Number of vertices
    pub fn len(&self) -> usize {
        self.first.map_or(0, |_| 1 + self.deltas.len())
    }

    /// Returns true for a zone without vertices
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }
}

fn narrow(value: i64, field: Field, vertex: usize) -> Result<i16> {
    i16::try_from(value).map_err(|_| Error::range(field, value as f64).at_vertex(vertex))
}

/// Delta-codes an offset sequence, rejecting values that do not fit 16 bits
pub fn encode_deltas(offsets: &[GridOffset]) -> Result<DeltaRing> {
    let Some((first, rest)) = offsets.split_first() else {
        return Ok(DeltaRing::default());
    };

    let first = [
        narrow(first.dx as i64, Field::Offset, 0)?,
        narrow(first.dy as i64, Field::Offset, 0)?,
    ];

    // i64 so that any pair of i32 offsets subtracts without wrapping
    let mut deltas = Vec::with_capacity(rest.len());
    let mut previous = offsets[0];
    for (i, &offset) in rest.iter().enumerate() {
        let dx = narrow(offset.dx as i64 - previous.dx as i64, Field::OffsetDelta, i + 1)?;
        let dy = narrow(offset.dy as i64 - previous.dy as i64, Field::OffsetDelta, i + 1)?;
        deltas.push([zigzag_encode(dx), zigzag_encode(dy)]);
        previous = offset;
    }

    Ok(DeltaRing {
        first: Some(first),
        deltas,
    })
}

/// Accumulates zigzagged deltas back into absolute offsets
///
/// Every accumulated offset must stay inside the signed 16-bit range the
/// encoder enforces.
pub fn decode_deltas(ring: &DeltaRing) -> Result<Vec<GridOffset>> {
    let Some([dx, dy]) = ring.first else {
        return Ok(Vec::new());
    };

    let mut offsets = Vec::with_capacity(ring.len());
    let mut current = GridOffset::new(dx as i32, dy as i32);
    offsets.push(current);

    for (i, &[zx, zy]) in ring.deltas.iter().enumerate() {
        let dx = accumulate(current.dx, zx, i + 1)?;
        let dy = accumulate(current.dy, zy, i + 1)?;
        current = GridOffset::new(dx, dy);
        offsets.push(current);
    }

    Ok(offsets)
}

fn accumulate(current: i32, delta: u16, vertex: usize) -> Result<i32> {
    let next = current + zigzag_decode(delta) as i32;
    if i16::try_from(next).is_err() {
        return Err(Error::Codec(format!(
            "Offset {} at vertex {} is outside the 16-bit range",
            next, vertex
        )));
    }
    Ok(next)
}
