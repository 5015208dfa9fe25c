//! Raw binary layout of a packed batch
//!
//! ```text
//! f32 reference longitude | f32 reference latitude | u16 zone count
//! per zone:
//!   u16 mean_ndvi | u16 area_ha | u16 offset count
//!   i16 dx | i16 dy                      (first offset, raw)
//!   u16 zz(ddx) | u16 zz(ddy)  ...       (count - 1 zigzagged deltas)
//! ```
//!
//! All fields are big-endian. A zone with an offset count of zero has no
//! offset fields at all.

pub mod byte_order;
pub mod zigzag;

pub use byte_order::{WireReader, WireWriter};
pub use zigzag::{decode_deltas, encode_deltas, zigzag_decode, zigzag_encode, DeltaRing};

use crate::error::{Error, Result};

/// Bytes before the first zone
pub const HEADER_LEN: usize = 10;
/// Bytes of a zone without offsets
pub const ZONE_HEADER_LEN: usize = 6;
/// Bytes per stored offset
pub const OFFSET_LEN: usize = 4;

/// Zone with every field already reduced to its wire width
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WireZone {
    pub ndvi: u16,
    pub area: u16,
    pub ring: DeltaRing,
}

/// Batch with every field already reduced to its wire width
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireBatch {
    pub lon: f32,
    pub lat: f32,
    pub zones: Vec<WireZone>,
}

impl WireBatch {
    /// Exact size of the serialized buffer
    pub fn encoded_len(&self) -> usize {
        HEADER_LEN
            + self
                .zones
                .iter()
                .map(|zone| ZONE_HEADER_LEN + zone.ring.len() * OFFSET_LEN)
                .sum::<usize>()
    }
}

/// Serializes a batch whose fields have already been range-checked
///
/// Zone and offset counts must fit `u16`; quantization guarantees that.
pub fn write(batch: &WireBatch) -> Vec<u8> {
    let mut writer = WireWriter::with_capacity(batch.encoded_len());

    writer.write_f32(batch.lon);
    writer.write_f32(batch.lat);
    writer.write_u16(batch.zones.len() as u16);

    for zone in &batch.zones {
        writer.write_u16(zone.ndvi);
        writer.write_u16(zone.area);
        writer.write_u16(zone.ring.len() as u16);

        if let Some([dx, dy]) = zone.ring.first {
            writer.write_i16(dx);
            writer.write_i16(dy);
        }
        for &[zx, zy] in &zone.ring.deltas {
            writer.write_u16(zx);
            writer.write_u16(zy);
        }
    }

    writer.into_inner()
}

/// Parses a raw buffer, rejecting any length inconsistent with its header fields
pub fn read(data: &[u8]) -> Result<WireBatch> {
    let mut reader = WireReader::new(data);

    let lon = reader.read_f32()?;
    let lat = reader.read_f32()?;
    if !lon.is_finite() || !lat.is_finite() {
        return Err(Error::Codec(format!(
            "Reference point ({}, {}) is not finite",
            lon, lat
        )));
    }

    let zone_count = reader.read_u16()? as usize;
    if zone_count * ZONE_HEADER_LEN > reader.remaining() {
        return Err(Error::Codec(format!(
            "Zone count {} needs at least {} bytes, {} remain",
            zone_count,
            zone_count * ZONE_HEADER_LEN,
            reader.remaining()
        )));
    }

    let mut zones = Vec::with_capacity(zone_count);
    for index in 0..zone_count {
        let ndvi = reader.read_u16()?;
        let area = reader.read_u16()?;
        let offset_count = reader.read_u16()? as usize;

        let zones_left = zone_count - index - 1;
        let needed = offset_count * OFFSET_LEN + zones_left * ZONE_HEADER_LEN;
        if needed > reader.remaining() {
            return Err(Error::Codec(format!(
                "Zone {} declares {} offsets but only {} bytes remain",
                index,
                offset_count,
                reader.remaining()
            )));
        }

        let mut ring = DeltaRing::default();
        if offset_count > 0 {
            ring.first = Some([reader.read_i16()?, reader.read_i16()?]);
            ring.deltas.reserve(offset_count - 1);
            for _ in 1..offset_count {
                ring.deltas.push([reader.read_u16()?, reader.read_u16()?]);
            }
        }

        zones.push(WireZone { ndvi, area, ring });
    }

    if reader.remaining() != 0 {
        return Err(Error::Codec(format!(
            "{} unexpected bytes after the last zone",
            reader.remaining()
        )));
    }

    Ok(WireBatch { lon, lat, zones })
}
