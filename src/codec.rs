//! Batch packing and unpacking
//!
//! `pack` turns a [`Batch`] into a printable payload in three steps:
//! quantize every field to its wire width (failing before any byte is
//! written), serialize the raw buffer, then compress and text-encode it.
//! `decode` reverses the steps and either returns the whole batch or an
//! error; there are no partial results.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::compression::Compression;
use crate::error::{Error, Field, Result};
use crate::grid::{GridConfig, GridFrame};
use crate::text::TextEncoding;
use crate::types::{Batch, ReconstructedZone, ReferencePoint, Zone};
use crate::wire::{self, WireBatch, WireZone};

/// Fixed-point scaling of the per-zone statistics
///
/// NDVI is stored as `round((ndvi + ndvi_bias) * ndvi_scale)`; the default
/// bias of 1.0 maps the full [-1, 1] index range onto non-negative values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Quantization {
    pub ndvi_scale: f64,
    pub ndvi_bias: f64,
    pub area_scale: f64,
}

impl Default for Quantization {
    fn default() -> Self {
        Self {
            ndvi_scale: 1000.0,
            ndvi_bias: 1.0,
            area_scale: 10.0,
        }
    }
}

impl Quantization {
    /// Scales a mean NDVI value into its u16 field
    pub fn quantize_ndvi(&self, ndvi: f64) -> Result<u16> {
        to_u16((ndvi + self.ndvi_bias) * self.ndvi_scale)
            .ok_or_else(|| Error::range(Field::MeanNdvi, ndvi))
    }

    /// Inverse of [`Quantization::quantize_ndvi`]
    pub fn dequantize_ndvi(&self, stored: u16) -> f64 {
        stored as f64 / self.ndvi_scale - self.ndvi_bias
    }

    /// Scales an area in hectares into its u16 field
    pub fn quantize_area(&self, area_ha: f64) -> Result<u16> {
        to_u16(area_ha * self.area_scale).ok_or_else(|| Error::range(Field::AreaHa, area_ha))
    }

    /// Inverse of [`Quantization::quantize_area`]
    pub fn dequantize_area(&self, stored: u16) -> f64 {
        stored as f64 / self.area_scale
    }

    fn validate(&self) -> Result<()> {
        let valid = |v: f64| v.is_finite() && v > 0.0;
        if !valid(self.ndvi_scale) || !valid(self.area_scale) || !self.ndvi_bias.is_finite() {
            return Err(Error::Config(format!(
                "invalid quantization: ndvi_scale {}, ndvi_bias {}, area_scale {}",
                self.ndvi_scale, self.ndvi_bias, self.area_scale
            )));
        }
        Ok(())
    }
}

fn to_u16(scaled: f64) -> Option<u16> {
    let rounded = scaled.round();
    if rounded.is_finite() && rounded >= 0.0 && rounded <= u16::MAX as f64 {
        Some(rounded as u16)
    } else {
        None
    }
}

/// Settings of the packed payload; both ends must agree on them
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub quantization: Quantization,
    pub compression: Compression,
    /// Deflate level, 0-9
    pub compression_level: u32,
    pub text: TextEncoding,
    /// Upper bound on the decompressed buffer
    pub max_raw_bytes: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            quantization: Quantization::default(),
            compression: Compression::Deflate,
            compression_level: 9,
            text: TextEncoding::Base85,
            max_raw_bytes: 1 << 20,
        }
    }
}

impl CodecConfig {
    /// Checks levels and scales
    pub fn validate(&self) -> Result<()> {
        if self.compression_level > 9 {
            return Err(Error::Config(format!(
                "compression level must be 0-9, got {}",
                self.compression_level
            )));
        }
        self.quantization.validate()
    }
}

/// Reduces a batch to wire widths, failing on the first field out of range
pub fn quantize(batch: &Batch, quantization: &Quantization) -> Result<WireBatch> {
    if batch.zones.len() > u16::MAX as usize {
        return Err(Error::range(Field::ZoneCount, batch.zones.len() as f64));
    }

    let zones = batch
        .zones
        .iter()
        .enumerate()
        .map(|(index, zone)| quantize_zone(zone, quantization).map_err(|e| e.at_zone(index)))
        .collect::<Result<Vec<_>>>()?;

    Ok(WireBatch {
        lon: batch.reference.lon as f32,
        lat: batch.reference.lat as f32,
        zones,
    })
}

pub(crate) fn quantize_zone(zone: &Zone, quantization: &Quantization) -> Result<WireZone> {
    if zone.offsets.len() > u16::MAX as usize {
        return Err(Error::range(Field::OffsetCount, zone.offsets.len() as f64));
    }

    Ok(WireZone {
        ndvi: quantization.quantize_ndvi(zone.mean_ndvi)?,
        area: quantization.quantize_area(zone.area_ha)?,
        ring: wire::encode_deltas(&zone.offsets)?,
    })
}

/// Restores floating-point statistics and absolute offsets
pub fn dequantize(wire_batch: &WireBatch, quantization: &Quantization) -> Result<Batch> {
    let zones = wire_batch
        .zones
        .iter()
        .map(|zone| {
            Ok(Zone::new(
                quantization.dequantize_ndvi(zone.ndvi),
                quantization.dequantize_area(zone.area),
                wire::decode_deltas(&zone.ring)?,
            ))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Batch::new(
        ReferencePoint::new(wire_batch.lon as f64, wire_batch.lat as f64),
        zones,
    ))
}

/// Serializes a batch into the raw, uncompressed wire buffer
pub fn pack_raw(batch: &Batch, config: &CodecConfig) -> Result<Vec<u8>> {
    config.validate()?;
    Ok(wire::write(&quantize(batch, &config.quantization)?))
}

/// Parses a raw, uncompressed wire buffer
pub fn unpack_raw(data: &[u8], config: &CodecConfig) -> Result<Batch> {
    config.validate()?;
    dequantize(&wire::read(data)?, &config.quantization)
}

/// Packs a batch into a printable payload
pub fn pack(batch: &Batch, config: &CodecConfig) -> Result<String> {
    let raw = pack_raw(batch, config)?;
    let compressed = config.compression.compress(&raw, config.compression_level)?;
    let payload = config.text.encode(&compressed);

    debug!(
        "Packed {} zones: {} raw bytes, {} compressed, {} characters",
        batch.zones.len(),
        raw.len(),
        compressed.len(),
        payload.len()
    );

    Ok(payload)
}

/// Decodes a printable payload back into a batch
pub fn decode(payload: &str, config: &CodecConfig) -> Result<Batch> {
    config.validate()?;
    let compressed = config.text.decode(payload)?;
    let raw = config
        .compression
        .decompress(&compressed, config.max_raw_bytes)?;
    let batch = unpack_raw(&raw, config)?;

    debug!(
        "Decoded {} zones from {} characters ({} raw bytes)",
        batch.zones.len(),
        payload.len(),
        raw.len()
    );

    Ok(batch)
}

impl Batch {
    /// Rebuilds the geographic polygon of every zone
    pub fn reconstruct(&self, config: &GridConfig) -> Result<Vec<ReconstructedZone>> {
        let frame = GridFrame::new(self.reference, config)?;

        self.zones
            .iter()
            .enumerate()
            .map(|(index, zone)| {
                let polygon = frame
                    .offsets_to_polygon(&zone.offsets)
                    .map_err(|e| e.at_zone(index))?;
                Ok(ReconstructedZone {
                    mean_ndvi: zone.mean_ndvi,
                    area_ha: zone.area_ha,
                    offsets: zone.offsets.clone(),
                    polygon,
                })
            })
            .collect()
    }
}
