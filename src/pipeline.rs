//! Detection results to transmittable batches
//!
//! A detection run yields polygons with their statistics plus the query
//! bounding box. The pipeline picks which zones to send, snaps them onto the
//! grid anchored at the box centroid and drops zones the grid or the wire
//! format cannot carry. Dropping is reported, never silent.

use log::{info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::codec::{self, quantize_zone};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::grid::GridFrame;
use crate::types::{Batch, DetectedZone, DetectionRun, Zone};

const M2_PER_HECTARE: f64 = 10_000.0;

/// Which detected zones make it into a batch
///
/// Zones with `min_area_m2 <= area < max_area_m2` are ranked by area,
/// largest first, and at most `max_zones` of them are encoded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ZoneSelection {
    pub min_area_m2: f64,
    pub max_area_m2: Option<f64>,
    pub max_zones: Option<usize>,
}

impl Default for ZoneSelection {
    fn default() -> Self {
        Self {
            min_area_m2: 0.0,
            max_area_m2: Some(10_000_000.0),
            max_zones: Some(10),
        }
    }
}

impl ZoneSelection {
    /// Candidates in encoding order, paired with their index in the input
    pub fn candidates<'a>(&self, zones: &'a [DetectedZone]) -> Vec<(usize, &'a DetectedZone)> {
        let max = self.max_area_m2.unwrap_or(f64::INFINITY);
        let mut candidates: Vec<_> = zones
            .iter()
            .enumerate()
            .filter(|(_, zone)| zone.area_m2 >= self.min_area_m2 && zone.area_m2 < max)
            .collect();

        // stable, so equal areas keep their input order
        candidates.sort_by(|(_, a), (_, b)| b.area_m2.total_cmp(&a.area_m2));
        candidates
    }

    /// Checks that the area range is non-empty
    pub fn validate(&self) -> Result<()> {
        let max = self.max_area_m2.unwrap_or(f64::INFINITY);
        if !self.min_area_m2.is_finite() || self.min_area_m2 < 0.0 || max.is_nan() || max <= self.min_area_m2 {
            return Err(Error::Config(format!(
                "invalid zone selection area range [{}, {:?})",
                self.min_area_m2, self.max_area_m2
            )));
        }
        Ok(())
    }
}

/// Zone left out of a batch and why
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DroppedZone {
    /// Index in the detection run
    pub index: usize,
    pub reason: String,
}

/// Batch built from one detection run
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub batch: Batch,
    pub dropped: Vec<DroppedZone>,
}

/// Packed payload of one detection run
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRun {
    pub payload: String,
    pub batch: Batch,
    pub dropped: Vec<DroppedZone>,
}

fn encode_zone(frame: &GridFrame, detected: &DetectedZone, config: &Config) -> Result<Zone> {
    let ring = frame.snap(&detected.polygon)?;
    let offsets = frame.to_offsets(&ring)?;
    let zone = Zone::new(detected.mean_ndvi, detected.area_m2 / M2_PER_HECTARE, offsets);

    // anything that would fail packing is dropped here instead
    quantize_zone(&zone, &config.codec.quantization)?;
    Ok(zone)
}

/// Builds the batch of one detection run
///
/// The reference point is the bounding-box centroid at wire precision. Zones
/// failing with a geometry or range error are dropped and logged; the next
/// candidate takes their place. Any other error aborts the run.
pub fn build_batch(run: &DetectionRun, config: &Config) -> Result<BatchReport> {
    config.validate()?;

    let reference = run.bbox.centroid().to_wire_precision();
    let frame = GridFrame::new(reference, &config.grid)?;
    let limit = config.selection.max_zones.unwrap_or(usize::MAX);

    let mut zones = Vec::new();
    let mut dropped = Vec::new();

    for (index, detected) in config.selection.candidates(&run.zones) {
        if zones.len() >= limit {
            break;
        }
        match encode_zone(&frame, detected, config) {
            Ok(zone) => zones.push(zone),
            Err(e @ (Error::Geometry { .. } | Error::Range { .. })) => {
                let e = e.at_zone(index);
                warn!("Dropping {}", e);
                dropped.push(DroppedZone {
                    index,
                    reason: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    info!(
        "Built batch at ({:.5}, {:.5}) in zone {}: {} of {} zones kept, {} dropped",
        reference.lon,
        reference.lat,
        frame.zone().epsg(),
        zones.len(),
        run.zones.len(),
        dropped.len()
    );

    Ok(BatchReport {
        batch: Batch::new(reference, zones),
        dropped,
    })
}

/// Builds and packs the batch of one detection run
pub fn encode_run(run: &DetectionRun, config: &Config) -> Result<EncodedRun> {
    let BatchReport { batch, dropped } = build_batch(run, config)?;
    let payload = codec::pack(&batch, &config.codec)?;
    Ok(EncodedRun {
        payload,
        batch,
        dropped,
    })
}

/// Encodes independent runs in parallel; results keep the input order
pub fn encode_runs(runs: &[DetectionRun], config: &Config) -> Vec<Result<EncodedRun>> {
    runs.par_iter().map(|run| encode_run(run, config)).collect()
}
