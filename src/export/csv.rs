//! CSV interchange, one row per zone
//!
//! Batch rows carry `ref_point, mean_ndvi, area_ha, offsets` with the pair
//! columns written as JSON arrays. Polygon rows replace the offsets with a
//! GeoJSON geometry. A zero-zone batch has no rows and cannot be read back.

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::{Batch, GridOffset, ReconstructedZone, ReferencePoint, Zone};

#[derive(Debug, Serialize, Deserialize)]
struct ZoneRow {
    ref_point: String,
    mean_ndvi: f64,
    area_ha: f64,
    offsets: String,
}

#[derive(Debug, Serialize)]
struct PolygonRow {
    ref_point: String,
    mean_ndvi: f64,
    area_ha: f64,
    geometry: String,
}

/// Writes one row per zone
pub fn write_batch<W: Write>(batch: &Batch, writer: W) -> Result<()> {
    let ref_point = serde_json::to_string(&batch.reference)?;
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    for zone in &batch.zones {
        csv_writer.serialize(ZoneRow {
            ref_point: ref_point.clone(),
            mean_ndvi: zone.mean_ndvi,
            area_ha: zone.area_ha,
            offsets: serde_json::to_string(&zone.offsets)?,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

pub fn write_batch_file<P: AsRef<Path>>(batch: &Batch, path: P) -> Result<()> {
    write_batch(batch, File::create(path)?)
}

// Python-style tuples are accepted as well as JSON arrays
fn parse_pair(text: &str) -> Result<ReferencePoint> {
    let normalized = text.trim().replace('(', "[").replace(')', "]");
    let pair: [f64; 2] = serde_json::from_str(&normalized)?;
    Ok(ReferencePoint::from(pair))
}

/// Reads rows back into a batch; every row must share one reference point
pub fn read_batch<R: Read>(reader: R) -> Result<Batch> {
    let mut csv_reader = ::csv::Reader::from_reader(reader);
    let mut reference: Option<ReferencePoint> = None;
    let mut zones = Vec::new();

    for (line, result) in csv_reader.deserialize::<ZoneRow>().enumerate() {
        let row = result?;
        let row_reference = parse_pair(&row.ref_point)?;

        match reference {
            None => reference = Some(row_reference),
            Some(existing) if existing != row_reference => {
                return Err(Error::Codec(format!(
                    "row {} has reference point {:?}, expected {:?}",
                    line + 1,
                    row_reference,
                    existing
                )));
            }
            Some(_) => {}
        }

        let offsets: Vec<GridOffset> = serde_json::from_str(&row.offsets)?;
        zones.push(Zone::new(row.mean_ndvi, row.area_ha, offsets));
    }

    let reference = reference.ok_or_else(|| Error::Codec("CSV contains no zone rows".to_string()))?;
    Ok(Batch::new(reference, zones))
}

pub fn read_batch_file<P: AsRef<Path>>(path: P) -> Result<Batch> {
    read_batch(File::open(path)?)
}

/// Writes reconstructed zones with their polygons as GeoJSON geometries
pub fn write_polygons<W: Write>(
    reference: ReferencePoint,
    zones: &[ReconstructedZone],
    writer: W,
) -> Result<()> {
    let ref_point = serde_json::to_string(&reference)?;
    let mut csv_writer = ::csv::Writer::from_writer(writer);

    for zone in zones {
        let geometry = super::geojson::feature(zone)["geometry"].to_string();
        csv_writer.serialize(PolygonRow {
            ref_point: ref_point.clone(),
            mean_ndvi: zone.mean_ndvi,
            area_ha: zone.area_ha,
            geometry,
        })?;
    }

    csv_writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridConfig;
    use tempfile::tempdir;

    fn batch() -> Batch {
        let offsets = |raw: &[[i32; 2]]| -> Vec<GridOffset> {
            raw.iter().map(|&[dx, dy]| GridOffset::new(dx, dy)).collect()
        };
        Batch::new(
            ReferencePoint::new(36.295, 4.227),
            vec![
                Zone::new(0.452, 123.4, offsets(&[[0, 0], [3, 0], [3, 2], [0, 2], [0, 0]])),
                Zone::new(-0.1, 5.5, offsets(&[[-1, -1], [1, -1], [0, 1], [-1, -1]])),
            ],
        )
    }

    #[test]
    fn test_write_layout() {
        let mut out = Vec::new();
        write_batch(&batch(), &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("ref_point,mean_ndvi,area_ha,offsets"));
        assert_eq!(
            lines.next(),
            Some("\"[36.295,4.227]\",0.452,123.4,\"[[0,0],[3,0],[3,2],[0,2],[0,0]]\"")
        );
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("zones.csv");

        write_batch_file(&batch(), &path).unwrap();
        assert_eq!(read_batch_file(&path).unwrap(), batch());
    }

    #[test]
    fn test_python_tuple_reference() {
        let text = "ref_point,mean_ndvi,area_ha,offsets\n\"(36.295, 4.227)\",0.5,1.0,\"[[0, 0], [1, 0], [1, 1], [0, 0]]\"\n";
        let batch = read_batch(text.as_bytes()).unwrap();
        assert_eq!(batch.reference, ReferencePoint::new(36.295, 4.227));
        assert_eq!(batch.zones[0].offsets.len(), 4);
    }

    #[test]
    fn test_mixed_references_are_rejected() {
        let text = "ref_point,mean_ndvi,area_ha,offsets\n\
                    \"[1.0,2.0]\",0.5,1.0,\"[]\"\n\
                    \"[1.0,2.5]\",0.5,1.0,\"[]\"\n";
        assert!(matches!(read_batch(text.as_bytes()), Err(Error::Codec(_))));
    }

    #[test]
    fn test_no_rows() {
        let text = "ref_point,mean_ndvi,area_ha,offsets\n";
        assert!(matches!(read_batch(text.as_bytes()), Err(Error::Codec(_))));
    }

    #[test]
    fn test_polygon_rows() {
        let batch = batch();
        let zones = batch.reconstruct(&GridConfig::default()).unwrap();

        let mut out = Vec::new();
        write_polygons(batch.reference, &zones, &mut out).unwrap();

        let mut reader = ::csv::Reader::from_reader(out.as_slice());
        let headers: Vec<String> = reader.headers().unwrap().iter().map(String::from).collect();
        assert_eq!(headers, vec!["ref_point", "mean_ndvi", "area_ha", "geometry"]);

        let records: Vec<_> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(records.len(), 2);
        let geometry: serde_json::Value = serde_json::from_str(&records[0][3]).unwrap();
        assert_eq!(geometry["type"], "Polygon");
    }
}
