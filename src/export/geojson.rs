//! GeoJSON output of reconstructed zones

use serde_json::{json, Value};

use crate::types::{ReconstructedZone, ReferencePoint};

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// One zone as a Feature; zones without offsets get a null geometry
pub fn feature(zone: &ReconstructedZone) -> Value {
    let geometry = match &zone.polygon {
        Some(ring) => json!({
            "type": "Polygon",
            "coordinates": [ring],
        }),
        None => Value::Null,
    };

    json!({
        "type": "Feature",
        "geometry": geometry,
        "properties": {
            "mean_ndvi": round_to(zone.mean_ndvi, 4),
            "area_ha": round_to(zone.area_ha, 2),
            "offsets": zone.offsets,
        },
    })
}

/// All zones of a batch in transmission order
///
/// The reference point is kept as a foreign member so the offsets stay
/// interpretable.
pub fn feature_collection(reference: ReferencePoint, zones: &[ReconstructedZone]) -> Value {
    json!({
        "type": "FeatureCollection",
        "reference": reference,
        "features": zones.iter().map(feature).collect::<Vec<_>>(),
    })
}
