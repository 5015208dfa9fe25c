//! SMS body composition
//!
//! The body is a human-readable summary followed by the payload on its own
//! last line, so a receiver can recover the payload from a forwarded message.

use crate::types::Batch;

/// Summary lines for a batch, one line per zone
pub fn summary(batch: &Batch) -> String {
    if batch.is_empty() {
        return "No high NDVI zones found for your query.".to_string();
    }

    let mut lines = Vec::with_capacity(batch.len() + 1);
    lines.push(format!("Found {} high NDVI zones:", batch.len()));
    for zone in &batch.zones {
        lines.push(format!("NDVI: {:.2}, Area(ha): {:.1}", zone.mean_ndvi, zone.area_ha));
    }
    lines.join("\n")
}

/// Full SMS body: the summary, then the payload on its own line
pub fn compose(batch: &Batch, payload: &str) -> String {
    format!("{}\n{}", summary(batch), payload)
}

/// Payload line of a composed message
///
/// A bare payload is returned as is.
pub fn extract_payload(message: &str) -> Option<&str> {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
}
