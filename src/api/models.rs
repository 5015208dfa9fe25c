use serde::{Deserialize, Serialize};

use crate::pipeline::DroppedZone;

#[derive(Debug, Serialize)]
pub struct PingResponse {
    pub status: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct EncodeResponse {
    pub payload: String,
    pub zone_count: usize,
    pub dropped: Vec<DroppedZone>,
    /// Complete SMS body, summary plus payload
    pub message: String,
    pub execution_time_ms: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DecodeRequest {
    /// Bare payload or a complete SMS body
    pub payload: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
