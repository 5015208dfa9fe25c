use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use log::{debug, warn};
use serde_json::Value;

use crate::config::Config;
use crate::error::Error;
use crate::types::DetectionRun;
use crate::{codec, export, message, pipeline};
use super::models::*;

type ApiError = (StatusCode, Json<ErrorResponse>);

fn error_response(e: Error) -> ApiError {
    let status = match &e {
        Error::Geometry { .. } | Error::Range { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        Error::Codec(_) | Error::Json(_) | Error::Csv(_) => StatusCode::BAD_REQUEST,
        Error::Projection(_) | Error::Config(_) | Error::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    warn!("Request failed with {}: {}", status, e);

    (
        status,
        Json(ErrorResponse {
            error: e.to_string(),
        }),
    )
}

pub async fn ping() -> Json<PingResponse> {
    Json(PingResponse {
        status: "ok".to_string(),
        message: "Server is running.".to_string(),
    })
}

pub async fn encode(
    State(config): State<Arc<Config>>,
    Json(run): Json<DetectionRun>,
) -> Result<Json<EncodeResponse>, ApiError> {
    let start = Instant::now();

    let encoded = pipeline::encode_run(&run, &config).map_err(error_response)?;
    let execution_time_ms = start.elapsed().as_secs_f64() * 1000.0;
    debug!(
        "Encoded {} zones into {} characters in {:.2} ms",
        encoded.batch.len(),
        encoded.payload.len(),
        execution_time_ms
    );

    Ok(Json(EncodeResponse {
        message: message::compose(&encoded.batch, &encoded.payload),
        zone_count: encoded.batch.len(),
        payload: encoded.payload,
        dropped: encoded.dropped,
        execution_time_ms,
    }))
}

pub async fn decode(
    State(config): State<Arc<Config>>,
    Json(req): Json<DecodeRequest>,
) -> Result<Json<Value>, ApiError> {
    let payload = message::extract_payload(&req.payload)
        .ok_or_else(|| error_response(Error::Codec("Empty payload".to_string())))?;

    let batch = codec::decode(payload, &config.codec).map_err(error_response)?;
    let zones = batch.reconstruct(&config.grid).map_err(error_response)?;

    Ok(Json(export::feature_collection(batch.reference, &zones)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridFrame;
    use crate::types::{BoundingBox, DetectedZone, GridOffset};

    fn config() -> Arc<Config> {
        Arc::new(Config::default())
    }

    fn run() -> DetectionRun {
        let bbox = BoundingBox::new(36.26, 4.19, 36.33, 4.26);
        let frame = GridFrame::new(bbox.centroid().to_wire_precision(), &config().grid).unwrap();
        let polygon = [[0, 0], [3, 0], [3, 2], [0, 2]]
            .iter()
            .map(|&[dx, dy]| frame.point_at(GridOffset::new(dx, dy)).unwrap())
            .collect();

        DetectionRun {
            bbox,
            zones: vec![DetectedZone {
                polygon,
                mean_ndvi: 0.452,
                area_m2: 60_000.0,
            }],
        }
    }

    #[tokio::test]
    async fn test_ping() {
        let Json(response) = ping().await;
        assert_eq!(response.status, "ok");
    }

    #[tokio::test]
    async fn test_encode_then_decode() {
        let Json(encoded) = encode(State(config()), Json(run())).await.unwrap();
        assert_eq!(encoded.zone_count, 1);
        assert!(encoded.dropped.is_empty());
        assert!(encoded.message.starts_with("Found 1 high NDVI zones:"));
        assert!(encoded.message.ends_with(&encoded.payload));

        // the whole SMS body is accepted as well
        let request = DecodeRequest {
            payload: encoded.message.clone(),
        };
        let Json(collection) = decode(State(config()), Json(request)).await.unwrap();
        let features = collection["features"].as_array().unwrap();
        assert_eq!(features.len(), 1);
        assert_eq!(features[0]["properties"]["mean_ndvi"], serde_json::json!(0.452));
        assert_eq!(features[0]["properties"]["area_ha"], serde_json::json!(6.0));
    }

    #[tokio::test]
    async fn test_garbage_payload_is_bad_request() {
        let request = DecodeRequest {
            payload: "not a payload".to_string(),
        };
        let (status, Json(body)) = decode(State(config()), Json(request)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(!body.error.is_empty());
    }

    #[tokio::test]
    async fn test_empty_payload_is_bad_request() {
        let request = DecodeRequest {
            payload: "\n".to_string(),
        };
        let (status, _) = decode(State(config()), Json(request)).await.unwrap_err();
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_status_mapping() {
        let (status, _) = error_response(Error::geometry("collapsed"));
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        let (status, _) = error_response(Error::Config("bad".to_string()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
