use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tower::ServiceBuilder;
use axum::extract::DefaultBodyLimit;

use crate::config::Config;
use super::handlers::*;

pub fn create_router(config: Config) -> Router {
    Router::new()
        .route("/ping", get(ping))
        .route("/api/encode", post(encode))
        .route("/api/decode", post(decode))
        .layer(
            ServiceBuilder::new()
                .layer(DefaultBodyLimit::max(16 * 1024 * 1024)) // 16MB limit
                .layer(CorsLayer::permissive())
        )
        .with_state(Arc::new(config))
}
