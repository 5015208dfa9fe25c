use std::env;

use log::info;
use ndvi_zone_codec::api::create_router;
use ndvi_zone_codec::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match env::var("CONFIG_PATH") {
        Ok(path) => Config::from_json_file(path)?,
        Err(_) => Config::default(),
    };
    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let app = create_router(config);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("NDVI zone codec API listening on http://{}", bind_addr);
    info!("  GET  /ping");
    info!("  POST /api/encode (detection run JSON)");
    info!("  POST /api/decode ({{\"payload\": ...}})");

    axum::serve(listener, app).await?;
    Ok(())
}
