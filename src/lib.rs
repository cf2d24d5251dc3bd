pub mod config;
pub mod modules;
pub mod services;

use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use modules::metrics::metrics_routes;
use modules::sensor::sensor_routes;
use services::metrics::{metrics_middleware, MetricsRegistry};
use services::sensor::{Co2Sensor, DetectionState, WatchCharacteristic};

pub struct AppState {
    pub sensor: Arc<Co2Sensor>,
    // Sinks the sensor pushes into; read back without polling
    pub level: Arc<WatchCharacteristic<f64>>,
    pub detected: Arc<WatchCharacteristic<DetectionState>>,
}

pub fn create_app(state: AppState, metrics: Arc<MetricsRegistry>) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .nest("/sensor", sensor_routes())
        .merge(metrics_routes(metrics.clone()))
        .layer(middleware::from_fn_with_state(metrics, metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root() -> &'static str {
    "HTTP CO2 Sensor Bridge"
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}
