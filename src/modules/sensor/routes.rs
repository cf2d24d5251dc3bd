use axum::{routing::get, Router};
use std::sync::Arc;

use crate::AppState;
use super::controller;

pub fn sensor_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/level", get(controller::get_level))
        .route("/detected", get(controller::get_detected))
        .route("/characteristics", get(controller::get_characteristics))
        .route("/last", get(controller::get_last))
        .route("/info", get(controller::get_info))
}
