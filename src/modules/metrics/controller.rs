use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use crate::services::metrics::MetricsRegistry;

const PROMETHEUS_TEXT: &str = "text/plain; version=0.0.4";

/// GET /metrics: every `co2_*` series (poll outcomes, coalesced requests,
/// last level and detection, HTTP traffic) in Prometheus text format
pub async fn get_metrics(State(metrics): State<Arc<MetricsRegistry>>) -> Response {
    match metrics.export() {
        Ok(output) => ([(header::CONTENT_TYPE, PROMETHEUS_TEXT)], output).into_response(),
        Err(e) => {
            tracing::error!("Metrics export failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to export metrics: {}", e),
            )
                .into_response()
        }
    }
}
