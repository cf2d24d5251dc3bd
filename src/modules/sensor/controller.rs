use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::AppState;
use crate::services::sensor::{AccessoryInformation, SampleError};
use super::schema::{
    CharacteristicsResponse, DetectionResponse, LastSampleResponse, LevelResponse,
    SensorErrorResponse,
};

type ApiError = (StatusCode, Json<SensorErrorResponse>);

fn sample_error(err: SampleError) -> ApiError {
    let status = match err {
        SampleError::Transport(_) | SampleError::Parse(_) => StatusCode::BAD_GATEWAY,
        SampleError::Deadline(_) => StatusCode::GATEWAY_TIMEOUT,
        SampleError::Closed => StatusCode::SERVICE_UNAVAILABLE,
        SampleError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(SensorErrorResponse::from(&err)))
}

// =============================================================================
// GET /sensor/level - Current CO2 level (joins any poll in progress)
// =============================================================================

pub async fn get_level(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LevelResponse>, ApiError> {
    let level = state.sensor.get_value().await.map_err(sample_error)?;
    Ok(Json(LevelResponse { level }))
}

// =============================================================================
// GET /sensor/detected - Last pushed detection state (never polls)
// =============================================================================

pub async fn get_detected(State(state): State<Arc<AppState>>) -> Json<DetectionResponse> {
    Json(state.sensor.get_detection_state().into())
}

// =============================================================================
// GET /sensor/characteristics - Pushed sink values (never polls)
// =============================================================================

pub async fn get_characteristics(
    State(state): State<Arc<AppState>>,
) -> Json<CharacteristicsResponse> {
    Json(CharacteristicsResponse {
        level: state.level.value(),
        detected: state.detected.value().map(DetectionResponse::from),
    })
}

// =============================================================================
// GET /sensor/last - Cached result of the most recent poll
// =============================================================================

pub async fn get_last(
    State(state): State<Arc<AppState>>,
) -> Result<Json<LastSampleResponse>, ApiError> {
    match state.sensor.last_known() {
        Some(result) => Ok(Json(LastSampleResponse::from(&result))),
        None => Err((
            StatusCode::NOT_FOUND,
            Json(SensorErrorResponse::new("No poll has completed yet")),
        )),
    }
}

// =============================================================================
// GET /sensor/info - Accessory information
// =============================================================================

pub async fn get_info(State(state): State<Arc<AppState>>) -> Json<AccessoryInformation> {
    Json(state.sensor.information().clone())
}
