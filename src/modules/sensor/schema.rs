use serde::Serialize;

use crate::services::sensor::{DetectionState, ErrorKind, SampleError, SampleResult};

// =============================================================================
// LEVEL
// =============================================================================

#[derive(Debug, Serialize)]
pub struct LevelResponse {
    pub level: f64,
}

// =============================================================================
// DETECTION
// =============================================================================

#[derive(Debug, Serialize)]
pub struct DetectionResponse {
    pub state: DetectionState,
    pub code: u8,
}

impl From<DetectionState> for DetectionResponse {
    fn from(state: DetectionState) -> Self {
        Self {
            state,
            code: state.code(),
        }
    }
}

// =============================================================================
// PUSHED CHARACTERISTICS
// =============================================================================

/// Values last pushed to the characteristic sinks; `None` until the first
/// successful poll
#[derive(Debug, Serialize)]
pub struct CharacteristicsResponse {
    pub level: Option<f64>,
    pub detected: Option<DetectionResponse>,
}

// =============================================================================
// LAST KNOWN SAMPLE
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum LastSampleResponse {
    Ok { level: f64 },
    Error { error: String, kind: ErrorKind },
}

impl From<&SampleResult> for LastSampleResponse {
    fn from(result: &SampleResult) -> Self {
        match result {
            Ok(level) => Self::Ok { level: *level },
            Err(e) => Self::Error {
                error: e.to_string(),
                kind: e.kind(),
            },
        }
    }
}

// =============================================================================
// ERROR RESPONSE
// =============================================================================

#[derive(Debug, Serialize)]
pub struct SensorErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl SensorErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            kind: None,
        }
    }
}

impl From<&SampleError> for SensorErrorResponse {
    fn from(err: &SampleError) -> Self {
        Self {
            error: err.to_string(),
            kind: Some(err.kind()),
        }
    }
}
