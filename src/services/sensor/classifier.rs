use serde::Serialize;

/// Binary CO2 detection state derived from a level reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionState {
    #[default]
    Normal,
    Abnormal,
}

impl DetectionState {
    /// CarbonDioxideDetected characteristic code
    pub fn code(&self) -> u8 {
        match self {
            Self::Normal => 0,
            Self::Abnormal => 1,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Abnormal => "abnormal",
        }
    }
}

pub fn classify(value: f64, bound: f64) -> DetectionState {
    if value >= bound {
        DetectionState::Abnormal
    } else {
        DetectionState::Normal
    }
}
