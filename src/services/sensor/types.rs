use serde::Serialize;
use std::time::Duration;

/// Outcome of one poll cycle. Every waiter of a cycle receives a clone of the
/// same value.
pub type SampleResult = Result<f64, SampleError>;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SampleError {
    #[error("Transport error: {0}")]
    Transport(String),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Poll did not complete within {0:?}")]
    Deadline(Duration),
    #[error("Poll coordinator is shut down")]
    Closed,
    #[error("Poll task failed: {0}")]
    Internal(String),
}

impl SampleError {
    /// Stable label used in metrics and API error bodies
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Transport(_) => ErrorKind::Transport,
            Self::Parse(_) => ErrorKind::Parse,
            Self::Deadline(_) => ErrorKind::Deadline,
            Self::Closed => ErrorKind::Closed,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Transport,
    Parse,
    Deadline,
    Closed,
    Internal,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Transport => "transport",
            Self::Parse => "parse",
            Self::Deadline => "deadline",
            Self::Closed => "closed",
            Self::Internal => "internal",
        }
    }
}
