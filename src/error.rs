use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("Insufficient data for analysis")]
    InsufficientData,
    #[error("Judge unavailable: {0}")]
    JudgeUnavailable(String),
    #[error("Judge returned malformed output: {0}")]
    JudgeMalformed(String),
    #[error("Unparseable timestamp: {0}")]
    UnparseableTimestamp(String),
}

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("Conversation {0} not found")]
    NotFound(i64),
    #[error("Insufficient data for analysis of conversation {0}")]
    InsufficientData(i64),
    #[error("Invalid conversation upload: {0}")]
    Invalid(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ServiceError {
    /// HTTP-style status code for callers that surface errors over a wire.
    pub fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::InsufficientData(_) | Self::Invalid(_) => 400,
            Self::Internal(_) => 500,
        }
    }
}
