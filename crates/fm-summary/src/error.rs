use thiserror::Error;

#[derive(Debug, Error)]
pub enum SummaryError {
    #[error("network has no geometry to derive a study area from")]
    EmptyStudyArea,

    #[error("clip buffer must be finite and >= 0, got {0}")]
    InvalidBuffer(f64),
}

pub type SummaryResult<T> = Result<T, SummaryError>;
