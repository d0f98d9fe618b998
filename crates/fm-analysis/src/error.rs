use fm_core::FmError;
use fm_engine::EngineError;
use fm_network::NetworkError;
use fm_output::OutputError;
use fm_summary::SummaryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("configuration error: {0}")]
    Config(#[from] FmError),

    #[error("network error: {0}")]
    Network(#[from] NetworkError),

    #[error("engine error: {0}")]
    Engine(#[from] EngineError),

    #[error("summary error: {0}")]
    Summary(#[from] SummaryError),

    #[error("output error: {0}")]
    Output(#[from] OutputError),

    #[error("could not build worker pool: {0}")]
    ThreadPool(String),
}

pub type AnalysisResult<T> = Result<T, AnalysisError>;
