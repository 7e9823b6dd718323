use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalysisError {
    #[error("Missing data: {0}")]
    MissingData(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Invalid weights: {0}")]
    InvalidWeights(String),

    #[error("Source unavailable: {0}")]
    SourceUnavailable(String),

    #[error("Universe unavailable: {0}")]
    UniverseUnavailable(String),
}
