use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("No historical data found for {0}")]
    NotFound(String),

    #[error("Provider error: {0}")]
    Provider(String),

    #[error("Missing metric: {0}")]
    MissingMetric(String),

    #[error("Insufficient data: {0}")]
    InsufficientData(String),

    #[error("Chart error: {0}")]
    Chart(String),
}
