use thiserror::Error;

/// Errors that can occur while loading observations or building charts
#[derive(Debug, Error)]
pub enum ChartError {
    /// Reading a local data file or writing chart output failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP fetch of the observation JSON failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Observation JSON could not be decoded
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Aggregation over the observation table failed
    #[error("Aggregation error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Charts derive their domains from the first and last record
    #[error("No observations to plot")]
    EmptyData,

    /// A date or month string could not be parsed
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    /// A picker selection outside the data bounds
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// Configuration error (bad property file, unknown values)
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Type alias for Results using ChartError
pub type Result<T> = std::result::Result<T, ChartError>;
