// errors.rs
use crate::calendar::CalendarError;
use crate::fetcher::FetchError;
use thiserror::Error;

/// Everything that can go wrong while processing one server, plus start-up configuration.
/// The driver catches these per server; none of them stop the batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Calendar(#[from] CalendarError),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Configuration error: {0}")]
    Config(String),
}
