/// Error taxonomy for the extraction, reconciliation, and scoring core.
///
/// Parsing and reconciliation never return these for bad vendor data; they
/// skip and count instead. Scoring and simulation fail fast on bad caller
/// input.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq)]
pub enum CorridorError {
    /// Network error, timeout, bad status, or non-JSON body from the feed.
    #[error("Feed fetch failed: {0}")]
    FetchFailure(String),

    /// Zone identity unknown to the snapshot source.
    #[error("Zone not found: {0}")]
    NotFound(String),

    /// A scenario modifier could not be used.
    #[error("Invalid input for '{field}': {reason}")]
    InvalidInput { field: String, reason: String },

    /// A raw station record without usable coordinates. Only counted during
    /// reconciliation, never surfaced from it.
    #[error("Malformed station record: {0}")]
    MalformedRecord(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// The zone snapshot collaborator (file or database) failed.
    #[error("Zone source error: {0}")]
    ZoneSource(String),
}

impl CorridorError {
    pub fn invalid_input(field: &str, reason: impl Into<String>) -> Self {
        CorridorError::InvalidInput {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<reqwest::Error> for CorridorError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            CorridorError::FetchFailure(format!("request timed out: {}", err))
        } else if err.is_decode() {
            CorridorError::FetchFailure(format!("response was not JSON: {}", err))
        } else {
            CorridorError::FetchFailure(err.to_string())
        }
    }
}
