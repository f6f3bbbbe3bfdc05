/// Structured logging for the corridor service
///
/// Log records go through `tracing` with a `source` field naming the data
/// source involved. Fetch failures are classified so routine upstream
/// flakiness logs as a warning while outright outages log as errors.

use std::fmt;

use tracing::Level;

use crate::error::CorridorError;
use crate::stations::Reconciled;

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataSource {
    Feed,
    Zones,
    Database,
    Http,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Feed => write!(f, "FEED"),
            DataSource::Zones => write!(f, "ZONES"),
            DataSource::Database => write!(f, "DB"),
            DataSource::Http => write!(f, "HTTP"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureType {
    /// Unexpected failure - network outage, server error, timeout
    Unexpected,
    /// Unknown - cannot determine if this is expected or not
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Subscriber setup
// ---------------------------------------------------------------------------

/// Maps a config level name to a tracing level. Unknown names fall back to
/// `INFO`.
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" | "warning" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Installs the global fmt subscriber. Safe to call more than once; later
/// calls are ignored.
pub fn init_logging(level: &str) {
    let _ = tracing_subscriber::fmt()
        .with_max_level(parse_level(level))
        .with_target(false)
        .try_init();
}

// ---------------------------------------------------------------------------
// Failure logging
// ---------------------------------------------------------------------------

/// Classify a feed fetch failure based on the error text
pub fn classify_fetch_failure(error: &CorridorError) -> FailureType {
    let message = error.to_string();

    if message.contains("timed out") || message.contains("HTTP error") || message.contains("connect") {
        FailureType::Unexpected
    } else {
        // includes HTML maintenance pages served with a 200
        FailureType::Unknown
    }
}

/// Log a feed fetch failure with classification
pub fn log_fetch_failure(origin: &str, error: &CorridorError) {
    let failure_type = classify_fetch_failure(error);

    match failure_type {
        FailureType::Unexpected => {
            tracing::error!(source = %DataSource::Feed, origin, kind = %failure_type, "{}", error)
        }
        FailureType::Unknown => {
            tracing::warn!(source = %DataSource::Feed, origin, kind = %failure_type, "{}", error)
        }
    }
}

/// Log a summary of one reconciliation pass
pub fn log_refresh_summary(reconciled: &Reconciled) {
    if reconciled.is_empty() && reconciled.candidates > 0 {
        tracing::warn!(
            source = %DataSource::Feed,
            candidates = reconciled.candidates,
            malformed = reconciled.malformed,
            "Refresh produced no usable stations"
        );
    } else {
        tracing::info!(
            source = %DataSource::Feed,
            stations = reconciled.len(),
            candidates = reconciled.candidates,
            malformed = reconciled.malformed,
            aqi_unresolved = reconciled.aqi_unresolved,
            "Station registry refreshed"
        );
    }
}
