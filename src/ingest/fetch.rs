/// Station feed retrieval.
///
/// `FeedSource` is the seam between the refresh pipeline and the network:
/// the daemon uses `HttpFeedSource`, tests substitute canned JSON. A fetch
/// either yields a parsed JSON value or a `FetchFailure`; it never touches
/// the station cache itself.

use std::time::Duration;

use serde_json::Value;

use crate::config::FeedConfig;
use crate::error::CorridorError;

/// Anything that can produce the raw station feed as JSON.
pub trait FeedSource: Send + Sync {
    fn fetch(&self) -> Result<Value, CorridorError>;

    /// Human-readable origin, used in log messages.
    fn describe(&self) -> String;
}

/// Blocking HTTP GET against the configured feed URL.
pub struct HttpFeedSource {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpFeedSource {
    /// Builds the client with an explicit timeout. Government feeds often
    /// serve broken certificate chains, so verification can be switched off
    /// in config.
    pub fn new(config: &FeedConfig) -> Result<Self, CorridorError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| CorridorError::Config(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self {
            url: config.url.clone(),
            client,
        })
    }
}

impl FeedSource for HttpFeedSource {
    fn fetch(&self) -> Result<Value, CorridorError> {
        let response = self
            .client
            .get(&self.url)
            .header("Accept", "application/json")
            .send()?;

        if !response.status().is_success() {
            return Err(CorridorError::FetchFailure(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let body = response.text()?;
        parse_feed_body(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Parses a feed body as JSON. Some feeds answer with HTML error pages and a
/// 200 status, which surfaces here as a `FetchFailure`.
pub fn parse_feed_body(body: &str) -> Result<Value, CorridorError> {
    serde_json::from_str(body)
        .map_err(|e| CorridorError::FetchFailure(format!("response was not JSON: {}", e)))
}
