/// Service configuration loader - parses corridor.toml
///
/// Separates feed location, polling cadence, endpoint port, and zone source
/// from code. Every section has defaults, so an empty file is valid.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::CorridorError;

pub const DEFAULT_CONFIG_PATH: &str = "corridor.toml";
pub const DEFAULT_FEED_URL: &str = "https://airquality.cpcb.gov.in/caaqms/iit_rss_feed_with_coordinates";

/// Root configuration structure for TOML parsing
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServiceConfig {
    pub feed: FeedConfig,
    pub daemon: DaemonConfig,
    pub endpoint: EndpointConfig,
    pub zones: ZonesFileConfig,
    pub logging: LoggingConfig,
}

/// Inbound station feed
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeedConfig {
    pub url: String,
    pub timeout_secs: u64,
    /// The upstream government feed has a history of broken cert chains.
    pub accept_invalid_certs: bool,
    pub user_agent: String,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_FEED_URL.to_string(),
            timeout_secs: 15,
            accept_invalid_certs: true,
            user_agent: "Mozilla/5.0".to_string(),
        }
    }
}

/// Background polling
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct DaemonConfig {
    /// Minutes between refreshes; 0 disables the loop.
    pub poll_interval_minutes: u64,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            poll_interval_minutes: 15,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct EndpointConfig {
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ZonesFileConfig {
    pub file: String,
}

impl Default for ZonesFileConfig {
    fn default() -> Self {
        Self {
            file: "zones.toml".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ServiceConfig {
    /// Parses configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, CorridorError> {
        toml::from_str(content).map_err(|e| CorridorError::Config(format!("invalid configuration: {}", e)))
    }

    /// Applies environment overrides (`CORRIDOR_FEED_URL`).
    pub fn apply_env(mut self) -> Self {
        if let Ok(url) = std::env::var("CORRIDOR_FEED_URL") {
            if !url.trim().is_empty() {
                self.feed.url = url;
            }
        }
        self
    }
}

/// Loads configuration from `path`.
///
/// A missing file at the default path yields defaults; a missing file that
/// was asked for explicitly is an error.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<ServiceConfig, CorridorError> {
    let path = path.as_ref();

    if !path.exists() && path == Path::new(DEFAULT_CONFIG_PATH) {
        return Ok(ServiceConfig::default());
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| CorridorError::Config(format!("failed to read {}: {}", path.display(), e)))?;

    ServiceConfig::from_toml_str(&contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ServiceConfig::from_toml_str("").expect("empty config is valid");
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert_eq!(config.feed.timeout_secs, 15);
        assert_eq!(config.daemon.poll_interval_minutes, 15);
        assert_eq!(config.endpoint.port, None);
        assert_eq!(config.zones.file, "zones.toml");
    }

    #[test]
    fn test_partial_sections_keep_other_defaults() {
        let config = ServiceConfig::from_toml_str(
            r#"
            [feed]
            timeout_secs = 5

            [endpoint]
            port = 8080
            "#,
        )
        .unwrap();
        assert_eq!(config.feed.timeout_secs, 5);
        assert_eq!(config.feed.url, DEFAULT_FEED_URL);
        assert!(config.feed.accept_invalid_certs);
        assert_eq!(config.endpoint.port, Some(8080));
    }

    #[test]
    fn test_malformed_config_is_error() {
        let result = ServiceConfig::from_toml_str("[feed\nurl = 3");
        assert!(matches!(result, Err(CorridorError::Config(_))));
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[daemon]\npoll_interval_minutes = 0\n[logging]\nlevel = \"debug\"").unwrap();

        let config = load_config(file.path()).expect("file should load");
        assert_eq!(config.daemon.poll_interval_minutes, 0);
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_explicit_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_config(dir.path().join("missing.toml"));
        assert!(matches!(result, Err(CorridorError::Config(_))));
    }

    #[test]
    fn test_shipped_config_parses() {
        let config = load_config(DEFAULT_CONFIG_PATH).expect("corridor.toml should parse");
        assert!(config.feed.url.starts_with("https://"));
    }
}
