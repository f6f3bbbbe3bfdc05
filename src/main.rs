//! Corridor Service - Main Daemon
//!
//! A server-side daemon that:
//! 1. Pulls the CPCB air-quality station feed and reconciles it into a
//!    station registry held in memory
//! 2. Re-polls the feed on a fixed interval, keeping the last good registry
//!    when a poll fails
//! 3. Optionally serves stations, zone resilience scores, and what-if
//!    scenarios over HTTP
//!
//! Usage:
//!   cargo run --release                         # Poll the feed, no HTTP endpoint
//!   cargo run --release -- --endpoint 8080      # Also serve the API on port 8080
//!   cargo run --release -- --once               # Single refresh, print summary, exit
//!   cargo run --release -- --config other.toml  # Alternate configuration file
//!
//! Environment:
//!   DATABASE_URL      - read zone snapshots from PostgreSQL instead of zones.toml
//!   CORRIDOR_FEED_URL - override the feed URL from the config file

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;

use corridor_service::config::{self, ServiceConfig};
use corridor_service::daemon::Daemon;
use corridor_service::db::{self, PgZoneSource};
use corridor_service::endpoint::{self, AppState};
use corridor_service::ingest::fetch::{FeedSource, HttpFeedSource};
use corridor_service::logging::{self, DataSource};
use corridor_service::monitor::StationCache;
use corridor_service::zones::{self, ZoneSource};

#[derive(Parser, Debug)]
#[command(name = "corridor_service", version, about = "Air-quality station feed and zone resilience service")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = config::DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Serve the HTTP API on this port (overrides [endpoint] port)
    #[arg(long, value_name = "PORT")]
    endpoint: Option<u16>,

    /// Run a single refresh, print a summary, and exit
    #[arg(long)]
    once: bool,
}

fn main() {
    let cli = Cli::parse();

    println!("🌫  Corridor Service");
    println!("====================\n");

    dotenv::dotenv().ok();
    let config = match config::load_config(&cli.config) {
        Ok(config) => config.apply_env(),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    logging::init_logging(&config.logging.level);

    let feed: Arc<dyn FeedSource> = match HttpFeedSource::new(&config.feed) {
        Ok(source) => Arc::new(source),
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    let cache = Arc::new(StationCache::new());
    let mut daemon = Daemon::new(config.daemon.clone(), Arc::clone(&cache), Arc::clone(&feed));

    println!("📥 Initial refresh from {}", feed.describe());
    if cli.once {
        match daemon.refresh_once() {
            Ok(snapshot) => {
                println!("✓ {} stations ({} malformed records dropped)", snapshot.len(), snapshot.malformed);
                for station in snapshot.station_list() {
                    let aqi = station.aqi.map(|v| v.to_string()).unwrap_or_else(|| "n/a".to_string());
                    println!("   {:<40} AQI {:>4}  CO2 {:>7.2} ppm", station.name, aqi, station.co2_estimated);
                }
                return;
            }
            Err(e) => {
                eprintln!("✗ Refresh failed: {}", e);
                std::process::exit(1);
            }
        }
    }
    daemon.poll();
    println!();

    if let Some(port) = cli.endpoint.or(config.endpoint.port) {
        start_endpoint(port, &config, cache, feed);
    }

    daemon.run();
}

/// Picks the zone source and spawns the HTTP server on a background thread.
fn start_endpoint(port: u16, config: &ServiceConfig, cache: Arc<StationCache>, feed: Arc<dyn FeedSource>) {
    println!("🚀 Starting HTTP endpoint server...");

    let zones = match load_zone_source(config) {
        Ok(zones) => zones,
        Err(e) => {
            eprintln!("❌ Failed to load zones: {}", e);
            eprintln!("   Continuing without HTTP endpoint\n");
            return;
        }
    };

    let state = AppState { cache, feed, zones };
    std::thread::spawn(move || {
        if let Err(e) = endpoint::start_endpoint_server(port, state) {
            tracing::error!(source = %DataSource::Http, "Endpoint server error: {}", e);
        }
    });
}

fn load_zone_source(config: &ServiceConfig) -> Result<Arc<dyn ZoneSource>, String> {
    if db::database_url().is_some() {
        let source = PgZoneSource::connect().map_err(|e| e.to_string())?;
        tracing::info!(source = %DataSource::Database, "Zone snapshots from PostgreSQL");
        return Ok(Arc::new(source));
    }

    let registry = zones::load_zones(&config.zones.file).map_err(|e| e.to_string())?;
    tracing::info!(source = %DataSource::Zones, zones = registry.len(), file = %config.zones.file, "Zone snapshots from file");
    Ok(Arc::new(registry))
}
