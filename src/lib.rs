/// corridor_service: air-quality station feed reconciliation and zone
/// resilience scoring.
///
/// # Module structure
///
/// ```text
/// corridor_service
/// ├── model       - shared data types (Station, ZoneSnapshot, ScenarioResult, ...)
/// ├── error       - CorridorError taxonomy
/// ├── config      - service configuration loader (corridor.toml)
/// ├── logging     - tracing setup and fetch failure classification
/// ├── stations    - station identity, reconciliation, AQI resolution
/// ├── zones       - ZoneSource trait and zones.toml registry
/// ├── db          - PostgreSQL connection and read-only zone source
/// ├── daemon      - refresh loop around the station cache
/// ├── endpoint    - HTTP JSON API for stations, resilience, scenarios
/// ├── monitor     - process-wide station cache with copy-and-swap refresh
/// ├── ingest
/// │   ├── aliases - vendor key alias tables and value coercion
/// │   ├── feed    - recursive station discovery in arbitrary JSON
/// │   ├── fetch   - FeedSource trait + HTTP implementation
/// │   └── fixtures (test only) - representative feed payloads
/// └── analysis
///     ├── pollutants - CO2 estimate from primary pollutants
///     ├── resilience - composite zone resilience score
///     └── scenario   - what-if congestion, response time, flood risk
/// ```

pub mod analysis;
pub mod config;
pub mod daemon;
pub mod db;
pub mod endpoint;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod monitor;
pub mod stations;
pub mod zones;
