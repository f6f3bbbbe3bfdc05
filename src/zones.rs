/// Zone snapshots from zones.toml
///
/// The scorers only ever read zone state. Where it comes from is behind the
/// `ZoneSource` trait: this module provides the file-backed registry, and
/// `db::PgZoneSource` reads the same records from PostgreSQL.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::CorridorError;
use crate::model::{FacilityRecord, IncomeTier, TrafficRecord, WeatherRecord, ZoneSnapshot};

// ============================================================================
// Zone Source
// ============================================================================

/// Read-only supplier of the latest known state for each zone.
pub trait ZoneSource: Send + Sync {
    /// Latest snapshot for `zone_id`, or `Ok(None)` if the zone is unknown.
    fn snapshot(&self, zone_id: &str) -> Result<Option<ZoneSnapshot>, CorridorError>;

    /// All known zone ids, in a stable order.
    fn zone_ids(&self) -> Result<Vec<String>, CorridorError>;
}

/// Looks up a zone, turning an unknown id into `NotFound`.
pub fn require_snapshot(source: &dyn ZoneSource, zone_id: &str) -> Result<ZoneSnapshot, CorridorError> {
    source
        .snapshot(zone_id)?
        .ok_or_else(|| CorridorError::NotFound(zone_id.to_string()))
}

// ============================================================================
// TOML Configuration Structures
// ============================================================================

/// Root zones configuration
#[derive(Debug, Deserialize)]
pub struct ZonesConfig {
    #[serde(default, rename = "zone")]
    pub zones: Vec<ZoneEntry>,
}

/// Single zone as written in zones.toml
#[derive(Debug, Deserialize, Clone)]
pub struct ZoneEntry {
    pub id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub income_tier: IncomeTier,
    pub weather: Option<WeatherRecord>,
    pub traffic: Option<TrafficRecord>,
    #[serde(default, rename = "facility")]
    pub facilities: Vec<FacilityRecord>,
}

impl From<&ZoneEntry> for ZoneSnapshot {
    fn from(entry: &ZoneEntry) -> Self {
        ZoneSnapshot {
            zone_id: entry.id.clone(),
            name: entry.name.clone(),
            latitude: entry.latitude,
            longitude: entry.longitude,
            income_tier: entry.income_tier,
            weather: entry.weather.clone(),
            traffic: entry.traffic.clone(),
            facilities: entry.facilities.clone(),
        }
    }
}

// ============================================================================
// File-backed registry
// ============================================================================

/// Zones loaded once from a TOML file and served from memory.
#[derive(Debug, Default)]
pub struct ZoneRegistry {
    zones: Vec<ZoneEntry>,
}

impl ZoneRegistry {
    pub fn from_entries(zones: Vec<ZoneEntry>) -> Self {
        Self { zones }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, CorridorError> {
        let config: ZonesConfig = toml::from_str(content)
            .map_err(|e| CorridorError::Config(format!("invalid zones file: {}", e)))?;
        Ok(Self::from_entries(config.zones))
    }

    pub fn len(&self) -> usize {
        self.zones.len()
    }

    pub fn is_empty(&self) -> bool {
        self.zones.is_empty()
    }

    pub fn get_zone(&self, zone_id: &str) -> Option<&ZoneEntry> {
        self.zones.iter().find(|z| z.id == zone_id)
    }
}

impl ZoneSource for ZoneRegistry {
    fn snapshot(&self, zone_id: &str) -> Result<Option<ZoneSnapshot>, CorridorError> {
        Ok(self.get_zone(zone_id).map(ZoneSnapshot::from))
    }

    fn zone_ids(&self) -> Result<Vec<String>, CorridorError> {
        Ok(self.zones.iter().map(|z| z.id.clone()).collect())
    }
}

// ============================================================================
// Loading Functions
// ============================================================================

/// Load zones from a TOML file
pub fn load_zones<P: AsRef<Path>>(path: P) -> Result<ZoneRegistry, CorridorError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path)
        .map_err(|e| CorridorError::Config(format!("failed to read {}: {}", path.display(), e)))?;
    ZoneRegistry::from_toml_str(&content)
}

// ============================================================================
// Tests
// ============================================================================
