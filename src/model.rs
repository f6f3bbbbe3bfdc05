/// Core data types for the corridor air-quality and resilience service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic beyond small accessors, no I/O, and no external
/// dependencies other than serde derives; only types.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Station types
// ---------------------------------------------------------------------------

/// A single pollutant sub-reading attached to a station at reconciliation
/// time. Values are `None` when the vendor sent a sentinel ("NA", "-") or
/// omitted the field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantReading {
    pub id: String,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub avg: Option<f64>,
    pub sub_index: Option<f64>,
}

/// A reconciled air-quality monitoring station.
///
/// `key` is the identity key chosen by `stations::identity_key`; it is unique
/// within one reconciliation pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Station {
    pub key: String,
    pub name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub aqi: Option<i64>,
    pub predominant_pollutant: Option<String>,
    pub pollutants: Vec<PollutantReading>,
    /// Estimated CO2 (ppm), always within the estimator's plausible band.
    pub co2_estimated: f64,
    /// Vendor-reported last update, verbatim.
    pub last_update: Option<String>,
}

// ---------------------------------------------------------------------------
// Zone snapshot (supplied by the persistence collaborator, read-only here)
// ---------------------------------------------------------------------------

/// Income classification used as a stand-in for supply/nutrition access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IncomeTier {
    Low,
    Middle,
    High,
}

/// Latest weather log for a zone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub aqi: Option<i64>,
    pub temperature_c: Option<f64>,
    pub precipitation_mm: Option<f64>,
}

/// Latest traffic reading for a zone. `congestion_level` is in [0, 1].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficRecord {
    pub congestion_level: f64,
}

/// ICU capacity of one medical facility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityRecord {
    pub name: String,
    pub total_icu_beds: u32,
    pub occupied_icu_beds: u32,
}

/// Everything the scorers know about a zone at one point in time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneSnapshot {
    pub zone_id: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    pub income_tier: IncomeTier,
    pub weather: Option<WeatherRecord>,
    pub traffic: Option<TrafficRecord>,
    pub facilities: Vec<FacilityRecord>,
}

// ---------------------------------------------------------------------------
// Derived results
// ---------------------------------------------------------------------------

/// Component scores behind a resilience score, each in [0, 100].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComponentScores {
    pub aqi_score: f64,
    pub medical_capacity_score: f64,
    pub nutrition_access_score: f64,
}

/// Composite 0–100 livability indicator for a zone. Never persisted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResilienceScore {
    pub zone_id: String,
    pub zone_name: String,
    pub overall_score: f64,
    pub metrics: ComponentScores,
}

/// Advisory raised by the scenario simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Advisory {
    FloodRisk,
    ResponseDelay,
}

impl Advisory {
    pub fn message(&self) -> &'static str {
        match self {
            Advisory::FloodRisk => "High flood risk detected",
            Advisory::ResponseDelay => "Ambulance delays likely",
        }
    }
}

/// Output of a what-if simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
    pub zone_id: String,
    /// Projected congestion in [0, 1], two decimals.
    pub congestion_level: f64,
    pub congestion_display: String,
    /// Projected ambulance response time, minutes.
    pub response_time_min: f64,
    /// Flood-risk probability in [0, 100].
    pub flood_risk_probability: f64,
    pub advisories: Vec<Advisory>,
    /// Human-readable text for each advisory, in the same order.
    pub alerts: Vec<String>,
}

impl ScenarioResult {
    pub fn has_advisory(&self, advisory: Advisory) -> bool {
        self.advisories.contains(&advisory)
    }
}
