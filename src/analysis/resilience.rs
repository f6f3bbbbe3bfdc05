/// Zone resilience scoring.
///
/// Combines three independently clamped component scores into one 0–100
/// indicator:
///
/// - AQI: 100 at AQI 50, falling 0.4 per point to 0 at AQI 300. Zones with
///   no weather log are scored at a moderate AQI of 150.
/// - Medical capacity: free share of ICU beds across all facilities. No beds
///   at all scores 0.
/// - Nutrition/supply: fixed value per income tier. This is a placeholder
///   until a real supply-chain signal exists.
///
/// Overall = 0.4·AQI + 0.4·medical + 0.2·nutrition, rounded to one decimal.
/// Scoring is pure: the same snapshot always yields the same score.

use crate::error::CorridorError;
use crate::model::{ComponentScores, IncomeTier, ResilienceScore, ZoneSnapshot};
use crate::zones::{self, ZoneSource};

/// AQI assumed when a zone has no weather data.
pub const DEFAULT_AQI: f64 = 150.0;

const AQI_FULL_SCORE: f64 = 50.0;
const AQI_SLOPE: f64 = 0.4;

const WEIGHT_AQI: f64 = 0.4;
const WEIGHT_MEDICAL: f64 = 0.4;
const WEIGHT_NUTRITION: f64 = 0.2;

/// Scores a snapshot. Infallible; unknown zones are handled by `score_zone`.
pub fn score(snapshot: &ZoneSnapshot) -> ResilienceScore {
    let aqi = snapshot
        .weather
        .as_ref()
        .and_then(|w| w.aqi)
        .map(|v| v as f64)
        .unwrap_or(DEFAULT_AQI);

    let aqi_score = aqi_score(aqi);
    let medical_score = medical_capacity_score(snapshot);
    let nutrition_score = nutrition_score(snapshot.income_tier);

    let overall = aqi_score * WEIGHT_AQI
        + medical_score * WEIGHT_MEDICAL
        + nutrition_score * WEIGHT_NUTRITION;

    ResilienceScore {
        zone_id: snapshot.zone_id.clone(),
        zone_name: snapshot.name.clone(),
        overall_score: round1(overall),
        metrics: ComponentScores {
            aqi_score: round1(aqi_score),
            medical_capacity_score: round1(medical_score),
            nutrition_access_score: round1(nutrition_score),
        },
    }
}

/// Looks up the zone and scores it, or fails with `NotFound`.
pub fn score_zone(source: &dyn ZoneSource, zone_id: &str) -> Result<ResilienceScore, CorridorError> {
    let snapshot = zones::require_snapshot(source, zone_id)?;
    Ok(score(&snapshot))
}

/// Linear in AQI, clamped to [0, 100].
pub fn aqi_score(aqi: f64) -> f64 {
    (100.0 - (aqi - AQI_FULL_SCORE) * AQI_SLOPE).clamp(0.0, 100.0)
}

/// Free ICU share across the zone's facilities, clamped to [0, 100].
pub fn medical_capacity_score(snapshot: &ZoneSnapshot) -> f64 {
    let total: u64 = snapshot.facilities.iter().map(|f| f.total_icu_beds as u64).sum();
    if total == 0 {
        return 0.0;
    }
    let occupied: u64 = snapshot.facilities.iter().map(|f| f.occupied_icu_beds as u64).sum();

    let occupancy = occupied as f64 / total as f64;
    ((1.0 - occupancy) * 100.0).clamp(0.0, 100.0)
}

/// Placeholder supply score per income tier.
pub fn nutrition_score(tier: IncomeTier) -> f64 {
    match tier {
        IncomeTier::Low => 40.0,
        IncomeTier::Middle | IncomeTier::High => 85.0,
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
