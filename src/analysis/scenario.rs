/// What-if scenario simulation for a zone.
///
/// Projects congestion, ambulance response time, and flood-risk probability
/// from the zone's current traffic reading plus user-supplied perturbations.
/// Every formula is deterministic and the simulator holds no state.
///
/// Recognised modifiers (percentages, default 0):
/// - `rain_intensity`: raises congestion 0.005 per point and drives flood risk
/// - `traffic_load`: raises congestion 0.01 per point
///
/// Unrecognised modifier keys are ignored. A recognised key whose value is not
/// a finite number fails with `InvalidInput` naming the key, before anything
/// is computed.

use serde_json::Value;

use crate::error::CorridorError;
use crate::model::{Advisory, ScenarioResult, ZoneSnapshot};
use crate::zones::{self, ZoneSource};

pub const RAIN_INTENSITY: &str = "rain_intensity";
pub const TRAFFIC_LOAD: &str = "traffic_load";

/// Congestion assumed when a zone has no traffic reading.
pub const DEFAULT_CONGESTION: f64 = 0.3;
const RAIN_CONGESTION_RATE: f64 = 0.005;
const TRAFFIC_CONGESTION_RATE: f64 = 0.01;

/// Baseline ambulance response time, minutes.
pub const BASE_RESPONSE_MIN: f64 = 15.0;
/// Congestion above which response time starts to stretch.
const DELAY_ONSET_CONGESTION: f64 = 0.5;

const RAIN_FLOOD_RATE: f64 = 0.8;
/// Zones south of this latitude get a flood-risk bonus.
pub const LOW_LYING_LATITUDE: f64 = 28.5;
const LOW_LYING_FLOOD_BONUS: f64 = 10.0;

const FLOOD_ADVISORY_THRESHOLD: f64 = 70.0;
const DELAY_ADVISORY_THRESHOLD: f64 = 20.0;

// ---------------------------------------------------------------------------
// Modifiers
// ---------------------------------------------------------------------------

/// Validated scenario perturbations.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScenarioModifiers {
    pub rain_intensity: f64,
    pub traffic_load: f64,
}

impl ScenarioModifiers {
    /// From a JSON object body. `null` or a missing key means 0; numbers and
    /// numeric strings are accepted. A non-object body is rejected.
    pub fn from_json(body: &Value) -> Result<Self, CorridorError> {
        let map = match body {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::default()),
            _ => return Err(CorridorError::invalid_input("body", "expected a JSON object")),
        };

        let field = |name: &str| -> Result<f64, CorridorError> {
            match map.get(name) {
                None | Some(Value::Null) => Ok(0.0),
                Some(Value::Number(n)) => n
                    .as_f64()
                    .filter(|v| v.is_finite())
                    .ok_or_else(|| CorridorError::invalid_input(name, "not a finite number")),
                Some(Value::String(s)) => parse_number(name, s),
                Some(other) => Err(CorridorError::invalid_input(
                    name,
                    format!("expected a number, got {}", other),
                )),
            }
        };

        Ok(Self {
            rain_intensity: field(RAIN_INTENSITY)?,
            traffic_load: field(TRAFFIC_LOAD)?,
        })
    }

    /// From decoded key/value pairs (e.g. a URL query string). The last
    /// occurrence of a repeated key wins; an empty value means 0.
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self, CorridorError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut rain = None;
        let mut traffic = None;

        for (key, value) in pairs {
            match key {
                RAIN_INTENSITY => rain = Some(value),
                TRAFFIC_LOAD => traffic = Some(value),
                _ => {}
            }
        }

        let field = |name: &str, raw: Option<&str>| match raw {
            None => Ok(0.0),
            Some(s) if s.trim().is_empty() => Ok(0.0),
            Some(s) => parse_number(name, s),
        };

        Ok(Self {
            rain_intensity: field(RAIN_INTENSITY, rain)?,
            traffic_load: field(TRAFFIC_LOAD, traffic)?,
        })
    }
}

fn parse_number(field: &str, raw: &str) -> Result<f64, CorridorError> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| CorridorError::invalid_input(field, format!("not a number: '{}'", raw)))
}

// ---------------------------------------------------------------------------
// Simulation
// ---------------------------------------------------------------------------

/// Runs the scenario against a snapshot.
pub fn simulate(snapshot: &ZoneSnapshot, modifiers: &ScenarioModifiers) -> ScenarioResult {
    let base_congestion = snapshot
        .traffic
        .as_ref()
        .map(|t| t.congestion_level)
        .filter(|c| c.is_finite())
        .unwrap_or(DEFAULT_CONGESTION);

    let congestion = (base_congestion
        + modifiers.rain_intensity * RAIN_CONGESTION_RATE
        + modifiers.traffic_load * TRAFFIC_CONGESTION_RATE)
        .clamp(0.0, 1.0);

    // Linear stretch from 1x at the onset to 2x at full congestion.
    let delay_factor = if congestion > DELAY_ONSET_CONGESTION {
        1.0 + (congestion - DELAY_ONSET_CONGESTION) * 2.0
    } else {
        1.0
    };
    let response_time = BASE_RESPONSE_MIN * delay_factor;

    let mut flood_risk = (modifiers.rain_intensity * RAIN_FLOOD_RATE).min(100.0);
    if snapshot.latitude < LOW_LYING_LATITUDE {
        flood_risk += LOW_LYING_FLOOD_BONUS;
    }
    let flood_risk = flood_risk.clamp(0.0, 100.0);

    // Thresholds apply to the unrounded projections.
    let mut advisories = Vec::new();
    if flood_risk > FLOOD_ADVISORY_THRESHOLD {
        advisories.push(Advisory::FloodRisk);
    }
    if response_time > DELAY_ADVISORY_THRESHOLD {
        advisories.push(Advisory::ResponseDelay);
    }
    let alerts = advisories.iter().map(|a| a.message().to_string()).collect();

    ScenarioResult {
        zone_id: snapshot.zone_id.clone(),
        congestion_level: round_to(congestion, 2),
        congestion_display: format!("{}%", (congestion * 100.0).trunc() as i64),
        response_time_min: round_to(response_time, 1),
        flood_risk_probability: round_to(flood_risk, 1),
        advisories,
        alerts,
    }
}

/// Validates modifiers, looks up the zone, and simulates. Fails with
/// `InvalidInput` or `NotFound`; nothing is computed on failure.
pub fn simulate_zone(
    source: &dyn ZoneSource,
    zone_id: &str,
    raw_modifiers: &Value,
) -> Result<ScenarioResult, CorridorError> {
    let modifiers = ScenarioModifiers::from_json(raw_modifiers)?;
    let snapshot = zones::require_snapshot(source, zone_id)?;
    Ok(simulate(&snapshot, &modifiers))
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{IncomeTier, TrafficRecord};
    use crate::zones::ZoneRegistry;
    use serde_json::json;

    fn zone(latitude: f64, congestion: Option<f64>) -> ZoneSnapshot {
        ZoneSnapshot {
            zone_id: "z".to_string(),
            name: "Test".to_string(),
            latitude,
            longitude: 77.2,
            income_tier: IncomeTier::Middle,
            weather: None,
            traffic: congestion.map(|c| TrafficRecord { congestion_level: c }),
            facilities: vec![],
        }
    }

    fn modifiers(rain: f64, traffic: f64) -> ScenarioModifiers {
        ScenarioModifiers { rain_intensity: rain, traffic_load: traffic }
    }

    // --- Simulation ---------------------------------------------------------

    #[test]
    fn test_zero_modifiers_without_history_is_baseline() {
        let result = simulate(&zone(28.6, None), &modifiers(0.0, 0.0));
        assert_eq!(result.congestion_level, 0.30);
        assert_eq!(result.congestion_display, "30%");
        assert_eq!(result.response_time_min, 15.0);
        assert_eq!(result.flood_risk_probability, 0.0);
        assert!(result.advisories.is_empty());
    }

    #[test]
    fn test_heavy_rain_triggers_flood_advisory() {
        let result = simulate(&zone(28.6, None), &modifiers(90.0, 0.0));
        assert_eq!(result.flood_risk_probability, 72.0);
        assert!(result.has_advisory(Advisory::FloodRisk));
    }

    #[test]
    fn test_low_lying_zone_gets_flood_bonus() {
        let result = simulate(&zone(28.4, None), &modifiers(90.0, 0.0));
        assert_eq!(result.flood_risk_probability, 82.0);
    }

    #[test]
    fn test_flood_risk_capped_at_100_with_bonus() {
        let result = simulate(&zone(20.0, None), &modifiers(200.0, 0.0));
        assert_eq!(result.flood_risk_probability, 100.0);
    }

    #[test]
    fn test_congestion_uses_history_and_rates() {
        // 0.4 + 20*0.005 + 10*0.01 = 0.6
        let result = simulate(&zone(28.6, Some(0.4)), &modifiers(20.0, 10.0));
        assert_eq!(result.congestion_level, 0.6);
        // 15 * (1 + 0.1*2) = 18
        assert_eq!(result.response_time_min, 18.0);
        assert!(!result.has_advisory(Advisory::ResponseDelay));
    }

    #[test]
    fn test_full_congestion_doubles_response_time() {
        let result = simulate(&zone(28.6, Some(0.9)), &modifiers(0.0, 50.0));
        assert_eq!(result.congestion_level, 1.0);
        assert_eq!(result.response_time_min, 30.0);
        assert!(result.has_advisory(Advisory::ResponseDelay));
    }

    #[test]
    fn test_congestion_clamped_at_zero() {
        let result = simulate(&zone(28.6, Some(0.1)), &modifiers(0.0, -50.0));
        assert_eq!(result.congestion_level, 0.0);
        assert_eq!(result.response_time_min, 15.0);
    }

    #[test]
    fn test_congestion_at_onset_has_no_delay() {
        let result = simulate(&zone(28.6, Some(0.5)), &modifiers(0.0, 0.0));
        assert_eq!(result.response_time_min, 15.0);
    }

    #[test]
    fn test_flood_advisory_uses_unrounded_risk() {
        // 87.55 * 0.8 = 70.04, reported as 70.0
        let result = simulate(&zone(28.6, None), &modifiers(87.55, -50.0));
        assert_eq!(result.flood_risk_probability, 70.0);
        assert!(result.has_advisory(Advisory::FloodRisk));
    }

    #[test]
    fn test_delay_advisory_uses_unrounded_response_time() {
        // 0.3 + 36.8 * 0.01 = 0.668 -> 15 * 1.336 = 20.04, reported as 20.0
        let result = simulate(&zone(28.6, None), &modifiers(0.0, 36.8));
        assert_eq!(result.response_time_min, 20.0);
        assert!(result.has_advisory(Advisory::ResponseDelay));
        assert!(!result.has_advisory(Advisory::FloodRisk));
    }

    #[test]
    fn test_congestion_display_truncates() {
        // 0.3 + 0.267 = 0.567
        let result = simulate(&zone(28.6, None), &modifiers(0.0, 26.7));
        assert_eq!(result.congestion_level, 0.57);
        assert_eq!(result.congestion_display, "56%");
    }

    #[test]
    fn test_alerts_carry_advisory_messages() {
        let result = simulate(&zone(28.4, Some(0.9)), &modifiers(90.0, 0.0));
        assert_eq!(result.advisories, vec![Advisory::FloodRisk, Advisory::ResponseDelay]);
        assert_eq!(result.alerts, vec!["High flood risk detected", "Ambulance delays likely"]);

        let calm = simulate(&zone(28.6, None), &modifiers(0.0, 0.0));
        assert!(calm.alerts.is_empty());
    }

    // --- Modifier parsing ---------------------------------------------------

    #[test]
    fn test_from_json_defaults_and_ignores_unknown_keys() {
        let parsed = ScenarioModifiers::from_json(&json!({ "wind": "gale", "traffic_load": 5 })).unwrap();
        assert_eq!(parsed, modifiers(0.0, 5.0));
    }

    #[test]
    fn test_from_json_accepts_numeric_strings() {
        let parsed = ScenarioModifiers::from_json(&json!({ "rain_intensity": "42.5" })).unwrap();
        assert_eq!(parsed.rain_intensity, 42.5);
    }

    #[test]
    fn test_from_json_rejects_non_numeric_with_field_name() {
        let err = ScenarioModifiers::from_json(&json!({ "rain_intensity": "heavy" })).unwrap_err();
        match err {
            CorridorError::InvalidInput { field, .. } => assert_eq!(field, "rain_intensity"),
            other => panic!("expected InvalidInput, got {:?}", other),
        }

        let err = ScenarioModifiers::from_json(&json!({ "traffic_load": [1, 2] })).unwrap_err();
        assert!(matches!(err, CorridorError::InvalidInput { ref field, .. } if field == "traffic_load"));
    }

    #[test]
    fn test_from_json_rejects_non_object_body() {
        assert!(ScenarioModifiers::from_json(&json!([1])).is_err());
        assert_eq!(ScenarioModifiers::from_json(&Value::Null).unwrap(), ScenarioModifiers::default());
    }

    #[test]
    fn test_from_pairs() {
        let parsed = ScenarioModifiers::from_pairs(vec![
            ("rain_intensity", "10"),
            ("foo", "bar"),
            ("rain_intensity", "30"),
            ("traffic_load", ""),
        ])
        .unwrap();
        assert_eq!(parsed, modifiers(30.0, 0.0));

        let err = ScenarioModifiers::from_pairs(vec![("traffic_load", "NaN")]).unwrap_err();
        assert!(err.to_string().contains("traffic_load"));
    }

    // --- Zone lookup --------------------------------------------------------

    #[test]
    fn test_simulate_zone_errors() {
        let registry = ZoneRegistry::default();
        assert_eq!(
            simulate_zone(&registry, "nope", &json!({})),
            Err(CorridorError::NotFound("nope".to_string()))
        );
        assert!(matches!(
            simulate_zone(&registry, "nope", &json!({ "rain_intensity": "x" })),
            Err(CorridorError::InvalidInput { .. })
        ));
    }
}
