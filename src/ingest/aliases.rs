/// Ordered alias tables for vendor-specific station field names.
///
/// Vendors spell the same field several ways (`lat` / `latitude`,
/// `lon` / `lng` / `longitude`, ...). Each logical field has one table here,
/// in priority order; `first_present` returns the first alias whose value is
/// non-null and non-empty, so lookups are deterministic and testable.

use serde_json::{Map, Value};

/// List-valued keys whose elements are stations ("stations in city").
pub const STATION_COLLECTION: &[&str] = &["stationsInCity", "stations_in_city"];

/// Primary vendor identifier.
pub const STATION_ID: &[&str] = &["stationId", "siteId"];
pub const STATION_NAME: &[&str] = &["stationName", "siteName", "Station"];
pub const NAME: &[&str] = &["name", "station"];

pub const LATITUDE: &[&str] = &["latitude", "lat"];
pub const LONGITUDE: &[&str] = &["longitude", "lng", "lon"];
pub const AQI: &[&str] = &["airQualityIndexValue", "aqi", "AQI"];
pub const PREDOMINANT: &[&str] = &["predominantParameter", "predominant_parameter"];
pub const POLLUTANTS: &[&str] = &["pollutants"];
pub const LAST_UPDATE: &[&str] = &["lastUpdate", "last_update", "live_ts"];
pub const CITY: &[&str] = &["cityId", "city"];
pub const STATE: &[&str] = &["stateId", "state"];

// Pollutant sub-reading fields
pub const POLLUTANT_ID: &[&str] = &["indexId", "id"];
pub const POLLUTANT_MIN: &[&str] = &["min"];
pub const POLLUTANT_MAX: &[&str] = &["max"];
pub const POLLUTANT_AVG: &[&str] = &["avg"];
pub const POLLUTANT_SUB_INDEX: &[&str] = &["Hourly_sub_index", "subIndex", "sub_index"];
pub const POLLUTANT_AQI: &[&str] = &["aqi"];

/// Pollutant id whose reading stands in for a missing station AQI.
pub const AQI_FALLBACK_POLLUTANT: &str = "PM2.5";

/// Returns the value of the first alias present with a non-empty value.
///
/// Null, empty strings, and whitespace-only strings count as absent.
pub fn first_present<'a>(record: &'a Map<String, Value>, aliases: &[&str]) -> Option<&'a Value> {
    aliases
        .iter()
        .filter_map(|alias| record.get(*alias))
        .find(|value| !is_empty(value))
}

/// True if any alias key exists on the record, whatever its value.
pub fn has_any(record: &Map<String, Value>, aliases: &[&str]) -> bool {
    aliases.iter().any(|alias| record.contains_key(*alias))
}

/// First non-empty alias rendered as a trimmed string (numbers included).
pub fn first_string(record: &Map<String, Value>, aliases: &[&str]) -> Option<String> {
    first_present(record, aliases).and_then(value_as_string)
}

/// First non-empty alias interpreted as a finite number. Numeric strings are
/// accepted; sentinels such as `"NA"` or `"-"` yield `None`.
pub fn first_number(record: &Map<String, Value>, aliases: &[&str]) -> Option<f64> {
    first_present(record, aliases).and_then(value_as_f64)
}

pub fn value_as_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

pub fn value_as_f64(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
