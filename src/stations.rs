/// Station reconciliation: raw feed records into a keyed station registry.
///
/// Feeds have no reliable primary key, so each record's identity key is the
/// first non-empty value in the chain
///
///   stationId → stationName → name → "<lat>_<lon>"
///
/// (each link resolved through its alias table in `ingest::aliases`).
/// Records without usable coordinates are dropped and counted. When two
/// records share a key, the later one replaces the earlier one entirely.
/// That can let a sparser duplicate overwrite a richer one if the feed
/// orders them that way; last-seen wins regardless.

use std::collections::BTreeMap;

use serde_json::{Map, Value};

use crate::analysis::pollutants;
use crate::ingest::aliases::{self, first_number, first_present, first_string};
use crate::ingest::feed::{self, RawStationRecord};
use crate::model::{PollutantReading, Station};

/// Result of one reconciliation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reconciled {
    /// Stations keyed by identity key.
    pub stations: BTreeMap<String, Station>,
    /// Raw records dropped for lacking valid coordinates.
    pub malformed: usize,
    /// Stations kept with no resolvable AQI.
    pub aqi_unresolved: usize,
    /// Raw candidates seen before deduplication.
    pub candidates: usize,
}

impl Reconciled {
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Station> {
        self.stations.get(key)
    }
}

/// Full pipeline over a parsed feed: extract, reconcile, estimate.
pub fn build_registry(feed_json: &Value) -> Reconciled {
    let records = feed::extract_stations(feed_json);
    reconcile(records)
}

/// Deduplicates raw records into stations. Never fails.
pub fn reconcile<I>(records: I) -> Reconciled
where
    I: IntoIterator<Item = RawStationRecord>,
{
    let mut result = Reconciled::default();

    for record in records {
        result.candidates += 1;

        let Some(station) = build_station(&record) else {
            result.malformed += 1;
            continue;
        };

        // Last write wins: replace, never merge field by field.
        result.stations.insert(station.key.clone(), station);
    }

    result.aqi_unresolved = result.stations.values().filter(|s| s.aqi.is_none()).count();
    result
}

/// Identity key for a record, or `None` when nothing usable is present.
pub fn identity_key(record: &RawStationRecord) -> Option<String> {
    first_string(record, aliases::STATION_ID)
        .or_else(|| first_string(record, aliases::STATION_NAME))
        .or_else(|| first_string(record, aliases::NAME))
        .or_else(|| coordinates(record).map(|(lat, lon)| coordinate_key(lat, lon)))
}

/// `"<lat>_<lon>"` fallback key.
pub fn coordinate_key(latitude: f64, longitude: f64) -> String {
    format!("{}_{}", latitude, longitude)
}

/// Validated WGS84 coordinates, if the record has them.
pub fn coordinates(record: &RawStationRecord) -> Option<(f64, f64)> {
    let lat = first_number(record, aliases::LATITUDE)?;
    let lon = first_number(record, aliases::LONGITUDE)?;

    if (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon) {
        Some((lat, lon))
    } else {
        None
    }
}

fn build_station(record: &RawStationRecord) -> Option<Station> {
    let (latitude, longitude) = coordinates(record)?;
    let key = identity_key(record)?;

    let name = first_string(record, aliases::STATION_NAME)
        .or_else(|| first_string(record, aliases::NAME))
        .unwrap_or_else(|| key.clone());

    let pollutants = pollutant_readings(record);
    let aqi = resolve_aqi(record);
    let co2_estimated = pollutants::estimate_from_readings(&pollutants);

    Some(Station {
        key,
        name,
        city: first_string(record, aliases::CITY),
        state: first_string(record, aliases::STATE),
        latitude,
        longitude,
        aqi,
        predominant_pollutant: first_string(record, aliases::PREDOMINANT),
        pollutants,
        co2_estimated,
        last_update: first_string(record, aliases::LAST_UPDATE),
    })
}

/// Station AQI, falling back to the PM2.5 pollutant entry when the top-level
/// value is absent or a sentinel. Numeric values truncate toward zero.
pub fn resolve_aqi(record: &RawStationRecord) -> Option<i64> {
    first_number(record, aliases::AQI)
        .or_else(|| fallback_aqi(record))
        .map(|value| value.trunc() as i64)
}

fn fallback_aqi(record: &RawStationRecord) -> Option<f64> {
    pollutant_objects(record)
        .find(|p| {
            first_string(p, aliases::POLLUTANT_ID).as_deref() == Some(aliases::AQI_FALLBACK_POLLUTANT)
        })
        .and_then(|p| {
            first_number(p, aliases::POLLUTANT_AQI).or_else(|| first_number(p, aliases::POLLUTANT_AVG))
        })
}

fn pollutant_objects(record: &RawStationRecord) -> impl Iterator<Item = &Map<String, Value>> {
    first_present(record, aliases::POLLUTANTS)
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(Value::as_object)
}

/// Pollutant sub-readings in feed order. Entries without an id are skipped.
fn pollutant_readings(record: &RawStationRecord) -> Vec<PollutantReading> {
    pollutant_objects(record)
        .filter_map(|p| {
            Some(PollutantReading {
                id: first_string(p, aliases::POLLUTANT_ID)?,
                min: first_number(p, aliases::POLLUTANT_MIN),
                max: first_number(p, aliases::POLLUTANT_MAX),
                avg: first_number(p, aliases::POLLUTANT_AVG),
                sub_index: first_number(p, aliases::POLLUTANT_SUB_INDEX),
            })
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
