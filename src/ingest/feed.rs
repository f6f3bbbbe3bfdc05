/// Station extraction from feeds of unknown shape.
///
/// Feeds nest station records under vendor-specific wrapper keys at varying
/// depths, so extraction walks the whole JSON value instead of deserializing
/// into a fixed schema. At each object node two patterns are tested in order:
///
/// 1. the object holds a list under a station-collection key
///    (`stationsInCity`): every object in that list is a candidate;
/// 2. otherwise, the object itself carries an identity-like key and a
///    latitude-like key: the object is a candidate.
///
/// Either way the walk continues into every nested object and array, so
/// sibling or deeper station lists are still found. The same station may be
/// emitted more than once; `stations::reconcile` deduplicates.

use serde_json::{Map, Value};

use crate::ingest::aliases;

/// An untyped station-like object lifted out of a feed.
pub type RawStationRecord = Map<String, Value>;

/// Extracts every station-like record from `value`, in traversal order.
///
/// Never fails: scalars yield nothing, unrecognised nodes are traversed.
pub fn extract_stations(value: &Value) -> Vec<RawStationRecord> {
    let mut found = Vec::new();
    visit(value, &mut found);
    found
}

fn visit(value: &Value, found: &mut Vec<RawStationRecord>) {
    match value {
        Value::Object(map) => {
            if let Some(list) = station_collection(map) {
                found.extend(list.iter().filter_map(|item| item.as_object().cloned()));
            } else if looks_like_station(map) {
                found.push(map.clone());
            }

            for child in map.values() {
                if child.is_object() || child.is_array() {
                    visit(child, found);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                visit(item, found);
            }
        }
        _ => {}
    }
}

/// The first station-collection list on this object, if any.
fn station_collection(map: &Map<String, Value>) -> Option<&Vec<Value>> {
    aliases::STATION_COLLECTION
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_array))
}

fn looks_like_station(map: &Map<String, Value>) -> bool {
    let has_identity = aliases::has_any(map, aliases::STATION_ID)
        || aliases::has_any(map, aliases::STATION_NAME)
        || aliases::has_any(map, aliases::NAME);
    has_identity && aliases::has_any(map, aliases::LATITUDE)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
