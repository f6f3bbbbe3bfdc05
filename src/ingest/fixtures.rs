/// Test fixtures: representative JSON payloads from air-quality station feeds.
///
/// These fixtures are structurally faithful but truncated to the minimum
/// needed to exercise the parser and reconciler. The CPCB-style envelope
/// nests stations three levels deep:
///
///   [ state ]
///     .stateId
///     .citiesInState[]
///       .cityId
///       .stationsInCity[]
///         .stationId / .stationName
///         .latitude / .longitude  : sometimes strings, sometimes numbers
///         .airQualityIndexValue   : number, or "NA" when offline
///         .predominantParameter
///         .lastUpdate             : "dd-mm-YYYY HH:MM:SS"
///         .pollutants[]
///           .indexId : "PM2.5", "PM10", "NO2", "CO", "OZONE", ...
///           .min / .max / .avg: numbers or "NA"
///           .Hourly_sub_index
///
/// Other vendors wrap the same records under arbitrary keys, or flatten
/// them into a bare array of station objects.

/// Two states, three cities, four stations in the standard CPCB shape.
/// Anand Vihar reports AQI as "NA" and relies on the PM2.5 fallback.
#[cfg(test)]
pub(crate) fn fixture_cpcb_states_json() -> &'static str {
    r#"[
      {
        "stateId": "Delhi",
        "citiesInState": [
          {
            "cityId": "Delhi",
            "stationsInCity": [
              {
                "stationId": "site_301",
                "stationName": "Anand Vihar, Delhi - DPCC",
                "latitude": "28.646835",
                "longitude": "77.316032",
                "airQualityIndexValue": "NA",
                "predominantParameter": "PM2.5",
                "lastUpdate": "01-05-2024 12:00:00",
                "pollutants": [
                  { "indexId": "PM2.5", "min": 180, "max": 412, "avg": 287, "Hourly_sub_index": 311 },
                  { "indexId": "PM10", "min": 240, "max": 520, "avg": 402, "Hourly_sub_index": 302 },
                  { "indexId": "NO2", "min": 40, "max": 92, "avg": 61, "Hourly_sub_index": 76 },
                  { "indexId": "CO", "min": 1.1, "max": 3.9, "avg": 2.4, "Hourly_sub_index": 84 }
                ]
              },
              {
                "stationId": "site_5024",
                "stationName": "Lodhi Road, Delhi - IMD",
                "latitude": 28.591825,
                "longitude": 77.227307,
                "airQualityIndexValue": 168,
                "predominantParameter": "PM10",
                "lastUpdate": "01-05-2024 12:00:00",
                "pollutants": [
                  { "indexId": "PM10", "min": 90, "max": 230, "avg": 168, "Hourly_sub_index": 168 }
                ]
              }
            ]
          }
        ]
      },
      {
        "stateId": "Maharashtra",
        "citiesInState": [
          {
            "cityId": "Mumbai",
            "stationsInCity": [
              {
                "stationId": "site_5104",
                "stationName": "Bandra, Mumbai - MPCB",
                "latitude": 19.041847,
                "longitude": 72.865513,
                "airQualityIndexValue": 92,
                "pollutants": []
              }
            ]
          },
          {
            "cityId": "Pune",
            "stationsInCity": [
              {
                "stationId": "site_5763",
                "stationName": "Karve Road, Pune - MPCB",
                "latitude": "18.501",
                "longitude": "73.8163",
                "airQualityIndexValue": "74"
              }
            ]
          }
        ]
      }
    ]"#
}

/// Station objects buried under unrecognised wrapper keys at several depths,
/// with no `stationsInCity` list anywhere.
#[cfg(test)]
pub(crate) fn fixture_wrapped_sites_json() -> &'static str {
    r#"{
      "rss": {
        "channel": {
          "items": [
            { "siteId": "site_1", "name": "Shallow", "lat": 26.9, "lng": 75.8, "aqi": 120 }
          ],
          "region": {
            "north": {
              "feeds": [
                { "siteId": "site_2", "name": "Deep", "latitude": 30.7, "longitude": 76.7, "aqi": "-" }
              ]
            }
          }
        }
      },
      "meta": { "count": 2, "source": "vendor" }
    }"#
}

/// The same station listed twice with different freshness, plus one record
/// that has a name but no coordinates at all.
#[cfg(test)]
pub(crate) fn fixture_duplicate_and_malformed_json() -> &'static str {
    r#"{
      "data": [
        {
          "cityId": "Kolkata",
          "stationsInCity": [
            { "stationId": "site_296", "stationName": "Victoria", "latitude": 22.54, "longitude": 88.34, "airQualityIndexValue": 110 },
            { "stationName": "No Coordinates Here", "airQualityIndexValue": 90 }
          ]
        },
        {
          "latest": {
            "stationsInCity": [
              { "stationId": "site_296", "stationName": "Victoria", "latitude": 22.54, "longitude": 88.34, "airQualityIndexValue": 131 }
            ]
          }
        }
      ]
    }"#
}
