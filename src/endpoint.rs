/// HTTP endpoint for stations, zone resilience, and scenarios
///
/// Provides a small JSON API for the dashboard.
///
/// Endpoints:
/// - GET  /health                           - Service health check
/// - GET  /api/stations                     - Cached stations (lazy refresh when empty)
/// - POST /api/stations/refresh             - Force a feed refresh
/// - GET  /api/zones                        - Known zone ids
/// - GET  /api/zones/{id}/resilience        - Resilience score for a zone
/// - GET  /api/zones/{id}/simulate?...      - Scenario with query modifiers
/// - POST /api/zones/{id}/simulate          - Scenario with a JSON body
///
/// `route` is a pure function of the request parts and the shared state, so
/// the whole API is testable without opening a socket.

use std::io::Read;
use std::sync::Arc;

use serde_json::{Value, json};

use crate::analysis::{resilience, scenario};
use crate::error::CorridorError;
use crate::ingest::fetch::FeedSource;
use crate::logging::DataSource;
use crate::monitor::{CacheSnapshot, StationCache};
use crate::zones::ZoneSource;

// ---------------------------------------------------------------------------
// Shared state
// ---------------------------------------------------------------------------

/// Everything a request handler can reach.
#[derive(Clone)]
pub struct AppState {
    pub cache: Arc<StationCache>,
    pub feed: Arc<dyn FeedSource>,
    pub zones: Arc<dyn ZoneSource>,
}

/// Status code plus JSON body.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    fn ok(body: Value) -> Self {
        Self { status: 200, body }
    }

    fn error(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({ "error": message.into() }),
        }
    }
}

impl From<CorridorError> for ApiResponse {
    fn from(err: CorridorError) -> Self {
        match &err {
            CorridorError::NotFound(id) => Self {
                status: 404,
                body: json!({ "error": err.to_string(), "zone_id": id }),
            },
            CorridorError::InvalidInput { field, .. } => Self {
                status: 400,
                body: json!({ "error": err.to_string(), "field": field }),
            },
            CorridorError::FetchFailure(_) => Self::error(502, err.to_string()),
            CorridorError::MalformedRecord(_) | CorridorError::Config(_) | CorridorError::ZoneSource(_) => {
                Self::error(500, err.to_string())
            }
        }
    }
}

fn respond_with<T>(result: Result<T, CorridorError>, to_body: impl FnOnce(T) -> Value) -> ApiResponse {
    match result {
        Ok(value) => ApiResponse::ok(to_body(value)),
        Err(e) => e.into(),
    }
}

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Dispatches one request. `url` may carry a query string.
pub fn route(method: &str, url: &str, body: &str, state: &AppState) -> ApiResponse {
    let (path, query) = match url.split_once('?') {
        Some((path, query)) => (path, query),
        None => (url, ""),
    };
    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let method = method.to_ascii_uppercase();

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["health"]) => handle_health(),
        ("GET", ["api", "stations"]) => handle_stations(state),
        ("POST", ["api", "stations", "refresh"]) => handle_refresh(state),
        ("GET", ["api", "zones"]) => respond_with(state.zones.zone_ids(), |ids| json!({ "zones": ids })),
        ("GET", ["api", "zones", id, "resilience"]) => match decode_segment(id) {
            Ok(id) => respond_with(resilience::score_zone(state.zones.as_ref(), &id), |score| json!(score)),
            Err(e) => e.into(),
        },
        ("GET", ["api", "zones", id, "simulate"]) => handle_simulate_query(state, id, query),
        ("POST", ["api", "zones", id, "simulate"]) => handle_simulate_body(state, id, body),
        (_, ["health"])
        | (_, ["api", "stations"])
        | (_, ["api", "stations", "refresh"])
        | (_, ["api", "zones"])
        | (_, ["api", "zones", _, "resilience"])
        | (_, ["api", "zones", _, "simulate"]) => ApiResponse::error(405, format!("method {} not allowed", method)),
        _ => ApiResponse {
            status: 404,
            body: json!({
                "error": "Not found",
                "available_endpoints": [
                    "/health",
                    "/api/stations",
                    "/api/stations/refresh",
                    "/api/zones",
                    "/api/zones/{id}/resilience",
                    "/api/zones/{id}/simulate"
                ]
            }),
        },
    }
}

fn handle_health() -> ApiResponse {
    ApiResponse::ok(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

fn stations_body(snapshot: Arc<CacheSnapshot>) -> Value {
    json!({
        "count": snapshot.len(),
        "refreshed_at": snapshot.refreshed_at.to_rfc3339(),
        "malformed": snapshot.malformed,
        "stations": snapshot.station_list(),
    })
}

fn handle_stations(state: &AppState) -> ApiResponse {
    respond_with(state.cache.get_or_refresh(state.feed.as_ref()), stations_body)
}

fn handle_refresh(state: &AppState) -> ApiResponse {
    respond_with(state.cache.refresh(state.feed.as_ref()), stations_body)
}

fn handle_simulate_query(state: &AppState, id: &str, query: &str) -> ApiResponse {
    let result = decode_segment(id).and_then(|id| {
        let pairs = parse_query(query)?;
        let modifiers = scenario::ScenarioModifiers::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())))?;
        let snapshot = crate::zones::require_snapshot(state.zones.as_ref(), &id)?;
        Ok(scenario::simulate(&snapshot, &modifiers))
    });
    respond_with(result, |outcome| json!(outcome))
}

fn handle_simulate_body(state: &AppState, id: &str, body: &str) -> ApiResponse {
    let result = decode_segment(id).and_then(|id| {
        let raw = if body.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(body)
                .map_err(|e| CorridorError::invalid_input("body", format!("not valid JSON: {}", e)))?
        };
        scenario::simulate_zone(state.zones.as_ref(), &id, &raw)
    });
    respond_with(result, |outcome| json!(outcome))
}

fn decode_segment(raw: &str) -> Result<String, CorridorError> {
    urlencoding::decode(raw)
        .map(|s| s.into_owned())
        .map_err(|_| CorridorError::invalid_input("zone_id", "not valid UTF-8"))
}

/// Splits and percent-decodes `a=1&b=2`. `+` decodes to a space.
pub fn parse_query(query: &str) -> Result<Vec<(String, String)>, CorridorError> {
    let decode = |raw: &str| {
        urlencoding::decode(&raw.replace('+', " "))
            .map(|s| s.into_owned())
            .map_err(|_| CorridorError::invalid_input("query", "not valid UTF-8"))
    };

    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            Ok((decode(key)?, decode(value)?))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Start HTTP endpoint server on the specified port (blocks)
pub fn start_endpoint_server(port: u16, state: AppState) -> Result<(), String> {
    let server = tiny_http::Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server: {}", e))?;

    println!("📡 HTTP endpoint listening on http://0.0.0.0:{}", port);
    println!("   GET  /api/stations");
    println!("   GET  /api/zones/{{id}}/resilience");
    println!("   GET  /api/zones/{{id}}/simulate\n");

    for mut request in server.incoming_requests() {
        let method = request.method().to_string();
        let url = request.url().to_string();

        let mut body = String::new();
        if let Err(e) = request.as_reader().read_to_string(&mut body) {
            tracing::warn!(source = %DataSource::Http, url = %url, "Unreadable request body: {}", e);
        }

        let response = route(&method, &url, &body, &state);
        if response.status >= 500 {
            tracing::warn!(source = %DataSource::Http, method = %method, url = %url, status = response.status, "Request failed");
        } else {
            tracing::debug!(source = %DataSource::Http, method = %method, url = %url, status = response.status, "Request served");
        }

        if let Err(e) = request.respond(create_response(&response)) {
            tracing::warn!(source = %DataSource::Http, "Failed to send response: {}", e);
        }
    }

    Ok(())
}

/// Create HTTP response with JSON body
fn create_response(response: &ApiResponse) -> tiny_http::Response<std::io::Cursor<Vec<u8>>> {
    let body = serde_json::to_string_pretty(&response.body).unwrap_or_else(|_| "{}".to_string());

    let http = tiny_http::Response::from_data(body.into_bytes())
        .with_status_code(tiny_http::StatusCode::from(response.status));

    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]) {
        Ok(header) => http.with_header(header),
        Err(()) => http,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
