/// Integration tests for StationCache under concurrent refresh and read
///
/// Readers must only ever observe a complete generation: every snapshot
/// they see has exactly the station count of one of the feeds being
/// alternated, and every station in it belongs to that same feed.
///
/// Run with: cargo test --test cache_concurrency

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;

use corridor_service::error::CorridorError;
use corridor_service::ingest::fetch::FeedSource;
use corridor_service::monitor::StationCache;
use serde_json::{Value, json};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

const LARGE: usize = 120;
const SMALL: usize = 7;

/// Flat feed of `count` stations whose ids share `prefix`.
fn generation(prefix: &str, count: usize) -> Value {
    let stations: Vec<Value> = (0..count)
        .map(|i| {
            json!({
                "stationId": format!("{}_{:03}", prefix, i),
                "latitude": 20.0 + i as f64 * 0.01,
                "longitude": 77.0,
                "airQualityIndexValue": 100 + i,
            })
        })
        .collect();
    json!({ "stationsInCity": stations })
}

/// Alternates between a large and a small generation on every fetch.
struct AlternatingFeed {
    calls: AtomicUsize,
    large: Value,
    small: Value,
}

impl AlternatingFeed {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            large: generation("large", LARGE),
            small: generation("small", SMALL),
        }
    }
}

impl FeedSource for AlternatingFeed {
    fn fetch(&self) -> Result<Value, CorridorError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(if n % 2 == 0 { self.large.clone() } else { self.small.clone() })
    }

    fn describe(&self) -> String {
        "alternating".to_string()
    }
}

/// Succeeds once, then fails forever.
struct FailingAfterFirst {
    calls: AtomicUsize,
}

impl FeedSource for FailingAfterFirst {
    fn fetch(&self) -> Result<Value, CorridorError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            Ok(generation("only", SMALL))
        } else {
            Err(CorridorError::FetchFailure("request timed out".to_string()))
        }
    }

    fn describe(&self) -> String {
        "failing".to_string()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn test_readers_never_observe_partial_generation() {
    let cache = Arc::new(StationCache::new());
    let feed = Arc::new(AlternatingFeed::new());
    cache.refresh(feed.as_ref()).unwrap();

    let done = Arc::new(AtomicBool::new(false));

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                let mut observed = 0usize;
                while !done.load(Ordering::SeqCst) {
                    let snapshot = cache.snapshot().expect("populated before readers start");
                    let size = snapshot.len();
                    assert!(size == LARGE || size == SMALL, "torn snapshot of size {}", size);

                    let prefix = if size == LARGE { "large_" } else { "small_" };
                    assert!(snapshot.stations.keys().all(|k| k.starts_with(prefix)));
                    observed += 1;
                }
                observed
            })
        })
        .collect();

    let writer = {
        let cache = Arc::clone(&cache);
        let feed = Arc::clone(&feed);
        thread::spawn(move || {
            for _ in 0..200 {
                cache.refresh(feed.as_ref()).unwrap();
            }
        })
    };

    writer.join().unwrap();
    done.store(true, Ordering::SeqCst);

    for reader in readers {
        assert!(reader.join().unwrap() > 0);
    }
}

#[test]
fn test_concurrent_lazy_reads_fetch_once() {
    let cache = Arc::new(StationCache::new());
    let feed = Arc::new(AlternatingFeed::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = Arc::clone(&cache);
            let feed = Arc::clone(&feed);
            thread::spawn(move || cache.get_or_refresh(feed.as_ref()).unwrap().len())
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), LARGE);
    }
    assert_eq!(feed.calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_outage_keeps_last_good_generation() {
    let cache = StationCache::new();
    let feed = FailingAfterFirst {
        calls: AtomicUsize::new(0),
    };

    let first = cache.refresh(&feed).unwrap();
    for _ in 0..3 {
        assert!(cache.refresh(&feed).is_err());
    }

    let current = cache.snapshot().unwrap();
    assert!(Arc::ptr_eq(&first, &current));
    assert_eq!(cache.get_stations().len(), SMALL);
}
