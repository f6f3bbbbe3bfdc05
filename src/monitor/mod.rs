/// Process-wide station cache with copy-and-swap refresh.
///
/// ## Lifecycle
///
/// empty → populated → replaced → replaced → ...
///
/// The cache starts empty. The first successful fetch → extract → reconcile
/// run populates it, either on an explicit `refresh` or lazily from
/// `get_or_refresh`. Every later refresh builds a complete new snapshot off
/// to the side and swaps it in under the write lock, so a reader holds
/// either the old snapshot or the new one, never a mixture. Stations missing
/// from the newest feed disappear with the swap.
///
/// A failed fetch leaves the current snapshot in place and is returned to
/// the caller, who decides whether to retry on the next tick.
///
/// Refreshes are serialised by a separate gate so two concurrent lazy reads
/// on an empty cache fetch once, not twice. Readers never wait on the gate.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};

use crate::error::CorridorError;
use crate::ingest::fetch::FeedSource;
use crate::logging;
use crate::model::Station;
use crate::stations::{self, Reconciled};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One immutable generation of the station registry.
#[derive(Debug, Clone, PartialEq)]
pub struct CacheSnapshot {
    pub stations: BTreeMap<String, Station>,
    pub refreshed_at: DateTime<Utc>,
    /// Raw records dropped for lacking coordinates in this generation.
    pub malformed: usize,
}

impl CacheSnapshot {
    pub fn from_reconciled(reconciled: Reconciled, refreshed_at: DateTime<Utc>) -> Self {
        Self {
            stations: reconciled.stations,
            refreshed_at,
            malformed: reconciled.malformed,
        }
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Stations ordered by identity key.
    pub fn station_list(&self) -> Vec<Station> {
        self.stations.values().cloned().collect()
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct StationCache {
    current: RwLock<Option<Arc<CacheSnapshot>>>,
    refresh_gate: Mutex<()>,
}

impl StationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot, if the cache has ever been populated.
    pub fn snapshot(&self) -> Option<Arc<CacheSnapshot>> {
        self.current.read().clone()
    }

    pub fn is_populated(&self) -> bool {
        self.current.read().is_some()
    }

    /// Latest stations; empty before the first successful refresh.
    pub fn get_stations(&self) -> Vec<Station> {
        self.snapshot().map(|s| s.station_list()).unwrap_or_default()
    }

    /// Swaps in a fully built snapshot.
    pub fn publish(&self, reconciled: Reconciled) -> Arc<CacheSnapshot> {
        let snapshot = Arc::new(CacheSnapshot::from_reconciled(reconciled, Utc::now()));
        *self.current.write() = Some(Arc::clone(&snapshot));
        snapshot
    }

    /// Fetches the feed and replaces the cache. On failure the existing
    /// snapshot is untouched.
    pub fn refresh(&self, source: &dyn FeedSource) -> Result<Arc<CacheSnapshot>, CorridorError> {
        let _gate = self.refresh_gate.lock();
        self.refresh_locked(source)
    }

    /// Returns the current snapshot, refreshing first if the cache is empty.
    pub fn get_or_refresh(&self, source: &dyn FeedSource) -> Result<Arc<CacheSnapshot>, CorridorError> {
        if let Some(snapshot) = self.snapshot() {
            return Ok(snapshot);
        }

        let _gate = self.refresh_gate.lock();
        // Another reader may have populated it while we waited.
        if let Some(snapshot) = self.snapshot() {
            return Ok(snapshot);
        }
        self.refresh_locked(source)
    }

    fn refresh_locked(&self, source: &dyn FeedSource) -> Result<Arc<CacheSnapshot>, CorridorError> {
        let feed = source.fetch().inspect_err(|e| {
            logging::log_fetch_failure(&source.describe(), e);
        })?;

        let reconciled = stations::build_registry(&feed);
        logging::log_refresh_summary(&reconciled);

        Ok(self.publish(reconciled))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
