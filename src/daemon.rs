/// Core daemon implementation for the corridor service
///
/// The daemon owns the station refresh cadence:
/// 1. Runs an initial fetch → extract → reconcile pass at startup
/// 2. Re-polls the feed on a fixed interval
/// 3. Swaps each successful result into the shared `StationCache`
/// 4. Reports failures without stopping; the previous snapshot stays live

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use crate::config::DaemonConfig;
use crate::error::CorridorError;
use crate::ingest::fetch::FeedSource;
use crate::logging::DataSource;
use crate::monitor::{CacheSnapshot, StationCache};

// ---------------------------------------------------------------------------
// Poll bookkeeping
// ---------------------------------------------------------------------------

/// Outcome counters across the daemon's lifetime.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PollStats {
    pub attempts: u64,
    pub successes: u64,
    pub consecutive_failures: u32,
}

// ---------------------------------------------------------------------------
// Daemon State
// ---------------------------------------------------------------------------

pub struct Daemon {
    config: DaemonConfig,
    cache: Arc<StationCache>,
    feed: Arc<dyn FeedSource>,
    stats: PollStats,
}

impl Daemon {
    pub fn new(config: DaemonConfig, cache: Arc<StationCache>, feed: Arc<dyn FeedSource>) -> Self {
        Self {
            config,
            cache,
            feed,
            stats: PollStats::default(),
        }
    }

    pub fn cache(&self) -> &Arc<StationCache> {
        &self.cache
    }

    pub fn stats(&self) -> PollStats {
        self.stats
    }

    /// Interval between polls, or `None` when polling is disabled.
    pub fn poll_interval(&self) -> Option<Duration> {
        match self.config.poll_interval_minutes {
            0 => None,
            minutes => Some(Duration::from_secs(minutes * 60)),
        }
    }

    /// One refresh pass. The cache is only replaced on success.
    pub fn refresh_once(&mut self) -> Result<Arc<CacheSnapshot>, CorridorError> {
        self.stats.attempts += 1;

        match self.cache.refresh(self.feed.as_ref()) {
            Ok(snapshot) => {
                self.stats.successes += 1;
                self.stats.consecutive_failures = 0;
                Ok(snapshot)
            }
            Err(e) => {
                self.stats.consecutive_failures += 1;
                Err(e)
            }
        }
    }

    /// Refresh and report; never fails.
    pub fn poll(&mut self) {
        match self.refresh_once() {
            Ok(snapshot) => {
                println!(
                    "✓ Refresh complete: {} stations ({} malformed records dropped)",
                    snapshot.len(),
                    snapshot.malformed
                );
            }
            Err(e) => {
                eprintln!("✗ Refresh failed: {}", e);
                if self.stats.consecutive_failures > 1 {
                    tracing::warn!(
                        source = %DataSource::System,
                        consecutive_failures = self.stats.consecutive_failures,
                        "Serving stale station data"
                    );
                }
            }
        }
    }

    /// Main daemon loop (runs indefinitely). Returns immediately when the
    /// poll interval is 0.
    pub fn run(&mut self) {
        let Some(interval) = self.poll_interval() else {
            tracing::info!(source = %DataSource::System, "Polling disabled");
            return;
        };

        println!("🔄 Starting polling loop...");
        println!("   Poll interval: {} minutes", self.config.poll_interval_minutes);
        println!("   Feed: {}", self.feed.describe());

        loop {
            let start = Utc::now();
            std::thread::sleep(interval);
            self.poll();

            let elapsed = (Utc::now() - start).num_seconds();
            tracing::debug!(source = %DataSource::System, elapsed_secs = elapsed, "Poll cycle finished");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
