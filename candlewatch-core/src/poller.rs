//! Single-flight poller.
//!
//! At most one fetch is outstanding at any time. A caller that finds a fetch
//! already in flight gets nothing back and is expected to drop its tick; ticks
//! are never queued. The in-flight flag is released by [`FlightGuard`] on drop,
//! so a panicking fetch cannot wedge the poller.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;

use crate::classify::KeywordTable;
use crate::config::{AnalysisConfig, DashboardConfig};
use crate::data::{SourceError, TickSource};
use crate::snapshot::Snapshot;

/// Proof that the caller owns the single fetch slot. Releases it on drop.
#[derive(Debug)]
pub struct FlightGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for FlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

/// Result of one synchronous poll attempt.
#[derive(Debug)]
pub enum PollOutcome {
    /// Another fetch was in flight; nothing was requested.
    Skipped,
    Fetched(Snapshot),
    Failed(SourceError),
}

/// Fetches batches from a tick source and derives snapshots, one at a time.
pub struct Poller {
    source: Arc<dyn TickSource>,
    in_flight: Arc<AtomicBool>,
    row_limit: usize,
    keywords: KeywordTable,
    analysis: AnalysisConfig,
}

impl Poller {
    pub fn new(
        source: Arc<dyn TickSource>,
        row_limit: usize,
        keywords: KeywordTable,
        analysis: AnalysisConfig,
    ) -> Self {
        Self {
            source,
            in_flight: Arc::new(AtomicBool::new(false)),
            row_limit,
            keywords,
            analysis,
        }
    }

    pub fn from_config(source: Arc<dyn TickSource>, config: &DashboardConfig) -> Self {
        Self::new(
            source,
            config.source.row_limit,
            config.keywords.clone(),
            config.analysis.clone(),
        )
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Claim the fetch slot, or `None` if a fetch is already outstanding.
    pub fn try_begin(&self) -> Option<FlightGuard> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| FlightGuard {
                flag: Arc::clone(&self.in_flight),
            })
    }

    /// Fetch one batch and derive its snapshot. Requires the claimed slot.
    pub fn fetch(&self, _guard: &FlightGuard) -> Result<Snapshot, SourceError> {
        log::debug!(
            "fetching latest {} rows from {}",
            self.row_limit,
            self.source.name()
        );
        match self.source.fetch_latest(self.row_limit) {
            Ok(ticks) => {
                let snapshot = Snapshot::build(ticks, &self.keywords, &self.analysis, Utc::now());
                log::info!(
                    "fetched {} candles, {} pattern hits",
                    snapshot.candles.len(),
                    snapshot.hits.len()
                );
                Ok(snapshot)
            }
            Err(e) => {
                log::warn!("fetch from {} failed: {e}", self.source.name());
                Err(e)
            }
        }
    }

    /// Claim, fetch and release in one call.
    pub fn poll(&self) -> PollOutcome {
        let Some(guard) = self.try_begin() else {
            log::debug!("poll skipped: fetch already in flight");
            return PollOutcome::Skipped;
        };
        match self.fetch(&guard) {
            Ok(snapshot) => PollOutcome::Fetched(snapshot),
            Err(e) => PollOutcome::Failed(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Tick;
    use std::sync::atomic::AtomicUsize;

    struct CountingSource {
        calls: AtomicUsize,
        fail: bool,
    }

    impl TickSource for CountingSource {
        fn name(&self) -> &str {
            "counting"
        }
        fn fetch_latest(&self, limit: usize) -> Result<Vec<Tick>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(SourceError::NetworkUnreachable("down".into()));
            }
            Ok((0..limit.min(3))
                .map(|i| Tick::new(format!("2024-05-01 10:0{i}:00"), "VERDE"))
                .collect())
        }
    }

    fn poller(fail: bool) -> (Arc<CountingSource>, Poller) {
        let source = Arc::new(CountingSource {
            calls: AtomicUsize::new(0),
            fail,
        });
        let poller = Poller::new(
            source.clone(),
            300,
            KeywordTable::default(),
            AnalysisConfig::default(),
        );
        (source, poller)
    }

    #[test]
    fn guard_blocks_second_claim_until_dropped() {
        let (_, p) = poller(false);
        let guard = p.try_begin().expect("first claim");
        assert!(p.is_in_flight());
        assert!(p.try_begin().is_none());
        drop(guard);
        assert!(!p.is_in_flight());
        assert!(p.try_begin().is_some());
    }

    #[test]
    fn poll_while_in_flight_is_skipped_without_calling_source() {
        let (src, p) = poller(false);
        let _guard = p.try_begin().unwrap();
        assert!(matches!(p.poll(), PollOutcome::Skipped));
        assert_eq!(src.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn poll_fetches_and_releases() {
        let (src, p) = poller(false);
        match p.poll() {
            PollOutcome::Fetched(snap) => assert_eq!(snap.candles.len(), 3),
            other => panic!("expected Fetched, got {other:?}"),
        }
        assert!(!p.is_in_flight());
        assert_eq!(src.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn failure_releases_slot() {
        let (_, p) = poller(true);
        assert!(matches!(p.poll(), PollOutcome::Failed(_)));
        assert!(!p.is_in_flight());
    }
}
