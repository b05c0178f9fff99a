//! Background worker thread: owns the poll and clock timers.
//!
//! Communication with the TUI main thread is via `mpsc` channels. The
//! scheduler never blocks on the network: each admitted poll runs on a
//! short-lived fetch thread while the timers keep their cadence. The poller's
//! single-flight guard decides whether a poll is admitted.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use chrono::Utc;

use candlewatch_core::timefmt::ClockZone;
use candlewatch_core::{Poller, Snapshot};

use crate::app::ErrorCategory;

/// How often the clock readout refreshes.
pub const CLOCK_PERIOD: Duration = Duration::from_secs(1);

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    /// Poll now instead of waiting for the next tick.
    RefreshNow,
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug, Clone)]
pub enum WorkerResponse {
    FetchStarted,
    Snapshot(Box<Snapshot>),
    FetchFailed {
        category: ErrorCategory,
        message: String,
    },
    /// A tick found a fetch already in flight and was dropped.
    Skipped,
    ClockTick {
        readout: String,
    },
}

/// Timer settings for the scheduler.
#[derive(Debug, Clone)]
pub struct WorkerSettings {
    pub poll_interval: Duration,
    pub zone: ClockZone,
}

/// Spawn the background scheduler thread.
///
/// The first poll fires immediately. Returns when `Shutdown` arrives or the
/// command channel closes; fetches still in flight at that point finish on
/// their own and their results are discarded.
pub fn spawn_worker(
    poller: Arc<Poller>,
    settings: WorkerSettings,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> std::io::Result<JoinHandle<()>> {
    thread::Builder::new()
        .name("candlewatch-worker".into())
        .spawn(move || {
            worker_loop(poller, settings, rx, tx);
        })
}

fn worker_loop(
    poller: Arc<Poller>,
    settings: WorkerSettings,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) {
    let active = Arc::new(AtomicBool::new(true));
    let start = Instant::now();
    let mut next_poll = start;
    let mut next_clock = start;

    log::info!(
        "worker started: source={} interval={:?}",
        poller.source_name(),
        settings.poll_interval
    );

    loop {
        let now = Instant::now();

        if now >= next_clock {
            let _ = tx.send(WorkerResponse::ClockTick {
                readout: settings.zone.readout(Utc::now()),
            });
            while next_clock <= now {
                next_clock += CLOCK_PERIOD;
            }
        }

        if now >= next_poll {
            start_poll(&poller, &tx, &active);
            next_poll = now + settings.poll_interval;
        }

        let wait = next_clock
            .min(next_poll)
            .saturating_duration_since(Instant::now());

        match rx.recv_timeout(wait) {
            Ok(WorkerCommand::RefreshNow) => {
                log::debug!("manual refresh requested");
                start_poll(&poller, &tx, &active);
            }
            Ok(WorkerCommand::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
            Err(RecvTimeoutError::Timeout) => {}
        }
    }

    active.store(false, Ordering::Release);
    log::info!("worker stopped");
}

/// Claim the fetch slot and run one fetch on its own thread, or report the
/// tick as skipped if a fetch is already outstanding.
fn start_poll(poller: &Arc<Poller>, tx: &Sender<WorkerResponse>, active: &Arc<AtomicBool>) {
    let Some(guard) = poller.try_begin() else {
        log::debug!("poll skipped: fetch already in flight");
        let _ = tx.send(WorkerResponse::Skipped);
        return;
    };

    let _ = tx.send(WorkerResponse::FetchStarted);

    let fetch_poller = Arc::clone(poller);
    let fetch_tx = tx.clone();
    let fetch_active = Arc::clone(active);

    let spawned = thread::Builder::new()
        .name("candlewatch-fetch".into())
        .spawn(move || {
            let result = fetch_poller.fetch(&guard);

            if !fetch_active.load(Ordering::Acquire) {
                log::debug!("discarding fetch result that arrived after shutdown");
                return;
            }

            let resp = match result {
                Ok(snapshot) => WorkerResponse::Snapshot(Box::new(snapshot)),
                Err(e) => WorkerResponse::FetchFailed {
                    category: ErrorCategory::of(&e),
                    message: e.to_string(),
                },
            };
            let _ = fetch_tx.send(resp);
            // Hold the slot until the result is queued.
            drop(guard);
        });

    // The closure (and its guard) is dropped on failure, which frees the slot.
    if let Err(e) = spawned {
        log::error!("failed to spawn fetch thread: {e}");
        let _ = tx.send(WorkerResponse::FetchFailed {
            category: ErrorCategory::Other,
            message: format!("failed to spawn fetch thread: {e}"),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlewatch_core::config::AnalysisConfig;
    use candlewatch_core::data::SyntheticSource;
    use candlewatch_core::KeywordTable;
    use std::sync::mpsc;

    fn synthetic_poller() -> Arc<Poller> {
        let start = chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();
        Arc::new(Poller::new(
            Arc::new(SyntheticSource::new(3, start, 20)),
            300,
            KeywordTable::default(),
            AnalysisConfig::default(),
        ))
    }

    fn settings(interval: Duration) -> WorkerSettings {
        WorkerSettings {
            poll_interval: interval,
            zone: ClockZone::default(),
        }
    }

    #[test]
    fn worker_shutdown() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, _resp_rx) = mpsc::channel();

        let handle = spawn_worker(
            synthetic_poller(),
            settings(Duration::from_secs(60)),
            cmd_rx,
            resp_tx,
        )
        .unwrap();
        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().expect("worker should join cleanly");
    }

    #[test]
    fn worker_stops_when_command_channel_closes() {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle = spawn_worker(
            synthetic_poller(),
            settings(Duration::from_secs(60)),
            cmd_rx,
            resp_tx,
        )
        .unwrap();
        drop(cmd_tx);
        handle.join().unwrap();
    }

    #[test]
    fn each_result_lands_before_the_next_fetch_starts() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(
            synthetic_poller(),
            settings(Duration::from_millis(1)),
            cmd_rx,
            resp_tx,
        )
        .unwrap();

        let mut events = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(5);
        while events.len() < 40 && Instant::now() < deadline {
            match resp_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(WorkerResponse::FetchStarted) => events.push('S'),
                Ok(WorkerResponse::Snapshot(_)) => events.push('R'),
                Ok(WorkerResponse::FetchFailed { .. }) => events.push('R'),
                _ => {}
            }
        }

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();

        assert!(events.len() >= 4, "too few fetches: {events:?}");
        for (i, e) in events.iter().enumerate() {
            let expected = if i % 2 == 0 { 'S' } else { 'R' };
            assert_eq!(*e, expected, "out of order at {i}: {events:?}");
        }
    }

    #[test]
    fn first_poll_and_clock_fire_immediately() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(
            synthetic_poller(),
            settings(Duration::from_secs(60)),
            cmd_rx,
            resp_tx,
        )
        .unwrap();

        let mut saw_clock = false;
        let mut snapshot = None;
        let deadline = Instant::now() + Duration::from_secs(5);
        while snapshot.is_none() && Instant::now() < deadline {
            match resp_rx.recv_timeout(Duration::from_millis(100)) {
                Ok(WorkerResponse::ClockTick { readout }) => {
                    assert!(readout.ends_with("America/Sao_Paulo"));
                    saw_clock = true;
                }
                Ok(WorkerResponse::Snapshot(s)) => snapshot = Some(s),
                _ => {}
            }
        }

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();

        assert!(saw_clock);
        assert_eq!(snapshot.expect("snapshot within 5s").candles.len(), 21);
    }
}
