//! Application state: single-owner, main-thread only.
//!
//! All dashboard state lives here. The worker thread communicates via channels
//! and every response is folded in through one of the `apply_*` methods.

use std::collections::VecDeque;
use std::sync::mpsc::{Receiver, Sender};

use chrono::{DateTime, NaiveDateTime, Utc};

use candlewatch_core::data::SourceError;
use candlewatch_core::timefmt::ClockZone;
use candlewatch_core::{PatternHit, Snapshot};

use crate::worker::{WorkerCommand, WorkerResponse};

/// Maximum number of records kept in the error history.
pub const ERROR_HISTORY_CAP: usize = 50;

/// Which panel is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    Tape,
    Patterns,
    Help,
}

impl Panel {
    const COUNT: usize = 3;

    pub fn index(self) -> usize {
        match self {
            Panel::Tape => 0,
            Panel::Patterns => 1,
            Panel::Help => 2,
        }
    }

    pub fn from_index(i: usize) -> Option<Self> {
        match i {
            0 => Some(Panel::Tape),
            1 => Some(Panel::Patterns),
            2 => Some(Panel::Help),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Panel::Tape => "Tape",
            Panel::Patterns => "Patterns",
            Panel::Help => "Help",
        }
    }

    pub fn next(self) -> Panel {
        Panel::from_index((self.index() + 1) % Self::COUNT).unwrap_or(Panel::Tape)
    }

    pub fn prev(self) -> Panel {
        Panel::from_index((self.index() + Self::COUNT - 1) % Self::COUNT).unwrap_or(Panel::Tape)
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Feed connection state shown in the header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    /// No fetch has completed yet.
    Connecting,
    Online,
    Error,
}

impl ConnectionStatus {
    pub fn label(self) -> &'static str {
        match self {
            ConnectionStatus::Connecting => "connecting",
            ConnectionStatus::Online => "online",
            ConnectionStatus::Error => "error",
        }
    }
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Auth,
    Data,
    Config,
    Other,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Network => "NET",
            ErrorCategory::Auth => "AUTH",
            ErrorCategory::Data => "DATA",
            ErrorCategory::Config => "CFG",
            ErrorCategory::Other => "ERR",
        }
    }

    pub fn of(error: &SourceError) -> Self {
        match error {
            SourceError::NetworkUnreachable(_) | SourceError::Timeout { .. } => {
                ErrorCategory::Network
            }
            SourceError::AuthenticationRejected { .. } => ErrorCategory::Auth,
            SourceError::NotFound(_)
            | SourceError::Http { .. }
            | SourceError::ResponseFormatChanged(_) => ErrorCategory::Data,
            SourceError::NotConfigured(_) => ErrorCategory::Config,
            SourceError::Other(_) => ErrorCategory::Other,
        }
    }
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    None,
    ErrorHistory,
}

/// Top-level application state.
pub struct AppState {
    // Navigation
    pub active_panel: Panel,
    pub running: bool,

    // Feed
    pub source_name: String,
    pub snapshot: Option<Snapshot>,
    pub connection: ConnectionStatus,
    pub fetching: bool,
    pub last_update: Option<DateTime<Utc>>,
    pub exhaustion_threshold: usize,

    // Patterns panel
    pub pattern_cursor: Option<usize>,

    // Clock
    pub zone: ClockZone,
    pub clock: String,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub overlay: Overlay,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        source_name: impl Into<String>,
        zone: ClockZone,
        exhaustion_threshold: usize,
    ) -> Self {
        let clock = zone.readout(Utc::now());
        Self {
            active_panel: Panel::Tape,
            running: true,
            source_name: source_name.into(),
            snapshot: None,
            connection: ConnectionStatus::Connecting,
            fetching: false,
            last_update: None,
            exhaustion_threshold,
            pattern_cursor: None,
            zone,
            clock,
            worker_tx,
            worker_rx,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            overlay: Overlay::None,
        }
    }

    /// Fold one worker response into the state.
    pub fn apply(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::FetchStarted => self.apply_fetch_started(),
            WorkerResponse::Snapshot(snapshot) => self.apply_snapshot(*snapshot),
            WorkerResponse::FetchFailed { category, message } => {
                self.apply_fetch_failed(category, message)
            }
            WorkerResponse::Skipped => self.apply_skipped(),
            WorkerResponse::ClockTick { readout } => self.apply_clock(readout),
        }
    }

    pub fn apply_fetch_started(&mut self) {
        self.fetching = true;
    }

    /// Replace the working set wholesale. The pattern cursor follows its hit
    /// by timestamp and is cleared if that hit is gone.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) {
        let selected = self.selected_hit().map(|h| h.timestamp.clone());
        self.pattern_cursor =
            selected.and_then(|ts| snapshot.hits.iter().position(|h| h.timestamp == ts));

        if self.connection == ConnectionStatus::Error {
            self.set_status("Connection restored");
        } else if snapshot.is_empty() {
            self.set_warning("Table returned no rows");
        }

        self.fetching = false;
        self.connection = ConnectionStatus::Online;
        self.last_update = Some(snapshot.fetched_at);
        self.snapshot = Some(snapshot);
    }

    /// A failed fetch keeps the previous working set on screen.
    pub fn apply_fetch_failed(&mut self, category: ErrorCategory, message: String) {
        self.fetching = false;
        self.connection = ConnectionStatus::Error;
        let context = format!("fetch from {}", self.source_name);
        self.push_error(category, message, context);
    }

    pub fn apply_skipped(&mut self) {
        log::debug!("tick skipped while a fetch is in flight");
    }

    pub fn apply_clock(&mut self, readout: String) {
        self.clock = readout;
    }

    /// Ask the worker for an immediate poll. It goes through the same
    /// single-flight guard as the timer.
    pub fn request_refresh(&mut self) {
        if self.worker_tx.send(WorkerCommand::RefreshNow).is_err() {
            self.set_warning("Worker is not running");
        } else if self.fetching {
            self.set_warning("Fetch already in progress");
        } else {
            self.set_status("Refreshing...");
        }
    }

    /// Last update as `HH:MM:SS` in the display zone.
    pub fn last_update_label(&self) -> Option<String> {
        self.last_update.map(|at| self.zone.time_of_day(at))
    }

    pub fn hits(&self) -> &[PatternHit] {
        self.snapshot.as_ref().map(|s| s.hits.as_slice()).unwrap_or(&[])
    }

    pub fn selected_hit(&self) -> Option<&PatternHit> {
        self.pattern_cursor.and_then(|i| self.hits().get(i))
    }

    /// Candle index the tape should highlight, if a hit is selected.
    pub fn highlighted_candle(&self) -> Option<usize> {
        self.selected_hit().map(|h| h.index)
    }

    /// Move the pattern cursor towards newer hits. The first press selects the oldest.
    pub fn cursor_next(&mut self) {
        let count = self.hits().len();
        if count == 0 {
            self.pattern_cursor = None;
            return;
        }
        self.pattern_cursor = Some(match self.pattern_cursor {
            Some(i) => (i + 1).min(count - 1),
            None => 0,
        });
    }

    /// Move the pattern cursor towards older hits. The first press selects the newest.
    pub fn cursor_prev(&mut self) {
        let count = self.hits().len();
        if count == 0 {
            self.pattern_cursor = None;
            return;
        }
        self.pattern_cursor = Some(match self.pattern_cursor {
            Some(i) => i.saturating_sub(1),
            None => count - 1,
        });
    }

    pub fn clear_cursor(&mut self) {
        self.pattern_cursor = None;
    }

    /// Push an error to the history, capping at [`ERROR_HISTORY_CAP`].
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    /// Set an info status message.
    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    /// Set a warning status message.
    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlewatch_core::config::AnalysisConfig;
    use candlewatch_core::{KeywordTable, Tick};
    use std::sync::mpsc;

    fn app() -> (AppState, Receiver<WorkerCommand>) {
        let (tx, rx) = mpsc::channel();
        let (_resp_tx, resp_rx) = mpsc::channel();
        let app = AppState::new(tx, resp_rx, "test", ClockZone::default(), 7);
        (app, rx)
    }

    fn snapshot(labels_oldest_first: &[&str]) -> Snapshot {
        let ticks: Vec<Tick> = labels_oldest_first
            .iter()
            .enumerate()
            .rev()
            .map(|(i, l)| Tick::new(format!("2024-05-01 10:{i:02}:00"), *l))
            .collect();
        Snapshot::build(
            ticks,
            &KeywordTable::default(),
            &AnalysisConfig::default(),
            Utc::now(),
        )
    }

    #[test]
    fn panel_cycle() {
        assert_eq!(Panel::Tape.next(), Panel::Patterns);
        assert_eq!(Panel::Help.next(), Panel::Tape);
        assert_eq!(Panel::Tape.prev(), Panel::Help);
        assert_eq!(Panel::Patterns.prev(), Panel::Tape);
    }

    #[test]
    fn panel_from_index() {
        for i in 0..3 {
            let p = Panel::from_index(i).unwrap();
            assert_eq!(p.index(), i);
        }
        assert!(Panel::from_index(3).is_none());
    }

    #[test]
    fn error_history_caps_at_50() {
        let (mut app, _rx) = app();
        for i in 0..60 {
            app.push_error(ErrorCategory::Other, format!("error {i}"), String::new());
        }
        assert_eq!(app.error_history.len(), ERROR_HISTORY_CAP);
        assert!(app.error_history[0].message.contains("59"));
    }

    #[test]
    fn connection_status_transitions() {
        let (mut app, _rx) = app();
        assert_eq!(app.connection, ConnectionStatus::Connecting);

        app.apply_fetch_started();
        assert!(app.fetching);
        app.apply_snapshot(snapshot(&["VERDE"]));
        assert_eq!(app.connection, ConnectionStatus::Online);
        assert!(!app.fetching);

        app.apply_fetch_failed(ErrorCategory::Network, "down".into());
        assert_eq!(app.connection, ConnectionStatus::Error);
        assert_eq!(app.error_history.len(), 1);
        // Previous working set stays on screen.
        assert_eq!(app.snapshot.as_ref().unwrap().candles.len(), 1);

        app.apply_snapshot(snapshot(&["VERDE", "VERMELHO"]));
        assert_eq!(app.connection, ConnectionStatus::Online);
        assert_eq!(app.snapshot.as_ref().unwrap().candles.len(), 2);
    }

    #[test]
    fn empty_table_sets_warning() {
        let (mut app, _rx) = app();
        app.apply_snapshot(snapshot(&[]));
        assert!(matches!(app.status_message, Some((_, StatusLevel::Warning))));
    }

    #[test]
    fn cursor_moves_and_highlights_anchor() {
        let (mut app, _rx) = app();
        // Hits at index 3 and 7.
        app.apply_snapshot(snapshot(&[
            "VERDE", "VERMELHO", "VERMELHO", "VERMELHO", "VERDE", "VERMELHO", "VERMELHO",
            "VERDE",
        ]));
        assert_eq!(app.hits().len(), 2);
        assert_eq!(app.highlighted_candle(), None);

        app.cursor_prev();
        assert_eq!(app.highlighted_candle(), Some(7));
        app.cursor_prev();
        app.cursor_prev();
        assert_eq!(app.highlighted_candle(), Some(3));
        app.cursor_next();
        app.cursor_next();
        assert_eq!(app.highlighted_candle(), Some(7));
        app.clear_cursor();
        assert_eq!(app.highlighted_candle(), None);
    }

    #[test]
    fn cursor_follows_hit_across_snapshots() {
        let (mut app, _rx) = app();
        let labels = ["VERDE", "VERMELHO", "VERMELHO", "VERMELHO"];
        app.apply_snapshot(snapshot(&labels));
        app.cursor_next();
        assert_eq!(app.selected_hit().unwrap().timestamp, "2024-05-01 10:03:00");

        let mut longer = labels.to_vec();
        longer.extend(["DOJI", "DOJI"]);
        app.apply_snapshot(snapshot(&longer));
        assert_eq!(app.selected_hit().unwrap().timestamp, "2024-05-01 10:03:00");

        app.apply_snapshot(snapshot(&["DOJI"]));
        assert_eq!(app.pattern_cursor, None);
    }

    #[test]
    fn refresh_sends_command() {
        let (mut app, rx) = app();
        app.request_refresh();
        assert!(matches!(rx.try_recv(), Ok(WorkerCommand::RefreshNow)));
    }

    #[test]
    fn source_errors_map_to_categories() {
        assert_eq!(
            ErrorCategory::of(&SourceError::Timeout { secs: 10 }),
            ErrorCategory::Network
        );
        assert_eq!(
            ErrorCategory::of(&SourceError::AuthenticationRejected { status: 401 }),
            ErrorCategory::Auth
        );
        assert_eq!(
            ErrorCategory::of(&SourceError::ResponseFormatChanged("x".into())),
            ErrorCategory::Data
        );
    }
}
