//! Candlewatch Core: candle feed domain, classification, pattern scanning, polling.
//!
//! This crate contains everything the dashboard derives from the feed:
//! - Domain types (ticks, candles, directions, pattern hits)
//! - Keyword-table label classifier (the only place raw labels are read)
//! - Four-candle continuity scanner and the streak tracker on top of it
//! - Windowed feed statistics and time formatting
//! - Tick sources (Supabase REST, synthetic demo feed)
//! - Single-flight poller that turns a fetched batch into a [`Snapshot`]

pub mod classify;
pub mod config;
pub mod data;
pub mod domain;
pub mod poller;
pub mod scanner;
pub mod snapshot;
pub mod stats;
pub mod streak;
pub mod timefmt;

pub use classify::KeywordTable;
pub use config::{ConfigError, DashboardConfig};
pub use domain::{Candle, Direction, PatternHit, PatternKind, Tick, Tint};
pub use poller::{FlightGuard, PollOutcome, Poller};
pub use scanner::PatternScanner;
pub use snapshot::Snapshot;
pub use stats::FeedStats;
pub use streak::Streak;
