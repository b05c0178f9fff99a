//! Snapshot: one fully derived view of a fetched batch.
//!
//! A snapshot is built in one pass from a newest-first batch: reverse into
//! chronological order, classify, scan, track the streak, count. The UI
//! replaces its previous snapshot wholesale; nothing is merged.

use chrono::{DateTime, Utc};

use crate::classify::KeywordTable;
use crate::config::AnalysisConfig;
use crate::domain::{Candle, PatternHit, Tick};
use crate::scanner::PatternScanner;
use crate::stats::FeedStats;
use crate::streak::Streak;

#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Working set, oldest first.
    pub candles: Vec<Candle>,
    /// Pattern hits, oldest first.
    pub hits: Vec<PatternHit>,
    pub streak: Streak,
    pub stats: FeedStats,
    pub fetched_at: DateTime<Utc>,
}

impl Snapshot {
    pub fn build(
        newest_first: Vec<Tick>,
        keywords: &KeywordTable,
        analysis: &AnalysisConfig,
        fetched_at: DateTime<Utc>,
    ) -> Self {
        let candles: Vec<Candle> = newest_first
            .iter()
            .rev()
            .map(|tick| keywords.candle(tick))
            .collect();

        let hits = PatternScanner::new(analysis.pattern_cap).scan(&candles);
        let streak = Streak::from_hits(&hits);
        let stats = FeedStats::compute(&candles, analysis.stats_window);

        Self {
            candles,
            hits,
            streak,
            stats,
            fetched_at,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}
