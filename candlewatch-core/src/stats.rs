//! Feed statistics over the most recent window of candles.

use serde::{Deserialize, Serialize};

use crate::domain::{Candle, Direction};

/// Default number of most recent candles the statistics cover.
pub const DEFAULT_STATS_WINDOW: usize = 120;

/// Counts per direction and the up share of directional candles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedStats {
    pub total: usize,
    pub up: usize,
    pub down: usize,
    pub neutral: usize,
}

impl FeedStats {
    /// Compute over the newest `window` candles of a chronological slice.
    pub fn compute(candles: &[Candle], window: usize) -> Self {
        let start = candles.len().saturating_sub(window);
        let mut stats = Self::default();
        for candle in &candles[start..] {
            stats.total += 1;
            match candle.direction {
                Direction::Up => stats.up += 1,
                Direction::Down => stats.down += 1,
                Direction::Neutral => stats.neutral += 1,
            }
        }
        stats
    }

    /// `up / (up + down)` as a fraction, `None` when there are no directional candles.
    pub fn win_rate(&self) -> Option<f64> {
        let decided = self.up + self.down;
        if decided == 0 {
            None
        } else {
            Some(self.up as f64 / decided as f64)
        }
    }

    /// Win rate formatted for display: `"57.1%"`, or `"0%"` with nothing to divide.
    pub fn win_rate_percent(&self) -> String {
        match self.win_rate() {
            Some(rate) => format!("{:.1}%", rate * 100.0),
            None => "0%".to_string(),
        }
    }
}
