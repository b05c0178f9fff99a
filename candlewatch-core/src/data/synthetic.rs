//! Synthetic tick source for demo mode and offline runs.
//!
//! Produces one-minute candles from a seeded RNG. Every fetch appends one new
//! candle so the dashboard visibly moves without a network.

use std::sync::Mutex;

use chrono::{Duration, NaiveDateTime};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::provider::{SourceError, TickSource};
use crate::domain::Tick;

/// Labels the synthetic feed writes, mirroring the live table's vocabulary.
const LABELS: [&str; 5] = ["VERDE", "VERMELHO", "DOJI", "AZUL", "ROSA"];

/// Candles retained between fetches, unless a caller asks for more.
pub const HISTORY_CAP: usize = 1000;

struct FeedState {
    rng: StdRng,
    next_time: NaiveDateTime,
    history: Vec<Tick>,
}

impl FeedState {
    fn push_next(&mut self) {
        let roll: u32 = self.rng.gen_range(0..100);
        // Roughly 46% up, 46% down, 6% doji, 2% tag colors.
        let label = match roll {
            0..=45 => LABELS[0],
            46..=91 => LABELS[1],
            92..=97 => LABELS[2],
            98 => LABELS[3],
            _ => LABELS[4],
        };
        let timestamp = self.next_time.format("%Y-%m-%d %H:%M:%S").to_string();
        self.history.push(Tick::new(timestamp, label));
        self.next_time += Duration::minutes(1);
    }
}

/// Deterministic random candle feed.
pub struct SyntheticSource {
    state: Mutex<FeedState>,
}

impl SyntheticSource {
    /// Seeded feed starting at `start`, pre-filled with `history` candles.
    pub fn new(seed: u64, start: NaiveDateTime, history: usize) -> Self {
        let mut state = FeedState {
            rng: StdRng::seed_from_u64(seed),
            next_time: start,
            history: Vec::with_capacity(history + 64),
        };
        for _ in 0..history {
            state.push_next();
        }
        Self {
            state: Mutex::new(state),
        }
    }

    /// Demo feed ending roughly now, with a few hundred candles of history.
    pub fn demo(seed: u64) -> Self {
        let history = 400;
        let start = chrono::Local::now().naive_local() - Duration::minutes(history as i64);
        Self::new(seed, start, history)
    }

    /// Number of candles generated so far.
    pub fn len(&self) -> usize {
        self.state.lock().map(|s| s.history.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TickSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_latest(&self, limit: usize) -> Result<Vec<Tick>, SourceError> {
        let mut state = self
            .state
            .lock()
            .map_err(|_| SourceError::Other("synthetic feed state poisoned".into()))?;
        state.push_next();
        let keep = HISTORY_CAP.max(limit);
        if state.history.len() > keep {
            let excess = state.history.len() - keep;
            state.history.drain(..excess);
        }
        Ok(state.history.iter().rev().take(limit).cloned().collect())
    }
}
