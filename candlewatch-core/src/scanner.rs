//! Four-candle continuity scanner.
//!
//! A window is `[base, mid1, mid2, signal]`, oldest to newest. It qualifies when
//! none of the four is Neutral, `mid1` and `mid2` agree (a two-candle run) and
//! `base` points the other way (the setup). The hit is a Continuation when the
//! signal keeps the run's direction and a Reversal otherwise.
//!
//! The scan walks from the newest candle backwards so the cap keeps the most
//! recent hits, then returns them oldest-first. Windows overlap freely.

use crate::domain::{Candle, PatternHit, PatternKind};

/// Candles inspected per window.
pub const WINDOW: usize = 4;

/// Default maximum number of hits returned per scan.
pub const DEFAULT_CAP: usize = 10;

/// Sliding-window pattern scanner with a hit cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PatternScanner {
    cap: usize,
}

impl Default for PatternScanner {
    fn default() -> Self {
        Self { cap: DEFAULT_CAP }
    }
}

impl PatternScanner {
    pub fn new(cap: usize) -> Self {
        Self { cap }
    }

    /// Test the window whose signal candle sits at `index`.
    ///
    /// `candles` must be chronological (index `i` older than `i + 1`).
    pub fn detect_at(&self, candles: &[Candle], index: usize) -> Option<PatternHit> {
        if index < WINDOW - 1 {
            return None;
        }
        let signal = candles.get(index)?;
        let mid2 = candles.get(index - 1)?;
        let mid1 = candles.get(index - 2)?;
        let base = candles.get(index - 3)?;

        // Order matters: neutral rejection, run match, setup, then the signal test.
        if ![base, mid1, mid2, signal]
            .iter()
            .all(|c| c.direction.is_directional())
        {
            return None;
        }
        if mid1.direction != mid2.direction {
            return None;
        }
        if base.direction == mid1.direction {
            return None;
        }

        let kind = if signal.direction == mid1.direction {
            PatternKind::Continuation
        } else {
            PatternKind::Reversal
        };

        Some(PatternHit {
            timestamp: signal.timestamp.clone(),
            kind,
            index,
        })
    }

    /// Scan the whole sequence. Returns at most `cap` hits, oldest-first.
    pub fn scan(&self, candles: &[Candle]) -> Vec<PatternHit> {
        let mut hits = Vec::new();
        if self.cap == 0 || candles.len() < WINDOW {
            return hits;
        }

        for index in (WINDOW - 1..candles.len()).rev() {
            if let Some(hit) = self.detect_at(candles, index) {
                hits.push(hit);
                if hits.len() >= self.cap {
                    break;
                }
            }
        }

        hits.reverse();
        hits
    }
}
