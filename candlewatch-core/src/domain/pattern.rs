//! Pattern hits produced by the window scanner.

use serde::{Deserialize, Serialize};

/// Whether the two-candle run carried on through the signal candle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PatternKind {
    Continuation,
    Reversal,
}

impl PatternKind {
    pub fn label(self) -> &'static str {
        match self {
            PatternKind::Continuation => "Continuation",
            PatternKind::Reversal => "Reversal",
        }
    }

    pub fn short(self) -> &'static str {
        match self {
            PatternKind::Continuation => "C",
            PatternKind::Reversal => "R",
        }
    }
}

/// A detected window, keyed by the signal candle.
///
/// `index` is the signal's position in the chronological working set. It only
/// disambiguates candles that share a timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternHit {
    pub timestamp: String,
    pub kind: PatternKind,
    pub index: usize,
}
