//! Tick and Candle: the raw feed row and its classified form.

use serde::{Deserialize, Serialize};

/// One raw row from the feed table: a timestamp and a free-text label.
///
/// Missing or `null` columns are carried as empty strings. A `Tick` never
/// leaves the source boundary; everything downstream sees [`Candle`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tick {
    pub timestamp: String,
    pub label: String,
}

impl Tick {
    pub fn new(timestamp: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
            label: label.into(),
        }
    }
}

/// Three-way classification of a candle label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Neutral,
}

impl Direction {
    /// True for `Up` and `Down`.
    pub fn is_directional(self) -> bool {
        !matches!(self, Direction::Neutral)
    }

    pub fn label(self) -> &'static str {
        match self {
            Direction::Up => "Call",
            Direction::Down => "Put",
            Direction::Neutral => "Doji",
        }
    }
}

/// Display-only color of a tape cell.
///
/// `Blue` and `Pink` are synthetic tag values written into the feed by the
/// upstream catalogue; they classify as [`Direction::Neutral`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tint {
    Green,
    Red,
    Blue,
    Pink,
    Gray,
}

/// A classified tick. The raw label has been replaced by its direction and tint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: String,
    pub direction: Direction,
    pub tint: Tint,
}

impl Candle {
    pub fn new(timestamp: impl Into<String>, direction: Direction, tint: Tint) -> Self {
        Self {
            timestamp: timestamp.into(),
            direction,
            tint,
        }
    }

    /// Build a candle whose tint follows its direction. Handy for tests and the demo feed.
    pub fn plain(timestamp: impl Into<String>, direction: Direction) -> Self {
        let tint = match direction {
            Direction::Up => Tint::Green,
            Direction::Down => Tint::Red,
            Direction::Neutral => Tint::Gray,
        };
        Self::new(timestamp, direction, tint)
    }
}
