//! Label classification: keyword table mapping free-text labels to a direction.
//!
//! This is the boundary where raw labels enter the system. Matching is a
//! case-insensitive substring test: Up keywords are checked first, then Down,
//! and anything else is Neutral.

use serde::{Deserialize, Serialize};

use crate::domain::{Candle, Direction, Tick, Tint};

/// Keyword sets used to classify labels.
///
/// Keywords are stored uppercase. `blue` and `pink` only affect the display
/// tint of Neutral candles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTable {
    pub up: Vec<String>,
    pub down: Vec<String>,
    pub blue: Vec<String>,
    pub pink: Vec<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        Self {
            up: to_owned(&["VERD", "GREEN", "CALL", "WIN", "BUY", "ALTA"]),
            down: to_owned(&["VERMELH", "RED", "PUT", "LOSS", "SELL", "BAIXA"]),
            blue: to_owned(&["AZUL", "BLUE"]),
            pink: to_owned(&["ROSA", "PINK"]),
        }
    }
}

fn to_owned(words: &[&str]) -> Vec<String> {
    words.iter().map(|w| w.to_string()).collect()
}

impl KeywordTable {
    /// Build a table from custom up/down sets, keeping the default tint tags.
    pub fn new(up: &[&str], down: &[&str]) -> Self {
        Self {
            up: to_owned(up),
            down: to_owned(down),
            ..Self::default()
        }
        .normalized()
    }

    /// Uppercase and trim every keyword, dropping blanks.
    pub fn normalized(self) -> Self {
        fn norm(words: Vec<String>) -> Vec<String> {
            words
                .into_iter()
                .map(|w| w.trim().to_uppercase())
                .filter(|w| !w.is_empty())
                .collect()
        }
        Self {
            up: norm(self.up),
            down: norm(self.down),
            blue: norm(self.blue),
            pink: norm(self.pink),
        }
    }

    /// `(up, down)` pairs where the up keyword occurs inside the down keyword.
    ///
    /// Up is matched first, so any label carrying such a down keyword would
    /// classify as Up.
    pub fn overlap(&self) -> Vec<(&str, &str)> {
        self.up
            .iter()
            .flat_map(|u| {
                self.down
                    .iter()
                    .filter(move |d| d.contains(u.as_str()))
                    .map(move |d| (u.as_str(), d.as_str()))
            })
            .collect()
    }

    /// Classify a label. Empty or unrecognised labels are Neutral.
    pub fn classify(&self, label: &str) -> Direction {
        let normalized = label.trim().to_uppercase();
        if normalized.is_empty() {
            return Direction::Neutral;
        }
        if contains_any(&normalized, &self.up) {
            Direction::Up
        } else if contains_any(&normalized, &self.down) {
            Direction::Down
        } else {
            Direction::Neutral
        }
    }

    /// Display tint for a label.
    pub fn tint(&self, label: &str) -> Tint {
        let normalized = label.trim().to_uppercase();
        if contains_any(&normalized, &self.blue) {
            return Tint::Blue;
        }
        if contains_any(&normalized, &self.pink) {
            return Tint::Pink;
        }
        match self.classify(&normalized) {
            Direction::Up => Tint::Green,
            Direction::Down => Tint::Red,
            Direction::Neutral => Tint::Gray,
        }
    }

    /// Convert a raw tick into a candle. The label does not survive this call.
    pub fn candle(&self, tick: &Tick) -> Candle {
        Candle::new(
            tick.timestamp.clone(),
            self.classify(&tick.label),
            self.tint(&tick.label),
        )
    }
}

fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles.iter().any(|n| haystack.contains(n.as_str()))
}
