//! Time formatting: `HH:MM` cell labels and the fixed-zone wall clock.

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Placeholder shown for timestamps that cannot be read.
pub const PLACEHOLDER: &str = "--:--";

/// `HH:MM` label for a feed timestamp such as `2024-05-01 10:15:00` or
/// `2024-05-01T10:15:00+00:00`. Anything unreadable becomes [`PLACEHOLDER`].
pub fn format_hhmm(timestamp: &str) -> String {
    let trimmed = timestamp.trim();
    if trimmed.is_empty() {
        return PLACEHOLDER.to_string();
    }

    let time_part = trimmed
        .split_once(' ')
        .or_else(|| trimmed.split_once('T'))
        .map(|(_, rest)| rest)
        .unwrap_or(trimmed);

    let mut parts = time_part.split(':');
    let (Some(hours), Some(minutes)) = (parts.next(), parts.next()) else {
        return PLACEHOLDER.to_string();
    };

    let hh = last_chars(hours, 2);
    let mm: String = minutes.chars().take(2).collect();
    format!("{hh:0>2}:{mm:0>2}")
}

fn last_chars(s: &str, n: usize) -> String {
    let count = s.chars().count();
    s.chars().skip(count.saturating_sub(n)).collect()
}

/// A named zone with a fixed UTC offset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClockZone {
    pub zone_name: String,
    pub utc_offset_minutes: i32,
}

impl Default for ClockZone {
    fn default() -> Self {
        Self {
            zone_name: "America/Sao_Paulo".to_string(),
            utc_offset_minutes: -180,
        }
    }
}

impl ClockZone {
    /// The offset, or `None` if it falls outside ±24h.
    pub fn offset(&self) -> Option<FixedOffset> {
        FixedOffset::east_opt(self.utc_offset_minutes.checked_mul(60)?)
    }

    /// `HH:MM:SS` in this zone (UTC if the offset is out of range).
    pub fn time_of_day(&self, at: DateTime<Utc>) -> String {
        match self.offset() {
            Some(offset) => at.with_timezone(&offset).format("%H:%M:%S").to_string(),
            None => at.format("%H:%M:%S").to_string(),
        }
    }

    /// `HH:MM:SS <zone>` for the given instant.
    pub fn readout(&self, now: DateTime<Utc>) -> String {
        let zone = if self.offset().is_some() {
            self.zone_name.as_str()
        } else {
            "UTC"
        };
        format!("{} {zone}", self.time_of_day(now))
    }
}
