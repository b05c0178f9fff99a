//! Parrot/neon theme tokens for the Candlewatch TUI
//!
//! Provides a consistent color palette inspired by:
//! - Parrot color scheme (neon accents on dark background)
//! - Terminal aesthetic with high contrast
//!
//! # Color Palette
//! - **Accent**: Electric cyan (primary highlights, focus)
//! - **Positive**: Neon green (Call candles, online, continuation)
//! - **Negative**: Hot pink (Put candles, errors)
//! - **Warning**: Neon orange (alerts, reversal, exhaustion)
//! - **Neutral**: Cool purple (secondary info)
//! - **Muted**: Steel blue (disabled, secondary text)
//!
//! Free functions return ready-made [`Style`]s from the default theme for
//! the widgets that only need one token.

use ratatui::style::{Color, Modifier, Style};

use candlewatch_core::{PatternKind, Tint};

use crate::app::ConnectionStatus;

/// Parrot/neon theme for the Candlewatch TUI
#[derive(Debug, Clone, Copy)]
pub struct Theme {
    /// Near-black background (primary surface)
    pub background: Color,
    /// Electric cyan accent (focus, highlights)
    pub accent: Color,
    /// Neon green (Call candles, online)
    pub positive: Color,
    /// Hot pink (Put candles, errors)
    pub negative: Color,
    /// Neon orange (warnings, alerts)
    pub warning: Color,
    /// Cool purple (neutral info, secondary)
    pub neutral: Color,
    /// Steel blue (muted text, disabled)
    pub muted: Color,
    /// White (primary text)
    pub text_primary: Color,
    /// Light gray (secondary text, Doji candles)
    pub text_secondary: Color,
    /// Tag colors for the two flagged neutral labels
    pub tag_blue: Color,
    pub tag_pink: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::parrot_neon()
    }
}

impl Theme {
    /// Create the default Parrot/neon theme
    pub fn parrot_neon() -> Self {
        Self {
            // Background: deep charcoal (almost black)
            background: Color::Rgb(18, 18, 20),

            // Accent: electric cyan
            accent: Color::Rgb(0, 255, 255),

            // Positive: neon green
            positive: Color::Rgb(0, 255, 128),

            // Negative: hot pink
            negative: Color::Rgb(255, 20, 147),

            // Warning: neon orange
            warning: Color::Rgb(255, 140, 0),

            // Neutral: cool purple
            neutral: Color::Rgb(147, 112, 219),

            // Muted: steel blue
            muted: Color::Rgb(100, 149, 237),

            // Text colors
            text_primary: Color::White,
            text_secondary: Color::Rgb(170, 170, 170),

            // Tags
            tag_blue: Color::Rgb(30, 144, 255),
            tag_pink: Color::Rgb(255, 105, 180),
        }
    }

    /// Cell background for a candle tint
    pub fn tint_color(&self, tint: Tint) -> Color {
        match tint {
            Tint::Green => self.positive,
            Tint::Red => self.negative,
            Tint::Blue => self.tag_blue,
            Tint::Pink => self.tag_pink,
            Tint::Gray => self.text_secondary,
        }
    }

    /// Cell background for a pattern hit
    pub fn pattern_color(&self, kind: PatternKind) -> Color {
        match kind {
            PatternKind::Continuation => self.positive,
            PatternKind::Reversal => self.warning,
        }
    }

    /// Get color for win rate fraction (None when nothing is directional)
    pub fn win_rate_color(&self, win_rate: Option<f64>) -> Color {
        match win_rate {
            Some(w) if w >= 0.6 => self.positive,
            Some(w) if w >= 0.5 => self.accent,
            Some(w) if w >= 0.4 => self.neutral,
            Some(_) => self.warning,
            None => self.muted,
        }
    }

    pub fn connection_color(&self, status: ConnectionStatus) -> Color {
        match status {
            ConnectionStatus::Online => self.positive,
            ConnectionStatus::Error => self.negative,
            ConnectionStatus::Connecting => self.warning,
        }
    }

    /// Style for a grid cell: tinted background with dark text.
    pub fn cell(&self, background: Color) -> Style {
        Style::default()
            .bg(background)
            .fg(self.background)
            .add_modifier(Modifier::BOLD)
    }

    /// Style for a cell pushed into the background while another is highlighted.
    pub fn dimmed_cell(&self) -> Style {
        Style::default().bg(self.background).fg(self.muted)
    }
}

// ── Style shortcuts ──────────────────────────────────────────────────

pub fn accent() -> Style {
    Style::default().fg(Theme::default().accent)
}

pub fn accent_bold() -> Style {
    accent().add_modifier(Modifier::BOLD)
}

pub fn positive() -> Style {
    Style::default().fg(Theme::default().positive)
}

pub fn negative() -> Style {
    Style::default().fg(Theme::default().negative)
}

pub fn warning() -> Style {
    Style::default().fg(Theme::default().warning)
}

pub fn neutral() -> Style {
    Style::default().fg(Theme::default().neutral)
}

pub fn muted() -> Style {
    Style::default().fg(Theme::default().muted)
}

pub fn text() -> Style {
    Style::default().fg(Theme::default().text_primary)
}

pub fn panel_border(active: bool) -> Style {
    if active {
        accent()
    } else {
        muted()
    }
}

pub fn panel_title(active: bool) -> Style {
    if active {
        accent_bold()
    } else {
        muted()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_creation() {
        let theme = Theme::default();
        assert_eq!(theme.background, Color::Rgb(18, 18, 20));
        assert_eq!(theme.accent, Color::Rgb(0, 255, 255));
    }

    #[test]
    fn test_tint_color() {
        let theme = Theme::default();
        assert_eq!(theme.tint_color(Tint::Green), theme.positive);
        assert_eq!(theme.tint_color(Tint::Red), theme.negative);
        assert_eq!(theme.tint_color(Tint::Gray), theme.text_secondary);
        assert_ne!(theme.tint_color(Tint::Blue), theme.tint_color(Tint::Pink));
    }

    #[test]
    fn test_pattern_color() {
        let theme = Theme::default();
        assert_eq!(theme.pattern_color(PatternKind::Continuation), theme.positive);
        assert_eq!(theme.pattern_color(PatternKind::Reversal), theme.warning);
    }

    #[test]
    fn test_win_rate_color() {
        let theme = Theme::default();
        assert_eq!(theme.win_rate_color(Some(0.75)), theme.positive);
        assert_eq!(theme.win_rate_color(Some(0.55)), theme.accent);
        assert_eq!(theme.win_rate_color(Some(0.45)), theme.neutral);
        assert_eq!(theme.win_rate_color(Some(0.30)), theme.warning);
        assert_eq!(theme.win_rate_color(None), theme.muted);
    }

    #[test]
    fn test_connection_color() {
        let theme = Theme::default();
        assert_eq!(theme.connection_color(ConnectionStatus::Online), theme.positive);
        assert_eq!(theme.connection_color(ConnectionStatus::Error), theme.negative);
        assert_eq!(theme.connection_color(ConnectionStatus::Connecting), theme.warning);
    }

    #[test]
    fn test_panel_styles() {
        assert_eq!(panel_border(true), accent());
        assert_eq!(panel_border(false), muted());
        assert!(panel_title(true).add_modifier.contains(Modifier::BOLD));
    }
}
