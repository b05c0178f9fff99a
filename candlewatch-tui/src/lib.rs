//! Candlewatch TUI: terminal dashboard for a live candle feed.
//!
//! Provides a three-panel view of the feed with:
//! - Header cards for the statistics window and connection state
//! - Candle tape colored by label
//! - Recent continuity patterns, streak and exhaustion warning
//! - Background polling with a single-flight guard and a fixed-zone clock

pub mod app;
pub mod input;
pub mod logging;
pub mod theme;
pub mod ui;
pub mod worker;

pub use app::AppState;
pub use theme::Theme;
pub use input::handle_key;
