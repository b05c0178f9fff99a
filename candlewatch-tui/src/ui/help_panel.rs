//! Panel 3 (Help): keyboard shortcuts and what the panels show.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use crate::app::AppState;
use crate::theme;

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();

    section(&mut lines, "Global Navigation");
    key(&mut lines, "1-3", "Switch to panel by number");
    key(&mut lines, "Tab / Shift+Tab", "Cycle panels forward / back");
    key(&mut lines, "r", "Refresh now (ignored while a fetch is in flight)");
    key(&mut lines, "e", "Open error history overlay");
    key(&mut lines, "q / Ctrl+C", "Quit");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 1 — Tape");
    key(&mut lines, "", "Latest candles, oldest top-left, colored by label");
    key(&mut lines, "h / l", "Select previous / next pattern hit");
    key(&mut lines, "Esc", "Clear the selection");
    lines.push(Line::from(""));

    section(&mut lines, "Panel 2 — Patterns");
    key(&mut lines, "", "Most recent four-candle hits, oldest first");
    key(&mut lines, "Continuation", "Two-candle run after a setup, signal keeps the run");
    key(&mut lines, "Reversal", "Two-candle run after a setup, signal breaks the run");
    key(
        &mut lines,
        "Exhausted",
        &format!("Newest kind repeated {}+ times in a row", app.exhaustion_threshold),
    );
    lines.push(Line::from(""));

    section(&mut lines, "Feed");
    key(&mut lines, "Source", &app.source_name);
    key(&mut lines, "Clock", &app.zone.zone_name);

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    f.render_widget(para, area);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme::accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>16}  ", keys), theme::accent()),
        Span::styled(desc.to_string(), theme::muted()),
    ]));
}
