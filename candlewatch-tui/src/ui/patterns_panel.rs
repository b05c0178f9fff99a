//! Panel 2 (Patterns): recent continuity hits, streak and exhaustion warning.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use candlewatch_core::timefmt::format_hhmm;
use candlewatch_core::{PatternHit, Streak};

use crate::app::AppState;
use crate::theme::{self, Theme};
use crate::ui::widgets::cell_grid::{self, GridCell};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();
    let t = Theme::default();

    // Legend
    lines.push(Line::from(vec![
        Span::styled(" Continuation ", t.cell(t.positive)),
        Span::raw(" "),
        Span::styled(" Reversal ", t.cell(t.warning)),
        Span::styled("  [h/l]select [Esc]clear", theme::muted()),
    ]));
    lines.push(Line::from(""));

    let Some(snapshot) = &app.snapshot else {
        lines.push(Line::from(Span::styled(
            "Syncing with the feed...",
            theme::warning(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    };

    lines.push(streak_line(&snapshot.streak, app.exhaustion_threshold));
    if !snapshot.hits.is_empty() {
        lines.push(Line::from(vec![
            Span::styled("Sequence: ", theme::muted()),
            Span::styled(kind_sequence(&snapshot.hits), theme::text()),
        ]));
    }

    if let Some(hit) = app.selected_hit() {
        lines.push(Line::from(vec![
            Span::styled("Selected: ", theme::muted()),
            Span::styled(
                format!("{} at {}", hit.kind.label(), format_hhmm(&hit.timestamp)),
                theme::accent_bold(),
            ),
            Span::styled(format!("  (candle #{})", hit.index + 1), theme::muted()),
        ]));
    }
    lines.push(Line::from(""));

    if snapshot.hits.is_empty() {
        lines.push(Line::from(Span::styled(
            "No patterns in the current window.",
            theme::muted(),
        )));
    } else {
        let cells = hit_cells(&snapshot.hits, app.pattern_cursor, &t);
        let grid = cell_grid::grid_lines(&cells, area.width);
        let per_row = cell_grid::cells_per_row(area.width);
        let focus_row = app.pattern_cursor.map(|i| i / per_row);
        let height = (area.height as usize).saturating_sub(lines.len());
        let rows = cell_grid::visible_rows(grid.len(), height, focus_row);
        lines.extend(grid.into_iter().skip(rows.start).take(rows.len()));
    }

    f.render_widget(Paragraph::new(lines), area);
}

/// Current streak with the exhaustion warning once it reaches `threshold`.
pub fn streak_line(streak: &Streak, threshold: usize) -> Line<'static> {
    let Some(kind) = streak.kind else {
        return Line::from(Span::styled("Streak: none", theme::muted()));
    };

    let t = Theme::default();
    let mut spans = vec![
        Span::styled("Streak: ", theme::muted()),
        Span::styled(
            format!("{} x{}", kind.label(), streak.len()),
            Style::default()
                .fg(t.pattern_color(kind))
                .add_modifier(Modifier::BOLD),
        ),
    ];
    if streak.is_exhausted(threshold) {
        spans.push(Span::styled(
            format!("  ⚠ exhausted ({}+ in a row)", threshold),
            theme::warning().add_modifier(Modifier::BOLD),
        ));
    }
    Line::from(spans)
}

/// One cell per hit, oldest first. The selected hit is underlined.
pub fn hit_cells(hits: &[PatternHit], cursor: Option<usize>, t: &Theme) -> Vec<GridCell> {
    hits.iter()
        .enumerate()
        .map(|(i, hit)| {
            let mut style = t.cell(t.pattern_color(hit.kind));
            if cursor == Some(i) {
                style = style.add_modifier(Modifier::UNDERLINED | Modifier::REVERSED);
            }
            GridCell::new(format_hhmm(&hit.timestamp), style)
        })
        .collect()
}

/// Short `C`/`R` sequence, oldest first.
pub fn kind_sequence(hits: &[PatternHit]) -> String {
    hits.iter().map(|h| h.kind.short()).collect()
}
