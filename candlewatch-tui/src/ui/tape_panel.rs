//! Panel 1 (Tape): the working set as a grid of `HH:MM` cells.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use candlewatch_core::timefmt::format_hhmm;
use candlewatch_core::{Candle, Direction};

use crate::app::AppState;
use crate::theme::{self, Theme};
use crate::ui::widgets::cell_grid::{self, GridCell};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let mut lines: Vec<Line> = Vec::new();
    let t = Theme::default();

    // Legend
    lines.push(Line::from(vec![
        Span::styled(format!(" {} ", Direction::Up.label()), t.cell(t.positive)),
        Span::raw(" "),
        Span::styled(format!(" {} ", Direction::Down.label()), t.cell(t.negative)),
        Span::raw(" "),
        Span::styled(format!(" {} ", Direction::Neutral.label()), t.cell(t.text_secondary)),
        Span::styled(
            format!("  source: {}  [r]efresh [h/l]select hit", app.source_name),
            theme::muted(),
        ),
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

    if snapshot.is_empty() {
        lines.push(Line::from(Span::styled(
            "The table returned no rows.",
            theme::muted(),
        )));
        f.render_widget(Paragraph::new(lines), area);
        return;
    }

    let cells = tape_cells(&snapshot.candles, app.highlighted_candle(), &t);
    let grid = cell_grid::grid_lines(&cells, area.width);
    let per_row = cell_grid::cells_per_row(area.width);
    let focus_row = app.highlighted_candle().map(|i| i / per_row);
    let height = (area.height as usize).saturating_sub(lines.len());
    let rows = cell_grid::visible_rows(grid.len(), height, focus_row);

    lines.extend(grid.into_iter().skip(rows.start).take(rows.len()));
    f.render_widget(Paragraph::new(lines), area);
}

/// One cell per candle, oldest first. With a highlighted candle every other
/// cell is dimmed.
pub fn tape_cells(candles: &[Candle], highlight: Option<usize>, t: &Theme) -> Vec<GridCell> {
    candles
        .iter()
        .enumerate()
        .map(|(i, candle)| {
            let style = match highlight {
                Some(h) if h == i => t
                    .cell(t.tint_color(candle.tint))
                    .add_modifier(Modifier::UNDERLINED),
                Some(_) => t.dimmed_cell(),
                None => t.cell(t.tint_color(candle.tint)),
            };
            GridCell::new(format_hhmm(&candle.timestamp), style)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use candlewatch_core::Tint;

    fn candles() -> Vec<Candle> {
        vec![
            Candle::new("2024-05-01 10:00:00", Direction::Up, Tint::Green),
            Candle::new("2024-05-01 10:01:00", Direction::Down, Tint::Red),
            Candle::new("", Direction::Neutral, Tint::Gray),
        ]
    }

    #[test]
    fn labels_and_colors() {
        let t = Theme::default();
        let cells = tape_cells(&candles(), None, &t);
        assert_eq!(cells[0].label, "10:00");
        assert_eq!(cells[0].style.bg, Some(t.positive));
        assert_eq!(cells[1].style.bg, Some(t.negative));
        assert_eq!(cells[2].label, "--:--");
    }

    #[test]
    fn highlight_dims_the_rest() {
        let t = Theme::default();
        let cells = tape_cells(&candles(), Some(1), &t);
        assert_eq!(cells[1].style.bg, Some(t.negative));
        assert_eq!(cells[0].style, t.dimmed_cell());
        assert_eq!(cells[2].style, t.dimmed_cell());
    }
}
