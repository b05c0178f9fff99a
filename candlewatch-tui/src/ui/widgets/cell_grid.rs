//! Wrapping grid of fixed-width `HH:MM` cells.
//!
//! Used by the Tape and Patterns panels. Cells are laid out oldest top-left,
//! left to right, wrapping at the panel width.

use std::ops::Range;

use ratatui::style::Style;
use ratatui::text::{Line, Span};

/// Width of one `HH:MM` label.
pub const CELL_WIDTH: u16 = 5;
/// Blank columns between cells.
pub const CELL_GAP: u16 = 1;

/// One rendered cell.
#[derive(Debug, Clone, PartialEq)]
pub struct GridCell {
    pub label: String,
    pub style: Style,
}

impl GridCell {
    pub fn new(label: impl Into<String>, style: Style) -> Self {
        Self {
            label: label.into(),
            style,
        }
    }
}

/// Cells that fit on one row of `width` columns (at least one).
pub fn cells_per_row(width: u16) -> usize {
    let per = (width + CELL_GAP) / (CELL_WIDTH + CELL_GAP);
    per.max(1) as usize
}

/// Lay cells out as lines for a panel `width` columns wide.
pub fn grid_lines(cells: &[GridCell], width: u16) -> Vec<Line<'static>> {
    let per_row = cells_per_row(width);
    let gap = " ".repeat(CELL_GAP as usize);

    cells
        .chunks(per_row)
        .map(|row| {
            let mut spans = Vec::with_capacity(row.len() * 2);
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    spans.push(Span::raw(gap.clone()));
                }
                spans.push(Span::styled(
                    format!("{:^width$}", cell.label, width = CELL_WIDTH as usize),
                    cell.style,
                ));
            }
            Line::from(spans)
        })
        .collect()
}

/// Rows to show when only `height` fit: the newest rows, unless that would
/// hide `focus`, in which case the window starts at `focus`.
pub fn visible_rows(total: usize, height: usize, focus: Option<usize>) -> Range<usize> {
    if total <= height {
        return 0..total;
    }
    let mut start = total - height;
    if let Some(row) = focus {
        if row < start {
            start = row;
        }
    }
    start..start + height
}
