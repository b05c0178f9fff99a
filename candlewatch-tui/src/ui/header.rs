//! Header cards: window statistics, last update, connection status.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use candlewatch_core::{Direction as Side, FeedStats};

use crate::app::AppState;
use crate::theme::{self, Theme};

/// Rows taken by the header (one content line inside a border).
pub const HEIGHT: u16 = 3;

struct Card {
    title: &'static str,
    value: String,
    style: Style,
}

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let cards = cards(app);
    let constraints: Vec<Constraint> = cards
        .iter()
        .map(|_| Constraint::Ratio(1, cards.len() as u32))
        .collect();
    let slots = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(constraints)
        .split(area);

    for (card, slot) in cards.into_iter().zip(slots.iter()) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(theme::muted())
            .title(Span::styled(format!(" {} ", card.title), theme::muted()));
        let para = Paragraph::new(Line::from(Span::styled(card.value, card.style)))
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(para, *slot);
    }
}

fn cards(app: &AppState) -> Vec<Card> {
    let t = Theme::default();
    let empty = FeedStats::default();
    let stats = app.snapshot.as_ref().map(|s| &s.stats).unwrap_or(&empty);
    let bold = |c| Style::default().fg(c).add_modifier(Modifier::BOLD);

    let status = if app.fetching {
        format!("{} ⟳", app.connection.label())
    } else {
        app.connection.label().to_string()
    };

    vec![
        Card {
            title: "Sample",
            value: stats.total.to_string(),
            style: bold(t.text_primary),
        },
        Card {
            title: "Win rate",
            value: stats.win_rate_percent(),
            style: bold(t.win_rate_color(stats.win_rate())),
        },
        Card {
            title: Side::Up.label(),
            value: stats.up.to_string(),
            style: bold(t.positive),
        },
        Card {
            title: Side::Down.label(),
            value: stats.down.to_string(),
            style: bold(t.negative),
        },
        Card {
            title: Side::Neutral.label(),
            value: stats.neutral.to_string(),
            style: bold(t.text_secondary),
        },
        Card {
            title: "Updated",
            value: app.last_update_label().unwrap_or_else(|| "--:--:--".to_string()),
            style: bold(t.accent),
        },
        Card {
            title: "Status",
            value: status,
            style: bold(t.connection_color(app.connection)),
        },
    ]
}
