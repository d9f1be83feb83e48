use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders};

use crate::projection::fmt_ts_ui;

pub(super) trait View {
    fn title(&self) -> String;

    /// RFC 3339 timestamp shown beside the title; empty hides it.
    fn updated_at(&self) -> &str {
        ""
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect);
}

pub(super) fn render_view_chrome(
    frame: &mut ratatui::Frame,
    title: &str,
    updated_at: &str,
    area: Rect,
) -> Rect {
    let mut spans = vec![Span::styled(
        title.to_string(),
        Style::default().fg(Color::Yellow),
    )];
    if !updated_at.is_empty() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            fmt_ts_ui(updated_at),
            Style::default().fg(Color::Gray),
        ));
    }

    let outer = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(spans));
    let inner = outer.inner(area);
    frame.render_widget(outer, area);
    inner
}
