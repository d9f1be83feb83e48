use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Cell, Paragraph, Row, Table, TableState, Wrap};

use crate::projection::{DetailPanel, TaskRow, Tone};

use super::{View, render_view_chrome};

pub(super) struct TasksView<'a> {
    pub(super) rows: &'a [TaskRow],
    pub(super) selected: Option<usize>,
    pub(super) updated_at: &'a str,
}

impl View for TasksView<'_> {
    fn title(&self) -> String {
        format!("Tasks ({})", self.rows.len())
    }

    fn updated_at(&self) -> &str {
        self.updated_at
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        let inner = render_view_chrome(frame, &self.title(), self.updated_at(), area);

        if self.rows.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(
                    "(no tasks)",
                    Style::default().fg(Color::Gray),
                ))),
                inner,
            );
            return;
        }

        let header = Row::new(vec!["Status", "ID", "Title", "Claimed By"]).style(
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        );
        let rows = self.rows.iter().map(|r| {
            Row::new(vec![
                Cell::from(Span::styled(
                    r.status.clone(),
                    Style::default()
                        .fg(tone_color(r.tone))
                        .add_modifier(Modifier::BOLD),
                )),
                Cell::from(Span::styled(r.id.clone(), Style::default().fg(Color::Cyan))),
                Cell::from(r.title.clone()),
                Cell::from(Span::styled(
                    r.claimed_by.clone(),
                    Style::default().fg(Color::Gray),
                )),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(11),
                Constraint::Length(9),
                Constraint::Min(10),
                Constraint::Length(20),
            ],
        )
        .header(header)
        .row_highlight_style(Style::default().bg(Color::DarkGray))
        .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(self.selected);
        frame.render_stateful_widget(table, inner, &mut state);
    }
}

pub(super) struct DetailView<'a> {
    pub(super) panel: &'a DetailPanel,
}

impl View for DetailView<'_> {
    fn title(&self) -> String {
        self.panel.title.clone()
    }

    fn render(&self, frame: &mut ratatui::Frame, area: Rect) {
        let inner = render_view_chrome(frame, &self.title(), self.updated_at(), area);
        let lines = self
            .panel
            .lines
            .iter()
            .map(|l| Line::from(l.as_str()))
            .collect::<Vec<_>>();
        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
    }
}

pub(super) fn tone_color(tone: Tone) -> Color {
    match tone {
        Tone::Pending => Color::Yellow,
        Tone::Claimed => Color::Blue,
        Tone::Running => Color::Magenta,
        Tone::Done => Color::Green,
        Tone::Failed => Color::Red,
        Tone::Other => Color::White,
    }
}
