use super::*;

pub(super) fn draw(frame: &mut ratatui::Frame, app: &App) {
    let screen = app.screen();
    let message_height = screen
        .message
        .as_ref()
        .map(|m| m.text.lines().count().clamp(1, 4) as u16)
        .unwrap_or(1)
        + 1;

    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
            Constraint::Length(message_height),
            Constraint::Length(2),
        ])
        .split(area);

    // Header
    let status_style = if screen.status.online {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    };
    let mut spans = vec![
        Span::styled("Neona", Style::default().fg(Color::Black).bg(Color::White)),
        Span::raw("  "),
        Span::styled(screen.status.text.as_str(), status_style),
    ];
    if let Some(busy) = screen.busy.as_deref() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            busy,
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::ITALIC),
        ));
    }
    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, chunks[0]);

    // Table, with the detail panel beside it when one is open.
    let main = if screen.detail.is_some() {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
            .split(chunks[1])
    } else {
        Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(100)])
            .split(chunks[1])
    };
    let tasks = TasksView {
        rows: &screen.rows,
        selected: screen.selected,
        updated_at: &app.controller.session().health().time,
    };
    tasks.render(frame, main[0]);
    if let Some(panel) = &screen.detail {
        DetailView { panel }.render(frame, main[1]);
    }

    // Help bar
    let mut help = vec![Span::styled("Commands: ", Style::default().add_modifier(Modifier::BOLD))];
    for def in COMMANDS {
        help.push(Span::styled(
            format!("{} ", def.name),
            Style::default().fg(Color::Cyan),
        ));
    }
    help.push(Span::styled(
        "| Ctrl+R refresh  Esc back  Ctrl+C quit",
        Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
    ));
    frame.render_widget(Paragraph::new(Line::from(help)), chunks[2]);

    // Last message
    let lines = match &screen.message {
        Some(m) => {
            let style = if m.is_error {
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            };
            m.text
                .lines()
                .map(|l| Line::from(Span::styled(l, style)))
                .collect::<Vec<_>>()
        }
        None => vec![Line::from("")],
    };
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::TOP)),
        chunks[3],
    );

    // Input
    let prompt = "neona>";
    let mut input_spans = vec![
        Span::styled(prompt, Style::default().fg(Color::Cyan)),
        Span::raw(" "),
        Span::raw(app.input.buf.as_str()),
    ];
    if app.input.is_empty() {
        input_spans.push(Span::styled(
            "type a command, or help",
            Style::default().fg(Color::Gray).add_modifier(Modifier::DIM),
        ));
    }
    let input = Paragraph::new(Line::from(input_spans)).block(Block::default().borders(Borders::TOP));
    frame.render_widget(input, chunks[4]);

    let x = chunks[4].x + prompt.len() as u16 + 1 + app.input.cursor as u16;
    let y = chunks[4].y + 1;
    if x < chunks[4].x + chunks[4].width {
        frame.set_cursor_position(Position::new(x, y));
    }
}
