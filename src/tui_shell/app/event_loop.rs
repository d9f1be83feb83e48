use super::*;

pub(super) fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        app.drain_replies();

        terminal
            .draw(|f| super::render::draw(f, app))
            .context("draw")?;
        if app.quit {
            return Ok(());
        }

        if event::poll(Duration::from_millis(50)).context("poll")? {
            match event::read().context("read event")? {
                Event::Key(k) if k.kind == KeyEventKind::Press => handle_key(app, k),
                _ => {}
            }
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('q') => app.quit = true,
            KeyCode::Char('r') => app.run_command(Command::Refresh),
            KeyCode::Char('u') => app.input.clear(),
            KeyCode::Char('p') => app.input.history_up(),
            KeyCode::Char('n') => app.input.history_down(),
            KeyCode::Char('a') => app.input.move_home(),
            KeyCode::Char('e') => app.input.move_end(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::F(5) => app.run_command(Command::Refresh),

        KeyCode::Esc => {
            if !app.input.is_empty() {
                app.input.clear();
            } else if !app.controller.session_mut().close_detail() {
                app.quit = true;
            }
        }

        KeyCode::Enter => {
            if !app.input.is_empty() {
                app.submit_input();
            }
        }

        KeyCode::Up => {
            if app.input.is_empty() && app.input.history_pos.is_none() {
                app.controller.session_mut().select_prev();
            } else {
                app.input.history_up();
            }
        }
        KeyCode::Down => {
            if app.input.is_empty() && app.input.history_pos.is_none() {
                app.controller.session_mut().select_next();
            } else {
                app.input.history_down();
            }
        }

        KeyCode::Left => app.input.move_left(),
        KeyCode::Right => app.input.move_right(),
        KeyCode::Home => app.input.move_home(),
        KeyCode::End => app.input.move_end(),
        KeyCode::Backspace => app.input.backspace(),
        KeyCode::Delete => app.input.delete(),
        KeyCode::Char(c) => app.input.insert_char(c),
        _ => {}
    }
}
