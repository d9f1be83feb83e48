use std::io::{self, IsTerminal};
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::error::RemoteError;
use crate::projection::{self, Screen};
use crate::remote::{DaemonClient, TaskApi};
use crate::session::{COMMANDS, Call, Command, Controller, Reply, Session, local_holder_id};
use crate::tui::TuiRunOptions;

use super::View;
use super::input::Input;
use super::views::{DetailView, TasksView};

mod event_loop;
mod render;
mod worker;

use self::worker::Worker;

pub(super) fn run(opts: TuiRunOptions) -> Result<()> {
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("TUI requires an interactive terminal (TTY)");
    }

    let client = DaemonClient::new(&opts.client)?;
    let holder_id = local_holder_id();
    tracing::info!(base_url = client.base_url(), holder_id, "starting session");

    let controller =
        Controller::new(Session::new(holder_id)).with_lease_ttl(opts.client.lease_ttl_sec);
    let worker = worker::spawn(client)?;
    let mut app = App::new(controller, worker);

    enable_raw_mode().context("enable raw mode")?;
    let mut terminal = setup_or_restore(
        || {
            let mut stdout = io::stdout();
            execute!(stdout, EnterAlternateScreen).context("enter alternate screen")?;
            Terminal::new(CrosstermBackend::new(stdout)).context("create terminal")
        },
        || {
            disable_raw_mode().ok();
            execute!(io::stdout(), LeaveAlternateScreen).ok();
        },
    )?;
    terminal.clear().ok();

    app.run_command(Command::Refresh);
    let res = event_loop::run_loop(&mut terminal, &mut app);

    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    terminal.show_cursor().ok();

    tracing::info!("session closed");
    res
}

/// Runs the terminal setup steps that follow raw mode; any failure undoes what was
/// already switched on before the error is returned.
fn setup_or_restore<T>(setup: impl FnOnce() -> Result<T>, restore: impl FnOnce()) -> Result<T> {
    setup().inspect_err(|_| restore())
}

pub(super) struct App {
    controller: Controller,
    input: Input,
    worker: Worker,
    quit: bool,
}

impl App {
    fn new(controller: Controller, worker: Worker) -> Self {
        Self {
            controller,
            input: Input::default(),
            worker,
            quit: false,
        }
    }

    fn screen(&self) -> Screen {
        projection::project(self.controller.session(), self.controller.in_flight())
    }

    fn run_command(&mut self, cmd: Command) {
        let call = self.controller.begin(cmd);
        self.dispatch(call);
    }

    fn submit_input(&mut self) {
        let line = self.input.take_line();
        let call = self.controller.submit(&line);
        self.dispatch(call);
    }

    /// Hands `call` to the control thread. If the thread is gone the call is failed
    /// locally so the controller does not stay busy.
    fn dispatch(&mut self, mut call: Option<Call>) {
        while let Some(c) = call.take() {
            let Err(c) = self.worker.send(c) else {
                return;
            };
            call = self.controller.complete(Err(control_thread_gone(&c)));
        }
    }

    /// Applies every reply the control thread has produced since the last tick.
    fn drain_replies(&mut self) {
        loop {
            match self.worker.try_recv() {
                Ok(Some(result)) => {
                    let next = self.controller.complete(result);
                    self.dispatch(next);
                }
                Ok(None) => return,
                Err(()) => {
                    if let Some(c) = self.controller.in_flight().cloned() {
                        let next = self.controller.complete(Err(control_thread_gone(&c)));
                        self.dispatch(next);
                    }
                    return;
                }
            }
        }
    }
}

fn control_thread_gone(call: &Call) -> RemoteError {
    tracing::error!(call = ?call, "control thread is not running");
    RemoteError::Transport {
        operation: "dispatch".to_string(),
        cause: "control thread stopped".to_string(),
    }
}

#[cfg(test)]
#[path = "../tests/tui_shell/app_tests.rs"]
mod tests;
