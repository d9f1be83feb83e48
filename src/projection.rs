//! Pure mapping from session state to the text the terminal shows.
//!
//! Nothing here touches the network or mutates the session; every function returns the
//! same output for the same input, so the renderer can be a thin layer of styling over a
//! [`Screen`].

use crate::remote::{HealthStatus, MemoryItem, Run, Task, TaskDetail, TaskStatus, WorkersStats};
use crate::session::{COMMANDS, Call, Detail, KEY_BINDINGS, Message, Session};

mod time_utils;

pub use self::time_utils::fmt_ts_ui;

/// Colour class of a task status; the renderer picks the actual colour.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tone {
    Pending,
    Claimed,
    Running,
    Done,
    Failed,
    Other,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TaskRow {
    pub status: String,
    pub tone: Tone,
    pub id: String,
    pub title: String,
    pub claimed_by: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StatusSummary {
    pub text: String,
    pub online: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MessageLine {
    pub text: String,
    pub is_error: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DetailPanel {
    pub title: String,
    pub lines: Vec<String>,
}

/// Everything one frame displays.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Screen {
    pub status: StatusSummary,
    pub rows: Vec<TaskRow>,
    pub selected: Option<usize>,
    pub message: Option<MessageLine>,
    pub detail: Option<DetailPanel>,
    /// Set while a call is outstanding.
    pub busy: Option<String>,
}

pub fn project(session: &Session, in_flight: Option<&Call>) -> Screen {
    Screen {
        status: status_summary(session.health(), session.tasks().len(), session.holder_id()),
        rows: task_rows(session.tasks()),
        selected: session.selected_index(),
        message: session.message().map(message_line),
        detail: session.detail().map(detail_panel),
        busy: in_flight.map(busy_label),
    }
}

pub fn status_label(status: &TaskStatus) -> String {
    match status {
        TaskStatus::Pending => "○ PENDING".to_string(),
        TaskStatus::Claimed => "◐ CLAIMED".to_string(),
        TaskStatus::Running => "◑ RUNNING".to_string(),
        TaskStatus::Completed => "● DONE".to_string(),
        TaskStatus::Failed => "✗ FAILED".to_string(),
        TaskStatus::Other(raw) => raw.to_uppercase(),
    }
}

pub fn status_tone(status: &TaskStatus) -> Tone {
    match status {
        TaskStatus::Pending => Tone::Pending,
        TaskStatus::Claimed => Tone::Claimed,
        TaskStatus::Running => Tone::Running,
        TaskStatus::Completed => Tone::Done,
        TaskStatus::Failed => Tone::Failed,
        TaskStatus::Other(_) => Tone::Other,
    }
}

pub fn task_rows(tasks: &[Task]) -> Vec<TaskRow> {
    tasks
        .iter()
        .map(|t| TaskRow {
            status: status_label(&t.status),
            tone: status_tone(&t.status),
            id: t.short_id(),
            title: t.title.clone(),
            claimed_by: dash_if_empty(&t.claimed_by),
        })
        .collect()
}

pub fn status_summary(health: &HealthStatus, task_count: usize, holder_id: &str) -> StatusSummary {
    if !health.ok {
        let mut text = "○ DAEMON OFFLINE".to_string();
        if !health.db.is_empty() {
            text.push_str(&format!(" ({})", health.db));
        }
        text.push_str(&format!(" | {}", holder_id));
        return StatusSummary {
            text,
            online: false,
        };
    }

    let mut parts = vec![if health.version.is_empty() {
        "● DAEMON".to_string()
    } else {
        format!("● DAEMON v{}", health.version)
    }];
    parts.push(format!("{} tasks", task_count));
    parts.push(format!("DB: {}", health.db));
    parts.push(holder_id.to_string());
    StatusSummary {
        text: parts.join(" | "),
        online: true,
    }
}

pub fn message_line(message: &Message) -> MessageLine {
    let prefix = if message.is_error { "✗" } else { "✓" };
    MessageLine {
        text: format!("{} {}", prefix, message.text),
        is_error: message.is_error,
    }
}

pub fn detail_panel(detail: &Detail) -> DetailPanel {
    match detail {
        Detail::Task(task) => task_detail_panel(task),
        Detail::Logs { task_id, runs } => DetailPanel {
            title: format!("Runs · {}", crate::remote::short_id(task_id)),
            lines: run_lines(runs),
        },
        Detail::Memory { task_id, items } => DetailPanel {
            title: format!("Memory · {}", crate::remote::short_id(task_id)),
            lines: memory_lines(items),
        },
        Detail::Workers(stats) => DetailPanel {
            title: "Workers".to_string(),
            lines: worker_lines(stats),
        },
        Detail::Help => DetailPanel {
            title: "Help".to_string(),
            lines: help_lines(),
        },
    }
}

fn task_detail_panel(task: &TaskDetail) -> DetailPanel {
    let mut lines = vec![
        format!("id:      {}", task.id),
        format!("title:   {}", task.title),
        format!("status:  {}", status_label(&task.status)),
        format!("holder:  {}", dash_if_empty(&task.claimed_by)),
        format!("created: {}", fmt_ts_or_dash(&task.created_at)),
        format!("updated: {}", fmt_ts_or_dash(&task.updated_at)),
    ];
    if !task.description.trim().is_empty() {
        lines.push(String::new());
        lines.extend(task.description.lines().map(str::to_string));
    }
    DetailPanel {
        title: format!("Task · {}", task.short_id()),
        lines,
    }
}

fn run_lines(runs: &[Run]) -> Vec<String> {
    if runs.is_empty() {
        return vec!["(no runs)".to_string()];
    }
    let mut lines = Vec::new();
    for r in runs {
        lines.push(format!("{}  exit={}  {}", r.short_id(), r.exit_code, r.command));
        let output = if r.stderr.trim().is_empty() {
            &r.stdout
        } else {
            &r.stderr
        };
        if let Some(first) = output.lines().map(str::trim).find(|l| !l.is_empty()) {
            lines.push(format!("  {}", first));
        }
    }
    lines
}

fn memory_lines(items: &[MemoryItem]) -> Vec<String> {
    if items.is_empty() {
        return vec!["(no memory)".to_string()];
    }
    items
        .iter()
        .map(|m| format!("[{}] {}", m.tags, m.content))
        .collect()
}

fn worker_lines(stats: &WorkersStats) -> Vec<String> {
    let mut lines = vec![format!(
        "active: {}/{}",
        stats.active_workers, stats.global_max
    )];
    for (connector, count) in &stats.connector_counts {
        lines.push(format!("  {}: {}", connector, count));
    }
    if !stats.workers.is_empty() {
        lines.push(format!("{} worker record(s)", stats.workers.len()));
    }
    lines
}

fn help_lines() -> Vec<String> {
    let mut lines = Vec::new();
    for def in COMMANDS {
        let mut usage = def.usage.to_string();
        if !def.aliases.is_empty() {
            usage.push_str(&format!(" ({})", def.aliases.join(", ")));
        }
        lines.push(format!("{: <26}{}", usage, def.help));
    }
    lines.push(String::new());
    for (keys, action) in KEY_BINDINGS {
        lines.push(format!("{: <26}{}", keys, action));
    }
    lines
}

fn busy_label(call: &Call) -> String {
    let what = match call {
        Call::Refresh { .. } => "refreshing",
        Call::CreateTask { .. } => "creating task",
        Call::Claim { .. } => "claiming",
        Call::Release { .. } => "releasing",
        Call::Run { .. } => "running command",
        Call::AddNote { .. } => "adding note",
        Call::QueryMemory { .. } => "querying memory",
        Call::GetTask { .. } => "loading task",
        Call::TaskLogs { .. } => "loading runs",
        Call::TaskMemory { .. } => "loading memory",
        Call::Workers => "loading workers",
    };
    format!("{}...", what)
}

fn dash_if_empty(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

fn fmt_ts_or_dash(ts: &str) -> String {
    if ts.is_empty() {
        "-".to_string()
    } else {
        fmt_ts_ui(ts)
    }
}

#[cfg(test)]
#[path = "tests/projection_tests.rs"]
mod tests;
