//! Local state of one operator session: the last daemon snapshot, the selected row, and
//! the message shown under the table.

use crate::remote::{HealthStatus, MemoryItem, Run, Task, TaskDetail, WorkersStats};

mod command;
mod controller;

pub use self::command::{
    COMMANDS, Command, CommandDef, KEY_BINDINGS, RunLine, parse_command, split_verb,
};
pub use self::controller::{Call, Controller, Reply};

/// Daemon state as of the last refresh. Replaced wholesale, never merged.
#[derive(Clone, Debug, Default, PartialEq)]
struct Snapshot {
    health: HealthStatus,
    tasks: Vec<Task>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Message {
    pub text: String,
    pub is_error: bool,
}

/// Extra information shown beside the task table.
#[derive(Clone, Debug, PartialEq)]
pub enum Detail {
    Task(TaskDetail),
    Logs { task_id: String, runs: Vec<Run> },
    Memory { task_id: String, items: Vec<MemoryItem> },
    Workers(WorkersStats),
    Help,
}

#[derive(Debug)]
pub struct Session {
    holder_id: String,
    snapshot: Snapshot,
    selected: Option<usize>,
    message: Option<Message>,
    detail: Option<Detail>,
}

impl Session {
    pub fn new(holder_id: impl Into<String>) -> Self {
        Self {
            holder_id: holder_id.into(),
            snapshot: Snapshot::default(),
            selected: None,
            message: None,
            detail: None,
        }
    }

    pub fn holder_id(&self) -> &str {
        &self.holder_id
    }

    pub fn tasks(&self) -> &[Task] {
        &self.snapshot.tasks
    }

    pub fn health(&self) -> &HealthStatus {
        &self.snapshot.health
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_task(&self) -> Option<&Task> {
        self.selected.and_then(|i| self.snapshot.tasks.get(i))
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    pub fn detail(&self) -> Option<&Detail> {
        self.detail.as_ref()
    }

    /// Ignored unless `index` addresses a row of the current table.
    pub fn select(&mut self, index: usize) {
        if index < self.snapshot.tasks.len() {
            self.selected = Some(index);
        }
    }

    pub fn select_next(&mut self) {
        let len = self.snapshot.tasks.len();
        if len == 0 {
            return;
        }
        self.selected = Some(match self.selected {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        });
    }

    pub fn select_prev(&mut self) {
        if self.snapshot.tasks.is_empty() {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| i.saturating_sub(1)));
    }

    pub fn close_detail(&mut self) -> bool {
        self.detail.take().is_some()
    }

    pub(crate) fn set_health(&mut self, health: HealthStatus) {
        self.snapshot = Snapshot {
            health,
            tasks: std::mem::take(&mut self.snapshot.tasks),
        };
    }

    /// Swaps in a fresh task list. The selection is clamped to the new length, cleared
    /// when the list is empty, and starts on the first row when there was none.
    pub(crate) fn replace_tasks(&mut self, tasks: Vec<Task>) {
        let len = tasks.len();
        self.snapshot = Snapshot {
            health: std::mem::take(&mut self.snapshot.health),
            tasks,
        };
        self.selected = match (len, self.selected) {
            (0, _) => None,
            (_, None) => Some(0),
            (n, Some(i)) => Some(i.min(n - 1)),
        };
    }

    pub(crate) fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            is_error: false,
        });
    }

    pub(crate) fn set_error(&mut self, text: impl Into<String>) {
        self.message = Some(Message {
            text: text.into(),
            is_error: true,
        });
    }

    pub(crate) fn show_detail(&mut self, detail: Detail) {
        self.detail = Some(detail);
    }
}

/// `tui@<hostname>`, the holder identity used for every lease call of this process.
pub fn local_holder_id() -> String {
    let host = hostname::get()
        .map(|h| h.to_string_lossy().to_string())
        .unwrap_or_else(|_| "localhost".to_string());
    format!("tui@{}", host)
}

#[cfg(test)]
#[path = "tests/session/session_tests.rs"]
mod tests;
