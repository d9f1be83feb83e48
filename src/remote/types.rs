//! Records exchanged with the daemon.
//!
//! Every response field is optional on the wire. Absent and `null` fields fall back to an
//! empty string, zero, or an empty collection instead of failing the whole response. The
//! exceptions are a run's exit code (`-1`, so a missing code never reads as success) and
//! the health `db`/`version` (`"unknown"`).

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};

/// `null` decodes the same as an absent field.
pub(crate) fn null_as_default<'de, D, T>(de: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(de)?.unwrap_or_default())
}

fn unknown() -> String {
    "unknown".to_string()
}

fn null_as_unknown<'de, D>(de: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(de)?.unwrap_or_else(unknown))
}

/// Exit code recorded for a run whose record carries none.
pub const MISSING_EXIT_CODE: i64 = -1;

fn missing_exit_code() -> i64 {
    MISSING_EXIT_CODE
}

fn null_as_missing_exit_code<'de, D>(de: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<i64>::deserialize(de)?.unwrap_or(MISSING_EXIT_CODE))
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub ok: bool,
    #[serde(default = "unknown", deserialize_with = "null_as_unknown")]
    pub db: String,
    #[serde(default = "unknown", deserialize_with = "null_as_unknown")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub time: String,
}

impl HealthStatus {
    /// Synthesized when the daemon cannot be reached at all.
    pub fn unreachable() -> Self {
        Self {
            ok: false,
            db: "unreachable".to_string(),
            version: String::new(),
            time: String::new(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<String>", into = "String")]
pub enum TaskStatus {
    Pending,
    Claimed,
    Running,
    Completed,
    Failed,
    Other(String),
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Other(String::new())
    }
}

impl TaskStatus {
    pub fn as_str(&self) -> &str {
        match self {
            TaskStatus::Pending => "pending",
            TaskStatus::Claimed => "claimed",
            TaskStatus::Running => "running",
            TaskStatus::Completed => "completed",
            TaskStatus::Failed => "failed",
            TaskStatus::Other(raw) => raw.as_str(),
        }
    }
}

impl From<String> for TaskStatus {
    fn from(raw: String) -> Self {
        match raw.to_lowercase().as_str() {
            "pending" => TaskStatus::Pending,
            "claimed" => TaskStatus::Claimed,
            "running" => TaskStatus::Running,
            "completed" => TaskStatus::Completed,
            "failed" => TaskStatus::Failed,
            _ => TaskStatus::Other(raw),
        }
    }
}

impl From<Option<String>> for TaskStatus {
    fn from(raw: Option<String>) -> Self {
        raw.map(TaskStatus::from).unwrap_or_default()
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        status.as_str().to_string()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Task {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    pub status: TaskStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub claimed_by: String,
}

impl Task {
    pub fn short_id(&self) -> String {
        short_id(&self.id)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaskDetail {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub status: TaskStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub claimed_by: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    #[serde(deserialize_with = "null_as_default")]
    pub updated_at: String,
}

impl TaskDetail {
    pub fn short_id(&self) -> String {
        short_id(&self.id)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Run {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub command: String,
    #[serde(
        default = "missing_exit_code",
        deserialize_with = "null_as_missing_exit_code"
    )]
    pub exit_code: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub stdout: String,
    #[serde(deserialize_with = "null_as_default")]
    pub stderr: String,
}

impl Default for Run {
    fn default() -> Self {
        Self {
            id: String::new(),
            command: String::new(),
            exit_code: MISSING_EXIT_CODE,
            stdout: String::new(),
            stderr: String::new(),
        }
    }
}

impl Run {
    pub fn short_id(&self) -> String {
        short_id(&self.id)
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// What to show the operator for a failed run: stderr, else stdout, else the code.
    pub fn failure_output(&self) -> String {
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            return stderr.to_string();
        }
        let stdout = self.stdout.trim();
        if !stdout.is_empty() {
            return stdout.to_string();
        }
        format!("exit code {}", self.exit_code)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MemoryItem {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub content: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: String,
    #[serde(deserialize_with = "null_as_default")]
    pub task_id: String,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkersStats {
    pub active_workers: i64,
    pub global_max: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub connector_counts: BTreeMap<String, i64>,
    #[serde(deserialize_with = "null_as_default")]
    pub workers: Vec<serde_json::Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct CreatedTask {
    pub(super) id: String,
}

#[derive(Debug, Serialize)]
pub(super) struct CreateTaskRequest<'a> {
    pub(super) title: &'a str,
    pub(super) description: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct ClaimRequest<'a> {
    pub(super) holder_id: &'a str,
    pub(super) ttl_sec: u64,
}

#[derive(Debug, Serialize)]
pub(super) struct ReleaseRequest<'a> {
    pub(super) holder_id: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct RunRequest<'a> {
    pub(super) holder_id: &'a str,
    pub(super) command: &'a str,
    pub(super) args: &'a [String],
}

#[derive(Debug, Serialize)]
pub(super) struct AddMemoryRequest<'a> {
    pub(super) task_id: &'a str,
    pub(super) content: &'a str,
    pub(super) tags: &'a str,
}

/// First 8 characters of a server-assigned id.
pub fn short_id(id: &str) -> String {
    id.chars().take(8).collect()
}

#[cfg(test)]
#[path = "../tests/remote/types_tests.rs"]
mod tests;
