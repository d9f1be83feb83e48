use std::time::Duration;

use anyhow::{Context, Result};

use crate::error::RemoteError;

mod http_client;
mod memory;
mod system;
mod tasks;
mod types;
pub use self::types::*;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:7466";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LEASE_TTL_SECS: u64 = 300;

/// Tags attached to notes added from the session.
pub const NOTE_TAGS: &str = "note";

#[derive(Clone, Debug)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
    pub lease_ttl_sec: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            lease_ttl_sec: DEFAULT_LEASE_TTL_SECS,
        }
    }
}

/// One method per daemon capability. Each issues a single request with no retry.
pub trait TaskApi {
    /// Never fails: an unreachable or erroring daemon reads as [`HealthStatus::unreachable`].
    fn health(&self) -> HealthStatus;
    fn list_tasks(&self, status: Option<&str>) -> Result<Vec<Task>, RemoteError>;
    fn get_task(&self, task_id: &str) -> Result<TaskDetail, RemoteError>;
    /// Returns the id of the created task.
    fn create_task(&self, title: &str, description: &str) -> Result<String, RemoteError>;
    fn claim_task(
        &self,
        task_id: &str,
        holder_id: &str,
        ttl_sec: u64,
    ) -> Result<serde_json::Value, RemoteError>;
    fn release_task(&self, task_id: &str, holder_id: &str) -> Result<(), RemoteError>;
    fn run_task(
        &self,
        task_id: &str,
        holder_id: &str,
        command: &str,
        args: &[String],
    ) -> Result<Run, RemoteError>;
    fn task_logs(&self, task_id: &str) -> Result<Vec<Run>, RemoteError>;
    fn task_memory(&self, task_id: &str) -> Result<Vec<MemoryItem>, RemoteError>;
    fn add_memory(
        &self,
        task_id: &str,
        content: &str,
        tags: &str,
    ) -> Result<MemoryItem, RemoteError>;
    fn query_memory(&self, query: &str) -> Result<Vec<MemoryItem>, RemoteError>;
    fn workers(&self) -> Result<WorkersStats, RemoteError>;
}

/// Blocking HTTP client for the daemon API.
pub struct DaemonClient {
    base_url: String,
    client: reqwest::blocking::Client,
}

impl DaemonClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("neona-tui")
            .timeout(config.timeout)
            .build()
            .context("build reqwest client")?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl TaskApi for DaemonClient {
    fn health(&self) -> HealthStatus {
        self.check_health()
    }

    fn list_tasks(&self, status: Option<&str>) -> Result<Vec<Task>, RemoteError> {
        DaemonClient::list_tasks(self, status)
    }

    fn get_task(&self, task_id: &str) -> Result<TaskDetail, RemoteError> {
        DaemonClient::get_task(self, task_id)
    }

    fn create_task(&self, title: &str, description: &str) -> Result<String, RemoteError> {
        DaemonClient::create_task(self, title, description)
    }

    fn claim_task(
        &self,
        task_id: &str,
        holder_id: &str,
        ttl_sec: u64,
    ) -> Result<serde_json::Value, RemoteError> {
        DaemonClient::claim_task(self, task_id, holder_id, ttl_sec)
    }

    fn release_task(&self, task_id: &str, holder_id: &str) -> Result<(), RemoteError> {
        DaemonClient::release_task(self, task_id, holder_id)
    }

    fn run_task(
        &self,
        task_id: &str,
        holder_id: &str,
        command: &str,
        args: &[String],
    ) -> Result<Run, RemoteError> {
        DaemonClient::run_task(self, task_id, holder_id, command, args)
    }

    fn task_logs(&self, task_id: &str) -> Result<Vec<Run>, RemoteError> {
        DaemonClient::task_logs(self, task_id)
    }

    fn task_memory(&self, task_id: &str) -> Result<Vec<MemoryItem>, RemoteError> {
        DaemonClient::task_memory(self, task_id)
    }

    fn add_memory(
        &self,
        task_id: &str,
        content: &str,
        tags: &str,
    ) -> Result<MemoryItem, RemoteError> {
        DaemonClient::add_memory(self, task_id, content, tags)
    }

    fn query_memory(&self, query: &str) -> Result<Vec<MemoryItem>, RemoteError> {
        DaemonClient::query_memory(self, query)
    }

    fn workers(&self) -> Result<WorkersStats, RemoteError> {
        DaemonClient::workers(self)
    }
}
