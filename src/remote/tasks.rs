//! Task queue and lease operations.

use super::*;

impl DaemonClient {
    pub fn list_tasks(&self, status: Option<&str>) -> Result<Vec<Task>, RemoteError> {
        let operation = "list tasks";
        let mut req = self.client.get(self.url("/tasks"));
        if let Some(status) = status.filter(|s| !s.is_empty()) {
            req = req.query(&[("status", status)]);
        }
        let resp = self.send(req, operation)?;
        self.read_list(resp, operation)
    }

    pub fn get_task(&self, task_id: &str) -> Result<TaskDetail, RemoteError> {
        let operation = format!("get task {}", task_id);
        let resp = self.send(
            self.client.get(self.url(&format!("/tasks/{}", task_id))),
            &operation,
        )?;
        self.read_json(resp, &operation)
    }

    pub fn create_task(&self, title: &str, description: &str) -> Result<String, RemoteError> {
        let operation = "create task";
        let resp = self.send(
            self.client
                .post(self.url("/tasks"))
                .json(&CreateTaskRequest { title, description }),
            operation,
        )?;
        let created: CreatedTask = self.read_json(resp, operation)?;
        Ok(created.id)
    }

    /// Returns the daemon's lease payload untouched.
    pub fn claim_task(
        &self,
        task_id: &str,
        holder_id: &str,
        ttl_sec: u64,
    ) -> Result<serde_json::Value, RemoteError> {
        let operation = format!("claim task {}", task_id);
        let resp = self.send(
            self.client
                .post(self.url(&format!("/tasks/{}/claim", task_id)))
                .json(&ClaimRequest { holder_id, ttl_sec }),
            &operation,
        )?;
        self.read_json(resp, &operation)
    }

    pub fn release_task(&self, task_id: &str, holder_id: &str) -> Result<(), RemoteError> {
        let operation = format!("release task {}", task_id);
        let _ = self.send(
            self.client
                .post(self.url(&format!("/tasks/{}/release", task_id)))
                .json(&ReleaseRequest { holder_id }),
            &operation,
        )?;
        Ok(())
    }

    pub fn run_task(
        &self,
        task_id: &str,
        holder_id: &str,
        command: &str,
        args: &[String],
    ) -> Result<Run, RemoteError> {
        let operation = format!("run command on task {}", task_id);
        let resp = self.send(
            self.client
                .post(self.url(&format!("/tasks/{}/run", task_id)))
                .json(&RunRequest {
                    holder_id,
                    command,
                    args,
                }),
            &operation,
        )?;
        let mut run: Run = self.read_json(resp, &operation)?;
        if run.command.is_empty() {
            run.command = command.to_string();
        }
        Ok(run)
    }

    pub fn task_logs(&self, task_id: &str) -> Result<Vec<Run>, RemoteError> {
        let operation = format!("get logs for task {}", task_id);
        let resp = self.send(
            self.client
                .get(self.url(&format!("/tasks/{}/logs", task_id))),
            &operation,
        )?;
        self.read_list(resp, &operation)
    }
}
