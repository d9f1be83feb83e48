//! Notes/memory operations.

use super::*;

impl DaemonClient {
    pub fn task_memory(&self, task_id: &str) -> Result<Vec<MemoryItem>, RemoteError> {
        let operation = format!("get memory for task {}", task_id);
        let resp = self.send(
            self.client
                .get(self.url(&format!("/tasks/{}/memory", task_id))),
            &operation,
        )?;
        let mut items: Vec<MemoryItem> = self.read_list(resp, &operation)?;
        for item in items.iter_mut().filter(|m| m.task_id.is_empty()) {
            item.task_id = task_id.to_string();
        }
        Ok(items)
    }

    pub fn add_memory(
        &self,
        task_id: &str,
        content: &str,
        tags: &str,
    ) -> Result<MemoryItem, RemoteError> {
        let operation = "add memory";
        let resp = self.send(
            self.client.post(self.url("/memory")).json(&AddMemoryRequest {
                task_id,
                content,
                tags,
            }),
            operation,
        )?;
        let mut item: MemoryItem = self.read_json(resp, operation)?;
        if item.content.is_empty() {
            item.content = content.to_string();
        }
        if item.tags.is_empty() {
            item.tags = tags.to_string();
        }
        if item.task_id.is_empty() {
            item.task_id = task_id.to_string();
        }
        Ok(item)
    }

    pub fn query_memory(&self, query: &str) -> Result<Vec<MemoryItem>, RemoteError> {
        let operation = "query memory";
        let resp = self.send(
            self.client.get(self.url("/memory")).query(&[("q", query)]),
            operation,
        )?;
        self.read_list(resp, operation)
    }
}
