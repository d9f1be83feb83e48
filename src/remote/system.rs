//! Liveness and worker pool status.

use super::*;

impl DaemonClient {
    /// Probes `/health`. Any failure, including a status >= 400 or an unreadable body,
    /// reads as an offline daemon rather than an error.
    pub fn check_health(&self) -> HealthStatus {
        let operation = "health";
        let resp = match self.send(self.client.get(self.url("/health")), operation) {
            Ok(resp) => resp,
            Err(err) => {
                tracing::debug!(error = %err, "health probe failed");
                return HealthStatus::unreachable();
            }
        };
        match self.read_json::<HealthStatus>(resp, operation) {
            Ok(health) => health,
            Err(err) => {
                tracing::debug!(error = %err, "health probe returned an unreadable body");
                HealthStatus::unreachable()
            }
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.check_health().ok
    }

    pub fn workers(&self) -> Result<WorkersStats, RemoteError> {
        let operation = "get workers";
        let resp = self.send(self.client.get(self.url("/workers")), operation)?;
        self.read_json(resp, operation)
    }
}
