use serde::de::DeserializeOwned;

use super::*;

impl DaemonClient {
    pub(super) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends `req` once and maps connection failures and statuses >= 400.
    pub(super) fn send(
        &self,
        req: reqwest::blocking::RequestBuilder,
        operation: &str,
    ) -> Result<reqwest::blocking::Response, RemoteError> {
        let resp = req.send().map_err(|err| {
            tracing::warn!(operation, error = %err, "daemon request failed");
            RemoteError::Transport {
                operation: operation.to_string(),
                cause: transport_cause(&err),
            }
        })?;

        let status = resp.status();
        tracing::debug!(operation, status = status.as_u16(), url = %resp.url(), "daemon response");
        if status.as_u16() >= 400 {
            let body = resp.text().unwrap_or_default();
            return Err(RemoteError::Api {
                operation: operation.to_string(),
                status: status.as_u16(),
                body,
            });
        }
        Ok(resp)
    }

    pub(super) fn read_json<T: DeserializeOwned>(
        &self,
        resp: reqwest::blocking::Response,
        operation: &str,
    ) -> Result<T, RemoteError> {
        let text = resp.text().map_err(|err| RemoteError::Transport {
            operation: operation.to_string(),
            cause: transport_cause(&err),
        })?;
        decode_body(&text, operation)
    }

    /// Like [`Self::read_json`] for list endpoints; a `null` body is an empty list.
    pub(super) fn read_list<T: DeserializeOwned>(
        &self,
        resp: reqwest::blocking::Response,
        operation: &str,
    ) -> Result<Vec<T>, RemoteError> {
        let items: Option<Vec<T>> = self.read_json(resp, operation)?;
        Ok(items.unwrap_or_default())
    }
}

pub(super) fn decode_body<T: DeserializeOwned>(text: &str, operation: &str) -> Result<T, RemoteError> {
    // Some endpoints answer 200/204 with no body at all.
    let text = if text.trim().is_empty() { "null" } else { text };
    serde_json::from_str(text).map_err(|err| RemoteError::Decode {
        operation: operation.to_string(),
        cause: err.to_string(),
    })
}

fn transport_cause(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        "request timed out".to_string()
    } else if err.is_connect() {
        "daemon unreachable (connection failed)".to_string()
    } else {
        err.to_string()
    }
}
