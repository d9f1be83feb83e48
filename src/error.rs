//! Failure taxonomy shared by the transport adapter and the session controller.

use thiserror::Error;

/// A remote call that did not produce the expected record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    /// Connection refused, DNS failure, timeout, or a body that could not be read.
    #[error("{operation}: {cause}")]
    Transport { operation: String, cause: String },

    /// The daemon answered with a status >= 400.
    #[error("{operation} (HTTP {status}){}", body_suffix(.body))]
    Api {
        operation: String,
        status: u16,
        body: String,
    },

    /// A 2xx response whose body is not JSON of the expected shape.
    #[error("{operation}: invalid response: {cause}")]
    Decode { operation: String, cause: String },
}

impl RemoteError {
    pub fn status(&self) -> Option<u16> {
        match self {
            RemoteError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

fn body_suffix(body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        String::new()
    } else {
        format!(": {}", body)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("Unknown command: {0} (try: add, claim, release, run, note, query, refresh, help)")]
    UnknownCommand(String),

    #[error("No task selected - use arrow keys to select")]
    NoSelection,

    #[error("Usage: {usage}")]
    EmptyArgument { usage: &'static str },

    #[error("Busy - wait for the current command to finish")]
    Busy,
}

impl SessionError {
    /// Local validation failures never reach the network.
    pub fn is_local(&self) -> bool {
        !matches!(self, SessionError::Remote(_))
    }
}
