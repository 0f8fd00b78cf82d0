use reqwest::StatusCode;
use serde_json::Value;

#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    #[error("{0}")]
    InvalidFile(String),
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    /// The backend answered with a non-2xx status. Displays the server's own message.
    #[error("{detail}")]
    Status { status: StatusCode, detail: String },
    #[error("Invalid JSON from server: {0}")]
    InvalidJson(String),
    #[error("Unexpected response from server: {0}")]
    Decode(#[from] serde_json::Error),
}

impl BackendError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status(),
            _ => None,
        }
    }
}

/// Picks the most useful message out of an error response:
/// `detail`, then `error`, then the raw body, then the status line.
pub(crate) fn error_detail(body: &Value, text: &str, status: StatusCode) -> String {
    let field = ["detail", "error"]
        .iter()
        .filter_map(|key| body.get(key))
        .find(|value| !is_falsy(value));

    match field {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None if !text.trim().is_empty() => text.to_owned(),
        None => format!("HTTP {}", status.as_u16()),
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
