use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AdminError {
    #[error("Configuration error: {0}")]
    Config(String),

    /// The request never produced a response (connection refused, DNS, TLS).
    #[error("Network error: {0}")]
    Network(String),

    /// The service answered with a non-success status. The message is what
    /// slices record as their error.
    #[error("Request failed with status code {status}")]
    Status {
        status: u16,
        problem: Option<Problem>,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: i64 },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("{0} is read-only")]
    ReadOnly(&'static str),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AdminError {
    /// The message a slice records in `error_message`. Any HTTP failure
    /// reads the same way, whatever the body said.
    pub fn slice_message(&self) -> String {
        match self.status() {
            Some(status) => format!("Request failed with status code {}", status),
            None => self.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AdminError::Status { status, .. } => Some(*status),
            AdminError::NotFound { .. } => Some(404),
            _ => None,
        }
    }

    pub fn problem(&self) -> Option<&Problem> {
        match self {
            AdminError::Status { problem, .. } => problem.as_ref(),
            _ => None,
        }
    }
}

/// RFC 7807 problem body returned by the service on errors.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    #[serde(rename = "type")]
    pub problem_type: Option<String>,
    pub title: Option<String>,
    pub status: Option<u16>,
    pub detail: Option<String>,
    pub path: Option<String>,
    /// Translation key, e.g. `error.idexists`.
    pub message: Option<String>,
    pub entity_name: Option<String>,
    pub error_key: Option<String>,
}

impl Problem {
    /// Best human-readable line: detail, then title, then the message key.
    pub fn summary(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .or(self.title.as_deref())
            .or(self.message.as_deref())
    }
}
