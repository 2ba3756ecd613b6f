/*
[INPUT]:  Error sources (transport, HTTP status, decoding, polling, task failure)
[OUTPUT]: Structured error types with classification helpers
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for the task client and everything layered on it
#[derive(Error, Debug)]
pub enum TaskError {
    /// Network-level failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Backend answered with a non-2xx status
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Submission response did not carry a usable task handle
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// No terminal status observed within the attempt budget
    #[error("Task polling timed out after {attempts} attempts")]
    PollTimeout { attempts: u32 },

    /// Backend reported `status: "failed"`; the message is display-ready
    #[error("{0}")]
    TaskFailed(String),

    /// Caller cancelled the operation
    #[error("Task execution was cancelled")]
    Cancelled,

    /// Serialization/deserialization failed
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Input rejected before anything was sent
    #[error("{0}")]
    Validation(String),
}

impl TaskError {
    /// True for network failures and non-2xx answers from either endpoint
    pub fn is_transport(&self) -> bool {
        matches!(self, TaskError::Transport(_) | TaskError::HttpStatus { .. })
    }

    /// Check if the error is retryable by the caller
    pub fn is_retryable(&self) -> bool {
        match self {
            TaskError::Transport(_) | TaskError::PollTimeout { .. } => true,
            TaskError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }

    /// HTTP status code, when the backend produced one
    pub fn status_code(&self) -> Option<u16> {
        match self {
            TaskError::HttpStatus { status, .. } => Some(*status),
            TaskError::Transport(err) => err.status().map(|status| status.as_u16()),
            _ => None,
        }
    }

    /// Create a status error from code and body text
    pub fn http_status(status: StatusCode, body: impl Into<String>) -> Self {
        TaskError::HttpStatus {
            status: status.as_u16(),
            body: body.into(),
        }
    }
}

/// Result type alias for task operations
pub type Result<T> = std::result::Result<T, TaskError>;
