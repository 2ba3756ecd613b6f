/*
[INPUT]:  Terminal TaskStatus
[OUTPUT]: TaskOutcome (success payload or display-ready failure text)
[POS]:    Task layer - classification of backend-reported results
[UPDATE]: When backends introduce new failure payload shapes
*/

use serde_json::Value;

use crate::http::{Result, TaskError};
use crate::types::{TaskState, TaskStatus};

const FALLBACK_MESSAGE: &str = "Task failed";

/// Final result of one task, derived once at the end of polling
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    Success(Value),
    Failure(String),
}

impl TaskOutcome {
    /// Classify a terminal status. A missing success payload becomes `null`.
    pub fn from_status(status: TaskStatus) -> Self {
        match status.state() {
            TaskState::Success => TaskOutcome::Success(status.result.unwrap_or(Value::Null)),
            TaskState::Failed => TaskOutcome::Failure(failure_message(status.result.as_ref())),
            TaskState::Pending => TaskOutcome::Failure(FALLBACK_MESSAGE.to_string()),
        }
    }

    pub fn into_result(self) -> Result<Value> {
        match self {
            TaskOutcome::Success(value) => Ok(value),
            TaskOutcome::Failure(message) => Err(TaskError::TaskFailed(message)),
        }
    }
}

/// Turn a failure payload into one human-readable line.
///
/// First match wins: a bare string; a `detail` list of validation errors
/// rendered as `loc.path: msg` and comma-joined; a `detail` string; a
/// `message` field; otherwise "Task failed".
pub fn failure_message(payload: Option<&Value>) -> String {
    let Some(payload) = payload else {
        return FALLBACK_MESSAGE.to_string();
    };

    if let Value::String(text) = payload {
        return non_empty(text).unwrap_or(FALLBACK_MESSAGE).to_string();
    }

    match payload.get("detail") {
        Some(Value::Array(errors)) if !errors.is_empty() => {
            return errors
                .iter()
                .map(validation_error_line)
                .collect::<Vec<_>>()
                .join(", ");
        }
        Some(Value::String(detail)) if !detail.is_empty() => return detail.clone(),
        _ => {}
    }

    match payload.get("message") {
        Some(Value::String(message)) if !message.is_empty() => message.clone(),
        Some(Value::Number(number)) => number.to_string(),
        _ => FALLBACK_MESSAGE.to_string(),
    }
}

fn validation_error_line(error: &Value) -> String {
    let location = error
        .get("loc")
        .and_then(Value::as_array)
        .map(|segments| {
            segments
                .iter()
                .map(|segment| match segment {
                    Value::String(text) => text.clone(),
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(".")
        })
        .filter(|joined| !joined.is_empty())
        .unwrap_or_else(|| "field".to_string());

    let message = match error.get("msg") {
        Some(Value::String(msg)) => msg.clone(),
        Some(Value::Null) | None => "invalid value".to_string(),
        Some(other) => other.to_string(),
    };

    format!("{location}: {message}")
}

fn non_empty(text: &str) -> Option<&str> {
    if text.is_empty() { None } else { Some(text) }
}
