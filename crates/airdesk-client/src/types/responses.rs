/*
[INPUT]:  Task service response bodies
[OUTPUT]: Task handles and raw status objects
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use super::enums::TaskState;

/// Opaque identifier of one backend task.
///
/// Obtained from a single submission and only ever used to query that
/// submission's status.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskHandle(String);

impl TaskHandle {
    /// Wrap an existing identifier, e.g. one read back from a log line.
    /// Returns `None` for an empty identifier.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() { None } else { Some(Self(id)) }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Shapes the create-task endpoint is known to answer with.
///
/// Decoding tries the variants top to bottom; anything that matches neither a
/// bare string nor an object lands in `Unrecognized`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum CreateTaskResponse {
    Bare(String),
    Keyed(Map<String, Value>),
    Unrecognized(Value),
}

impl CreateTaskResponse {
    /// Extract the handle: bare string, then `task_id`, then `id`.
    ///
    /// Empty strings fall through to the next candidate.
    pub fn into_handle(self) -> Option<TaskHandle> {
        match self {
            CreateTaskResponse::Bare(id) => TaskHandle::new(id),
            CreateTaskResponse::Keyed(fields) => ["task_id", "id"]
                .iter()
                .filter_map(|key| fields.get(*key).and_then(id_text))
                .find_map(TaskHandle::new),
            CreateTaskResponse::Unrecognized(_) => None,
        }
    }
}

fn id_text(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Body of `GET <base>/tasks/{id}`, kept as the backend sent it.
///
/// `status` stays a raw value: only the strings `success` and `failed` are
/// terminal, anything else (numbers, booleans, unknown strings) is pending.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TaskStatus {
    pub fn state(&self) -> TaskState {
        TaskState::from_raw(self.status_text())
    }

    /// The status as text, when the backend sent a string
    pub fn status_text(&self) -> Option<&str> {
        self.status.as_ref().and_then(Value::as_str)
    }

    pub fn is_terminal(&self) -> bool {
        self.state().is_terminal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    fn decode(value: Value) -> Option<TaskHandle> {
        serde_json::from_value::<CreateTaskResponse>(value)
            .expect("every JSON value decodes to some variant")
            .into_handle()
    }

    #[rstest]
    #[case(json!("abc"), "abc")]
    #[case(json!({"task_id": "abc"}), "abc")]
    #[case(json!({"id": "abc"}), "abc")]
    #[case(json!({"task_id": "first", "id": "second"}), "first")]
    #[case(json!({"task_id": "", "id": "second"}), "second")]
    #[case(json!({"id": 17}), "17")]
    fn test_handle_shapes_accepted(#[case] body: Value, #[case] expected: &str) {
        assert_eq!(decode(body).as_ref().map(TaskHandle::as_str), Some(expected));
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!(null))]
    #[case(json!({"foo": "abc"}))]
    #[case(json!(""))]
    #[case(json!([ "abc" ]))]
    #[case(json!({"task_id": null, "id": false}))]
    fn test_handle_shapes_rejected(#[case] body: Value) {
        assert_eq!(decode(body), None);
    }

    #[test]
    fn test_status_keeps_unknown_fields() {
        let status: TaskStatus = serde_json::from_value(json!({
            "status": "success",
            "result": [1, 2],
            "finished_at": "2024-01-01T00:00:00Z"
        }))
        .expect("status");
        assert_eq!(status.state(), TaskState::Success);
        assert_eq!(status.result, Some(json!([1, 2])));
        assert_eq!(status.extra.get("finished_at"), Some(&json!("2024-01-01T00:00:00Z")));

        let round_trip = serde_json::to_value(&status).expect("serialize");
        assert_eq!(round_trip["finished_at"], json!("2024-01-01T00:00:00Z"));
    }

    #[rstest]
    #[case(json!({"status": 2}))]
    #[case(json!({"status": true}))]
    #[case(json!({"status": null}))]
    #[case(json!({"status": {"phase": "success"}}))]
    #[case(json!({"status": "running"}))]
    fn test_non_string_status_is_pending(#[case] body: Value) {
        let status: TaskStatus = serde_json::from_value(body.clone()).expect("status decodes");
        assert_eq!(status.state(), TaskState::Pending);
        assert_eq!(serde_json::to_value(&status).expect("serialize")["status"], body["status"]);
    }

    #[test]
    fn test_status_without_status_field_is_pending() {
        let status: TaskStatus = serde_json::from_value(json!({"progress": 50})).expect("status");
        assert!(!status.is_terminal());
    }
}
