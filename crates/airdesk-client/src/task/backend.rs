/*
[INPUT]:  Task submissions and task handles
[OUTPUT]: Abstract create-task / task-status operations
[POS]:    Task layer - seam between protocol logic and HTTP transport
[UPDATE]: When the task protocol gains new endpoints
*/

use async_trait::async_trait;

use crate::http::Result;
use crate::types::{TaskHandle, TaskStatus, TaskSubmission};

/// The two physical calls of the task protocol.
///
/// `TaskClient` is the production implementation; polling and the hook are
/// written against this trait so they can run over any transport.
#[async_trait]
pub trait TaskBackend: Send + Sync {
    /// Submit one task and return its handle
    async fn create_task(&self, submission: &TaskSubmission) -> Result<TaskHandle>;

    /// Fetch the current status of a task; exactly one request per call
    async fn task_status(&self, handle: &TaskHandle) -> Result<TaskStatus>;
}

