/*
[INPUT]:  Task submissions and task handles
[OUTPUT]: Task handles, raw task statuses, terminal statuses after polling
[POS]:    HTTP layer - task-service endpoints (create-task, tasks/{id})
[UPDATE]: When the task service changes paths or response shapes
*/

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::http::{Result, TaskClient, TaskError};
use crate::task::{PollOptions, TaskBackend, poll_task};
use crate::types::{CreateTaskResponse, HttpMethod, TaskHandle, TaskStatus, TaskSubmission};

const CREATE_TASK_PATH: &str = "create-task";
const TASKS_PATH: &str = "tasks";
const REQUEST_ID_HEADER: &str = "x-request-id";

impl TaskClient {
    /// Submit a task
    ///
    /// POST {base}/create-task
    pub async fn submit(
        &self,
        service: &str,
        route: &str,
        params: Value,
        method: HttpMethod,
    ) -> Result<TaskHandle> {
        self.submit_task(&TaskSubmission::new(service, route, params, method))
            .await
    }

    /// Submit a prepared task body
    ///
    /// POST {base}/create-task
    pub async fn submit_task(&self, submission: &TaskSubmission) -> Result<TaskHandle> {
        let request_id = Uuid::new_v4().to_string();
        let builder = self
            .request(Method::POST, &[CREATE_TASK_PATH])?
            .header(REQUEST_ID_HEADER, &request_id)
            .json(submission);
        let body = self.send_value(builder).await?;

        let handle = serde_json::from_value::<CreateTaskResponse>(body.clone())
            .ok()
            .and_then(CreateTaskResponse::into_handle)
            .ok_or_else(|| {
                TaskError::InvalidResponse(format!("create-task returned no task id: {body}"))
            })?;

        debug!(
            task_id = %handle,
            request_id = %request_id,
            service = %submission.service,
            route = %submission.route,
            method = %submission.method,
            "task submitted"
        );
        Ok(handle)
    }

    /// Fetch the current status of one task, unmodified
    ///
    /// GET {base}/tasks/{task_id}
    pub async fn fetch_status(&self, handle: &TaskHandle) -> Result<TaskStatus> {
        let builder = self.request(Method::GET, &[TASKS_PATH, handle.as_str()])?;
        let body = self.send_value(builder).await?;

        match body {
            Value::Object(_) => Ok(serde_json::from_value(body)?),
            other => {
                warn!(task_id = %handle, body = %other, "status body is not an object; treating as pending");
                Ok(TaskStatus::default())
            }
        }
    }

    /// Poll with this client's configured budget until a terminal status
    pub async fn poll(&self, handle: &TaskHandle) -> Result<TaskStatus> {
        self.poll_with(handle, self.poll_options(), &CancellationToken::new())
            .await
    }

    /// Poll with an explicit budget and cancellation token
    pub async fn poll_with(
        &self,
        handle: &TaskHandle,
        options: PollOptions,
        cancel: &CancellationToken,
    ) -> Result<TaskStatus> {
        poll_task(self, handle, options, cancel).await
    }
}

#[async_trait]
impl TaskBackend for TaskClient {
    async fn create_task(&self, submission: &TaskSubmission) -> Result<TaskHandle> {
        self.submit_task(submission).await
    }

    async fn task_status(&self, handle: &TaskHandle) -> Result<TaskStatus> {
        self.fetch_status(handle).await
    }
}
