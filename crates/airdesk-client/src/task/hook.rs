/*
[INPUT]:  TaskBackend, poll budget, (service, route, params, method) requests
[OUTPUT]: Task result or error, plus observable HookState over a watch channel
[POS]:    Task layer - stateful adapter for UI/CLI consumers
[UPDATE]: When changing state transitions or error normalization
*/

use serde::de::{Deserialize, DeserializeOwned};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use super::backend::TaskBackend;
use super::failure::TaskOutcome;
use super::poll::{PollOptions, poll_task};
use crate::http::{Result, TaskClient, TaskError};
use crate::types::{HttpMethod, TaskSubmission};

/// Observable state of a hook.
///
/// `Running` carries neither a result nor an error, so "loading with a stale
/// result" cannot be represented.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HookState {
    #[default]
    Idle,
    Running,
    Succeeded(Value),
    Failed(String),
}

impl HookState {
    pub fn is_loading(&self) -> bool {
        matches!(self, HookState::Running)
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            HookState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn last_result(&self) -> Option<&Value> {
        match self {
            HookState::Succeeded(value) => Some(value),
            _ => None,
        }
    }
}

/// Submit-and-poll wrapper with observable state.
///
/// Clones share one state. Overlapping `execute` calls are not serialized:
/// each one writes its own transitions and whichever settles last defines
/// the final state.
pub struct TaskHook<B: TaskBackend + ?Sized = TaskClient> {
    backend: Arc<B>,
    poll: PollOptions,
    state: Arc<watch::Sender<HookState>>,
}

impl<B: TaskBackend + ?Sized> Clone for TaskHook<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            poll: self.poll,
            state: Arc::clone(&self.state),
        }
    }
}

impl TaskHook<TaskClient> {
    /// Hook over a task client, using the client's poll budget
    pub fn from_client(client: TaskClient) -> Self {
        let poll = client.poll_options();
        Self::new(Arc::new(client), poll)
    }
}

impl<B: TaskBackend + ?Sized> TaskHook<B> {
    pub fn new(backend: Arc<B>, poll: PollOptions) -> Self {
        let (state, _) = watch::channel(HookState::Idle);
        Self {
            backend,
            poll,
            state: Arc::new(state),
        }
    }

    pub fn backend(&self) -> &Arc<B> {
        &self.backend
    }

    /// Receiver that always holds the latest state
    pub fn subscribe(&self) -> watch::Receiver<HookState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> HookState {
        self.state.borrow().clone()
    }

    pub fn loading(&self) -> bool {
        self.state.borrow().is_loading()
    }

    pub fn error(&self) -> Option<String> {
        self.state.borrow().error().map(str::to_string)
    }

    pub fn last_result(&self) -> Option<Value> {
        self.state.borrow().last_result().cloned()
    }

    /// Submit a task, poll it to completion and return its result payload.
    ///
    /// Failures are both recorded in the hook's state and returned.
    pub async fn execute(
        &self,
        service: &str,
        route: &str,
        params: Value,
        method: HttpMethod,
    ) -> Result<Value> {
        let submission = TaskSubmission::new(service, route, params, method);
        self.execute_with_cancel(&submission, &CancellationToken::new())
            .await
    }

    /// Like [`TaskHook::execute`], but decodes the payload into `T`.
    ///
    /// A payload that does not decode settles the hook as failed, so the
    /// state never reports success for a call that returned an error.
    pub async fn execute_as<T: DeserializeOwned>(
        &self,
        service: &str,
        route: &str,
        params: Value,
        method: HttpMethod,
    ) -> Result<T> {
        self.execute_with(service, route, params, method, |value| {
            Ok(T::deserialize(value)?)
        })
        .await
    }

    /// Like [`TaskHook::execute`], but stops early when `cancel` fires
    pub async fn execute_with_cancel(
        &self,
        submission: &TaskSubmission,
        cancel: &CancellationToken,
    ) -> Result<Value> {
        self.execute_decoded(submission, cancel, |value| Ok(value.clone()))
            .await
    }

    pub(crate) async fn execute_with<T, F>(
        &self,
        service: &str,
        route: &str,
        params: Value,
        method: HttpMethod,
        decode: F,
    ) -> Result<T>
    where
        F: FnOnce(&Value) -> Result<T>,
    {
        let submission = TaskSubmission::new(service, route, params, method);
        self.execute_decoded(&submission, &CancellationToken::new(), decode)
            .await
    }

    async fn execute_decoded<T, F>(
        &self,
        submission: &TaskSubmission,
        cancel: &CancellationToken,
        decode: F,
    ) -> Result<T>
    where
        F: FnOnce(&Value) -> Result<T>,
    {
        self.state.send_replace(HookState::Running);
        let guard = SettleGuard {
            state: &self.state,
            settled: false,
        };

        let result = self
            .run(submission, cancel)
            .await
            .and_then(|value| decode(&value).map(|decoded| (value, decoded)));
        match &result {
            Ok(_) => info!(
                service = %submission.service,
                route = %submission.route,
                method = %submission.method,
                "task succeeded"
            ),
            Err(err) => warn!(
                service = %submission.service,
                route = %submission.route,
                method = %submission.method,
                error = %err,
                "task did not succeed"
            ),
        }
        guard.settle(result)
    }

    async fn run(&self, submission: &TaskSubmission, cancel: &CancellationToken) -> Result<Value> {
        let handle = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TaskError::Cancelled),
            handle = self.backend.create_task(submission) => handle?,
        };
        let status = poll_task(self.backend.as_ref(), &handle, self.poll, cancel).await?;
        TaskOutcome::from_status(status).into_result()
    }
}

/// Moves the hook out of `Running` exactly once, even if the execute future
/// is dropped before it finishes.
struct SettleGuard<'a> {
    state: &'a watch::Sender<HookState>,
    settled: bool,
}

impl SettleGuard<'_> {
    fn settle<T>(mut self, result: Result<(Value, T)>) -> Result<T> {
        self.settled = true;
        match result {
            Ok((value, decoded)) => {
                self.state.send_replace(HookState::Succeeded(value));
                Ok(decoded)
            }
            Err(err) => {
                self.state.send_replace(HookState::Failed(err.to_string()));
                Err(err)
            }
        }
    }
}

impl Drop for SettleGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.state
                .send_replace(HookState::Failed(TaskError::Cancelled.to_string()));
        }
    }
}
