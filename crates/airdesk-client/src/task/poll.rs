/*
[INPUT]:  TaskBackend, TaskHandle, poll budget, CancellationToken
[OUTPUT]: Terminal TaskStatus, PollTimeout, or Cancelled
[POS]:    Task layer - sequential status polling loop
[UPDATE]: When changing poll pacing, budgets or cancellation points
*/

use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::backend::TaskBackend;
use crate::http::{Result, TaskError};
use crate::types::{TaskHandle, TaskStatus};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);
const DEFAULT_MAX_ATTEMPTS: u32 = 30;

/// Client-side polling budget.
///
/// Total wait is bounded by `interval * (max_attempts - 1)` plus the time the
/// status requests themselves take.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

impl PollOptions {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_attempts == 0 {
            return Err(TaskError::Config("max_attempts must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Poll `handle` until it reports `success` or `failed`.
///
/// Attempts are strictly sequential. The interval sleep only happens between
/// a non-terminal observation and the next attempt, never after a terminal
/// one and never after the final attempt. Cancellation is checked while a
/// request is in flight and while sleeping.
pub async fn poll_task<B>(
    backend: &B,
    handle: &TaskHandle,
    options: PollOptions,
    cancel: &CancellationToken,
) -> Result<TaskStatus>
where
    B: TaskBackend + ?Sized,
{
    options.validate()?;

    for attempt in 1..=options.max_attempts {
        let status = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TaskError::Cancelled),
            status = backend.task_status(handle) => status?,
        };

        if status.is_terminal() {
            debug!(task_id = %handle, attempt, status = ?status.status, "task reached terminal status");
            return Ok(status);
        }
        debug!(task_id = %handle, attempt, status = ?status.status, "task still running");

        if attempt < options.max_attempts {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => return Err(TaskError::Cancelled),
                _ = tokio::time::sleep(options.interval) => {}
            }
        }
    }

    warn!(task_id = %handle, attempts = options.max_attempts, "task polling timed out");
    Err(TaskError::PollTimeout {
        attempts: options.max_attempts,
    })
}
