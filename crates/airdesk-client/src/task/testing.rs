/*
[INPUT]:  Scripted submit outcome and status sequence
[OUTPUT]: In-memory TaskBackend that records submissions and fetch counts
[POS]:    Test support - drives hook, poll and desk unit tests without HTTP
[UPDATE]: When TaskBackend gains methods or tests need new script steps
*/

use async_trait::async_trait;
use serde_json::Value;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use super::backend::TaskBackend;
use crate::http::{Result, TaskError};
use crate::types::{TaskHandle, TaskStatus, TaskSubmission};

pub(crate) fn status(value: Value) -> TaskStatus {
    serde_json::from_value(value).expect("status fixture")
}

pub(crate) struct ScriptedBackend {
    handle: Mutex<Option<TaskError>>,
    handle_id: String,
    statuses: Mutex<VecDeque<Result<TaskStatus>>>,
    fallback: Option<TaskStatus>,
    submissions: Mutex<Vec<TaskSubmission>>,
    fetches: AtomicU32,
}

impl ScriptedBackend {
    pub(crate) fn new(handle_id: &str) -> Self {
        Self {
            handle: Mutex::new(None),
            handle_id: handle_id.to_string(),
            statuses: Mutex::new(VecDeque::new()),
            fallback: None,
            submissions: Mutex::new(Vec::new()),
            fetches: AtomicU32::new(0),
        }
    }

    /// Make the next `create_task` fail with `err`
    pub(crate) fn failing_submit(self, err: TaskError) -> Self {
        *self.handle.lock().expect("lock") = Some(err);
        self
    }

    pub(crate) fn then_status(self, status: TaskStatus) -> Self {
        self.statuses.lock().expect("lock").push_back(Ok(status));
        self
    }

    pub(crate) fn then_error(self, err: TaskError) -> Self {
        self.statuses.lock().expect("lock").push_back(Err(err));
        self
    }

    /// Answer with `status` once the script runs out
    pub(crate) fn always_status(mut self, status: TaskStatus) -> Self {
        self.fallback = Some(status);
        self
    }

    pub(crate) fn fetch_count(&self) -> u32 {
        self.fetches.load(Ordering::SeqCst)
    }

    pub(crate) fn submissions(&self) -> Vec<TaskSubmission> {
        self.submissions.lock().expect("lock").clone()
    }
}

#[async_trait]
impl TaskBackend for ScriptedBackend {
    async fn create_task(&self, submission: &TaskSubmission) -> Result<TaskHandle> {
        self.submissions.lock().expect("lock").push(submission.clone());
        if let Some(err) = self.handle.lock().expect("lock").take() {
            return Err(err);
        }
        Ok(TaskHandle::new(self.handle_id.clone()).expect("non-empty handle"))
    }

    async fn task_status(&self, _handle: &TaskHandle) -> Result<TaskStatus> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let next = self.statuses.lock().expect("lock").pop_front();
        match next {
            Some(result) => result,
            None => Ok(self
                .fallback
                .clone()
                .expect("status script exhausted without a fallback")),
        }
    }
}
