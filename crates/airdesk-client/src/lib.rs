/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public airdesk client crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod desk;
pub mod http;
pub mod task;
pub mod types;

// Re-export commonly used types from http
pub use http::{ClientConfig, Deployment, Result, TaskClient, TaskError};

// Re-export commonly used types from task
pub use task::{
    HookState,
    PollOptions,
    TaskBackend,
    TaskHook,
    TaskOutcome,
    failure_message,
    poll_task,
};

// Re-export commonly used types from desk
pub use desk::{BookingDesk, BookingLedger};

// Re-export all types
pub use types::*;
