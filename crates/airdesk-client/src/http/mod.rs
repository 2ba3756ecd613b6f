/*
[INPUT]:  HTTP client configuration and task-service endpoints
[OUTPUT]: HTTP responses and typed task results
[POS]:    HTTP layer - REST communication with the task service
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod error;
pub mod tasks;

pub use error::{Result, TaskError};

pub use client::{ClientConfig, Deployment, TaskClient};
