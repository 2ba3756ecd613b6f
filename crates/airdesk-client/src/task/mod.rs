/*
[INPUT]:  Task submissions routed through a TaskBackend
[OUTPUT]: Polling loop, outcome classification and the stateful TaskHook
[POS]:    Task layer - protocol semantics above the HTTP transport
[UPDATE]: When adding task lifecycle features
*/

pub mod backend;
pub mod failure;
pub mod hook;
pub mod poll;

#[cfg(test)]
pub(crate) mod testing;

pub use backend::TaskBackend;
pub use failure::{TaskOutcome, failure_message};
pub use hook::{HookState, TaskHook};
pub use poll::{PollOptions, poll_task};
