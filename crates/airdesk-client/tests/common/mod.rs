/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and mock helpers
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for airdesk-client tests

#![allow(dead_code)]

use airdesk_client::{ClientConfig, PollOptions, TaskClient, TaskHook};
use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

/// Client against `server` with a fast poll budget
pub fn fast_client(server: &MockServer, max_attempts: u32) -> TaskClient {
    let config = ClientConfig {
        poll: PollOptions::new(Duration::from_millis(5), max_attempts),
        ..ClientConfig::default()
    };
    TaskClient::with_config_and_base_url(config, &server.uri()).expect("client init")
}

pub fn fast_hook(server: &MockServer, max_attempts: u32) -> TaskHook {
    TaskHook::from_client(fast_client(server, max_attempts))
}

/// create-task answers with `body`
pub async fn mount_create_task(server: &MockServer, body: Value) {
    Mock::given(method("POST"))
        .and(path("/create-task"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// tasks/{id} answers with `body` for the next `times` requests
pub async fn mount_status_times(server: &MockServer, task_id: &str, body: Value, times: u64) {
    Mock::given(method("GET"))
        .and(path(format!("/tasks/{task_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .up_to_n_times(times)
        .mount(server)
        .await;
}

/// tasks/{id} answers with `body` indefinitely
pub async fn mount_status(server: &MockServer, task_id: &str, body: Value) {
    Mock::given(method("GET"))
        .and(path(format!("/tasks/{task_id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

/// Number of requests the server saw for `request_path`
pub async fn request_count(server: &MockServer, request_path: &str) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| request.url.path() == request_path)
        .count()
}
