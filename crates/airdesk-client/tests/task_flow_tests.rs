/*
[INPUT]:  Mock task-service responses
[OUTPUT]: Test results for submit + poll + hook flows
[POS]:    Integration tests - task protocol end to end
[UPDATE]: When task endpoints or hook semantics change
*/

mod common;

use airdesk_client::{
    BookingDesk, ClientConfig, Deployment, FlightQuery, HttpMethod, TaskClient, TaskError,
    TaskHandle,
};
use common::{
    fast_client, fast_hook, mount_create_task, mount_status, mount_status_times, request_count,
    setup_mock_server,
};
use serde_json::json;
use tokio_test::{assert_err, assert_ok};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[test]
fn test_client_creation() {
    let _client = assert_ok!(TaskClient::new());
    let _client = assert_ok!(TaskClient::with_config(ClientConfig::for_deployment(
        Deployment::Internal
    )));
}

#[test]
fn test_proxy_deployment_requires_origin() {
    let err = assert_err!(TaskClient::with_config(ClientConfig::for_deployment(
        Deployment::Proxy
    )));
    assert!(matches!(err, TaskError::Config(_)));
}

#[tokio::test]
async fn test_execute_success_after_pending() {
    let server = setup_mock_server().await;
    mount_create_task(&server, json!({"task_id": "abc"})).await;
    mount_status_times(&server, "abc", json!({"status": "pending"}), 1).await;
    mount_status(
        &server,
        "abc",
        json!({"status": "success", "result": [{"flight_id": "F1"}]}),
    )
    .await;

    let hook = fast_hook(&server, 30);
    let result = assert_ok!(
        hook.execute("flight", "api/flights", json!({}), HttpMethod::Get)
            .await
    );

    assert_eq!(result, json!([{"flight_id": "F1"}]));
    assert!(!hook.loading());
    assert_eq!(hook.error(), None);
    assert_eq!(request_count(&server, "/tasks/abc").await, 2);
}

#[tokio::test]
async fn test_execute_failed_task_sets_error() {
    let server = setup_mock_server().await;
    mount_create_task(&server, json!({"task_id": "abc"})).await;
    mount_status_times(&server, "abc", json!({"status": "pending"}), 1).await;
    mount_status(
        &server,
        "abc",
        json!({"status": "failed", "result": {"message": "no seats"}}),
    )
    .await;

    let hook = fast_hook(&server, 30);
    let err = assert_err!(
        hook.execute("flight", "api/flights", json!({}), HttpMethod::Get)
            .await
    );

    assert!(matches!(err, TaskError::TaskFailed(_)));
    assert!(!hook.loading());
    assert_eq!(hook.error().as_deref(), Some("no seats"));
    assert_eq!(hook.last_result(), None);
}

#[tokio::test]
async fn test_poll_gives_up_after_budget() {
    let server = setup_mock_server().await;
    mount_status(&server, "slow", json!({"status": "pending"})).await;

    let client = fast_client(&server, 4);
    let handle = TaskHandle::new("slow").expect("handle");
    let err = assert_err!(client.poll(&handle).await);

    assert!(matches!(err, TaskError::PollTimeout { attempts: 4 }));
    assert_eq!(request_count(&server, "/tasks/slow").await, 4);
}

#[tokio::test]
async fn test_success_on_thirtieth_attempt() {
    let server = setup_mock_server().await;
    mount_status_times(&server, "abc", json!({"status": "pending"}), 29).await;
    mount_status(&server, "abc", json!({"status": "success", "result": "done"})).await;

    let client = fast_client(&server, 30);
    let handle = TaskHandle::new("abc").expect("handle");
    let status = assert_ok!(client.poll(&handle).await);

    assert_eq!(status.result, Some(json!("done")));
    assert_eq!(request_count(&server, "/tasks/abc").await, 30);
}

#[tokio::test]
async fn test_create_task_server_error_reaches_hook() {
    let server = setup_mock_server().await;
    Mock::given(method("POST"))
        .and(path("/create-task"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let hook = fast_hook(&server, 3);
    let err = assert_err!(
        hook.execute("user", "api/users", json!({}), HttpMethod::Get)
            .await
    );

    assert!(err.is_transport());
    assert!(err.is_retryable());
    assert_eq!(hook.error().as_deref(), Some("HTTP status 503: maintenance"));
    assert_eq!(request_count(&server, "/tasks/abc").await, 0);
}

#[tokio::test]
async fn test_booking_desk_over_http() {
    let server = setup_mock_server().await;
    mount_create_task(&server, json!("t-9")).await;
    mount_status(
        &server,
        "t-9",
        json!({
            "status": "success",
            "result": [
                {"flight_id": "F0000001", "name": "Morning hop", "origin": "ATH", "destination": "SKG"},
                {"flight_id": "F0000002", "name": "Evening hop", "origin": "ATH", "destination": "RHO"}
            ]
        }),
    )
    .await;

    let desk = BookingDesk::new(fast_hook(&server, 5));
    let flights = assert_ok!(desk.search_flights(&FlightQuery::default()).await);

    assert_eq!(flights.len(), 2);
    assert_eq!(flights[1].destination, "RHO");
    assert!(!desk.hook().loading());
}
