//! Integration tests for the fal queue client against a mock server.

use std::time::Duration;

use assert_matches::assert_matches;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use comfyq_cloud::config::FalConfig;
use comfyq_cloud::error::CloudError;
use comfyq_cloud::fal::{FalClient, LogCursor, QueueStatus};

const APP_ID: &str = "fal-ai/recraft/v3/image-to-image";

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn test_config(server: &MockServer) -> FalConfig {
    FalConfig {
        queue_url: server.uri(),
        poll_interval: Duration::from_millis(10),
        max_wait: Duration::from_secs(5),
        ..FalConfig::new("test-key")
    }
}

async fn mount_submit(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path(format!("/{APP_ID}")))
        .and(header("authorization", "Key test-key"))
        .and(body_json(json!({ "prompt": "winter" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "request_id": "req-1",
            "status_url": format!("{}/requests/req-1/status", server.uri()),
            "response_url": format!("{}/requests/req-1", server.uri()),
        })))
        .expect(1)
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

/// Submit, one in-progress poll, one completed poll, then the result.
#[tokio::test]
async fn subscribe_polls_until_completed() {
    let server = MockServer::start().await;
    mount_submit(&server).await;

    Mock::given(method("GET"))
        .and(path("/requests/req-1/status"))
        .and(query_param("logs", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "IN_PROGRESS",
            "logs": [{ "message": "loading model" }],
        })))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/requests/req-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "COMPLETED",
            "logs": [{ "message": "loading model" }, { "message": "done" }],
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/requests/req-1"))
        .and(header("authorization", "Key test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "images": [{ "url": "https://cdn.example/out.webp" }],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = FalClient::new(&test_config(&server)).unwrap();
    let mut cursor = LogCursor::default();
    let mut printed = Vec::new();
    let mut statuses = Vec::new();

    let result = client
        .subscribe(APP_ID, &json!({ "prompt": "winter" }), |status| {
            statuses.push(status.is_completed());
            for entry in cursor.advance(status.logs()) {
                printed.push(entry.message.clone());
            }
        })
        .await
        .unwrap();

    assert_eq!(result["images"][0]["url"], "https://cdn.example/out.webp");
    assert_eq!(statuses, vec![false, true]);
    assert_eq!(printed, vec!["loading model", "done"]);
}

/// A request that never completes hits the configured wait limit.
#[tokio::test]
async fn subscribe_times_out() {
    let server = MockServer::start().await;
    mount_submit(&server).await;
    Mock::given(method("GET"))
        .and(path("/requests/req-1/status"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "status": "IN_QUEUE", "queue_position": 9 })),
        )
        .mount(&server)
        .await;

    let config = FalConfig {
        max_wait: Duration::from_millis(50),
        ..test_config(&server)
    };
    let client = FalClient::new(&config).unwrap();
    let err = client
        .subscribe(APP_ID, &json!({ "prompt": "winter" }), |_| {})
        .await
        .unwrap_err();

    assert_matches!(err, CloudError::Timeout { ref request_id, .. } if request_id == "req-1");
}

/// A rejected submission surfaces the status code and body.
#[tokio::test]
async fn submit_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/{APP_ID}")))
        .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
        .mount(&server)
        .await;

    let client = FalClient::new(&test_config(&server)).unwrap();
    let err = client.submit(APP_ID, &json!({})).await.unwrap_err();
    assert_matches!(err, CloudError::ApiError { status: 401, ref body } if body == "invalid key");
}

/// Status without logs does not send the `logs` query parameter.
#[tokio::test]
async fn status_without_logs() {
    let server = MockServer::start().await;
    mount_submit(&server).await;
    Mock::given(method("GET"))
        .and(path("/requests/req-1/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "status": "IN_QUEUE" })))
        .mount(&server)
        .await;

    let client = FalClient::new(&test_config(&server)).unwrap();
    let handle = client.submit(APP_ID, &json!({ "prompt": "winter" })).await.unwrap();
    let status = client.status(&handle, false).await.unwrap();
    assert_eq!(status, QueueStatus::InQueue { queue_position: None });

    let requests = server.received_requests().await.unwrap();
    let status_request = requests.iter().find(|r| r.url.path().ends_with("/status")).unwrap();
    assert!(status_request.url.query().is_none());
}
