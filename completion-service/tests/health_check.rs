//! Integration tests for the health endpoint and request correlation.

mod common;

use common::TestApp;
use reqwest::Client;

#[tokio::test]
async fn health_check_returns_ok_with_parseable_time() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/", app.address))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status().as_u16(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");

    let time = body["time"].as_str().expect("time should be a string");
    assert!(time.ends_with('Z'), "timestamp should be UTC: {}", time);
    chrono::DateTime::parse_from_rfc3339(time).expect("time should be RFC 3339");

    app.cleanup().await;
}

#[tokio::test]
async fn concurrent_requests_get_distinct_request_ids() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let (first, second) = tokio::join!(
        client.get(format!("{}/", app.address)).send(),
        client.get(format!("{}/", app.address)).send(),
    );
    let first = first.expect("Failed to send first request");
    let second = second.expect("Failed to send second request");

    let first_id = first
        .headers()
        .get("x-request-id")
        .expect("first response should carry a request id")
        .to_str()
        .unwrap()
        .to_string();
    let second_id = second
        .headers()
        .get("x-request-id")
        .expect("second response should carry a request id")
        .to_str()
        .unwrap()
        .to_string();

    assert_ne!(first_id, second_id);

    app.cleanup().await;
}

#[tokio::test]
async fn inbound_request_id_is_echoed() {
    let app = TestApp::spawn().await;
    let client = Client::new();

    let response = client
        .get(format!("{}/", app.address))
        .header("x-request-id", "test-correlation-id")
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|h| h.to_str().ok()),
        Some("test-correlation-id")
    );

    app.cleanup().await;
}
