//! E2E tests for the notification history

mod common;

use common::TestServer;
use serde_json::{Value, json};

async fn send_message(server: &TestServer, message: &str) {
    server.patch_draft(json!({ "message": message })).await;
    let response = server
        .client
        .post(&server.url("/api/v1/send"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    // History ids only order across millisecond boundaries
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
}

#[tokio::test]
async fn test_history_lists_newest_first() {
    let server = TestServer::new().await;

    send_message(&server, "first").await;
    send_message(&server, "second").await;

    let history: Value = server
        .client
        .get(&server.url("/api/v1/history"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let entries = history.as_array().unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["message"], "second");
    assert_eq!(entries[1]["message"], "first");
    assert_eq!(entries[0]["outcome"], "succeeded");
    assert_eq!(entries[0]["operation"], "send_advanced");
    assert_eq!(entries[0]["title"], "Home Assistant");

    // The full composed request is kept verbatim
    let recorded: Value =
        serde_json::from_str(entries[0]["request"].as_str().unwrap()).unwrap();
    assert_eq!(recorded["message"], "second");
}

#[tokio::test]
async fn test_history_records_failures_too() {
    let server = TestServer::new().await;
    server.hub.fail_operations(true);

    server.patch_draft(json!({ "message": "doomed" })).await;
    let response = server
        .client
        .post(&server.url("/api/v1/send"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 502);

    let history: Value = server
        .client
        .get(&server.url("/api/v1/history"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let entries = history.as_array().unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["outcome"], "failed");
}

#[tokio::test]
async fn test_history_limit_narrows_the_window() {
    let server = TestServer::new().await;

    for message in ["one", "two", "three"] {
        send_message(&server, message).await;
    }

    let history: Value = server
        .client
        .get(&server.url("/api/v1/history?limit=2"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let entries = history.as_array().unwrap();

    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["message"], "three");
    assert_eq!(entries[1]["message"], "two");
}
