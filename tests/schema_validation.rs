//! Schema validation tests for the wire payloads and API documents
//!
//! Every payload shape the engine emits is locked to a JSON schema in
//! tests/schemas/. These tests exercise the real composition paths
//! and validate what actually goes out.

mod common;

use common::TestServer;
use common::schema_validator::assert_matches_schema;
use serde_json::{Value, json};

async fn preview_request(server: &TestServer, patch: Value) -> Value {
    server.patch_draft(patch).await;

    let preview: Value = server
        .client
        .post(&server.url("/api/v1/preview"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    preview["request"].clone()
}

#[tokio::test]
async fn test_minimal_send_matches_the_advanced_schema() {
    let server = TestServer::new().await;

    let request = preview_request(&server, json!({ "message": "Hi" })).await;
    assert_matches_schema(&request, "send_advanced");
}

#[tokio::test]
async fn test_fully_loaded_send_matches_the_advanced_schema() {
    let server = TestServer::new().await;

    server
        .patch_draft(json!({
            "type": "buttons",
            "title": "Front door",
            "message": "Person detected",
            "subtitle": "Camera 2",
            "click_action": "/lovelace/cameras",
            "group": "security",
            "tag": "front-door",
            "channel": "security",
            "importance": "high",
            "color": "#ff0000",
            "led_color": "red",
            "vibration_pattern": "100, 1000, 100",
            "notification_icon": "mdi:doorbell",
            "icon_url": "https://example.com/icon.png",
            "sticky": true,
            "persistent": true,
            "alert_once": true,
            "timeout": 600,
            "visibility": "private",
            "car_ui": true,
            "chronometer": true,
            "sound": "default",
            "badge": 3,
            "interruption_level": "time-sensitive",
            "critical": true,
            "critical_volume": 0.7,
            "hide_thumbnail": true,
            "lazy_load": true,
            "content_type": "image/png",
            "buttons": [
                { "action": "OPEN", "title": "Open", "authenticationRequired": true },
                { "action": "IGNORE", "title": "Ignore", "uri": "/lovelace/door" },
                { "action": "SILENCE", "title": "Silence", "destructive": true }
            ],
            "selection": { "mode": "devices", "names": ["eds_iphone"] }
        }))
        .await;

    let response = server
        .client
        .post(&server.url("/api/v1/send"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    // Validate the payload the hub actually received
    let calls = server.hub.calls_for("send_advanced");
    assert_eq!(calls.len(), 1);
    assert_matches_schema(&calls[0], "send_advanced");
}

#[tokio::test]
async fn test_map_send_matches_the_advanced_schema() {
    let server = TestServer::new().await;

    let request = preview_request(
        &server,
        json!({
            "type": "map",
            "message": "Meet here",
            "latitude": "52.52",
            "longitude": "13.405",
            "second_latitude": "52.5",
            "second_longitude": "13.4"
        }),
    )
    .await;

    assert_eq!(request["action_data"]["latitude"], 52.52);
    assert_matches_schema(&request, "send_advanced");
}

#[tokio::test]
async fn test_tts_send_matches_the_tts_schema() {
    let server = TestServer::new().await;

    let request = preview_request(
        &server,
        json!({
            "type": "tts",
            "message": "Dinner is ready",
            "media_stream": "alarm_stream",
            "selection": { "mode": "devices", "names": ["pixel_7"] }
        }),
    )
    .await;

    assert_eq!(request["media_stream"], "alarm_stream");
    assert_matches_schema(&request, "send_tts");
}

#[tokio::test]
async fn test_template_documents_match_the_template_schema() {
    let server = TestServer::new().await;

    let created: Value = server
        .client
        .post(&server.url("/api/v1/templates"))
        .json(&json!({
            "name": "Security alert",
            "title": "Alert",
            "message": "Motion detected",
            "type": "buttons",
            "priority": "high",
            "buttons": [{ "action": "ACK", "title": "Acknowledge" }],
            "channel": "security",
            "interruption_level": "time-sensitive",
            "critical": true,
            "critical_volume": 0.9
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_matches_schema(&created, "template");

    let listed: Value = server
        .client
        .get(&server.url("/api/v1/templates"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    for template in listed.as_array().unwrap() {
        assert_matches_schema(template, "template");
    }
}

#[tokio::test]
async fn test_history_entries_match_the_schema() {
    let server = TestServer::new().await;

    server.patch_draft(json!({ "message": "Logged" })).await;
    server
        .client
        .post(&server.url("/api/v1/send"))
        .send()
        .await
        .unwrap();

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
    assert_matches_schema(&entries[0], "history_entry");
}
