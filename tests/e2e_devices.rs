//! E2E tests for the device directory and platform overrides
//!
//! The device list always comes live from the hub; only the platform
//! overrides persist in the engine.

mod common;

use std::sync::atomic::Ordering;

use common::TestServer;
use serde_json::{Value, json};

#[tokio::test]
async fn test_device_listing_classifies_platforms() {
    let server = TestServer::new().await;

    let response = server
        .client
        .get(&server.url("/api/v1/devices"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let listing: Value = response.json().await.unwrap();
    let devices = listing["devices"].as_array().unwrap();

    // Sorted by name; the notify service without the companion-app
    // prefix is not a device and never appears
    assert_eq!(devices.len(), 3);
    assert_eq!(devices[0]["name"], "eds_iphone");
    assert_eq!(devices[0]["platform"], "ios");
    assert_eq!(devices[0]["source"], "inferred");

    assert_eq!(devices[1]["name"], "garage_tablet");
    assert!(devices[1].get("platform").is_none());
    assert_eq!(devices[1]["source"], "unknown");

    assert_eq!(devices[2]["name"], "pixel_7");
    assert_eq!(devices[2]["platform"], "android");

    assert_eq!(listing["custom_operations"], 5);
}

#[tokio::test]
async fn test_platform_override_round_trip() {
    let server = TestServer::new().await;

    // garage_tablet cannot be inferred from its name; override it
    let response = server
        .client
        .put(&server.url("/api/v1/devices/garage_tablet/platform"))
        .json(&json!({ "platform": "android" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let overridden: Value = response.json().await.unwrap();
    assert_eq!(overridden["platform"], "android");
    assert_eq!(overridden["source"], "override");

    // The listing reflects the override
    let listing: Value = server
        .client
        .get(&server.url("/api/v1/devices"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tablet = listing["devices"]
        .as_array()
        .unwrap()
        .iter()
        .find(|device| device["name"] == "garage_tablet")
        .unwrap();
    assert_eq!(tablet["platform"], "android");
    assert_eq!(tablet["source"], "override");

    // Clearing falls back to name inference, which knows nothing here
    let response = server
        .client
        .delete(&server.url("/api/v1/devices/garage_tablet/platform"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let cleared: Value = response.json().await.unwrap();
    assert!(cleared.get("platform").is_none());
    assert_eq!(cleared["source"], "unknown");
}

#[tokio::test]
async fn test_override_beats_inference_in_the_listing() {
    let server = TestServer::new().await;

    // Reclassify a device whose name says iPhone
    server
        .client
        .put(&server.url("/api/v1/devices/eds_iphone/platform"))
        .json(&json!({ "platform": "android" }))
        .send()
        .await
        .unwrap();

    let listing: Value = server
        .client
        .get(&server.url("/api/v1/devices"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let device = listing["devices"]
        .as_array()
        .unwrap()
        .iter()
        .find(|device| device["name"] == "eds_iphone")
        .unwrap();
    assert_eq!(device["platform"], "android");
    assert_eq!(device["source"], "override");
}

#[tokio::test]
async fn test_directory_failure_maps_to_bad_gateway() {
    let server = TestServer::new().await;
    server
        .hub
        .behavior
        .fail_directory
        .store(true, Ordering::SeqCst);

    let response = server
        .client
        .get(&server.url("/api/v1/devices"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().contains("500"));
}

#[tokio::test]
async fn test_catalog_lists_dashboards_only() {
    let server = TestServer::new().await;
    *server.hub.behavior.panels.lock().unwrap() = json!({
        "lovelace": {
            "component_name": "lovelace",
            "title": "Overview",
            "url_path": "lovelace"
        },
        "energy": {
            "component_name": "energy",
            "title": "Energy",
            "url_path": "energy"
        },
        "cameras": {
            "component_name": "lovelace",
            "title": null,
            "url_path": "dashboard-cameras"
        }
    });

    let response = server
        .client
        .get(&server.url("/api/v1/catalog"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let dashboards: Value = response.json().await.unwrap();
    let list = dashboards.as_array().unwrap();

    // Non-dashboard panels are filtered; a missing title falls back
    // to the path
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["path"], "/dashboard-cameras");
    assert_eq!(list[0]["title"], "dashboard-cameras");
    assert_eq!(list[1]["path"], "/lovelace");
    assert_eq!(list[1]["title"], "Overview");
}

#[tokio::test]
async fn test_catalog_failure_resolves_to_an_empty_list() {
    let server = TestServer::new().await;
    server.hub.behavior.fail_panels.store(true, Ordering::SeqCst);

    // The catalog is best effort: a hub failure never becomes a 502
    let response = server
        .client
        .get(&server.url("/api/v1/catalog"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let dashboards: Value = response.json().await.unwrap();
    assert_eq!(dashboards, json!([]));

    // A panel document that does not parse resolves the same way
    server.hub.behavior.fail_panels.store(false, Ordering::SeqCst);
    *server.hub.behavior.panels.lock().unwrap() = json!(["not", "a", "panel", "map"]);

    let response = server
        .client
        .get(&server.url("/api/v1/catalog"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let dashboards: Value = response.json().await.unwrap();
    assert_eq!(dashboards, json!([]));
}
