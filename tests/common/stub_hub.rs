//! In-process stand-in for the home automation hub REST API
//!
//! Serves just enough of the hub surface for the engine: the service
//! directory, the template document, the panel listing, and the
//! custom operation endpoint. Every operation call is recorded so
//! tests can assert on the exact wire payload.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use axum::Router;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use axum::routing::{get, post};
use serde_json::{Value, json};
use tokio::net::TcpListener;

/// One recorded custom-operation invocation
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub operation: String,
    pub body: Value,
    /// Authorization header as received, if any
    pub authorization: Option<String>,
}

/// Mutable behavior knobs shared with the running stub
#[derive(Default)]
pub struct HubBehavior {
    /// Companion-app device names listed under the notify domain
    pub devices: Mutex<Vec<String>>,
    /// Templates served from the template document endpoint
    pub templates: Mutex<Vec<Value>>,
    /// Panel listing served from the dashboard endpoint
    pub panels: Mutex<Value>,
    /// When set, the service directory answers 500
    pub fail_directory: AtomicBool,
    /// When set, the panel listing answers 500
    pub fail_panels: AtomicBool,
    /// When set, every custom operation call answers 500
    pub fail_operations: AtomicBool,
    /// Every POSTed custom operation, in arrival order
    pub calls: Mutex<Vec<RecordedCall>>,
}

/// Handle to a running stub hub
pub struct StubHub {
    pub base_url: String,
    pub behavior: Arc<HubBehavior>,
}

impl StubHub {
    /// Bind to a random port and start serving
    pub async fn spawn() -> Self {
        let behavior = Arc::new(HubBehavior {
            devices: Mutex::new(vec![
                "eds_iphone".to_string(),
                "pixel_7".to_string(),
                "garage_tablet".to_string(),
            ]),
            panels: Mutex::new(json!({})),
            ..Default::default()
        });

        let router = Router::new()
            .route("/api/services", get(list_services))
            .route("/api/notify_manager/templates", get(list_templates))
            .route("/api/panels", get(list_panels))
            .route(
                "/api/services/notify_manager/:operation",
                post(call_operation),
            )
            .with_state(behavior.clone());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            behavior,
        }
    }

    /// Every recorded operation call so far
    pub fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.behavior.calls.lock().unwrap().clone()
    }

    /// Bodies of recorded calls for one operation
    pub fn calls_for(&self, operation: &str) -> Vec<Value> {
        self.recorded_calls()
            .into_iter()
            .filter(|call| call.operation == operation)
            .map(|call| call.body)
            .collect()
    }

    /// Make every subsequent operation call fail (or succeed again)
    pub fn fail_operations(&self, fail: bool) {
        self.behavior.fail_operations.store(fail, Ordering::SeqCst);
    }
}

async fn list_services(State(behavior): State<Arc<HubBehavior>>) -> Response {
    if behavior.fail_directory.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))).into_response();
    }

    let mut services = serde_json::Map::new();
    for device in behavior.devices.lock().unwrap().iter() {
        services.insert(format!("mobile_app_{}", device), json!({}));
    }
    // A notify service that is not a companion-app endpoint
    services.insert("persistent_notification".to_string(), json!({}));

    Json(json!([
        { "domain": "notify", "services": services },
        {
            "domain": "notify_manager",
            "services": {
                "send_advanced": {},
                "send_tts": {},
                "clear_notifications": {},
                "save_templates": {},
                "save_groups": {}
            }
        }
    ]))
    .into_response()
}

async fn list_templates(State(behavior): State<Arc<HubBehavior>>) -> Json<Value> {
    let templates = behavior.templates.lock().unwrap().clone();
    Json(json!({ "templates": templates }))
}

async fn list_panels(State(behavior): State<Arc<HubBehavior>>) -> Response {
    if behavior.fail_panels.load(Ordering::SeqCst) {
        return (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({}))).into_response();
    }

    Json(behavior.panels.lock().unwrap().clone()).into_response()
}

async fn call_operation(
    State(behavior): State<Arc<HubBehavior>>,
    Path(operation): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> StatusCode {
    let authorization = headers
        .get("authorization")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    behavior.calls.lock().unwrap().push(RecordedCall {
        operation,
        body,
        authorization,
    });

    if behavior.fail_operations.load(Ordering::SeqCst) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}
