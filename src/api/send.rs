//! Send, preview and clear endpoints
//!
//! These run the composition pipeline: snapshot the draft, resolve
//! recipients, compose, and (except for preview) dispatch.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::data::RecipientSelection;
use crate::error::AppError;
use crate::metrics::{COMPOSE_TOTAL, HTTP_REQUEST_DURATION_SECONDS, HTTP_REQUESTS_TOTAL};
use crate::service::{ResolvedTargets, SendReceipt, SendStatus, compose, resolve_targets};

/// Resolve the given selection against current groups and overrides
async fn resolve_selection(state: &AppState, selection: &RecipientSelection) -> ResolvedTargets {
    let groups = state.presets.list_groups().await;
    resolve_targets(selection, &groups, &state.registry.snapshot())
}

/// POST /api/v1/send
pub async fn send(State(state): State<AppState>) -> Result<Json<SendReceipt>, AppError> {
    let _timer = HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&["POST", "/api/v1/send"])
        .start_timer();

    let draft = state.draft.read().await.clone();
    let targets = resolve_selection(&state, &draft.selection).await;

    let receipt = state.sender.send(&draft, &targets).await?;

    HTTP_REQUESTS_TOTAL
        .with_label_values(&["POST", "/api/v1/send", "200"])
        .inc();

    Ok(Json(receipt))
}

/// GET /api/v1/send
pub async fn send_status(State(state): State<AppState>) -> Json<SendStatus> {
    Json(state.sender.status())
}

/// Composed request, rendered without dispatching
#[derive(Debug, Serialize)]
pub struct PreviewView {
    pub operation: String,
    pub request: serde_json::Value,
    pub target_count: usize,
}

/// POST /api/v1/preview
///
/// Runs the composer on the current draft. Validation failures
/// surface exactly as they would on send; nothing is dispatched and
/// the lifecycle is untouched.
pub async fn preview(State(state): State<AppState>) -> Result<Json<PreviewView>, AppError> {
    let draft = state.draft.read().await.clone();
    let targets = resolve_selection(&state, &draft.selection).await;

    let composed = compose(&draft, &targets)?;

    COMPOSE_TOTAL
        .with_label_values(&[draft.kind.as_str()])
        .inc();

    Ok(Json(PreviewView {
        operation: composed.operation.as_str().to_string(),
        request: composed.request,
        target_count: targets.devices.len(),
    }))
}

/// Body for clearing delivered notifications
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClearRequest {
    pub tag: String,
    pub selection: Option<RecipientSelection>,
}

/// POST /api/v1/notifications/clear
///
/// Resolves recipients like a send and dismisses notifications on
/// them, optionally narrowed by tag. The draft is not involved.
pub async fn clear_notifications(
    State(state): State<AppState>,
    Json(request): Json<ClearRequest>,
) -> Result<StatusCode, AppError> {
    let selection = request.selection.unwrap_or(RecipientSelection::All);
    let targets = resolve_selection(&state, &selection).await;

    state.sender.clear(&request.tag, &targets).await?;

    Ok(StatusCode::NO_CONTENT)
}
