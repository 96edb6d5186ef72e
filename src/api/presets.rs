//! Template and group endpoints
//!
//! Thin wrappers over the preset store. Validation and the dual-tier
//! persistence discipline live in the store itself.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;

use crate::AppState;
use crate::data::{DeviceGroup, Template};
use crate::error::AppError;

// =============================================================================
// Templates
// =============================================================================

/// GET /api/v1/templates
pub async fn list_templates(State(state): State<AppState>) -> Json<Vec<Template>> {
    Json(state.presets.list_templates().await)
}

/// POST /api/v1/templates
pub async fn create_template(
    State(state): State<AppState>,
    Json(mut template): Json<Template>,
) -> Result<Json<Template>, AppError> {
    // Creation always mints the id
    template.id = String::new();
    let saved = state.presets.upsert_template(template).await?;
    Ok(Json(saved))
}

/// PUT /api/v1/templates/:id
pub async fn update_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut template): Json<Template>,
) -> Result<Json<Template>, AppError> {
    template.id = id;
    let saved = state.presets.upsert_template(template).await?;
    Ok(Json(saved))
}

/// DELETE /api/v1/templates/:id
pub async fn delete_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.presets.delete_template(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Groups
// =============================================================================

/// GET /api/v1/groups
pub async fn list_groups(State(state): State<AppState>) -> Json<Vec<DeviceGroup>> {
    Json(state.presets.list_groups().await)
}

/// POST /api/v1/groups
pub async fn create_group(
    State(state): State<AppState>,
    Json(mut group): Json<DeviceGroup>,
) -> Result<Json<DeviceGroup>, AppError> {
    group.id = String::new();
    let saved = state.presets.upsert_group(group).await?;
    Ok(Json(saved))
}

/// PUT /api/v1/groups/:id
pub async fn update_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(mut group): Json<DeviceGroup>,
) -> Result<Json<DeviceGroup>, AppError> {
    group.id = id;
    let saved = state.presets.upsert_group(group).await?;
    Ok(Json(saved))
}

/// DELETE /api/v1/groups/:id
pub async fn delete_group(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.presets.delete_group(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
