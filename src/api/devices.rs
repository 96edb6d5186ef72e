//! Device endpoints
//!
//! The device list itself always comes fresh from the hub's service
//! directory; only platform overrides live in this engine.

use axum::extract::{Path, State};
use axum::response::Json;
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::data::Platform;
use crate::error::AppError;
use crate::service::infer_platform;

/// One device in the directory listing
#[derive(Debug, Serialize)]
pub struct DeviceView {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub platform: Option<Platform>,
    /// Where the platform came from: "override", "inferred" or "unknown"
    pub source: &'static str,
}

fn device_view(name: String, platform: Option<Platform>, overridden: bool) -> DeviceView {
    let source = if overridden {
        "override"
    } else if platform.is_some() {
        "inferred"
    } else {
        "unknown"
    };

    DeviceView {
        name,
        platform,
        source,
    }
}

/// Directory listing response
#[derive(Debug, Serialize)]
pub struct DirectoryView {
    pub devices: Vec<DeviceView>,
    pub custom_operations: usize,
}

/// GET /api/v1/devices
pub async fn list_devices(State(state): State<AppState>) -> Result<Json<DirectoryView>, AppError> {
    let listing = state.directory.list_devices().await?;
    let lookup = state.registry.snapshot();

    let devices = listing
        .devices
        .into_iter()
        .map(|name| {
            let overridden = lookup.is_overridden(&name);
            let platform = lookup.platform_of(&name);
            device_view(name, platform, overridden)
        })
        .collect();

    Ok(Json(DirectoryView {
        devices,
        custom_operations: listing.custom_operations,
    }))
}

/// Platform override request body
#[derive(Debug, Deserialize)]
pub struct SetPlatformRequest {
    pub platform: Platform,
}

/// PUT /api/v1/devices/:name/platform
pub async fn set_platform(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<SetPlatformRequest>,
) -> Result<Json<DeviceView>, AppError> {
    state.registry.set_override(&name, request.platform).await?;

    tracing::info!(device = %name, platform = request.platform.as_str(), "Platform override set");

    Ok(Json(device_view(name, Some(request.platform), true)))
}

/// DELETE /api/v1/devices/:name/platform
pub async fn clear_platform(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<DeviceView>, AppError> {
    state.registry.clear_override(&name).await?;

    let platform = infer_platform(&name);
    Ok(Json(device_view(name, platform, false)))
}

/// GET /api/v1/catalog
///
/// Navigable destinations for the click-action field. Always answers;
/// a hub failure yields an empty list.
pub async fn catalog(State(state): State<AppState>) -> Json<Vec<crate::hub::Dashboard>> {
    Json(state.catalog.list_dashboards().await)
}
