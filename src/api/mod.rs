//! API layer
//!
//! HTTP handlers for:
//! - the composer panel API under /api/v1
//! - Metrics (Prometheus)

mod devices;
mod draft;
mod history;
pub mod metrics;
mod presets;
mod send;

pub use metrics::metrics_router;

use axum::{
    Router,
    routing::{get, post, put},
};

use crate::AppState;

/// Create the panel API router
///
/// Nested under `/api/v1` by the top-level router.
pub fn panel_api_router() -> Router<AppState> {
    Router::new()
        // Devices and other hub-derived listings
        .route("/devices", get(devices::list_devices))
        .route(
            "/devices/:name/platform",
            put(devices::set_platform).delete(devices::clear_platform),
        )
        .route("/catalog", get(devices::catalog))
        // Templates and groups
        .route(
            "/templates",
            get(presets::list_templates).post(presets::create_template),
        )
        .route(
            "/templates/:id",
            put(presets::update_template).delete(presets::delete_template),
        )
        .route(
            "/groups",
            get(presets::list_groups).post(presets::create_group),
        )
        .route(
            "/groups/:id",
            put(presets::update_group).delete(presets::delete_group),
        )
        // The draft
        .route("/draft", get(draft::get_draft).patch(draft::patch_draft))
        .route("/draft/reset", post(draft::reset_draft))
        .route("/draft/template/:id", post(draft::apply_template))
        .route("/draft/capture", post(draft::capture_template))
        .route("/draft/buttons/:preset", post(draft::apply_button_preset))
        .route("/button-presets", get(draft::list_button_presets))
        // Sending
        .route("/send", get(send::send_status).post(send::send))
        .route("/preview", post(send::preview))
        .route("/notifications/clear", post(send::clear_notifications))
        // History
        .route("/history", get(history::list_history))
}
