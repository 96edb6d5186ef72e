//! Notification history endpoint

use axum::extract::{Query, State};
use axum::response::Json;
use serde::Deserialize;

use crate::AppState;
use crate::data::HistoryEntry;
use crate::error::AppError;

#[derive(Debug, Default, Deserialize)]
pub struct HistoryParams {
    pub limit: Option<i64>,
}

/// GET /api/v1/history
///
/// Newest first. The table itself is already capped, so the limit
/// only narrows the window further.
pub async fn list_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let cap = state.config.engine.history_limit;
    let limit = params.limit.unwrap_or(cap).clamp(1, cap);

    let entries = state.db.get_history(limit).await?;
    Ok(Json(entries))
}
