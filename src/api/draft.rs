//! Draft endpoints
//!
//! The engine holds exactly one draft. Edits arrive as sparse patches;
//! a field absent from the patch keeps its current value. Selection is
//! a single field, so picking a group inherently clears an explicit
//! device selection and vice versa.

use axum::extract::{Path, State};
use axum::response::Json;
use serde::Deserialize;

use crate::AppState;
use crate::data::{
    ActionButton, Draft, Importance, InterruptionLevel, MediaStream, NotificationKind, Priority,
    RecipientSelection, Template, Visibility,
};
use crate::error::AppError;
use crate::service::{ButtonPreset, button_presets, preset_buttons};

/// At most this many buttons fit a notification
const MAX_BUTTONS: usize = 3;

/// Sparse draft update
///
/// Mirrors every draft field as an optional.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DraftPatch {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<NotificationKind>,
    pub priority: Option<Priority>,
    pub buttons: Option<Vec<ActionButton>>,
    pub selection: Option<RecipientSelection>,

    pub camera_entity: Option<String>,
    pub image_url: Option<String>,
    pub video_url: Option<String>,
    pub audio_url: Option<String>,
    pub latitude: Option<String>,
    pub longitude: Option<String>,
    pub second_latitude: Option<String>,
    pub second_longitude: Option<String>,
    pub progress: Option<i64>,
    pub progress_max: Option<i64>,
    pub progress_indeterminate: Option<bool>,
    pub media_stream: Option<MediaStream>,

    pub click_action: Option<String>,
    pub group: Option<String>,
    pub tag: Option<String>,

    pub channel: Option<String>,
    pub importance: Option<Importance>,
    pub color: Option<String>,
    pub led_color: Option<String>,
    pub vibration_pattern: Option<String>,
    pub notification_icon: Option<String>,
    pub icon_url: Option<String>,
    pub sticky: Option<bool>,
    pub persistent: Option<bool>,
    pub alert_once: Option<bool>,
    pub timeout: Option<i64>,
    pub visibility: Option<Visibility>,
    pub car_ui: Option<bool>,
    pub chronometer: Option<bool>,

    pub sound: Option<String>,
    pub badge: Option<i64>,
    pub interruption_level: Option<InterruptionLevel>,
    pub critical: Option<bool>,
    pub critical_volume: Option<f64>,

    pub hide_thumbnail: Option<bool>,
    pub lazy_load: Option<bool>,
    pub content_type: Option<String>,
}

impl DraftPatch {
    fn validate(&self) -> Result<(), AppError> {
        if let Some(ref buttons) = self.buttons {
            if buttons.len() > MAX_BUTTONS {
                return Err(AppError::Validation(format!(
                    "At most {} buttons are supported",
                    MAX_BUTTONS
                )));
            }
        }
        Ok(())
    }

    fn apply_to(self, draft: &mut Draft) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if let Some(value) = self.$field {
                    draft.$field = value;
                })*
            };
        }

        merge!(
            title,
            subtitle,
            message,
            kind,
            priority,
            buttons,
            selection,
            camera_entity,
            image_url,
            video_url,
            audio_url,
            latitude,
            longitude,
            second_latitude,
            second_longitude,
            progress,
            progress_max,
            progress_indeterminate,
            media_stream,
            click_action,
            group,
            tag,
            channel,
            importance,
            color,
            led_color,
            vibration_pattern,
            notification_icon,
            icon_url,
            sticky,
            persistent,
            alert_once,
            timeout,
            visibility,
            car_ui,
            chronometer,
            sound,
            badge,
            interruption_level,
            critical,
            critical_volume,
            hide_thumbnail,
            lazy_load,
            content_type,
        );
    }
}

/// GET /api/v1/draft
pub async fn get_draft(State(state): State<AppState>) -> Json<Draft> {
    Json(state.draft.read().await.clone())
}

/// PATCH /api/v1/draft
pub async fn patch_draft(
    State(state): State<AppState>,
    Json(patch): Json<DraftPatch>,
) -> Result<Json<Draft>, AppError> {
    patch.validate()?;

    let mut draft = state.draft.write().await;
    patch.apply_to(&mut draft);
    Ok(Json(draft.clone()))
}

/// POST /api/v1/draft/reset
pub async fn reset_draft(State(state): State<AppState>) -> Json<Draft> {
    let mut draft = state.draft.write().await;
    *draft = Draft::default();
    Json(draft.clone())
}

/// POST /api/v1/draft/template/:id
///
/// Merges the template into the draft; fields the template does not
/// define keep their current values.
pub async fn apply_template(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Draft>, AppError> {
    let template = state
        .presets
        .get_template(&id)
        .await
        .ok_or(AppError::NotFound)?;

    let mut draft = state.draft.write().await;
    draft.apply_template(&template);
    Ok(Json(draft.clone()))
}

/// Body for saving the current draft as a template
#[derive(Debug, Deserialize)]
pub struct CaptureRequest {
    pub name: String,
    /// Existing template id to overwrite; omit to create
    #[serde(default)]
    pub id: String,
}

/// POST /api/v1/draft/capture
///
/// Snapshots the draft as a named template and resets the draft,
/// ready for the next composition.
pub async fn capture_template(
    State(state): State<AppState>,
    Json(request): Json<CaptureRequest>,
) -> Result<Json<Template>, AppError> {
    let template = {
        let draft = state.draft.read().await;
        draft.capture_template(request.id, request.name)
    };

    let saved = state.presets.upsert_template(template).await?;

    let mut draft = state.draft.write().await;
    *draft = Draft::default();

    Ok(Json(saved))
}

/// GET /api/v1/button-presets
pub async fn list_button_presets() -> Json<Vec<ButtonPreset>> {
    Json(button_presets())
}

/// POST /api/v1/draft/buttons/:preset
///
/// Replaces the draft's buttons with a copy of the named preset.
pub async fn apply_button_preset(
    State(state): State<AppState>,
    Path(preset): Path<String>,
) -> Result<Json<Draft>, AppError> {
    let buttons = preset_buttons(&preset)
        .ok_or_else(|| AppError::Validation(format!("Unknown button preset: {}", preset)))?;

    let mut draft = state.draft.write().await;
    draft.buttons = buttons;
    Ok(Json(draft.clone()))
}
