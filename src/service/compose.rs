//! Payload composition
//!
//! Maps a Draft plus resolved targets into a single normalized request
//! object and picks the hub operation to invoke. The payload is
//! sparse: a field at its documented default is omitted, meaning "use
//! the platform default", never "explicitly disable".
//!
//! `compose` is pure. No I/O, no clock, no mutation of the draft;
//! callers use it both for dispatch and for preview rendering.

use serde_json::{Map, Value, json};

use crate::data::{
    ActionButton, Draft, Importance, InterruptionLevel, NotificationKind, Platform, Visibility,
};
use crate::error::AppError;
use crate::service::recipients::ResolvedTargets;

/// Fallback title when the draft leaves the title empty
const DEFAULT_TITLE: &str = "Home Assistant";

/// Platform display constraint on action buttons
const MAX_BUTTONS: usize = 3;

/// Abstract operations the hub exposes for delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOperation {
    /// Generic notification send
    Advanced,
    /// Text-to-speech announcement
    Tts,
    /// Dismiss previously delivered notifications
    ClearNotifications,
}

impl SendOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            SendOperation::Advanced => "send_advanced",
            SendOperation::Tts => "send_tts",
            SendOperation::ClearNotifications => "clear_notifications",
        }
    }
}

/// A composed outbound request, ready for the dispatch transport
#[derive(Debug, Clone)]
pub struct ComposedRequest {
    pub operation: SendOperation,
    pub request: Value,
}

fn insert_text(data: &mut Map<String, Value>, key: &str, value: &str) {
    if !value.is_empty() {
        data.insert(key.to_string(), json!(value));
    }
}

fn insert_flag(data: &mut Map<String, Value>, key: &str, value: bool) {
    if value {
        data.insert(key.to_string(), json!(true));
    }
}

/// Parse a coordinate pair; both halves must be present and parseable
///
/// Anything else means the pair is omitted entirely rather than sent
/// as zero or NaN.
fn parse_pin(latitude: &str, longitude: &str) -> Option<(f64, f64)> {
    let latitude = latitude.trim();
    let longitude = longitude.trim();

    if latitude.is_empty() || longitude.is_empty() {
        return None;
    }

    Some((latitude.parse().ok()?, longitude.parse().ok()?))
}

/// Compose the outbound request for a draft
///
/// Fails with a `Validation` error only when the message is empty and
/// the notification type is not TTS; every optional field simply
/// composes sparse.
pub fn compose(draft: &Draft, targets: &ResolvedTargets) -> Result<ComposedRequest, AppError> {
    if draft.message.is_empty() && draft.kind != NotificationKind::Tts {
        return Err(AppError::Validation("Message is required".to_string()));
    }

    let mut data = Map::new();

    // Base fields, always present
    let title = if draft.title.is_empty() {
        DEFAULT_TITLE
    } else {
        &draft.title
    };
    data.insert("title".to_string(), json!(title));
    data.insert("message".to_string(), json!(draft.message));

    insert_text(&mut data, "subtitle", &draft.subtitle);
    insert_text(&mut data, "clickAction", &draft.click_action);
    insert_text(&mut data, "group", &draft.group);
    insert_text(&mut data, "tag", &draft.tag);

    // Absent target means "broadcast to all"
    if !targets.devices.is_empty() {
        data.insert("target".to_string(), json!(targets.devices));
    }

    // Android options
    insert_text(&mut data, "channel", &draft.channel);
    if draft.importance != Importance::Default {
        data.insert("importance".to_string(), json!(draft.importance.as_str()));
    }
    insert_text(&mut data, "color", &draft.color);
    insert_text(&mut data, "ledColor", &draft.led_color);
    insert_text(&mut data, "vibrationPattern", &draft.vibration_pattern);
    insert_text(&mut data, "notification_icon", &draft.notification_icon);
    insert_text(&mut data, "icon_url", &draft.icon_url);
    insert_flag(&mut data, "sticky", draft.sticky);
    insert_flag(&mut data, "persistent", draft.persistent);
    insert_flag(&mut data, "alert_once", draft.alert_once);
    if draft.timeout > 0 {
        data.insert("timeout".to_string(), json!(draft.timeout));
    }
    if draft.visibility != Visibility::Public {
        data.insert("visibility".to_string(), json!(draft.visibility.as_str()));
    }
    insert_flag(&mut data, "car_ui", draft.car_ui);
    insert_flag(&mut data, "chronometer", draft.chronometer);

    // iOS options
    insert_text(&mut data, "sound", &draft.sound);
    if draft.badge > 0 {
        data.insert("badge".to_string(), json!(draft.badge));
    }
    if draft.interruption_level != InterruptionLevel::Active {
        data.insert(
            "interruption-level".to_string(),
            json!(draft.interruption_level.as_str()),
        );
    }
    if draft.critical {
        data.insert(
            "push".to_string(),
            json!({ "sound": { "critical": 1, "volume": draft.critical_volume } }),
        );
    }

    // Type-specific branch
    let mut operation = SendOperation::Advanced;
    match draft.kind {
        NotificationKind::Simple => {}
        NotificationKind::Buttons => {
            let actions: Vec<&ActionButton> = draft
                .buttons
                .iter()
                .filter(|button| button.is_complete())
                .take(MAX_BUTTONS)
                .collect();
            if !actions.is_empty() {
                data.insert("actions".to_string(), json!(actions));
            }
        }
        NotificationKind::Image => {
            insert_text(&mut data, "camera_entity", &draft.camera_entity);
            insert_text(&mut data, "image", &draft.image_url);
        }
        NotificationKind::Media => {
            insert_text(&mut data, "image", &draft.image_url);
            insert_text(&mut data, "video", &draft.video_url);
            // Audio attachments only play on iOS
            if targets.platforms.contains(Platform::Ios) {
                insert_text(&mut data, "audio", &draft.audio_url);
            }
        }
        NotificationKind::Tts => {
            operation = SendOperation::Tts;
            data.insert("tts_text".to_string(), json!(draft.message));
            data.insert(
                "media_stream".to_string(),
                json!(draft.media_stream.as_str()),
            );
        }
        NotificationKind::Map => {
            if let Some((latitude, longitude)) = parse_pin(&draft.latitude, &draft.longitude) {
                let mut action_data = Map::new();
                action_data.insert("latitude".to_string(), json!(latitude));
                action_data.insert("longitude".to_string(), json!(longitude));
                if let Some((latitude, longitude)) =
                    parse_pin(&draft.second_latitude, &draft.second_longitude)
                {
                    action_data.insert("second_latitude".to_string(), json!(latitude));
                    action_data.insert("second_longitude".to_string(), json!(longitude));
                }
                data.insert("action_data".to_string(), Value::Object(action_data));
            }
        }
        NotificationKind::Progress => {
            data.insert("progress".to_string(), json!(draft.progress));
            data.insert("progress_max".to_string(), json!(draft.progress_max));
            insert_flag(&mut data, "progress_indeterminate", draft.progress_indeterminate);
        }
    }

    // Attachment options
    insert_flag(&mut data, "hide-thumbnail", draft.hide_thumbnail);
    insert_flag(&mut data, "lazy", draft.lazy_load);
    insert_text(&mut data, "content-type", &draft.content_type);

    Ok(ComposedRequest {
        operation,
        request: Value::Object(data),
    })
}

/// Compose a clear-notifications request
///
/// Dismissal is fire-and-forget: `{tag?, target?}`, both optional. An
/// absent target clears on every device.
pub fn compose_clear(tag: &str, targets: &ResolvedTargets) -> ComposedRequest {
    let mut data = Map::new();
    insert_text(&mut data, "tag", tag);

    if !targets.devices.is_empty() {
        data.insert("target".to_string(), json!(targets.devices));
    }

    ComposedRequest {
        operation: SendOperation::ClearNotifications,
        request: Value::Object(data),
    }
}
