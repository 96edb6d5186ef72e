//! Built-in button presets
//!
//! Named, ready-made action button sets the composer offers for the
//! buttons notification type. Applying one replaces the draft's
//! button list with a fresh copy.

use serde::Serialize;

use crate::data::ActionButton;

/// A named built-in button set
#[derive(Debug, Clone, Serialize)]
pub struct ButtonPreset {
    pub name: &'static str,
    pub buttons: Vec<ActionButton>,
}

fn button(action: &str, label: &str) -> ActionButton {
    ActionButton {
        action: action.to_string(),
        label: label.to_string(),
        ..ActionButton::default()
    }
}

/// All built-in presets, in display order
pub fn button_presets() -> Vec<ButtonPreset> {
    vec![
        ButtonPreset {
            name: "confirm_dismiss",
            buttons: vec![button("CONFIRM", "✅ Confirm"), button("DISMISS", "❌ Dismiss")],
        },
        ButtonPreset {
            name: "yes_no",
            buttons: vec![button("YES", "👍 Yes"), button("NO", "👎 No")],
        },
        ButtonPreset {
            name: "alarm_response",
            buttons: vec![
                button("ALARM_OK", "✅ OK"),
                button("ALARM_SNOOZE", "⏰ Later"),
                button("ALARM_EMERGENCY", "🆘 Emergency"),
            ],
        },
        ButtonPreset {
            name: "door_response",
            buttons: vec![button("DOOR_OPEN", "🔓 Open"), button("DOOR_IGNORE", "🚪 Ignore")],
        },
        ButtonPreset {
            name: "reply",
            buttons: vec![button("REPLY", "💬 Reply")],
        },
    ]
}

/// Buttons for a preset by name, `None` for an unknown preset
pub fn preset_buttons(name: &str) -> Option<Vec<ActionButton>> {
    button_presets()
        .into_iter()
        .find(|preset| preset.name == name)
        .map(|preset| preset.buttons)
}
