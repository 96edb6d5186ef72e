//! Data models
//!
//! Rust structs for the notification domain: the working draft,
//! saved templates and device groups, platform classification, and
//! the dispatch history persisted to SQLite.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// ID Types
// =============================================================================

/// Entity ID wrapper (ULID format, 26 characters)
///
/// Example: "01ARZ3NDEKTSV4RRFFQ69G5FAV"
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub String);

impl EntityId {
    /// Generate a new ULID
    pub fn new() -> Self {
        Self(ulid::Ulid::new().to_string())
    }

    /// Create from existing string
    pub fn from_string(s: String) -> Self {
        Self(s)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Platform classification
// =============================================================================

/// Mobile platform a companion-app device runs on
///
/// Only these two values are storable as overrides; an unclassified
/// device is represented as `None` at the lookup layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ios => "ios",
            Self::Android => "android",
        }
    }
}

// =============================================================================
// Notification enums
// =============================================================================

/// Notification type selector
///
/// Each variant maps to a composition branch with its own payload
/// fields. `Tts` switches the dispatch operation entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    #[default]
    Simple,
    Buttons,
    Image,
    Media,
    Tts,
    Map,
    Progress,
}

impl NotificationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "simple",
            Self::Buttons => "buttons",
            Self::Image => "image",
            Self::Media => "media",
            Self::Tts => "tts",
            Self::Map => "map",
            Self::Progress => "progress",
        }
    }
}

/// Delivery priority carried on drafts and templates
///
/// Not emitted on the advanced wire payload; the hub derives push
/// settings from it for its own simpler service calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Normal,
    High,
    Critical,
}

/// Android notification channel importance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    Min,
    Low,
    #[default]
    Default,
    High,
    Max,
}

impl Importance {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Min => "min",
            Self::Low => "low",
            Self::Default => "default",
            Self::High => "high",
            Self::Max => "max",
        }
    }
}

/// Android lock-screen visibility
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
    Secret,
}

impl Visibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Secret => "secret",
        }
    }
}

/// iOS interruption level
///
/// Serialized kebab-case to match the wire format ("time-sensitive").
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum InterruptionLevel {
    Passive,
    #[default]
    Active,
    TimeSensitive,
    Critical,
}

impl InterruptionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Passive => "passive",
            Self::Active => "active",
            Self::TimeSensitive => "time-sensitive",
            Self::Critical => "critical",
        }
    }
}

/// Android audio stream used for TTS playback
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MediaStream {
    #[default]
    MusicStream,
    AlarmStream,
    AlarmStreamMax,
}

impl MediaStream {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MusicStream => "music_stream",
            Self::AlarmStream => "alarm_stream",
            Self::AlarmStreamMax => "alarm_stream_max",
        }
    }
}

// =============================================================================
// Recipient selection
// =============================================================================

/// Which devices a send addresses
///
/// The three modes are mutually exclusive by construction. `All`
/// produces an untargeted broadcast (the hub fans out to every
/// registered device).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum RecipientSelection {
    #[default]
    All,
    Group {
        id: String,
    },
    Devices {
        names: Vec<String>,
    },
}

// =============================================================================
// Action buttons
// =============================================================================

/// A tappable notification action
///
/// Serialized with the companion-app wire names: the label travels
/// as `title`, the unlock flag as `authenticationRequired`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionButton {
    /// Action identifier reported back by the app
    pub action: String,
    /// Button label shown to the user
    #[serde(rename = "title")]
    pub label: String,
    /// Optional URI opened on tap
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    /// Styles the action as destructive on iOS
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destructive: Option<bool>,
    /// Requires the device to be unlocked before the action fires
    #[serde(
        default,
        rename = "authenticationRequired",
        skip_serializing_if = "Option::is_none"
    )]
    pub authentication_required: Option<bool>,
}

impl ActionButton {
    /// A button is dispatchable only with both an action id and a label.
    pub fn is_complete(&self) -> bool {
        !self.action.is_empty() && !self.label.is_empty()
    }
}

// =============================================================================
// Draft
// =============================================================================

/// The working notification draft
///
/// One draft exists per engine instance. `Default` is the reset
/// state; string fields empty, booleans false, enums at their wire
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Draft {
    pub title: String,
    pub subtitle: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: NotificationKind,
    pub priority: Priority,
    pub buttons: Vec<ActionButton>,
    pub selection: RecipientSelection,

    // Attachments / type-specific inputs
    pub camera_entity: String,
    pub image_url: String,
    pub video_url: String,
    pub audio_url: String,
    pub latitude: String,
    pub longitude: String,
    pub second_latitude: String,
    pub second_longitude: String,
    pub progress: i64,
    pub progress_max: i64,
    pub progress_indeterminate: bool,
    pub media_stream: MediaStream,

    // Common options
    pub click_action: String,
    pub group: String,
    pub tag: String,

    // Android options
    pub channel: String,
    pub importance: Importance,
    pub color: String,
    pub led_color: String,
    pub vibration_pattern: String,
    pub notification_icon: String,
    pub icon_url: String,
    pub sticky: bool,
    pub persistent: bool,
    pub alert_once: bool,
    pub timeout: i64,
    pub visibility: Visibility,
    pub car_ui: bool,
    pub chronometer: bool,

    // iOS options
    pub sound: String,
    pub badge: i64,
    pub interruption_level: InterruptionLevel,
    pub critical: bool,
    pub critical_volume: f64,

    // Attachment options
    pub hide_thumbnail: bool,
    pub lazy_load: bool,
    pub content_type: String,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            title: String::new(),
            subtitle: String::new(),
            message: String::new(),
            kind: NotificationKind::Simple,
            priority: Priority::Normal,
            buttons: Vec::new(),
            selection: RecipientSelection::All,
            camera_entity: String::new(),
            image_url: String::new(),
            video_url: String::new(),
            audio_url: String::new(),
            latitude: String::new(),
            longitude: String::new(),
            second_latitude: String::new(),
            second_longitude: String::new(),
            progress: 0,
            progress_max: 100,
            progress_indeterminate: false,
            media_stream: MediaStream::MusicStream,
            click_action: String::new(),
            group: String::new(),
            tag: String::new(),
            channel: String::new(),
            importance: Importance::Default,
            color: String::new(),
            led_color: String::new(),
            vibration_pattern: String::new(),
            notification_icon: String::new(),
            icon_url: String::new(),
            sticky: false,
            persistent: false,
            alert_once: false,
            timeout: 0,
            visibility: Visibility::Public,
            car_ui: false,
            chronometer: false,
            sound: String::new(),
            badge: 0,
            interruption_level: InterruptionLevel::Active,
            critical: false,
            critical_volume: 1.0,
            hide_thumbnail: false,
            lazy_load: false,
            content_type: String::new(),
        }
    }
}

impl Draft {
    /// Merge a template into the draft
    ///
    /// Non-destructive: only fields the template defines overwrite
    /// the draft; everything else keeps its current value. Defined
    /// collections are deep-copied.
    pub fn apply_template(&mut self, template: &Template) {
        if let Some(ref title) = template.title {
            self.title = title.clone();
        }
        if let Some(ref message) = template.message {
            self.message = message.clone();
        }
        if let Some(kind) = template.kind {
            self.kind = kind;
        }
        if let Some(priority) = template.priority {
            self.priority = priority;
        }
        if let Some(ref buttons) = template.buttons {
            self.buttons = buttons.clone();
        }
        if let Some(ref channel) = template.channel {
            self.channel = channel.clone();
        }
        if let Some(ref color) = template.color {
            self.color = color.clone();
        }
        if let Some(ref sound) = template.sound {
            self.sound = sound.clone();
        }
        if let Some(ref click_action) = template.click_action {
            self.click_action = click_action.clone();
        }
        if let Some(sticky) = template.sticky {
            self.sticky = sticky;
        }
        if let Some(persistent) = template.persistent {
            self.persistent = persistent;
        }
        if let Some(importance) = template.importance {
            self.importance = importance;
        }
        if let Some(interruption_level) = template.interruption_level {
            self.interruption_level = interruption_level;
        }
        if let Some(critical) = template.critical {
            self.critical = critical;
        }
        if let Some(critical_volume) = template.critical_volume {
            self.critical_volume = critical_volume;
        }
    }

    /// Snapshot the draft's content fields as a named template.
    pub fn capture_template(&self, id: String, name: String) -> Template {
        Template {
            id,
            name,
            title: Some(self.title.clone()),
            message: Some(self.message.clone()),
            kind: Some(self.kind),
            priority: Some(self.priority),
            buttons: Some(self.buttons.clone()),
            channel: Some(self.channel.clone()),
            color: Some(self.color.clone()),
            sound: Some(self.sound.clone()),
            click_action: Some(self.click_action.clone()),
            sticky: Some(self.sticky),
            persistent: Some(self.persistent),
            importance: Some(self.importance),
            interruption_level: Some(self.interruption_level),
            critical: Some(self.critical),
            critical_volume: Some(self.critical_volume),
        }
    }
}

// =============================================================================
// Templates and device groups
// =============================================================================

/// A reusable notification preset
///
/// Every content field is optional: applying a template only touches
/// what it defines. Ids are `tpl_<millis>`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Template {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(
        default,
        rename = "type",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<NotificationKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buttons: Option<Vec<ActionButton>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sound: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub click_action: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sticky: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persistent: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub importance: Option<Importance>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interruption_level: Option<InterruptionLevel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub critical_volume: Option<f64>,
}

/// A named set of target devices
///
/// Ids are `grp_<millis>`. Device names are stored stripped of the
/// notify-service prefix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceGroup {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub devices: Vec<String>,
}

// =============================================================================
// Send lifecycle
// =============================================================================

/// Phase of the send lifecycle state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SendPhase {
    #[default]
    Idle,
    Composing,
    Dispatching,
    Succeeded,
    Failed,
}

impl SendPhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Composing => "composing",
            Self::Dispatching => "dispatching",
            Self::Succeeded => "succeeded",
            Self::Failed => "failed",
        }
    }

    /// Terminal phases linger briefly and then auto-return to idle.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Succeeded | Self::Failed)
    }
}

// =============================================================================
// Dispatch history
// =============================================================================

/// A dispatched notification, persisted for the history view
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct HistoryEntry {
    pub id: String,
    /// Hub operation invoked (send_advanced, send_tts, clear_notifications)
    pub operation: String,
    pub title: String,
    pub message: String,
    /// Number of explicit targets (0 = broadcast)
    pub target_count: i64,
    /// "succeeded" or "failed"
    pub outcome: String,
    /// Full request payload as JSON text
    pub request: String,
    pub created_at: DateTime<Utc>,
}
