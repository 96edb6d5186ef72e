//! Service layer
//!
//! The engine proper, separated from HTTP handlers: device platform
//! registry, recipient resolution, payload composition, the template
//! and group store, and send orchestration.

mod buttons;
mod compose;
mod recipients;
mod registry;
mod send;
mod store;

pub use buttons::{ButtonPreset, button_presets, preset_buttons};
pub use compose::{ComposedRequest, SendOperation, compose, compose_clear};
pub use recipients::{PlatformSet, ResolvedTargets, resolve_targets};
pub use registry::{DeviceRegistry, PlatformLookup, infer_platform};
pub use send::{SendReceipt, SendService, SendStatus};
pub use store::PresetStore;
