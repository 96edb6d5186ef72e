//! Recipient resolution
//!
//! Turns a recipient selection into a concrete device list and the set
//! of platforms the composed payload must cover. Pure functions only;
//! callers pass snapshots of the group list and the override map.

use crate::data::{DeviceGroup, Platform, RecipientSelection};
use crate::service::registry::PlatformLookup;

/// Platforms covered by a resolved target set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlatformSet {
    pub ios: bool,
    pub android: bool,
}

impl PlatformSet {
    pub const BOTH: PlatformSet = PlatformSet {
        ios: true,
        android: true,
    };

    pub fn insert(&mut self, platform: Platform) {
        match platform {
            Platform::Ios => self.ios = true,
            Platform::Android => self.android = true,
        }
    }

    pub fn contains(&self, platform: Platform) -> bool {
        match platform {
            Platform::Ios => self.ios,
            Platform::Android => self.android,
        }
    }
}

/// Concrete device list plus derived platform set for a selection
#[derive(Debug, Clone, Default)]
pub struct ResolvedTargets {
    pub devices: Vec<String>,
    pub platforms: PlatformSet,
}

/// Resolve a selection into concrete targets
///
/// An empty device list means "broadcast": the composed request omits
/// the target key and the hub fans out to every device, so the
/// platform set covers both ecosystems. A group id that no longer
/// exists resolves to the empty list rather than an error.
pub fn resolve_targets(
    selection: &RecipientSelection,
    groups: &[DeviceGroup],
    lookup: &PlatformLookup,
) -> ResolvedTargets {
    let devices: Vec<String> = match selection {
        RecipientSelection::All => Vec::new(),
        RecipientSelection::Group { id } => match groups.iter().find(|group| group.id == *id) {
            Some(group) => group.devices.clone(),
            None => {
                tracing::debug!(group_id = %id, "Selected group no longer exists, resolving to no targets");
                Vec::new()
            }
        },
        RecipientSelection::Devices { names } => names.clone(),
    };

    let mut platforms = PlatformSet::default();
    for device in &devices {
        match lookup.platform_of(device) {
            Some(platform) => platforms.insert(platform),
            // An unknown device must not hide either platform's options
            None => platforms = PlatformSet::BOTH,
        }
    }

    // Broadcast has to satisfy both ecosystems
    if devices.is_empty() {
        platforms = PlatformSet::BOTH;
    }

    ResolvedTargets { devices, platforms }
}
