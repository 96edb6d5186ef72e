//! Device registry
//!
//! Derives each device's platform from an explicit override map or a
//! name-based heuristic. Only overrides are stored; inference is
//! recomputed on every lookup.

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::RwLock;

use crate::data::{Database, Platform, SETTING_DEVICE_TYPES};
use crate::error::AppError;

/// Infer a device's platform from its name
///
/// Case-insensitive substring match. Returns `None` when the name
/// matches neither ecosystem.
pub fn infer_platform(device: &str) -> Option<Platform> {
    let name = device.to_lowercase();

    if name.contains("iphone") || name.contains("ipad") || name.contains("mac") {
        Some(Platform::Ios)
    } else if name.contains("pixel") || name.contains("samsung") || name.contains("android") {
        Some(Platform::Android)
    } else {
        None
    }
}

/// Immutable snapshot of the override map for pure resolution
#[derive(Debug, Clone, Default)]
pub struct PlatformLookup {
    overrides: HashMap<String, Platform>,
}

impl PlatformLookup {
    /// Platform of a device: override first, then name heuristic
    pub fn platform_of(&self, device: &str) -> Option<Platform> {
        self.overrides
            .get(device)
            .copied()
            .or_else(|| infer_platform(device))
    }

    /// Whether the device's platform comes from an explicit override
    pub fn is_overridden(&self, device: &str) -> bool {
        self.overrides.contains_key(device)
    }
}

/// Device registry backed by the durable override map
pub struct DeviceRegistry {
    db: Arc<Database>,
    overrides: RwLock<HashMap<String, Platform>>,
}

impl DeviceRegistry {
    /// Load the override map from the durable local cache
    pub async fn load(db: Arc<Database>) -> Result<Self, AppError> {
        let overrides: HashMap<String, Platform> = db
            .get_json(SETTING_DEVICE_TYPES)
            .await?
            .unwrap_or_default();

        if !overrides.is_empty() {
            tracing::info!(count = overrides.len(), "Loaded device platform overrides");
        }

        Ok(Self {
            db,
            overrides: RwLock::new(overrides),
        })
    }

    /// Platform of a device: override first, then name heuristic
    pub fn platform_of(&self, device: &str) -> Option<Platform> {
        self.snapshot().platform_of(device)
    }

    /// Snapshot the override map for pure resolution
    pub fn snapshot(&self) -> PlatformLookup {
        let overrides = match self.overrides.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };

        PlatformLookup { overrides }
    }

    /// Set a platform override and persist the map
    ///
    /// Idempotent. Only the two concrete platforms are storable.
    pub async fn set_override(&self, device: &str, platform: Platform) -> Result<(), AppError> {
        let snapshot = {
            let mut overrides = match self.overrides.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            overrides.insert(device.to_string(), platform);
            overrides.clone()
        };

        self.db.set_json(SETTING_DEVICE_TYPES, &snapshot).await
    }

    /// Remove a platform override, reverting the device to inference
    pub async fn clear_override(&self, device: &str) -> Result<(), AppError> {
        let snapshot = {
            let mut overrides = match self.overrides.write() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            overrides.remove(device);
            overrides.clone()
        };

        self.db.set_json(SETTING_DEVICE_TYPES, &snapshot).await
    }
}
