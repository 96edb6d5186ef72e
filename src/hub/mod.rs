//! Hub integration
//!
//! The engine reaches the home automation hub through a small set of
//! collaborator traits so the orchestrator and the stores stay
//! testable without a live hub. `HubClient` is the production
//! implementation, speaking the hub's REST API.

mod client;

pub use client::HubClient;

use async_trait::async_trait;

use crate::data::{DeviceGroup, Template};
use crate::error::AppError;

/// Notify endpoint listing reported by the hub
#[derive(Debug, Clone, Default)]
pub struct DirectoryListing {
    /// Device names, with the `mobile_app_` channel prefix stripped
    pub devices: Vec<String>,
    /// Count of engine-owned custom operations registered on the hub
    pub custom_operations: usize,
}

/// A navigable dashboard usable as a click-action target
#[derive(Debug, Clone, serde::Serialize)]
pub struct Dashboard {
    pub title: String,
    pub path: String,
}

/// Enumerates notification-capable endpoints
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceDirectory: Send + Sync {
    async fn list_devices(&self) -> Result<DirectoryListing, AppError>;
}

/// Best-effort remote replica for templates and groups
///
/// Replace operations are idempotent whole-collection writes; the hub
/// has no per-entity update protocol.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn get_templates(&self) -> Result<Vec<Template>, AppError>;
    async fn replace_templates(&self, templates: Vec<Template>) -> Result<(), AppError>;
    async fn replace_groups(&self, groups: Vec<DeviceGroup>) -> Result<(), AppError>;
}

/// Delivers a composed request to the hub for fan-out to devices
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DispatchTransport: Send + Sync {
    async fn invoke(&self, operation: &str, request: serde_json::Value) -> Result<(), AppError>;
}

/// Read-only catalog of navigable destinations for click actions
///
/// Failure to load yields an empty catalog, never an error.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TargetCatalog: Send + Sync {
    async fn list_dashboards(&self) -> Vec<Dashboard>;
}
