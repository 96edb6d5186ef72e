//! REST client for the home automation hub
//!
//! One concrete client implements every collaborator trait. Custom
//! operations live under the `notify_manager` service domain on the
//! hub side; device endpoints are `notify.mobile_app_*` services.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use crate::config::HubConfig;
use crate::data::{DeviceGroup, Template};
use crate::error::AppError;
use crate::hub::{Dashboard, DirectoryListing, DispatchTransport, RemoteStore, ServiceDirectory, TargetCatalog};

/// Service domain the engine's custom operations are registered under
const CUSTOM_DOMAIN: &str = "notify_manager";
/// Prefix that marks a notify service as a companion-app device endpoint
const DEVICE_CHANNEL_PREFIX: &str = "mobile_app_";

/// One entry of the hub's `/api/services` response
#[derive(Debug, Deserialize)]
struct ServiceDomain {
    domain: String,
    services: HashMap<String, serde_json::Value>,
}

/// Response body of `/api/notify_manager/templates`
#[derive(Debug, Deserialize)]
struct TemplatesDocument {
    #[serde(default)]
    templates: Vec<Template>,
}

/// One entry of the hub's `/api/panels` response
#[derive(Debug, Deserialize)]
struct PanelEntry {
    component_name: String,
    title: Option<String>,
    url_path: String,
}

/// REST client for the hub API
pub struct HubClient {
    http_client: reqwest::Client,
    config: HubConfig,
}

impl HubClient {
    /// Create a new hub client with the configured request timeout
    pub fn new(config: &HubConfig) -> Result<Self, AppError> {
        let http_client = reqwest::Client::builder()
            .user_agent("Notiforge/0.1.0")
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()?;

        Ok(Self {
            http_client,
            config: config.clone(),
        })
    }

    fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.http_client
            .get(self.config.api_url(path))
            .bearer_auth(&self.config.access_token)
    }

    /// Call a custom operation on the hub (`POST /api/services/<domain>/<op>`)
    async fn call_operation(
        &self,
        operation: &str,
        body: &serde_json::Value,
    ) -> Result<(), reqwest::Error> {
        let url = self
            .config
            .api_url(&format!("/api/services/{}/{}", CUSTOM_DOMAIN, operation));

        let response = self
            .http_client
            .post(url)
            .bearer_auth(&self.config.access_token)
            .json(body)
            .send()
            .await?;

        response.error_for_status()?;
        Ok(())
    }
}

#[async_trait]
impl ServiceDirectory for HubClient {
    async fn list_devices(&self) -> Result<DirectoryListing, AppError> {
        let response = self.get("/api/services").send().await?;

        if !response.status().is_success() {
            return Err(AppError::Hub(format!(
                "Service directory request failed: HTTP {}",
                response.status()
            )));
        }

        let domains: Vec<ServiceDomain> = response.json().await?;

        let mut listing = DirectoryListing::default();
        for domain in domains {
            match domain.domain.as_str() {
                "notify" => {
                    for service in domain.services.keys() {
                        if let Some(device) = service.strip_prefix(DEVICE_CHANNEL_PREFIX) {
                            listing.devices.push(device.to_string());
                        }
                    }
                }
                CUSTOM_DOMAIN => {
                    listing.custom_operations = domain.services.len();
                }
                _ => {}
            }
        }

        // HashMap iteration order is arbitrary; keep the listing stable
        listing.devices.sort();

        Ok(listing)
    }
}

#[async_trait]
impl RemoteStore for HubClient {
    async fn get_templates(&self) -> Result<Vec<Template>, AppError> {
        let response = self
            .get("/api/notify_manager/templates")
            .send()
            .await
            .map_err(|e| AppError::StoreSync(format!("Template fetch failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::StoreSync(format!(
                "Template fetch failed: HTTP {}",
                response.status()
            )));
        }

        let document: TemplatesDocument = response
            .json()
            .await
            .map_err(|e| AppError::StoreSync(format!("Template fetch returned bad JSON: {}", e)))?;

        Ok(document.templates)
    }

    async fn replace_templates(&self, templates: Vec<Template>) -> Result<(), AppError> {
        self.call_operation("save_templates", &serde_json::json!({ "templates": templates }))
            .await
            .map_err(|e| AppError::StoreSync(format!("Template sync failed: {}", e)))
    }

    async fn replace_groups(&self, groups: Vec<DeviceGroup>) -> Result<(), AppError> {
        self.call_operation("save_groups", &serde_json::json!({ "groups": groups }))
            .await
            .map_err(|e| AppError::StoreSync(format!("Group sync failed: {}", e)))
    }
}

#[async_trait]
impl DispatchTransport for HubClient {
    async fn invoke(&self, operation: &str, request: serde_json::Value) -> Result<(), AppError> {
        self.call_operation(operation, &request)
            .await
            .map_err(|e| AppError::Dispatch(format!("Hub rejected {}: {}", operation, e)))
    }
}

#[async_trait]
impl TargetCatalog for HubClient {
    async fn list_dashboards(&self) -> Vec<Dashboard> {
        // Best effort only. Any failure resolves to an empty catalog.
        let response = match self.get("/api/panels").send().await {
            Ok(response) => response,
            Err(error) => {
                tracing::debug!(%error, "Dashboard catalog unavailable");
                return Vec::new();
            }
        };

        if !response.status().is_success() {
            tracing::debug!(status = %response.status(), "Dashboard catalog request rejected");
            return Vec::new();
        }

        let panels: HashMap<String, PanelEntry> = match response.json().await {
            Ok(panels) => panels,
            Err(error) => {
                tracing::debug!(%error, "Dashboard catalog returned bad JSON");
                return Vec::new();
            }
        };

        let mut dashboards: Vec<Dashboard> = panels
            .into_values()
            .filter(|panel| panel.component_name == "lovelace")
            .map(|panel| Dashboard {
                title: panel.title.unwrap_or_else(|| panel.url_path.clone()),
                path: format!("/{}", panel.url_path),
            })
            .collect();

        dashboards.sort_by(|a, b| a.path.cmp(&b.path));
        dashboards
    }
}
