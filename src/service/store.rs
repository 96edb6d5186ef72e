//! Template and group store
//!
//! CRUD over the two reusable collections with dual persistence: the
//! durable local cache is authoritative, the hub replica is
//! best-effort. Mutations hold the collection's write lock through
//! both tiers, which keeps the whole-collection replace semantics
//! single-writer by construction.

use std::sync::Arc;
use std::sync::atomic::{AtomicI64, Ordering};

use chrono::Utc;
use tokio::sync::RwLock;

use crate::data::{Database, DeviceGroup, SETTING_GROUPS, SETTING_TEMPLATES, Template};
use crate::error::AppError;
use crate::hub::RemoteStore;
use crate::metrics::STORE_SYNC_TOTAL;

const TEMPLATE_ID_PREFIX: &str = "tpl";
const GROUP_ID_PREFIX: &str = "grp";

/// Store for templates and device groups
pub struct PresetStore {
    db: Arc<Database>,
    remote: Arc<dyn RemoteStore>,
    templates: RwLock<Vec<Template>>,
    groups: RwLock<Vec<DeviceGroup>>,
    /// Latest millisecond used for a generated id
    last_id_millis: AtomicI64,
}

impl PresetStore {
    /// Load both collections
    ///
    /// Templates prefer the hub copy and fall back to the local cache
    /// when the hub is unreachable or holds nothing. Groups are always
    /// loaded locally and then pushed to the hub so hub-side
    /// automations see them. The two load paths fail independently.
    pub async fn load(db: Arc<Database>, remote: Arc<dyn RemoteStore>) -> Result<Self, AppError> {
        let templates = match remote.get_templates().await {
            Ok(templates) if !templates.is_empty() => {
                tracing::info!(count = templates.len(), "Loaded templates from the hub");
                templates
            }
            Ok(_) => db.get_json(SETTING_TEMPLATES).await?.unwrap_or_default(),
            Err(error) => {
                tracing::warn!(%error, "Template load from hub failed, using local cache");
                db.get_json(SETTING_TEMPLATES).await?.unwrap_or_default()
            }
        };

        let cached_groups: Option<Vec<DeviceGroup>> = db.get_json(SETTING_GROUPS).await?;
        let push_groups = cached_groups.is_some();

        let store = Self {
            db,
            remote,
            templates: RwLock::new(templates),
            groups: RwLock::new(cached_groups.unwrap_or_default()),
            last_id_millis: AtomicI64::new(0),
        };

        if push_groups {
            let snapshot = store.groups.read().await.clone();
            store.sync_groups(snapshot).await;
        }

        Ok(store)
    }

    /// Millisecond timestamp for a generated id, bumped monotonically
    /// so two ids minted in the same millisecond never collide
    fn next_id_millis(&self) -> i64 {
        let mut last = self.last_id_millis.load(Ordering::Relaxed);
        loop {
            let now = Utc::now().timestamp_millis();
            let candidate = if now > last { now } else { last + 1 };
            match self.last_id_millis.compare_exchange_weak(
                last,
                candidate,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(observed) => last = observed,
            }
        }
    }

    fn generate_id(&self, prefix: &str) -> String {
        format!("{}_{}", prefix, self.next_id_millis())
    }

    /// Replicate templates to the hub, swallowing failures
    async fn sync_templates(&self, snapshot: Vec<Template>) {
        match self.remote.replace_templates(snapshot).await {
            Ok(()) => STORE_SYNC_TOTAL.with_label_values(&["templates", "ok"]).inc(),
            Err(error) => {
                STORE_SYNC_TOTAL
                    .with_label_values(&["templates", "error"])
                    .inc();
                tracing::warn!(%error, "Template sync to hub failed, local cache remains authoritative");
            }
        }
    }

    /// Replicate groups to the hub, swallowing failures
    async fn sync_groups(&self, snapshot: Vec<DeviceGroup>) {
        match self.remote.replace_groups(snapshot).await {
            Ok(()) => STORE_SYNC_TOTAL.with_label_values(&["groups", "ok"]).inc(),
            Err(error) => {
                STORE_SYNC_TOTAL.with_label_values(&["groups", "error"]).inc();
                tracing::warn!(%error, "Group sync to hub failed, local cache remains authoritative");
            }
        }
    }

    // =========================================================================
    // Templates
    // =========================================================================

    /// List templates in insertion order
    pub async fn list_templates(&self) -> Vec<Template> {
        self.templates.read().await.clone()
    }

    /// Look up one template by id (cloned snapshot)
    pub async fn get_template(&self, id: &str) -> Option<Template> {
        self.templates
            .read()
            .await
            .iter()
            .find(|template| template.id == id)
            .cloned()
    }

    /// Insert or replace a template
    ///
    /// An empty id mints a fresh `tpl_<millis>` id and appends; a
    /// known id replaces in place, preserving position.
    pub async fn upsert_template(&self, mut template: Template) -> Result<Template, AppError> {
        if template.name.trim().is_empty() {
            return Err(AppError::Validation("Template name is required".to_string()));
        }

        let mut templates = self.templates.write().await;

        if template.id.is_empty() {
            template.id = self.generate_id(TEMPLATE_ID_PREFIX);
            templates.push(template.clone());
        } else {
            let Some(slot) = templates
                .iter_mut()
                .find(|existing| existing.id == template.id)
            else {
                return Err(AppError::NotFound);
            };
            *slot = template.clone();
        }

        let snapshot = templates.clone();
        self.db.set_json(SETTING_TEMPLATES, &snapshot).await?;
        self.sync_templates(snapshot).await;

        Ok(template)
    }

    /// Delete a template; a missing id is a no-op
    pub async fn delete_template(&self, id: &str) -> Result<(), AppError> {
        let mut templates = self.templates.write().await;

        let before = templates.len();
        templates.retain(|template| template.id != id);
        if templates.len() == before {
            return Ok(());
        }

        let snapshot = templates.clone();
        self.db.set_json(SETTING_TEMPLATES, &snapshot).await?;
        self.sync_templates(snapshot).await;

        Ok(())
    }

    // =========================================================================
    // Groups
    // =========================================================================

    /// List groups in insertion order
    pub async fn list_groups(&self) -> Vec<DeviceGroup> {
        self.groups.read().await.clone()
    }

    /// Insert or replace a group
    ///
    /// Groups need a name and at least one device before anything is
    /// written to either tier.
    pub async fn upsert_group(&self, mut group: DeviceGroup) -> Result<DeviceGroup, AppError> {
        if group.name.trim().is_empty() {
            return Err(AppError::Validation("Group name is required".to_string()));
        }
        if group.devices.is_empty() {
            return Err(AppError::Validation(
                "Group needs at least one device".to_string(),
            ));
        }

        let mut groups = self.groups.write().await;

        if group.id.is_empty() {
            group.id = self.generate_id(GROUP_ID_PREFIX);
            groups.push(group.clone());
        } else {
            let Some(slot) = groups.iter_mut().find(|existing| existing.id == group.id) else {
                return Err(AppError::NotFound);
            };
            *slot = group.clone();
        }

        let snapshot = groups.clone();
        self.db.set_json(SETTING_GROUPS, &snapshot).await?;
        self.sync_groups(snapshot).await;

        Ok(group)
    }

    /// Delete a group; a missing id is a no-op
    pub async fn delete_group(&self, id: &str) -> Result<(), AppError> {
        let mut groups = self.groups.write().await;

        let before = groups.len();
        groups.retain(|group| group.id != id);
        if groups.len() == before {
            return Ok(());
        }

        let snapshot = groups.clone();
        self.db.set_json(SETTING_GROUPS, &snapshot).await?;
        self.sync_groups(snapshot).await;

        Ok(())
    }
}
