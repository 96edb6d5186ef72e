//! SQLite database layer
//!
//! The database carries two concerns:
//! - `settings`: a key/value document store that acts as the durable
//!   local cache (templates, groups, device-type overrides)
//! - `notify_history`: a capped log of dispatched notifications

use std::path::Path;

use sqlx::SqlitePool;

use crate::data::models::HistoryEntry;
use crate::error::AppError;
use crate::metrics::DB_QUERIES_TOTAL;

/// Durable local cache key for saved templates
pub const SETTING_TEMPLATES: &str = "templates";
/// Durable local cache key for device groups
pub const SETTING_GROUPS: &str = "groups";
/// Durable local cache key for device platform overrides
pub const SETTING_DEVICE_TYPES: &str = "device_types";

/// Database wrapper around the SQLite connection pool
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connect to the SQLite database and run migrations
    ///
    /// Creates the parent directory and the database file if missing.
    pub async fn connect(path: &Path) -> Result<Self, AppError> {
        // Create parent directory if it doesn't exist
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| AppError::Database(sqlx::Error::Io(e)))?;
        }

        let connection_string = format!("sqlite:{}?mode=rwc", path.display());
        let pool = SqlitePool::connect(&connection_string).await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
            tracing::error!("Migration failed: {}", e);
            AppError::Internal(anyhow::anyhow!("Migration failed: {}", e))
        })?;

        tracing::info!("Database connected and migrated successfully");

        Ok(Self { pool })
    }

    // =========================================================================
    // Settings (durable local cache)
    // =========================================================================

    /// Get a raw setting value
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, AppError> {
        DB_QUERIES_TOTAL.with_label_values(&["select", "settings"]).inc();

        let value = sqlx::query_scalar::<_, String>("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(value)
    }

    /// Upsert a raw setting value
    pub async fn set_setting(&self, key: &str, value: &str) -> Result<(), AppError> {
        DB_QUERIES_TOTAL.with_label_values(&["upsert", "settings"]).inc();

        sqlx::query(
            "INSERT INTO settings (key, value) VALUES (?, ?) ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get a setting deserialized from its JSON document
    ///
    /// A missing key and an unreadable document both resolve to
    /// `None`; a corrupt cache entry must not take the engine down.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        key: &str,
    ) -> Result<Option<T>, AppError> {
        let Some(raw) = self.get_setting(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(error) => {
                tracing::warn!(%error, key, "Discarding unreadable cache document");
                Ok(None)
            }
        }
    }

    /// Store a setting as a JSON document
    pub async fn set_json<T: serde::Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let raw = serde_json::to_string(value)?;
        self.set_setting(key, &raw).await
    }

    // =========================================================================
    // Dispatch history
    // =========================================================================

    /// Insert a history entry and prune the table to `limit` rows
    pub async fn insert_history(&self, entry: &HistoryEntry, limit: i64) -> Result<(), AppError> {
        DB_QUERIES_TOTAL.with_label_values(&["insert", "notify_history"]).inc();

        sqlx::query(
            r#"
            INSERT INTO notify_history (
                id, operation, title, message, target_count, outcome, request, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&entry.id)
        .bind(&entry.operation)
        .bind(&entry.title)
        .bind(&entry.message)
        .bind(entry.target_count)
        .bind(&entry.outcome)
        .bind(&entry.request)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        // Keep only the newest `limit` rows. ULIDs sort chronologically,
        // so id order matches insertion order.
        sqlx::query(
            r#"
            DELETE FROM notify_history
            WHERE id NOT IN (
                SELECT id FROM notify_history ORDER BY id DESC LIMIT ?
            )
            "#,
        )
        .bind(limit)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Get history entries, newest first
    pub async fn get_history(&self, limit: i64) -> Result<Vec<HistoryEntry>, AppError> {
        DB_QUERIES_TOTAL.with_label_values(&["select", "notify_history"]).inc();

        let entries = sqlx::query_as::<_, HistoryEntry>(
            "SELECT * FROM notify_history ORDER BY id DESC LIMIT ?",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}
