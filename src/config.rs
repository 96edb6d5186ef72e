//! Configuration management
//!
//! Loads configuration from:
//! 1. Default values
//! 2. Configuration file (config/local.toml)
//! 3. Environment variables (override)

use serde::Deserialize;
use std::path::PathBuf;

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub hub: HubConfig,
    pub engine: EngineConfig,
    pub logging: LoggingConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Port number (e.g., 8090)
    pub port: u16,
}

/// Database configuration (SQLite only)
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Path to SQLite database file
    pub path: PathBuf,
}

/// Home automation hub configuration
///
/// The hub exposes the notify services this engine composes for,
/// plus the remote template storage registered by its companion
/// integration.
#[derive(Debug, Clone, Deserialize)]
pub struct HubConfig {
    /// Hub REST API base URL (e.g., "http://homeassistant.local:8123")
    pub base_url: String,
    /// Long-lived access token for the hub API
    pub access_token: String,
    /// Per-request timeout in seconds
    pub request_timeout_seconds: u64,
}

impl HubConfig {
    /// Build a full API URL from a path like "/api/services"
    pub fn api_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }
}

/// Engine behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Seconds a terminal send state lingers before returning to idle
    pub success_linger_seconds: u64,
    /// Maximum rows kept in the notification history table
    pub history_limit: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
    /// Log format: "pretty" or "json"
    pub format: String,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// # Loading Order
    /// 1. Default values
    /// 2. config/default.toml (if exists)
    /// 3. config/local.toml (if exists)
    /// 4. Environment variables (NOTIFORGE_*)
    ///
    /// # Errors
    /// Returns error if configuration is invalid
    pub fn load() -> Result<Self, crate::error::AppError> {
        use config::{Config, Environment, File};

        let config = Config::builder()
            // Start with default values
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8090)?
            .set_default("database.path", "data/notiforge.db")?
            .set_default("hub.base_url", "http://homeassistant.local:8123")?
            .set_default("hub.request_timeout_seconds", 10)?
            .set_default("engine.success_linger_seconds", 3)?
            .set_default("engine.history_limit", 100)?
            .set_default("logging.level", "info")?
            .set_default("logging.format", "pretty")?
            // Load from config/default.toml if it exists
            .add_source(File::with_name("config/default").required(false))
            // Load from config/local.toml if it exists (overrides default)
            .add_source(File::with_name("config/local").required(false))
            // Load from environment variables (NOTIFORGE_*)
            .add_source(
                Environment::with_prefix("NOTIFORGE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;

        let app_config: Self = config
            .try_deserialize()
            .map_err(|e| crate::error::AppError::Config(e.to_string()))?;
        app_config.validate()?;
        Ok(app_config)
    }

    fn validate(&self) -> Result<(), crate::error::AppError> {
        let parsed = url::Url::parse(&self.hub.base_url)
            .map_err(|e| crate::error::AppError::Config(format!("hub.base_url: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(crate::error::AppError::Config(format!(
                "hub.base_url must be http or https, got {}",
                parsed.scheme()
            )));
        }

        if self.hub.access_token.trim().is_empty() {
            return Err(crate::error::AppError::Config(
                "hub.access_token must not be empty".to_string(),
            ));
        }

        if self.engine.history_limit <= 0 {
            return Err(crate::error::AppError::Config(
                "engine.history_limit must be positive".to_string(),
            ));
        }

        Ok(())
    }
}
