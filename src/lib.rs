// Suppress dead_code warnings for WIP modules (will be removed as features are completed)
#![allow(dead_code)]

//! Notiforge - A notification composition and targeting engine
//!
//! Sits between a control panel and a home automation hub: the panel
//! edits one shared draft, this engine resolves recipients, composes
//! the platform-specific payload, and dispatches it through the hub's
//! notify services.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      API Layer (Axum)                        │
//! │  - Draft editing and preview endpoints                      │
//! │  - Template / group / device endpoints                      │
//! │  - Send lifecycle and history endpoints                     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Service Layer                            │
//! │  - Recipient resolution and payload composition             │
//! │  - Send lifecycle state machine                             │
//! │  - Two-tier preset store                                    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   Data / Hub Layer                           │
//! │  - SQLite (sqlx)                                            │
//! │  - Hub REST client (reqwest)                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - `api`: HTTP handlers for the panel API
//! - `service`: Composition, targeting, send lifecycle, preset store
//! - `hub`: REST client for the home automation hub
//! - `data`: Database layer and domain models
//! - `config`: Configuration management
//! - `error`: Error types

pub mod api;
pub mod config;
pub mod data;
pub mod error;
pub mod hub;
pub mod metrics;
pub mod service;

use std::sync::Arc;

/// Application state shared across all handlers
///
/// This struct is cloned for each request and contains
/// shared resources like the database pool, preset store,
/// and hub client.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<config::AppConfig>,

    /// Database connection pool
    pub db: Arc<data::Database>,

    /// Known devices and their platform overrides
    pub registry: Arc<service::DeviceRegistry>,

    /// Templates and device groups (local tier plus hub replication)
    pub presets: Arc<service::PresetStore>,

    /// Send lifecycle state machine and dispatcher
    pub sender: Arc<service::SendService>,

    /// The single shared working draft
    pub draft: Arc<tokio::sync::RwLock<data::Draft>>,

    /// Live notify service listing from the hub
    pub directory: Arc<dyn hub::ServiceDirectory>,

    /// Dashboard catalog for click action targets
    pub catalog: Arc<dyn hub::TargetCatalog>,
}

impl AppState {
    /// Initialize application state
    ///
    /// # Steps
    /// 1. Connect to SQLite database
    /// 2. Build the hub client
    /// 3. Load the device registry
    /// 4. Load templates and groups
    /// 5. Build the send service
    ///
    /// # Errors
    /// Returns error if any initialization step fails
    pub async fn new(config: config::AppConfig) -> Result<Self, error::AppError> {
        tracing::info!("Initializing application state...");

        // 1. Connect to SQLite database
        let db = Arc::new(data::Database::connect(&config.database.path).await?);
        tracing::info!("Database connected");

        // 2. Build the hub client; one client backs every hub-facing trait
        let hub_client = Arc::new(hub::HubClient::new(&config.hub)?);
        tracing::info!(base_url = %config.hub.base_url, "Hub client ready");

        // 3. Load the device registry
        let registry = Arc::new(service::DeviceRegistry::load(db.clone()).await?);

        // 4. Load templates and groups (hub first, cache fallback)
        let presets = Arc::new(service::PresetStore::load(db.clone(), hub_client.clone()).await?);

        // 5. Build the send service
        let sender = Arc::new(service::SendService::new(
            hub_client.clone(),
            db.clone(),
            &config.engine,
        ));

        tracing::info!("Application state initialized successfully");

        Ok(Self {
            config: Arc::new(config),
            db,
            registry,
            presets,
            sender,
            draft: Arc::new(tokio::sync::RwLock::new(data::Draft::default())),
            directory: hub_client.clone(),
            catalog: hub_client,
        })
    }
}

/// Build the Axum router with all routes.
///
/// This is shared by the binary and integration tests to keep route
/// composition consistent across environments.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::Router;
    use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

    Router::new()
        .route("/health", axum::routing::get(health_check))
        .nest("/api/v1", api::panel_api_router())
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        // The panel is served from the hub origin, not ours
        .layer(CorsLayer::permissive())
        .with_state(state)
        .merge(api::metrics_router())
}

async fn health_check() -> &'static str {
    "OK"
}
