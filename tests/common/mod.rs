//! Common test utilities for E2E tests

pub mod schema_validator;
pub mod stub_hub;

use notiforge::{AppState, config};
use stub_hub::StubHub;
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Engine configuration pointing at the given hub and database
pub fn test_config(hub_base_url: &str, db_path: std::path::PathBuf) -> config::AppConfig {
    config::AppConfig {
        server: config::ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0, // Let OS assign port
        },
        database: config::DatabaseConfig { path: db_path },
        hub: config::HubConfig {
            base_url: hub_base_url.to_string(),
            access_token: "test-token".to_string(),
            request_timeout_seconds: 5,
        },
        engine: config::EngineConfig {
            success_linger_seconds: 0,
            history_limit: 100,
        },
        logging: config::LoggingConfig {
            level: "info".to_string(),
            format: "pretty".to_string(),
        },
    }
}

/// Test server instance wired to an in-process stub hub
pub struct TestServer {
    pub addr: String,
    pub state: AppState,
    pub hub: StubHub,
    pub _temp_dir: TempDir,
    pub client: reqwest::Client,
}

impl TestServer {
    /// Create a new test server instance
    pub async fn new() -> Self {
        Self::with_hub_templates(Vec::new()).await
    }

    /// Create a test server whose hub already serves the given templates
    pub async fn with_hub_templates(templates: Vec<serde_json::Value>) -> Self {
        // Spawn the stub hub first; the engine dials it on startup
        let hub = StubHub::spawn().await;
        *hub.behavior.templates.lock().unwrap() = templates;

        // Create temporary directory for test database
        let temp_dir = TempDir::new().unwrap();

        // Create test configuration
        let config = test_config(&hub.base_url, temp_dir.path().join("test.db"));

        // Initialize app state
        let state = AppState::new(config).await.unwrap();

        // Create HTTP client
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .build()
            .unwrap();

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let addr_str = format!("http://{}", addr);

        // The binary's router, unchanged
        let app = notiforge::build_router(state.clone());

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait a bit for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        Self {
            addr: addr_str,
            state,
            hub,
            _temp_dir: temp_dir,
            client,
        }
    }

    /// Get base URL for API requests
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.addr, path)
    }

    /// PATCH the draft with the given JSON body
    pub async fn patch_draft(&self, patch: serde_json::Value) -> reqwest::Response {
        self.client
            .patch(self.url("/api/v1/draft"))
            .json(&patch)
            .send()
            .await
            .unwrap()
    }
}
