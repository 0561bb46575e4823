//! Shared fixtures for the application-layer tests.

#![allow(dead_code)]

use std::sync::Arc;

use opsdeck_app::AppContext;
use opsdeck_domain::{BackendConfig, Config};
use opsdeck_infra::MemorySessionStore;
use wiremock::MockServer;

/// Config with every backend pointing at `base_url` and short retry delays.
pub fn config_for(base_url: &str) -> Config {
    let backend = BackendConfig { retry_delay_ms: 5, ..BackendConfig::new(base_url, 2_000) };
    Config {
        api: backend.clone(),
        auth_api: backend.clone(),
        orchestrator_api: backend,
        ..Config::default()
    }
}

/// Context over a mock server and an in-memory session store.
pub struct TestApp {
    pub server: MockServer,
    pub store: Arc<MemorySessionStore>,
    pub ctx: AppContext,
}

impl TestApp {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let store = Arc::new(MemorySessionStore::new());
        let ctx = AppContext::with_store(config_for(&server.uri()), store.clone())
            .expect("context should build");
        Self { server, store, ctx }
    }
}
