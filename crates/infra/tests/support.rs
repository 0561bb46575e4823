//! Shared fixtures for the service integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use opsdeck_domain::{Backend, BackendConfig, UploadConfig};
use opsdeck_infra::{
    ApiClient, AuthService, FileSessionStore, OrchestratorService, Session, UsersService,
};
use tempfile::TempDir;
use wiremock::MockServer;

/// Backend settings pointing at a mock server, with short retry delays.
pub fn backend_config(base_url: String) -> BackendConfig {
    BackendConfig { retry_delay_ms: 5, ..BackendConfig::new(base_url, 2_000) }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("opsdeck_infra=debug")
        .with_test_writer()
        .try_init();
}

/// Façades wired the way the application wires them: main and auth clients
/// share a file-backed session, the orchestrator client is anonymous. All
/// three backends point at the same mock server.
pub struct TestServices {
    pub server: MockServer,
    pub session: Arc<Session>,
    pub store: FileSessionStore,
    pub auth: AuthService,
    pub users: UsersService,
    pub orchestrator: OrchestratorService,
    _storage_dir: TempDir,
}

impl TestServices {
    pub async fn start() -> Self {
        init_tracing();

        let server = MockServer::start().await;
        let storage_dir = TempDir::new().expect("temp dir should be created");
        let store = FileSessionStore::new(storage_dir.path());
        let session = Arc::new(Session::new(Arc::new(store.clone())));

        let main = Arc::new(
            ApiClient::new(Backend::Main, backend_config(server.uri()), session.clone())
                .expect("main client"),
        );
        let auth = Arc::new(
            ApiClient::new(Backend::Auth, backend_config(server.uri()), session.clone())
                .expect("auth client"),
        );
        let orchestrator = Arc::new(
            ApiClient::anonymous(Backend::Orchestrator, backend_config(server.uri()))
                .expect("orchestrator client"),
        );

        Self {
            auth: AuthService::new(auth, session.clone()),
            users: UsersService::new(main, UploadConfig::default()),
            orchestrator: OrchestratorService::new(orchestrator),
            server,
            session,
            store,
            _storage_dir: storage_dir,
        }
    }
}
