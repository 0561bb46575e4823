//! Application context - dependency injection container

use std::sync::Arc;

use opsdeck_core::SessionStore;
use opsdeck_domain::{Backend, BackendConfig, Config};
use opsdeck_infra::{
    ApiClient, ApiError, AuthService, FileSessionStore, OrchestratorService, Session, UsersService,
};
use tracing::{info, warn};

use crate::utils::health::{ComponentHealth, HealthStatus};
use crate::utils::logging::error_label;

/// Application context - holds the configuration, the shared session and the
/// three service façades.
///
/// The main and auth clients share one [`Session`], so a login through the
/// auth façade is immediately visible to user-management calls. The
/// orchestrator client never sends credentials.
pub struct AppContext {
    pub config: Config,
    pub session: Arc<Session>,
    pub auth: Arc<AuthService>,
    pub users: Arc<UsersService>,
    pub orchestrator: Arc<OrchestratorService>,
}

impl AppContext {
    /// Build the context with a file-backed session under
    /// `config.storage_dir`.
    ///
    /// # Errors
    /// Returns [`ApiError::Config`] if any backend client cannot be built.
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let store = Arc::new(FileSessionStore::new(&config.storage_dir));
        Self::with_store(config, store)
    }

    /// Build the context on an explicit session store.
    pub fn with_store(config: Config, store: Arc<dyn SessionStore>) -> Result<Self, ApiError> {
        let session = Arc::new(Session::new(store));
        let agent = config.user_agent();
        let with_agent = |backend: &BackendConfig| BackendConfig {
            user_agent: Some(agent.clone()),
            ..backend.clone()
        };

        let main = Arc::new(ApiClient::new(Backend::Main, with_agent(&config.api), session.clone())?);
        let auth =
            Arc::new(ApiClient::new(Backend::Auth, with_agent(&config.auth_api), session.clone())?);
        let orchestrator = Arc::new(ApiClient::anonymous(
            Backend::Orchestrator,
            with_agent(&config.orchestrator_api),
        )?);

        info!(
            environment = %config.environment,
            api = %config.api.base_url,
            auth_api = %config.auth_api.base_url,
            orchestrator_api = %config.orchestrator_api.base_url,
            "application context initialized"
        );

        Ok(Self {
            auth: Arc::new(AuthService::new(auth, session.clone())),
            users: Arc::new(UsersService::new(main, config.uploads.clone())),
            orchestrator: Arc::new(OrchestratorService::new(orchestrator)),
            session,
            config,
        })
    }

    /// Reload a persisted session. Storage failures are logged, not fatal.
    pub async fn restore_session(&self) -> bool {
        match self.auth.restore_session().await {
            Ok(restored) => restored,
            Err(err) => {
                warn!(error = %err, kind = error_label(&err), "failed to restore persisted session");
                false
            }
        }
    }

    /// Check the orchestrator and report the session state.
    pub async fn health_check(&self) -> HealthStatus {
        let orchestrator = match self.orchestrator.health().await {
            Ok(response) if response.data.is_healthy() => ComponentHealth::healthy("orchestrator"),
            Ok(response) => ComponentHealth::unhealthy(
                "orchestrator",
                format!("reported status {}", response.data.status),
            ),
            Err(err) => {
                warn!(error = %err, kind = error_label(&err), "orchestrator health check failed");
                ComponentHealth::unhealthy("orchestrator", err.message())
            }
        };

        // An anonymous session is a valid state, not a failure.
        let session = ComponentHealth::healthy("session").with_message(
            if self.session.is_authenticated() { "signed in" } else { "anonymous" },
        );

        let mut status = HealthStatus::new().add_component(orchestrator).add_component(session);
        status.calculate_score();
        status
    }
}
