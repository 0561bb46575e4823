//! Authentication façade
//!
//! Talks to the auth backend and keeps the shared [`Session`] in step with
//! it. Successful logins store the token pair (visible to every client that
//! shares the session) and persist both `authTokens` and `loginResponse`.
//! Logout cleanup is local and unconditional.

use std::sync::Arc;

use opsdeck_domain::{
    AuthTokens, ChangePasswordRequest, LoginRequest, LoginResponse, QuickLoginRequest,
    RefreshTokenRequest, TokenValidation, User,
};
use serde_json::Value;
use tracing::{info, instrument, warn};

use crate::api::{ApiClient, ApiError, ApiRequest, ApiResponse, Session};

pub struct AuthService {
    client: Arc<ApiClient>,
    session: Arc<Session>,
}

impl AuthService {
    pub fn new(client: Arc<ApiClient>, session: Arc<Session>) -> Self {
        Self { client, session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    #[instrument(skip_all, fields(email = %request.email))]
    pub async fn login(&self, request: &LoginRequest) -> Result<ApiResponse<LoginResponse>, ApiError> {
        let response: ApiResponse<LoginResponse> = self.client.post("/auth/login", request).await?;
        self.store_login(&response.data).await;
        info!("login succeeded");
        Ok(response)
    }

    #[instrument(skip_all, fields(username = %request.username))]
    pub async fn quick_login(
        &self,
        request: &QuickLoginRequest,
    ) -> Result<ApiResponse<LoginResponse>, ApiError> {
        let response: ApiResponse<LoginResponse> =
            self.client.post("/auth/quick-login", request).await?;
        self.store_login(&response.data).await;
        info!("quick login succeeded");
        Ok(response)
    }

    /// Notify the server, then drop the local session whatever the outcome.
    #[instrument(skip(self))]
    pub async fn logout(&self) {
        if let Err(err) = self.client.request::<Value>(ApiRequest::post("/auth/logout")).await {
            warn!(status = err.status(), error = %err, "server-side logout failed");
        }
        self.clear_local().await;
        info!("logged out");
    }

    /// Ask the server whether the current token is still valid.
    ///
    /// A 401 clears the local session and yields `Ok(false)`.
    #[instrument(skip(self))]
    pub async fn validate_token(&self) -> Result<bool, ApiError> {
        match self.client.get::<TokenValidation>("/auth/validate").await {
            Ok(response) => Ok(response.data.valid),
            Err(err) if err.is_unauthorized() => {
                info!("token rejected; clearing local session");
                self.clear_local().await;
                Ok(false)
            }
            Err(err) => Err(err),
        }
    }

    /// Exchange the stored refresh token for a new pair.
    ///
    /// The old refresh token is kept if the server does not rotate it.
    #[instrument(skip(self))]
    pub async fn refresh_token(&self) -> Result<ApiResponse<AuthTokens>, ApiError> {
        let current = self.session.current();
        let refresh_token = current
            .as_ref()
            .and_then(|tokens| tokens.refresh_token.clone())
            .ok_or_else(|| ApiError::InvalidInput("no refresh token in session".into()))?;

        let request = RefreshTokenRequest { refresh_token: refresh_token.clone() };
        let response: ApiResponse<LoginResponse> = self.client.post("/auth/refresh", &request).await?;

        let mut tokens = response.data.tokens();
        if tokens.refresh_token.is_none() {
            tokens.refresh_token = Some(refresh_token);
        }
        if let Err(err) = self.session.set_tokens(tokens.clone()).await {
            warn!(error = %err, "failed to persist refreshed tokens");
        }

        Ok(response.map(|_| tokens))
    }

    #[instrument(skip(self))]
    pub async fn current_user(&self) -> Result<ApiResponse<User>, ApiError> {
        self.client.get("/auth/me").await
    }

    #[instrument(skip_all)]
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<ApiResponse<Value>, ApiError> {
        if request.new_password.is_empty() {
            return Err(ApiError::InvalidInput("new password must not be empty".into()));
        }
        self.client.post("/auth/change-password", request).await
    }

    /// Reload a persisted session; `Ok(false)` when there was none.
    #[instrument(skip(self))]
    pub async fn restore_session(&self) -> Result<bool, ApiError> {
        Ok(self.session.restore().await?)
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    async fn store_login(&self, login: &LoginResponse) {
        if let Err(err) = self.session.set_tokens(login.tokens()).await {
            warn!(error = %err, "failed to persist auth tokens");
        }
        if let Err(err) = self.session.save_login_response(login).await {
            warn!(error = %err, "failed to persist login response");
        }
    }

    async fn clear_local(&self) {
        if let Err(err) = self.session.clear().await {
            warn!(error = %err, "failed to clear persisted session");
        }
    }
}
