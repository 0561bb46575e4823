//! Authenticated session shared by the main and auth API clients

use std::sync::Arc;

use async_trait::async_trait;
use opsdeck_core::{CredentialProvider, SessionStore};
use opsdeck_domain::constants::{STORAGE_KEY_AUTH_TOKENS, STORAGE_KEY_LOGIN_RESPONSE};
use opsdeck_domain::{AuthTokens, LoginResponse, Result};
use parking_lot::RwLock;
use tracing::{debug, warn};

use crate::storage::MemorySessionStore;

/// Current token pair, mirrored into a [`SessionStore`].
///
/// The in-memory copy is the source of truth for outgoing requests; the store
/// only matters across restarts.
pub struct Session {
    tokens: RwLock<Option<AuthTokens>>,
    store: Arc<dyn SessionStore>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session").field("authenticated", &self.is_authenticated()).finish()
    }
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { tokens: RwLock::new(None), store }
    }

    /// Session that is never persisted.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemorySessionStore::new()))
    }

    pub fn current(&self) -> Option<AuthTokens> {
        self.tokens.read().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.read().is_some()
    }

    /// Replace the token pair in memory, then persist it. Last write wins.
    ///
    /// The in-memory pair is updated even when persisting fails.
    pub async fn set_tokens(&self, tokens: AuthTokens) -> Result<()> {
        let serialized = serde_json::to_string(&tokens)?;
        *self.tokens.write() = Some(tokens);
        self.store.set(STORAGE_KEY_AUTH_TOKENS, &serialized).await
    }

    pub async fn save_login_response(&self, response: &LoginResponse) -> Result<()> {
        let serialized = serde_json::to_string(response)?;
        self.store.set(STORAGE_KEY_LOGIN_RESPONSE, &serialized).await
    }

    /// Last persisted login response, if it can still be decoded.
    pub async fn login_response(&self) -> Result<Option<LoginResponse>> {
        let Some(raw) = self.store.get(STORAGE_KEY_LOGIN_RESPONSE).await? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(response) => Ok(Some(response)),
            Err(err) => {
                warn!(error = %err, "stored login response is unreadable");
                Ok(None)
            }
        }
    }

    /// Drop the tokens from memory and remove both persisted keys. Both removals
    /// are attempted; the first failure is returned.
    pub async fn clear(&self) -> Result<()> {
        *self.tokens.write() = None;
        let tokens = self.store.remove(STORAGE_KEY_AUTH_TOKENS).await;
        let login = self.store.remove(STORAGE_KEY_LOGIN_RESPONSE).await;
        tokens.and(login)
    }

    /// Reload tokens from the store.
    ///
    /// Returns `Ok(true)` when a session was restored. A stored value that
    /// fails to deserialize is purged together with the login response.
    pub async fn restore(&self) -> Result<bool> {
        let Some(raw) = self.store.get(STORAGE_KEY_AUTH_TOKENS).await? else {
            debug!("no persisted session");
            return Ok(false);
        };

        match serde_json::from_str::<AuthTokens>(&raw) {
            Ok(tokens) if !tokens.access_token.is_empty() => {
                *self.tokens.write() = Some(tokens);
                debug!("restored persisted session");
                Ok(true)
            }
            Ok(_) | Err(_) => {
                warn!("persisted session is corrupt; clearing it");
                self.clear().await?;
                Ok(false)
            }
        }
    }
}

#[async_trait]
impl CredentialProvider for Session {
    async fn tokens(&self) -> Option<AuthTokens> {
        self.current()
    }
}
