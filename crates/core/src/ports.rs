//! Port interfaces for credentials and durable session storage
//!
//! These traits define the boundaries between the request pipeline and the
//! infrastructure that holds tokens. Clients receive a provider explicitly
//! instead of reading shared global state.

use async_trait::async_trait;
use opsdeck_domain::{AuthTokens, Result};

/// Supplies the token pair attached to outgoing requests
///
/// Implementations must return a consistent snapshot: the request pipeline
/// reads it once per logical call, before the first attempt.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Current tokens, or `None` when no session is active
    async fn tokens(&self) -> Option<AuthTokens>;
}

/// Provider for backends that never send an `Authorization` header
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentials;

#[async_trait]
impl CredentialProvider for NoCredentials {
    async fn tokens(&self) -> Option<AuthTokens> {
        None
    }
}

/// Durable string key/value storage for session data
///
/// Keys used by the application are `authTokens` and `loginResponse`.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Read the raw value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<()>;
}
