//! Configuration structures
//!
//! One [`Config`] is resolved at startup (see `opsdeck_infra::config`) and
//! handed to constructors. Nothing reads the process environment after that.

use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ALLOWED_FILE_TYPES, DEFAULT_APP_NAME, DEFAULT_CACHE_TTL_SECS, DEFAULT_MAX_UPLOAD_SIZE,
    DEFAULT_RETRY_COUNT, DEFAULT_RETRY_DELAY_MS, DEFAULT_STORAGE_DIR, JSON_CONTENT_TYPE,
};
use crate::errors::{OpsDeckError, Result};
use crate::impl_wire_enum_conversions;

/// Deployment environment selecting the hardcoded fallbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Test,
    Production,
}

impl_wire_enum_conversions!(Environment {
    Development => "development",
    Test => "test",
    Production => "production",
});

/// Which backend a [`BackendConfig`] describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    Main,
    Auth,
    Orchestrator,
}

impl_wire_enum_conversions!(Backend {
    Main => "main",
    Auth => "auth",
    Orchestrator => "orchestrator",
});

/// Connection settings for a single REST backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    pub base_url: String,
    pub timeout_ms: u64,
    pub retry_count: u32,
    pub retry_delay_ms: u64,
    #[serde(default)]
    pub default_headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_agent: Option<String>,
}

impl BackendConfig {
    pub fn new(base_url: impl Into<String>, timeout_ms: u64) -> Self {
        let mut default_headers = BTreeMap::new();
        default_headers.insert("Accept".to_string(), JSON_CONTENT_TYPE.to_string());
        Self {
            base_url: base_url.into(),
            timeout_ms,
            retry_count: DEFAULT_RETRY_COUNT,
            retry_delay_ms: DEFAULT_RETRY_DELAY_MS,
            default_headers,
            user_agent: None,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Feature toggles baked into the deployment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FeatureFlags {
    pub debug: bool,
    pub mock_api: bool,
    pub analytics: bool,
}

/// Upload limits applied before a multipart request is sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadConfig {
    pub max_size_bytes: u64,
    pub allowed_mime_types: Vec<String>,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_size_bytes: DEFAULT_MAX_UPLOAD_SIZE,
            allowed_mime_types: DEFAULT_ALLOWED_FILE_TYPES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Server-side secrets. Only required in production.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerSecrets {
    #[serde(skip_serializing)]
    pub jwt_secret: Option<String>,
    #[serde(skip_serializing)]
    pub database_url: Option<String>,
}

impl std::fmt::Debug for ServerSecrets {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerSecrets")
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub environment: Environment,
    pub app_name: String,
    pub app_version: String,
    pub api: BackendConfig,
    pub auth_api: BackendConfig,
    pub orchestrator_api: BackendConfig,
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub uploads: UploadConfig,
    pub cache_ttl_secs: u64,
    pub storage_dir: String,
    #[serde(default)]
    pub secrets: ServerSecrets,
}

impl Config {
    /// Hardcoded defaults for an environment, before any overrides.
    pub fn defaults_for(environment: Environment) -> Self {
        let (api, auth_api, orchestrator_api) = match environment {
            Environment::Development => (
                BackendConfig::new("http://localhost:8080/api", 10_000),
                BackendConfig::new("http://localhost:8080/api", 10_000),
                BackendConfig::new("http://localhost:5000/api", 30_000),
            ),
            Environment::Test => (
                BackendConfig::new("http://localhost:8081/api", 5_000),
                BackendConfig::new("http://localhost:8081/api", 5_000),
                BackendConfig::new("http://localhost:5001/api", 5_000),
            ),
            Environment::Production => (
                BackendConfig::new("https://api.opsdeck.io/api", 15_000),
                BackendConfig::new("https://auth.opsdeck.io/api", 15_000),
                BackendConfig::new("https://orchestrator.opsdeck.io/api", 30_000),
            ),
        };

        Self {
            environment,
            app_name: DEFAULT_APP_NAME.to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            api,
            auth_api,
            orchestrator_api,
            features: FeatureFlags::default(),
            uploads: UploadConfig::default(),
            cache_ttl_secs: DEFAULT_CACHE_TTL_SECS,
            storage_dir: DEFAULT_STORAGE_DIR.to_string(),
            secrets: ServerSecrets::default(),
        }
    }

    pub fn backend(&self, backend: Backend) -> &BackendConfig {
        match backend {
            Backend::Main => &self.api,
            Backend::Auth => &self.auth_api,
            Backend::Orchestrator => &self.orchestrator_api,
        }
    }

    /// `User-Agent` sent to every backend, e.g. `OpsDeck/0.1.0`.
    pub fn user_agent(&self) -> String {
        format!("{}/{}", self.app_name, self.app_version)
    }

    /// Check invariants that the loaders cannot express through types.
    ///
    /// # Errors
    /// Returns `OpsDeckError::Config` for empty base URLs, a zero timeout, or
    /// missing server secrets in production.
    pub fn validate(&self) -> Result<()> {
        for backend in [Backend::Main, Backend::Auth, Backend::Orchestrator] {
            let cfg = self.backend(backend);
            if cfg.base_url.trim().is_empty() {
                return Err(OpsDeckError::Config(format!("{backend} API base URL is empty")));
            }
            if cfg.timeout_ms == 0 {
                return Err(OpsDeckError::Config(format!("{backend} API timeout must be > 0")));
            }
        }

        if self.environment == Environment::Production {
            let mut missing = Vec::new();
            if self.secrets.jwt_secret.as_deref().map_or(true, str::is_empty) {
                missing.push("OPSDECK_JWT_SECRET");
            }
            if self.secrets.database_url.as_deref().map_or(true, str::is_empty) {
                missing.push("OPSDECK_DATABASE_URL");
            }
            if !missing.is_empty() {
                return Err(OpsDeckError::Config(format!(
                    "Missing required production secrets: {}",
                    missing.join(", ")
                )));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::defaults_for(Environment::default())
    }
}
