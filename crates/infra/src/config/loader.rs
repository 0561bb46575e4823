//! Configuration loader
//!
//! Resolves the application [`Config`] once at startup.
//!
//! ## Loading Strategy
//! 1. If `OPSDECK_CONFIG_FILE` is set, the file is loaded (JSON or TOML by
//!    extension)
//! 2. Otherwise `OPSDECK_ENV` picks the hardcoded per-environment defaults
//!    and the remaining variables override them
//! 3. The result is validated; production requires the server secrets
//!
//! ## Environment Variables
//! - `OPSDECK_ENV`: `development` (default), `test` or `production`
//! - `OPSDECK_API_URL`, `OPSDECK_AUTH_API_URL`, `OPSDECK_ORCHESTRATOR_API_URL`:
//!   backend base URLs
//! - `OPSDECK_API_TIMEOUT_MS`: main and auth API timeout
//! - `OPSDECK_ORCHESTRATOR_TIMEOUT_MS`: orchestrator API timeout
//! - `OPSDECK_API_RETRY_COUNT`, `OPSDECK_API_RETRY_DELAY_MS`: retry policy for
//!   all backends
//! - `OPSDECK_DEBUG`, `OPSDECK_MOCK_API`, `OPSDECK_ANALYTICS`: feature flags
//! - `OPSDECK_APP_NAME`, `OPSDECK_APP_VERSION`: app identity
//! - `OPSDECK_MAX_UPLOAD_SIZE`, `OPSDECK_ALLOWED_FILE_TYPES`: upload limits
//!   (comma-separated MIME list)
//! - `OPSDECK_CACHE_TTL_SECS`: cache TTL in seconds
//! - `OPSDECK_STORAGE_DIR`: session storage directory
//! - `OPSDECK_JWT_SECRET`, `OPSDECK_DATABASE_URL`: production secrets

use std::path::{Path, PathBuf};
use std::str::FromStr;

use opsdeck_domain::{Config, Environment, OpsDeckError, Result};

/// Points the loader at a config file instead of the environment.
pub const CONFIG_FILE_VAR: &str = "OPSDECK_CONFIG_FILE";

/// Load configuration from a file when `OPSDECK_CONFIG_FILE` is set,
/// otherwise from environment variables.
///
/// # Errors
/// Returns `OpsDeckError::Config` if a value is malformed, the file cannot be
/// read, or validation fails.
pub fn load() -> Result<Config> {
    match env_var(CONFIG_FILE_VAR) {
        Some(path) => load_from_file(PathBuf::from(path)),
        None => {
            let config = load_from_env()?;
            tracing::info!(environment = %config.environment, "Configuration loaded from environment variables");
            Ok(config)
        }
    }
}

/// Load configuration from the process environment.
///
/// # Errors
/// Returns `OpsDeckError::Config` for malformed values or failed validation.
pub fn load_from_env() -> Result<Config> {
    load_from_lookup(env_var)
}

/// Load configuration through an arbitrary variable lookup.
///
/// Blank values count as unset.
///
/// # Errors
/// Returns `OpsDeckError::Config` for malformed values or failed validation.
pub fn load_from_lookup<F>(lookup: F) -> Result<Config>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

    let environment = match get("OPSDECK_ENV") {
        Some(raw) => Environment::from_str(&raw)
            .map_err(|_| OpsDeckError::Config(format!("Invalid OPSDECK_ENV: {raw}")))?,
        None => Environment::default(),
    };

    let mut config = Config::defaults_for(environment);

    if let Some(url) = get("OPSDECK_API_URL") {
        config.api.base_url = url;
    }
    if let Some(url) = get("OPSDECK_AUTH_API_URL") {
        config.auth_api.base_url = url;
    }
    if let Some(url) = get("OPSDECK_ORCHESTRATOR_API_URL") {
        config.orchestrator_api.base_url = url;
    }

    if let Some(timeout) = parse_var::<u64>(&get, "OPSDECK_API_TIMEOUT_MS")? {
        config.api.timeout_ms = timeout;
        config.auth_api.timeout_ms = timeout;
    }
    if let Some(timeout) = parse_var::<u64>(&get, "OPSDECK_ORCHESTRATOR_TIMEOUT_MS")? {
        config.orchestrator_api.timeout_ms = timeout;
    }

    let retry_count = parse_var::<u32>(&get, "OPSDECK_API_RETRY_COUNT")?;
    let retry_delay = parse_var::<u64>(&get, "OPSDECK_API_RETRY_DELAY_MS")?;
    for backend in [&mut config.api, &mut config.auth_api, &mut config.orchestrator_api] {
        if let Some(count) = retry_count {
            backend.retry_count = count;
        }
        if let Some(delay) = retry_delay {
            backend.retry_delay_ms = delay;
        }
    }

    config.features.debug = parse_bool(&get, "OPSDECK_DEBUG", config.features.debug)?;
    config.features.mock_api = parse_bool(&get, "OPSDECK_MOCK_API", config.features.mock_api)?;
    config.features.analytics = parse_bool(&get, "OPSDECK_ANALYTICS", config.features.analytics)?;

    if let Some(name) = get("OPSDECK_APP_NAME") {
        config.app_name = name;
    }
    if let Some(version) = get("OPSDECK_APP_VERSION") {
        config.app_version = version;
    }

    if let Some(size) = parse_var::<u64>(&get, "OPSDECK_MAX_UPLOAD_SIZE")? {
        config.uploads.max_size_bytes = size;
    }
    if let Some(types) = get("OPSDECK_ALLOWED_FILE_TYPES") {
        config.uploads.allowed_mime_types = types
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect();
    }

    if let Some(ttl) = parse_var::<u64>(&get, "OPSDECK_CACHE_TTL_SECS")? {
        config.cache_ttl_secs = ttl;
    }
    if let Some(dir) = get("OPSDECK_STORAGE_DIR") {
        config.storage_dir = dir;
    }

    config.secrets.jwt_secret = get("OPSDECK_JWT_SECRET");
    config.secrets.database_url = get("OPSDECK_DATABASE_URL");

    config.validate()?;
    Ok(config)
}

/// Load configuration from a JSON or TOML file.
///
/// # Errors
/// Returns `OpsDeckError::Config` if the file is missing, unreadable,
/// malformed, or fails validation.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(OpsDeckError::Config(format!("Config file not found: {}", path.display())));
    }

    tracing::info!(path = %path.display(), "Loading configuration from file");

    let contents = std::fs::read_to_string(path)
        .map_err(|e| OpsDeckError::Config(format!("Failed to read config file: {}", e)))?;

    let config = parse_config(&contents, path)?;
    config.validate()?;
    Ok(config)
}

/// Parse configuration from string content.
///
/// Format is detected by file extension (`.json` or `.toml`).
fn parse_config(contents: &str, path: &Path) -> Result<Config> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

    match extension {
        "toml" => toml::from_str(contents)
            .map_err(|e| OpsDeckError::Config(format!("Invalid TOML format: {}", e))),
        "json" => serde_json::from_str(contents)
            .map_err(|e| OpsDeckError::Config(format!("Invalid JSON format: {}", e))),
        _ => Err(OpsDeckError::Config(format!("Unsupported config format: {}", extension))),
    }
}

fn env_var(key: &str) -> Option<String> {
    std::env::var(key).ok()
}

fn parse_var<T>(get: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    get(key)
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| OpsDeckError::Config(format!("Invalid {key} value {raw:?}: {e}")))
        })
        .transpose()
}

/// Accepts `1`/`0`, `true`/`false`, `yes`/`no`, `on`/`off` (case-insensitive).
fn parse_bool(get: &impl Fn(&str) -> Option<String>, key: &str, default: bool) -> Result<bool> {
    match get(key) {
        None => Ok(default),
        Some(raw) => match raw.to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Ok(true),
            "0" | "false" | "no" | "off" => Ok(false),
            _ => Err(OpsDeckError::Config(format!("Invalid {key} value {raw:?}: expected a boolean"))),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::io::Write;
    use std::sync::Mutex;

    use once_cell::sync::Lazy;
    use tempfile::NamedTempFile;

    use super::*;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_variables() {
        let config = load_from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, Config::defaults_for(Environment::Development));
    }

    #[test]
    fn test_overrides_apply_per_backend() {
        let config = load_from_lookup(lookup(&[
            ("OPSDECK_ENV", "test"),
            ("OPSDECK_API_URL", "http://api.local/api"),
            ("OPSDECK_ORCHESTRATOR_API_URL", "http://orch.local/api"),
            ("OPSDECK_API_TIMEOUT_MS", "2500"),
            ("OPSDECK_ORCHESTRATOR_TIMEOUT_MS", "9000"),
            ("OPSDECK_API_RETRY_COUNT", "5"),
            ("OPSDECK_API_RETRY_DELAY_MS", "250"),
        ]))
        .unwrap();

        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.api.base_url, "http://api.local/api");
        assert_eq!(config.auth_api.base_url, Config::defaults_for(Environment::Test).auth_api.base_url);
        assert_eq!(config.orchestrator_api.base_url, "http://orch.local/api");
        assert_eq!(config.api.timeout_ms, 2500);
        assert_eq!(config.auth_api.timeout_ms, 2500);
        assert_eq!(config.orchestrator_api.timeout_ms, 9000);
        assert_eq!(config.orchestrator_api.retry_count, 5);
        assert_eq!(config.auth_api.retry_delay_ms, 250);
    }

    #[test]
    fn test_bool_parsing() {
        for (raw, expected) in
            [("1", true), ("TRUE", true), ("yes", true), ("on", true), ("0", false), ("off", false)]
        {
            let config = load_from_lookup(lookup(&[("OPSDECK_DEBUG", raw)])).unwrap();
            assert_eq!(config.features.debug, expected, "OPSDECK_DEBUG={raw}");
        }

        let err = load_from_lookup(lookup(&[("OPSDECK_ANALYTICS", "maybe")])).unwrap_err();
        assert!(matches!(err, OpsDeckError::Config(_)));
    }

    #[test]
    fn test_invalid_number_is_an_error() {
        let err =
            load_from_lookup(lookup(&[("OPSDECK_API_TIMEOUT_MS", "not-a-number")])).unwrap_err();
        match err {
            OpsDeckError::Config(msg) => assert!(msg.contains("OPSDECK_API_TIMEOUT_MS")),
            other => panic!("expected config error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_environment_is_an_error() {
        assert!(load_from_lookup(lookup(&[("OPSDECK_ENV", "staging")])).is_err());
    }

    #[test]
    fn test_upload_and_storage_settings() {
        let config = load_from_lookup(lookup(&[
            ("OPSDECK_MAX_UPLOAD_SIZE", "1024"),
            ("OPSDECK_ALLOWED_FILE_TYPES", "image/png, image/webp ,"),
            ("OPSDECK_CACHE_TTL_SECS", "60"),
            ("OPSDECK_STORAGE_DIR", "/var/lib/opsdeck"),
            ("OPSDECK_APP_NAME", "Ops Console"),
        ]))
        .unwrap();

        assert_eq!(config.uploads.max_size_bytes, 1024);
        assert_eq!(config.uploads.allowed_mime_types, vec!["image/png", "image/webp"]);
        assert_eq!(config.cache_ttl_secs, 60);
        assert_eq!(config.storage_dir, "/var/lib/opsdeck");
        assert_eq!(config.app_name, "Ops Console");
    }

    #[test]
    fn test_production_requires_secrets() {
        let err = load_from_lookup(lookup(&[("OPSDECK_ENV", "production")])).unwrap_err();
        match err {
            OpsDeckError::Config(msg) => {
                assert!(msg.contains("OPSDECK_JWT_SECRET"));
                assert!(msg.contains("OPSDECK_DATABASE_URL"));
            }
            other => panic!("expected config error, got {other:?}"),
        }

        let config = load_from_lookup(lookup(&[
            ("OPSDECK_ENV", "production"),
            ("OPSDECK_JWT_SECRET", "s3cret"),
            ("OPSDECK_DATABASE_URL", "postgres://db/opsdeck"),
        ]))
        .unwrap();
        assert_eq!(config.api.base_url, "https://api.opsdeck.io/api");
    }

    #[test]
    fn test_load_from_env_reads_process_environment() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        std::env::set_var("OPSDECK_ENV", "test");
        std::env::set_var("OPSDECK_AUTH_API_URL", "http://auth.test/api");
        std::env::remove_var(CONFIG_FILE_VAR);

        let config = load().expect("config from env");
        assert_eq!(config.environment, Environment::Test);
        assert_eq!(config.auth_api.base_url, "http://auth.test/api");

        std::env::remove_var("OPSDECK_ENV");
        std::env::remove_var("OPSDECK_AUTH_API_URL");
    }

    #[test]
    fn test_load_prefers_config_file() {
        let _guard = ENV_LOCK.lock().expect("env mutex poisoned");

        let mut config = Config::defaults_for(Environment::Test);
        config.app_name = "From File".into();
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(serde_json::to_string(&config).unwrap().as_bytes()).unwrap();
        let path = temp_file.path().with_extension("json");
        std::fs::copy(temp_file.path(), &path).unwrap();

        std::env::set_var(CONFIG_FILE_VAR, &path);
        let loaded = load();
        std::env::remove_var(CONFIG_FILE_VAR);
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.unwrap().app_name, "From File");
    }

    #[test]
    fn test_load_from_file_toml() {
        let toml_content = r#"
environment = "development"
app_name = "OpsDeck"
app_version = "1.2.3"
cache_ttl_secs = 120
storage_dir = ".opsdeck"

[api]
base_url = "http://localhost:8080/api"
timeout_ms = 10000
retry_count = 2
retry_delay_ms = 500

[auth_api]
base_url = "http://localhost:8080/api"
timeout_ms = 10000
retry_count = 2
retry_delay_ms = 500

[orchestrator_api]
base_url = "http://localhost:5000/api"
timeout_ms = 30000
retry_count = 0
retry_delay_ms = 0

[features]
debug = true
mock_api = false
analytics = false
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(toml_content.as_bytes()).unwrap();
        let path = temp_file.path().with_extension("toml");
        std::fs::copy(temp_file.path(), &path).unwrap();

        let result = load_from_file(&path);
        std::fs::remove_file(&path).ok();

        let config = result.expect("Should load config from TOML file");
        assert_eq!(config.app_version, "1.2.3");
        assert_eq!(config.api.retry_count, 2);
        assert!(config.features.debug);
        assert_eq!(config.uploads, opsdeck_domain::UploadConfig::default());
    }

    #[test]
    fn test_load_from_file_not_found() {
        let result = load_from_file(PathBuf::from("/nonexistent/config.json"));
        assert!(matches!(result, Err(OpsDeckError::Config(_))));
    }

    #[test]
    fn test_parse_config_invalid_json() {
        let result = parse_config(r#"{ "this is": "not valid json" "#, Path::new("test.json"));
        assert!(result.is_err(), "Should fail with invalid JSON");
    }

    #[test]
    fn test_parse_config_unsupported_format() {
        let result = parse_config("some content", Path::new("test.yaml"));
        assert!(result.is_err(), "Should fail with unsupported format");
    }
}
