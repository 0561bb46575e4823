//! Application constants
//!
//! Centralized location for domain-level constants: storage keys, header
//! names and the fallback values used when an environment variable is absent.

// Durable storage keys
pub const STORAGE_KEY_AUTH_TOKENS: &str = "authTokens";
pub const STORAGE_KEY_LOGIN_RESPONSE: &str = "loginResponse";

// HTTP
pub const DEFAULT_TOKEN_TYPE: &str = "Bearer";
pub const JSON_CONTENT_TYPE: &str = "application/json";
pub const UPLOAD_FIELD_NAME: &str = "file";

// Retry / timeout fallbacks
pub const DEFAULT_RETRY_COUNT: u32 = 3;
pub const DEFAULT_RETRY_DELAY_MS: u64 = 1000;

// Uploads
pub const DEFAULT_MAX_UPLOAD_SIZE: u64 = 10 * 1024 * 1024; // 10 MiB
pub const DEFAULT_ALLOWED_FILE_TYPES: &[&str] =
    &["image/jpeg", "image/png", "image/gif", "image/webp", "application/pdf"];

// Misc
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;
pub const DEFAULT_APP_NAME: &str = "OpsDeck";
pub const DEFAULT_STORAGE_DIR: &str = ".opsdeck";
pub const DEFAULT_PAGE_LIMIT: u32 = 20;
