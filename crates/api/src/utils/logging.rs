//! Tracing setup and logging helpers for the binary

use opsdeck_domain::{Config, Environment};
use opsdeck_infra::ApiError;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is not set.
pub fn default_filter(config: &Config) -> &'static str {
    if config.features.debug {
        "debug"
    } else {
        "info"
    }
}

/// Install the global subscriber.
///
/// `RUST_LOG` wins over the config-derived level. Production emits JSON
/// lines; every other environment uses the human-readable formatter.
/// Calling this twice is a no-op.
pub fn init_logging(config: &Config) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(config)));

    let registry = tracing_subscriber::registry().with(filter);

    let result = if config.environment == Environment::Production {
        registry.with(fmt::layer().json().with_current_span(false)).try_init()
    } else {
        registry.with(fmt::layer().with_target(false)).try_init()
    };

    if result.is_ok() {
        info!(environment = %config.environment, "logging initialized");
    }
}

/// Stable label for an API error, for log fields.
#[inline]
pub fn error_label(error: &ApiError) -> &'static str {
    match error {
        ApiError::Timeout(_) => "timeout",
        ApiError::Network(_) => "network",
        ApiError::Http { status, .. } if *status >= 500 => "server",
        ApiError::Http { status: 401 | 403, .. } => "auth",
        ApiError::Http { .. } => "client",
        ApiError::Decode { .. } => "decode",
        ApiError::Encode(_) => "encode",
        ApiError::InvalidInput(_) => "invalid_input",
        ApiError::Config(_) => "config",
        ApiError::Storage(_) => "storage",
    }
}

/// Log the resolved environment. Secrets are never included.
pub fn log_config_summary(config: &Config) {
    info!(
        app = %config.app_name,
        version = %config.app_version,
        environment = %config.environment,
        api = %config.api.base_url,
        auth_api = %config.auth_api.base_url,
        orchestrator_api = %config.orchestrator_api.base_url,
        api_timeout_ms = config.api.timeout_ms,
        orchestrator_timeout_ms = config.orchestrator_api.timeout_ms,
        retries = config.api.retry_count,
        debug = config.features.debug,
        mock_api = config.features.mock_api,
        analytics = config.features.analytics,
        storage_dir = %config.storage_dir,
        "configuration resolved"
    );
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use opsdeck_infra::api::ServerError;
    use serde_json::json;

    use super::*;

    #[test]
    fn debug_flag_raises_default_level() {
        let mut config = Config::default();
        assert_eq!(default_filter(&config), "info");

        config.features.debug = true;
        assert_eq!(default_filter(&config), "debug");
    }

    #[test]
    fn error_labels_follow_status_class() {
        assert_eq!(error_label(&ApiError::Timeout(Duration::from_secs(1))), "timeout");
        assert_eq!(error_label(&ApiError::from_response(503, json!(null))), "server");
        assert_eq!(error_label(&ApiError::from_response(401, json!(null))), "auth");
        assert_eq!(
            error_label(&ApiError::Http {
                status: 404,
                error: ServerError::Unparsed { body: json!("missing") },
            }),
            "client"
        );
        assert_eq!(error_label(&ApiError::InvalidInput("x".into())), "invalid_input");
    }
}
