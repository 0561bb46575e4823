//! OpsDeck - orchestrator admin client
//!
//! Resolves configuration, restores a persisted session and checks the
//! orchestrator. Exits non-zero when configuration cannot be resolved.

use anyhow::Context;
use opsdeck_app::utils::logging::{init_logging, log_config_summary};
use opsdeck_app::AppContext;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Seed the environment before config resolution reads it.
    let dotenv = dotenvy::dotenv();

    let config = opsdeck_infra::config::load().context("failed to resolve configuration")?;

    init_logging(&config);
    match dotenv {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(err) => warn!(error = %err, "no .env file loaded"),
    }
    log_config_summary(&config);

    let ctx = AppContext::new(config).context("failed to build application context")?;

    if ctx.restore_session().await {
        info!("restored persisted session");
    } else {
        info!("no persisted session, running anonymously");
    }

    let health = ctx.health_check().await;
    for component in &health.components {
        if component.is_healthy {
            info!(component = %component.name, message = ?component.message, "component healthy");
        } else {
            warn!(component = %component.name, message = ?component.message, "component unhealthy");
        }
    }

    if health.is_healthy {
        info!(score = health.score, "OpsDeck ready");
    } else {
        warn!(score = health.score, "OpsDeck started with degraded backends");
    }

    Ok(())
}
