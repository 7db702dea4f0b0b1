use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;

use rolegate_api::app::{self, services};
use rolegate_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    rolegate_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::debug!(?config, "configuration loaded");

    let cors_origin = HeaderValue::from_str(&config.cors_origin)
        .with_context(|| format!("CORS_ORIGIN is not a valid origin: {}", config.cors_origin))?;

    let services = Arc::new(
        services::build_services(&config)
            .await
            .context("failed to initialise services")?,
    );

    // Seeding runs beside the server; its outcome never blocks serving.
    if config.seed_admins {
        let seeding = services.clone();
        tokio::spawn(async move { services::seed(&seeding).await });
    }

    let app = app::build_app(services, cors_origin);

    let listener = tokio::net::TcpListener::bind(("0.0.0.0", config.port))
        .await
        .with_context(|| format!("failed to bind 0.0.0.0:{}", config.port))?;

    tracing::info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
