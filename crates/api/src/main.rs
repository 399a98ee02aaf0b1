use std::sync::Arc;

use anyhow::Context;

use tablegate_api::context::{AppContext, WebSettings};
use tablegate_auth::EntraIdentityProvider;
use tablegate_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tablegate_observability::init();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::debug!(?config, "configuration loaded");

    let records = tablegate_infra::db::record_store(&config.database)
        .context("invalid database configuration")?;
    let identity = EntraIdentityProvider::new(config.entra.clone());

    let ctx = AppContext::new(
        Arc::new(records),
        Arc::new(identity),
        WebSettings::from(&config),
    );
    let app = tablegate_api::app::build_app(ctx);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!(
        addr = %listener.local_addr()?,
        table = %config.database.table,
        "listening"
    );

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
