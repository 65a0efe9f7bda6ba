use anyhow::Context;

use innkeep_api::{app, config::ApiConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    innkeep_observability::init();

    let config = ApiConfig::from_env();
    let services = app::services::AppServices::in_memory();
    if config.seed_demo {
        services.seed_demo().context("failed to seed demo inventory")?;
        tracing::info!("demo inventory loaded");
    }

    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;

    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
