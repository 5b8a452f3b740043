//! CivicDesk API server

use anyhow::Context;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use civicdesk::config::ServiceConfig;
use civicdesk::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServiceConfig::load().context("loading configuration")?;
    if config.auth.uses_dev_secret() {
        tracing::warn!("using the development JWT secret; set CIVICDESK__AUTH__JWT_SECRET");
    }

    let state = Arc::new(AppState::in_memory(&config));

    match &config.seed.super_admin {
        Some(seed) => {
            state
                .accounts
                .seed_super_admin(seed)
                .await
                .context("seeding super admin")?;
        }
        None => tracing::warn!("no super admin configured; department admins cannot be registered"),
    }

    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!("CivicDesk API listening on {}", config.listen_addr);

    axum::serve(listener, app).await?;
    Ok(())
}
