use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use depthcrawl_server::config::ServerConfig;
use depthcrawl_server::routes;
use depthcrawl_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("depthcrawl=info".parse()?))
        .with_target(false)
        .init();

    let config = ServerConfig::from_env().context("Invalid server configuration")?;
    let addr = config.addr();

    let state = Arc::new(
        AppState::new(&config.crawl, config.api_key.clone())
            .context("Failed to build crawler")?,
    );
    if state.api_key.is_none() {
        tracing::warn!("DEPTHCRAWL_API_KEY not set, /api/v1 endpoints are open");
    }

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!(
        rate_limit = config.crawl.rate_limit.requests,
        rate_period_secs = config.crawl.rate_limit.period.as_secs(),
        max_concurrent_fetches = config.crawl.max_concurrent_fetches,
        "Starting server on {addr}"
    );
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
