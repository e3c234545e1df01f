mod auth;
mod config;
mod error;
mod handlers;
mod models;
mod rate_limit;
mod router;
mod state;

use clap::Parser;
use config::GatewayConfig;
use ledger::MemoryStore;
use router::create_router;
use state::AppState;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "gateway=info,ledger=info,tower_http=debug".into()),
        )
        .init();

    let config = GatewayConfig::parse();
    tracing::info!(listen = %config.listen_addr, "Starting Gateway API service");

    let store = Arc::new(MemoryStore::new());
    let state = AppState::new(&config, store);
    let sweeper = state.rate_limiter.spawn_sweeper(Duration::from_secs(60));

    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    tracing::info!("Listening on {}", config.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    sweeper.abort();
    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
