//! # docack-api — Binary Entry Point
//!
//! Starts the Axum HTTP server for the Docack API.
//! Binds to configurable port (default 8080).

use docack_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured tracing.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Build configuration from environment.
    let config = AppConfig::from_env();

    // Initialize database pool and run migrations.
    let pool = docack_api::db::init_pool().await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;

    // Provider clients for identity, storage, and email.
    let provider_config = docack_providers::ProviderConfig::from_env().map_err(|e| {
        tracing::error!("Provider configuration failed: {e}");
        e
    })?;
    let providers = docack_providers::ProviderClient::new(provider_config).map_err(|e| {
        tracing::error!("Provider client initialization failed: {e}");
        e
    })?;

    let port = config.port;
    let state = AppState {
        pool,
        providers,
        config,
    };

    let app = docack_api::app(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Docack API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
