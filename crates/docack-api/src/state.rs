//! # Application State
//!
//! Shared state for the Axum application, passed to all route handlers
//! via the `State` extractor.
//!
//! AppState holds only Docack-owned concerns:
//! - **Postgres pool** — documents, target rows, and the acknowledgment
//!   ledger (the only state this service persists).
//! - **Provider client** — typed clients for the identity provider,
//!   object storage, and email delivery.
//!
//! Sessions and user records are NOT stored here. They live with the
//! identity provider and are resolved per request by the access gate.

use docack_providers::ProviderClient;
use sqlx::PgPool;

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Postgres connection pool.
    pub pool: PgPool,
    /// Clients for the managed collaborators.
    pub providers: ProviderClient,
    /// Service configuration.
    pub config: AppConfig,
}

/// Service configuration built from environment variables in `main`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Port the server binds to.
    pub port: u16,
    /// Public base URL of this deployment, used as the magic-link
    /// redirect target. No trailing slash.
    pub public_base_url: String,
}

impl AppConfig {
    /// Build configuration from `PORT` and `DOCACK_PUBLIC_URL`.
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let public_base_url = std::env::var("DOCACK_PUBLIC_URL")
            .unwrap_or_else(|_| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_string();

        Self {
            port,
            public_base_url,
        }
    }
}
