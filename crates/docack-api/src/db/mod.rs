//! # Database Persistence Layer
//!
//! Postgres persistence for Docack-owned state via SQLx.
//!
//! ## What is persisted (Docack owned)
//!
//! - Document metadata rows (`documents`)
//! - Target-email rows for targeted documents (`document_targets`)
//! - The acknowledgment ledger (`acknowledgments`)
//!
//! ## What is NOT persisted here
//!
//! Users, sessions, and uploaded file bytes live with the managed
//! providers and are accessed via `docack-providers`.
//!
//! All functions take a `&PgPool`; there is no in-process cache, so
//! handlers stay stateless and any instance can serve any request.

pub mod acknowledgments;
pub mod documents;
pub mod targets;

use sqlx::postgres::{PgPool, PgPoolOptions};

/// Initialize the database connection pool and run migrations.
///
/// `DATABASE_URL` is mandatory: the document directory and the
/// acknowledgment ledger are the service's reason to exist, so there is
/// no degraded in-memory mode.
pub async fn init_pool() -> Result<PgPool, sqlx::Error> {
    let url = std::env::var("DATABASE_URL")
        .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;

    let pool = PgPoolOptions::new()
        .max_connections(20)
        .min_connections(2)
        .acquire_timeout(std::time::Duration::from_secs(5))
        .connect(&url)
        .await?;

    tracing::info!("Connected to PostgreSQL");

    // Run embedded migrations.
    sqlx::migrate!("./migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    Ok(pool)
}
