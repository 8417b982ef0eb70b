//! # docack-api — Axum HTTP Service for Docack
//!
//! Docack distributes company documents and tracks per-employee
//! acknowledgments. The service owns the document metadata and the
//! acknowledgment ledger in Postgres; sessions, file bytes, and mail
//! transport are delegated to managed providers via `docack-providers`.
//!
//! ## API Surface
//!
//! | Prefix                    | Module                  | Domain            |
//! |---------------------------|-------------------------|-------------------|
//! | `/`                       | [`routes`]              | Login landing     |
//! | `/auth/*`                 | [`routes::auth`]        | Auth flows        |
//! | `/dashboard/documents/*`  | [`routes::documents`]   | Employee listing  |
//! | `/admin/documents/*`      | [`routes::admin`]       | Admin console     |
//! | `/health/*`               | (here)                  | Probes            |
//!
//! ## Middleware Stack (execution order)
//!
//! ```text
//! TraceLayer → Gate (session resolution + routing rules) → Handler
//! ```

pub mod auth;
pub mod db;
pub mod directory;
pub mod error;
pub mod extractors;
pub mod gate;
pub mod routes;
pub mod session;
pub mod state;

use axum::middleware::from_fn_with_state;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Assemble the full application router with all routes and middleware.
///
/// Health probes (`/health/*`) are mounted outside the gate so they
/// remain accessible without a session.
pub fn app(state: AppState) -> Router {
    // Gated application routes.
    let gated = Router::new()
        .merge(routes::router())
        .merge(routes::auth::router())
        .merge(routes::documents::router())
        .merge(routes::admin::router())
        .layer(from_fn_with_state(state.clone(), gate::gate_middleware))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Unauthenticated health probes.
    let health = Router::new()
        .route("/health/liveness", axum::routing::get(liveness))
        .route("/health/readiness", axum::routing::get(readiness));

    Router::new().merge(health).merge(gated)
}

/// Liveness probe — always returns 200 if the process is running.
async fn liveness() -> &'static str {
    "ok"
}

/// Readiness probe — returns 200 when the application is ready to serve.
async fn readiness() -> &'static str {
    "ready"
}
