//! # Route Handlers
//!
//! One module per surface: auth flows, the employee document list, and
//! the admin console. The login landing at `/` lives here.

pub mod admin;
pub mod auth;
pub mod documents;

use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

/// Router for the login landing.
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(root))
}

/// Login landing. The gate redirects authenticated callers to the
/// dashboard before this handler runs.
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "service": "docack",
        "login": "/auth/login",
    }))
}
