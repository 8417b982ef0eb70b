//! # Employee Document Routes
//!
//! | Method | Path                                    | Operation        |
//! |--------|-----------------------------------------|------------------|
//! | GET    | `/dashboard/documents`                  | Annotated listing|
//! | POST   | `/dashboard/documents/:id/acknowledge`  | Acknowledge      |
//!
//! Any resolved identity may acknowledge any document; audience
//! targeting is advisory, not an access filter.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::Caller;
use crate::db::acknowledgments::{self, AcknowledgmentRecord};
use crate::directory::{self, AckFilter, ViewerDocument};
use crate::error::AppError;
use crate::state::AppState;

/// Router for the employee surface.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard/documents", get(list))
        .route("/dashboard/documents/:id/acknowledge", post(acknowledge))
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    #[serde(default)]
    pub filter: AckFilter,
    #[serde(default)]
    pub search: Option<String>,
}

/// List documents for the caller, newest first, with acknowledgment
/// state and optional filter/search.
async fn list(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<ViewerDocument>>, AppError> {
    let docs =
        directory::list_for_viewer(&state, &identity, query.filter, query.search.as_deref())
            .await?;
    Ok(Json(docs))
}

/// Record the caller's acknowledgment of a document.
///
/// A repeat acknowledgment maps to 409 via the ledger's unique
/// constraint; an unknown or deleted document id maps to 404 via its
/// foreign key.
async fn acknowledge(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<AcknowledgmentRecord>), AppError> {
    let record = acknowledgments::insert(&state.pool, id, &identity).await?;
    tracing::info!(document_id = %id, user_id = %identity.user_id, "document acknowledged");
    Ok((StatusCode::CREATED, Json(record)))
}
