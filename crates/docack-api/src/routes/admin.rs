//! # Admin Console Routes
//!
//! | Method | Path                   | Operation                      |
//! |--------|------------------------|--------------------------------|
//! | GET    | `/admin/documents`     | Listing with ack counts        |
//! | POST   | `/admin/documents`     | Upload (multipart)             |
//! | GET    | `/admin/documents/:id` | Detail with audience + pending |
//! | DELETE | `/admin/documents/:id` | Delete                         |
//!
//! The gate already redirects non-admins away from this namespace;
//! every handler still calls [`require_admin`] so the check holds even
//! if the two layers ever disagree.

use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use docack_core::Visibility;
use uuid::Uuid;

use crate::auth::{require_admin, Caller};
use crate::db::documents::DocumentRecord;
use crate::directory::{self, AdminDocument, DocumentDetail, NewDocument};
use crate::error::AppError;
use crate::state::AppState;

/// Router for the admin console.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/admin/documents", get(list).post(create))
        .route("/admin/documents/:id", get(detail).delete(delete))
}

/// List all documents with acknowledgment counts, newest first.
async fn list(
    State(state): State<AppState>,
    Caller(identity): Caller,
) -> Result<Json<Vec<AdminDocument>>, AppError> {
    require_admin(&identity)?;
    Ok(Json(directory::list_all_with_counts(&state).await?))
}

/// Upload a new document.
async fn create(
    State(state): State<AppState>,
    Caller(identity): Caller,
    multipart: Multipart,
) -> Result<(StatusCode, Json<DocumentRecord>), AppError> {
    require_admin(&identity)?;
    let upload = parse_upload(multipart).await?;
    let record = directory::create(&state, &identity, upload).await?;
    Ok((StatusCode::CREATED, Json(record)))
}

/// Fetch a document with its acknowledgment history, target emails, and
/// the targets still pending.
async fn detail(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(id): Path<Uuid>,
) -> Result<Json<DocumentDetail>, AppError> {
    require_admin(&identity)?;
    Ok(Json(directory::get_with_audience(&state, id).await?))
}

/// Delete a document and best-effort remove its stored file.
async fn delete(
    State(state): State<AppState>,
    Caller(identity): Caller,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    require_admin(&identity)?;
    directory::delete(&state, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Multipart parsing ───────────────────────────────────────────────────────

/// Parse the upload form.
///
/// Fields: `title` (required), `description`, `visibility`
/// (`all`|`targeted`, default `all`), `target_emails` (comma- or
/// newline-separated, repeatable), `file` (required).
async fn parse_upload(mut multipart: Multipart) -> Result<NewDocument, AppError> {
    let mut title = None;
    let mut description = None;
    let mut visibility = Visibility::All;
    let mut target_emails = Vec::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "title" => {
                title = Some(text_field(field, "title").await?);
            }
            "description" => {
                let value = text_field(field, "description").await?;
                if !value.trim().is_empty() {
                    description = Some(value);
                }
            }
            "visibility" => {
                let value = text_field(field, "visibility").await?;
                visibility = Visibility::parse(value.trim())?;
            }
            "target_emails" => {
                let value = text_field(field, "target_emails").await?;
                target_emails.extend(
                    value
                        .split(|c| c == ',' || c == '\n')
                        .map(str::to_string),
                );
            }
            "file" => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .filter(|n| !n.is_empty())
                    .ok_or_else(|| AppError::Validation("file name is required".to_string()))?;
                let content_type = field
                    .content_type()
                    .map(str::to_string)
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            other => {
                tracing::debug!(field = other, "ignoring unknown upload field");
            }
        }
    }

    let title = title
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .ok_or(docack_core::ValidationError::MissingField("title"))?;
    let (file_name, content_type, bytes) =
        file.ok_or(docack_core::ValidationError::MissingField("file"))?;
    if bytes.is_empty() {
        return Err(AppError::Validation("file is empty".to_string()));
    }

    Ok(NewDocument {
        title,
        description,
        visibility,
        target_emails,
        file_name,
        content_type,
        bytes,
    })
}

async fn text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &'static str,
) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid {name} field: {e}")))
}
