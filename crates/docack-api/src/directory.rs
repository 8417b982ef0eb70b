//! # Document Directory
//!
//! Orchestration over the database layer and the storage provider:
//! viewer listings with acknowledgment annotation, admin listings with
//! counts, the detail view with its audience, upload with explicit
//! compensation, and delete with best-effort object removal.

use chrono::Utc;
use docack_core::{normalize_target_emails, Identity, Visibility};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::acknowledgments::AcknowledgmentRecord;
use crate::db::documents::DocumentRecord;
use crate::db::{acknowledgments, documents, targets};
use crate::error::AppError;
use crate::state::AppState;

// ── Viewer listing ──────────────────────────────────────────────────────────

/// Acknowledgment-state filter for the viewer listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AckFilter {
    #[default]
    All,
    Acknowledged,
    Unacknowledged,
}

/// A document as the employee listing renders it.
#[derive(Debug, Clone, Serialize)]
pub struct ViewerDocument {
    #[serde(flatten)]
    pub document: DocumentRecord,
    /// Whether the viewer has a ledger row for this document.
    pub acknowledged: bool,
}

/// List documents for a viewer, newest first, each annotated with the
/// viewer's acknowledgment state.
///
/// Audience targeting is advisory: targeted documents still appear for
/// every viewer, and the viewer's ledger rows are fetched in one bulk
/// read rather than per document.
pub async fn list_for_viewer(
    state: &AppState,
    identity: &Identity,
    filter: AckFilter,
    search: Option<&str>,
) -> Result<Vec<ViewerDocument>, AppError> {
    let (docs, acked) = tokio::try_join!(
        documents::list_all(&state.pool),
        acknowledgments::document_ids_for_user(&state.pool, identity.user_id),
    )?;

    Ok(annotate_and_filter(docs, &acked, filter, search))
}

/// Pure listing step: annotate with the viewer's acknowledgment set,
/// then apply the state filter and case-insensitive search over title
/// and description.
fn annotate_and_filter(
    docs: Vec<DocumentRecord>,
    acked: &std::collections::HashSet<Uuid>,
    filter: AckFilter,
    search: Option<&str>,
) -> Vec<ViewerDocument> {
    let needle = search.map(str::to_lowercase).filter(|s| !s.is_empty());

    docs.into_iter()
        .map(|document| {
            let acknowledged = acked.contains(&document.id);
            ViewerDocument {
                document,
                acknowledged,
            }
        })
        .filter(|entry| match filter {
            AckFilter::All => true,
            AckFilter::Acknowledged => entry.acknowledged,
            AckFilter::Unacknowledged => !entry.acknowledged,
        })
        .filter(|entry| {
            let Some(needle) = &needle else { return true };
            entry.document.title.to_lowercase().contains(needle)
                || entry
                    .document
                    .description
                    .as_deref()
                    .is_some_and(|d| d.to_lowercase().contains(needle))
        })
        .collect()
}

// ── Admin listing & detail ──────────────────────────────────────────────────

/// A document as the admin listing renders it.
#[derive(Debug, Clone, Serialize)]
pub struct AdminDocument {
    #[serde(flatten)]
    pub document: DocumentRecord,
    pub acknowledgment_count: i64,
}

/// List all documents with acknowledgment counts, newest first.
pub async fn list_all_with_counts(state: &AppState) -> Result<Vec<AdminDocument>, AppError> {
    let rows = documents::list_with_ack_counts(&state.pool).await?;
    Ok(rows
        .into_iter()
        .map(|(document, acknowledgment_count)| AdminDocument {
            document,
            acknowledgment_count,
        })
        .collect())
}

/// A document with its full acknowledgment history and audience.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentDetail {
    pub document: DocumentRecord,
    /// Ledger rows, newest first.
    pub acknowledgments: Vec<AcknowledgmentRecord>,
    /// Target emails for `targeted` documents; empty for `all`.
    pub target_emails: Vec<String>,
    /// Targeted emails with no ledger row yet.
    pub pending: Vec<String>,
}

/// Fetch a document with its audience. The three reads are issued
/// concurrently.
pub async fn get_with_audience(state: &AppState, id: Uuid) -> Result<DocumentDetail, AppError> {
    let (document, acks, target_emails) = tokio::try_join!(
        documents::get_by_id(&state.pool, id),
        acknowledgments::list_for_document(&state.pool, id),
        targets::list_for_document(&state.pool, id),
    )?;

    let document = document.ok_or_else(|| AppError::NotFound(format!("document {id}")))?;
    let pending = pending_targets(&target_emails, &acks);

    Ok(DocumentDetail {
        document,
        acknowledgments: acks,
        target_emails,
        pending,
    })
}

/// Targeted emails that have not acknowledged yet. Target rows are
/// stored lowercased; ledger emails are lowercased for the comparison.
fn pending_targets(target_emails: &[String], acks: &[AcknowledgmentRecord]) -> Vec<String> {
    let acked: std::collections::HashSet<String> =
        acks.iter().map(|a| a.user_email.to_lowercase()).collect();

    target_emails
        .iter()
        .filter(|email| !acked.contains(*email))
        .cloned()
        .collect()
}

// ── Upload ──────────────────────────────────────────────────────────────────

/// A validated upload request.
#[derive(Debug)]
pub struct NewDocument {
    pub title: String,
    pub description: Option<String>,
    pub visibility: Visibility,
    /// Raw target emails; normalized before storage.
    pub target_emails: Vec<String>,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Create a document: store the file, insert the row, then insert
/// target rows for targeted visibility.
///
/// Target-insert failure triggers explicit compensation: the document
/// row and the stored object are removed so no partially targeted
/// document survives.
pub async fn create(
    state: &AppState,
    creator: &Identity,
    upload: NewDocument,
) -> Result<DocumentRecord, AppError> {
    let object_name = object_name(&upload.file_name);

    state
        .providers
        .storage()
        .put(&object_name, upload.bytes, &upload.content_type)
        .await?;

    let now = Utc::now();
    let record = DocumentRecord {
        id: Uuid::new_v4(),
        title: upload.title,
        description: upload.description,
        file_url: state.providers.storage().public_url(&object_name),
        file_name: upload.file_name,
        visibility: upload.visibility,
        created_by: creator.user_id,
        created_at: now,
        updated_at: now,
    };

    if let Err(e) = documents::insert(&state.pool, &record).await {
        remove_object_best_effort(state, &object_name).await;
        return Err(e.into());
    }

    if upload.visibility == Visibility::Targeted {
        let emails = normalize_target_emails(&upload.target_emails);
        if let Err(e) = targets::insert_many(&state.pool, record.id, &emails).await {
            tracing::error!(
                document_id = %record.id,
                error = %e,
                "target insert failed, compensating upload"
            );
            if let Err(del) = documents::delete(&state.pool, record.id).await {
                tracing::error!(document_id = %record.id, error = %del, "compensation row delete failed");
            }
            remove_object_best_effort(state, &object_name).await;
            return Err(e.into());
        }
    }

    tracing::info!(
        document_id = %record.id,
        visibility = %record.visibility,
        "document created"
    );
    Ok(record)
}

/// Storage object name: millisecond timestamp prefix keeps repeated
/// uploads of the same file name from colliding.
fn object_name(file_name: &str) -> String {
    format!("{}-{}", Utc::now().timestamp_millis(), sanitize(file_name))
}

/// Restrict object names to a conservative character set; everything
/// else becomes `_`.
fn sanitize(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

// ── Delete ──────────────────────────────────────────────────────────────────

/// Delete a document. The stored object is removed best-effort; the row
/// delete is authoritative and cascades to targets and acknowledgments.
pub async fn delete(state: &AppState, id: Uuid) -> Result<(), AppError> {
    let document = documents::get_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("document {id}")))?;

    if let Some(object) = object_name_from_url(&document.file_url) {
        remove_object_best_effort(state, object).await;
    } else {
        tracing::warn!(document_id = %id, file_url = %document.file_url, "could not derive object name from file URL");
    }

    if !documents::delete(&state.pool, id).await? {
        // Raced with another delete between the read and the write.
        return Err(AppError::NotFound(format!("document {id}")));
    }

    tracing::info!(document_id = %id, "document deleted");
    Ok(())
}

/// The storage object name is the final path segment of the public URL.
fn object_name_from_url(file_url: &str) -> Option<&str> {
    file_url.rsplit('/').next().filter(|s| !s.is_empty())
}

async fn remove_object_best_effort(state: &AppState, object_name: &str) {
    if let Err(e) = state.providers.storage().remove(object_name).await {
        tracing::warn!(object = object_name, error = %e, "storage object removal failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn doc(title: &str, description: Option<&str>) -> DocumentRecord {
        let now = Utc::now();
        DocumentRecord {
            id: Uuid::new_v4(),
            title: title.to_string(),
            description: description.map(String::from),
            file_url: "https://backend.docack.io/storage/v1/object/public/documents/1-f.pdf"
                .to_string(),
            file_name: "f.pdf".to_string(),
            visibility: Visibility::All,
            created_by: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
        }
    }

    fn ack(email: &str) -> AcknowledgmentRecord {
        AcknowledgmentRecord {
            id: Uuid::new_v4(),
            document_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            user_email: email.to_string(),
            acknowledged_at: Utc::now(),
        }
    }

    // ── annotate_and_filter ──────────────────────────────────────

    #[test]
    fn annotation_marks_acknowledged_documents() {
        let a = doc("Handbook", None);
        let b = doc("Policy", None);
        let acked: HashSet<Uuid> = [a.id].into_iter().collect();

        let out = annotate_and_filter(vec![a.clone(), b.clone()], &acked, AckFilter::All, None);
        assert_eq!(out.len(), 2);
        assert!(out[0].acknowledged);
        assert!(!out[1].acknowledged);
    }

    #[test]
    fn filter_acknowledged_keeps_only_acked() {
        let a = doc("Handbook", None);
        let b = doc("Policy", None);
        let acked: HashSet<Uuid> = [a.id].into_iter().collect();

        let out = annotate_and_filter(vec![a.clone(), b], &acked, AckFilter::Acknowledged, None);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].document.id, a.id);
    }

    #[test]
    fn filter_unacknowledged_keeps_only_unacked() {
        let a = doc("Handbook", None);
        let b = doc("Policy", None);
        let acked: HashSet<Uuid> = [a.id].into_iter().collect();

        let out = annotate_and_filter(vec![a, b.clone()], &acked, AckFilter::Unacknowledged, None);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].document.id, b.id);
    }

    #[test]
    fn search_is_case_insensitive_over_title_and_description() {
        let a = doc("Employee Handbook", None);
        let b = doc("Q3 Update", Some("travel POLICY changes"));
        let c = doc("Org chart", None);
        let acked = HashSet::new();

        let out = annotate_and_filter(
            vec![a.clone(), b.clone(), c],
            &acked,
            AckFilter::All,
            Some("handbook"),
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].document.id, a.id);

        let out = annotate_and_filter(vec![b.clone()], &acked, AckFilter::All, Some("policy"));
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].document.id, b.id);
    }

    #[test]
    fn empty_search_matches_everything() {
        let acked = HashSet::new();
        let out = annotate_and_filter(
            vec![doc("A", None), doc("B", None)],
            &acked,
            AckFilter::All,
            Some("   ".trim()),
        );
        assert_eq!(out.len(), 2);
    }

    // ── pending_targets ──────────────────────────────────────────

    #[test]
    fn pending_excludes_acknowledged_targets() {
        let targets = vec!["a@docack.io".to_string(), "b@docack.io".to_string()];
        let acks = vec![ack("A@docack.io")];
        assert_eq!(pending_targets(&targets, &acks), vec!["b@docack.io"]);
    }

    #[test]
    fn pending_is_empty_when_all_acknowledged() {
        let targets = vec!["a@docack.io".to_string()];
        let acks = vec![ack("a@docack.io")];
        assert!(pending_targets(&targets, &acks).is_empty());
    }

    // ── object names ─────────────────────────────────────────────

    #[test]
    fn object_name_is_millis_prefixed() {
        let name = object_name("handbook.pdf");
        let (prefix, rest) = name.split_once('-').expect("millis prefix");
        assert!(prefix.parse::<i64>().is_ok());
        assert_eq!(rest, "handbook.pdf");
    }

    #[test]
    fn sanitize_replaces_unsafe_characters() {
        assert_eq!(sanitize("q3 report (final).pdf"), "q3_report__final_.pdf");
        assert_eq!(sanitize("côté.pdf"), "c_t_.pdf");
        assert_eq!(sanitize("plain-name_v2.pdf"), "plain-name_v2.pdf");
    }

    #[test]
    fn object_name_from_url_takes_final_segment() {
        assert_eq!(
            object_name_from_url(
                "https://backend.docack.io/storage/v1/object/public/documents/1700000000000-h.pdf"
            ),
            Some("1700000000000-h.pdf")
        );
        assert_eq!(object_name_from_url("https://backend.docack.io/"), None);
    }

    // ── AckFilter deserialization ────────────────────────────────

    #[test]
    fn ack_filter_deserializes_lowercase() {
        assert_eq!(
            serde_json::from_str::<AckFilter>("\"acknowledged\"").unwrap(),
            AckFilter::Acknowledged
        );
        assert_eq!(
            serde_json::from_str::<AckFilter>("\"unacknowledged\"").unwrap(),
            AckFilter::Unacknowledged
        );
        assert_eq!(
            serde_json::from_str::<AckFilter>("\"all\"").unwrap(),
            AckFilter::All
        );
        assert!(serde_json::from_str::<AckFilter>("\"pending\"").is_err());
    }
}
