//! Document persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `documents` table.
//! Rows are created by admin upload and never mutated except delete;
//! visibility is immutable after insert.

use chrono::{DateTime, Utc};
use docack_core::Visibility;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// A stored document.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentRecord {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    /// Durable public URL of the stored file.
    pub file_url: String,
    /// Original upload file name, shown to viewers.
    pub file_name: String,
    pub visibility: Visibility,
    pub created_by: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert a new document record.
pub async fn insert(pool: &PgPool, record: &DocumentRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO documents (id, title, description, file_url, file_name, visibility, created_by, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(record.id)
    .bind(&record.title)
    .bind(&record.description)
    .bind(&record.file_url)
    .bind(&record.file_name)
    .bind(record.visibility.as_str())
    .bind(record.created_by)
    .bind(record.created_at)
    .bind(record.updated_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Fetch a document by ID.
pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<DocumentRecord>, sqlx::Error> {
    let row = sqlx::query_as::<_, DocumentRow>(
        "SELECT id, title, description, file_url, file_name, visibility, created_by, created_at, updated_at
         FROM documents WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(DocumentRow::into_record))
}

/// List all documents, newest first.
pub async fn list_all(pool: &PgPool) -> Result<Vec<DocumentRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, DocumentRow>(
        "SELECT id, title, description, file_url, file_name, visibility, created_by, created_at, updated_at
         FROM documents ORDER BY created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(DocumentRow::into_record).collect())
}

/// List all documents with their acknowledgment counts, newest first.
///
/// One grouped query instead of a count query per document.
pub async fn list_with_ack_counts(
    pool: &PgPool,
) -> Result<Vec<(DocumentRecord, i64)>, sqlx::Error> {
    let rows = sqlx::query_as::<_, CountedDocumentRow>(
        "SELECT d.id, d.title, d.description, d.file_url, d.file_name, d.visibility,
                d.created_by, d.created_at, d.updated_at,
                COUNT(a.id) AS acknowledgment_count
         FROM documents d
         LEFT JOIN acknowledgments a ON a.document_id = d.id
         GROUP BY d.id
         ORDER BY d.created_at DESC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| {
            let count = row.acknowledgment_count;
            (row.document.into_record(), count)
        })
        .collect())
}

/// Delete a document row. Target and acknowledgment rows cascade.
///
/// Returns `false` if no row matched.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM documents WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct DocumentRow {
    id: Uuid,
    title: String,
    description: Option<String>,
    file_url: String,
    file_name: String,
    visibility: String,
    created_by: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(sqlx::FromRow)]
struct CountedDocumentRow {
    #[sqlx(flatten)]
    document: DocumentRow,
    acknowledgment_count: i64,
}

impl DocumentRow {
    fn into_record(self) -> DocumentRecord {
        // The CHECK constraint keeps the column to known values; an
        // unknown value here means external tampering, so log and fall
        // back to the narrower audience.
        let visibility = Visibility::parse(&self.visibility).unwrap_or_else(|e| {
            tracing::error!(id = %self.id, error = %e, "unknown visibility value in database");
            Visibility::Targeted
        });

        DocumentRecord {
            id: self.id,
            title: self.title,
            description: self.description,
            file_url: self.file_url,
            file_name: self.file_name,
            visibility,
            created_by: self.created_by,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
