//! Target-email persistence operations.
//!
//! Rows exist only for `targeted` documents; a document with `all`
//! visibility has no rows here. Email normalization (trim, lowercase,
//! dedupe) happens in docack-core before these functions are called.

use sqlx::PgPool;
use uuid::Uuid;

/// Insert target rows for a document in one transaction.
///
/// All-or-nothing: a failed insert rolls back the batch so the caller's
/// compensation logic only ever sees a fully written or fully absent
/// target set.
pub async fn insert_many(
    pool: &PgPool,
    document_id: Uuid,
    emails: &[String],
) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for email in emails {
        sqlx::query(
            "INSERT INTO document_targets (id, document_id, target_email) VALUES ($1, $2, $3)",
        )
        .bind(Uuid::new_v4())
        .bind(document_id)
        .bind(email)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await
}

/// List target emails for a document, in insertion order.
pub async fn list_for_document(
    pool: &PgPool,
    document_id: Uuid,
) -> Result<Vec<String>, sqlx::Error> {
    let rows = sqlx::query_scalar::<_, String>(
        "SELECT target_email FROM document_targets WHERE document_id = $1 ORDER BY created_at",
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}
