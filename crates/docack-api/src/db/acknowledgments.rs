//! Acknowledgment ledger persistence operations.
//!
//! The ledger is append-only and one-way: a row records that a user
//! acknowledged a document, and there is no unacknowledge. The
//! `UNIQUE (document_id, user_id)` constraint is the idempotence
//! mechanism — a duplicate insert surfaces as a 23505 unique violation
//! and the caller maps it to a benign "already acknowledged" outcome.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use docack_core::Identity;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

/// A ledger row.
#[derive(Debug, Clone, Serialize)]
pub struct AcknowledgmentRecord {
    pub id: Uuid,
    pub document_id: Uuid,
    pub user_id: Uuid,
    /// Email at acknowledgment time, denormalized for the admin audit
    /// view (identities are never persisted elsewhere).
    pub user_email: String,
    pub acknowledged_at: DateTime<Utc>,
}

/// Record an acknowledgment for the caller.
///
/// A duplicate propagates as the raw 23505 database error and a missing
/// document as the raw 23503 foreign-key error; the API layer maps them
/// to Conflict and NotFound.
pub async fn insert(
    pool: &PgPool,
    document_id: Uuid,
    identity: &Identity,
) -> Result<AcknowledgmentRecord, sqlx::Error> {
    let record = AcknowledgmentRecord {
        id: Uuid::new_v4(),
        document_id,
        user_id: identity.user_id,
        user_email: identity.email.clone(),
        acknowledged_at: Utc::now(),
    };

    sqlx::query(
        "INSERT INTO acknowledgments (id, document_id, user_id, user_email, acknowledged_at)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(record.id)
    .bind(record.document_id)
    .bind(record.user_id)
    .bind(&record.user_email)
    .bind(record.acknowledged_at)
    .execute(pool)
    .await?;

    Ok(record)
}

/// List acknowledgments for a document, newest first.
pub async fn list_for_document(
    pool: &PgPool,
    document_id: Uuid,
) -> Result<Vec<AcknowledgmentRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, AcknowledgmentRow>(
        "SELECT id, document_id, user_id, user_email, acknowledged_at
         FROM acknowledgments WHERE document_id = $1 ORDER BY acknowledged_at DESC",
    )
    .bind(document_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(AcknowledgmentRow::into_record).collect())
}

/// The set of document IDs a user has acknowledged, in one bulk read.
pub async fn document_ids_for_user(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<HashSet<Uuid>, sqlx::Error> {
    let ids = sqlx::query_scalar::<_, Uuid>(
        "SELECT document_id FROM acknowledgments WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(ids.into_iter().collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct AcknowledgmentRow {
    id: Uuid,
    document_id: Uuid,
    user_id: Uuid,
    user_email: String,
    acknowledged_at: DateTime<Utc>,
}

impl AcknowledgmentRow {
    fn into_record(self) -> AcknowledgmentRecord {
        AcknowledgmentRecord {
            id: self.id,
            document_id: self.document_id,
            user_id: self.user_id,
            user_email: self.user_email,
            acknowledged_at: self.acknowledged_at,
        }
    }
}
