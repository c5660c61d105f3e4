//! # Audit Log Repository
//!
//! The notification/audit sink: human-readable status strings recorded by
//! the rest of the system, plus the queries an operator screen needs.
//!
//! Reconciliation inserts its rows through [`insert_message`] on its own
//! transaction, so a failed movement leaves no audit residue.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use yard_core::{AuditArea, AuditLevel, AuditMessage};

/// Repository for audit log operations.
#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: SqlitePool,
}

impl AuditRepository {
    /// Creates a new AuditRepository.
    pub fn new(pool: SqlitePool) -> Self {
        AuditRepository { pool }
    }

    /// Records a status message.
    ///
    /// ## Arguments
    /// * `message` - Human-readable text
    /// * `level` - Severity for display
    /// * `area` - Originating application area
    /// * `user` - Acting user, when known
    pub async fn record(
        &self,
        message: &str,
        level: AuditLevel,
        area: AuditArea,
        user: Option<&str>,
    ) -> DbResult<AuditMessage> {
        let entry = AuditMessage {
            id: Uuid::new_v4().to_string(),
            message: message.to_string(),
            level,
            area,
            user: user.map(str::to_string),
            viewed: false,
            created_at: Utc::now(),
        };

        debug!(id = %entry.id, ?level, ?area, "Recording audit message");

        sqlx::query(
            "INSERT INTO audit_log (id, message, level, area, user, viewed, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&entry.id)
        .bind(&entry.message)
        .bind(entry.level)
        .bind(entry.area)
        .bind(&entry.user)
        .bind(entry.viewed)
        .bind(entry.created_at)
        .execute(&self.pool)
        .await?;

        Ok(entry)
    }

    /// Lists the most recent messages, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<AuditMessage>> {
        let messages = sqlx::query_as::<_, AuditMessage>(
            "SELECT id, message, level, area, user, viewed, created_at \
             FROM audit_log ORDER BY created_at DESC, id LIMIT ?1",
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Lists unviewed messages, newest first.
    pub async fn list_unviewed(&self) -> DbResult<Vec<AuditMessage>> {
        let messages = sqlx::query_as::<_, AuditMessage>(
            "SELECT id, message, level, area, user, viewed, created_at \
             FROM audit_log WHERE viewed = 0 ORDER BY created_at DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(messages)
    }

    /// Marks a message as viewed.
    pub async fn mark_viewed(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("UPDATE audit_log SET viewed = 1 WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("AuditMessage", id));
        }

        Ok(())
    }
}

/// Inserts an audit row on an open transaction.
///
/// Used by operations that must keep their audit rows atomic with their
/// data changes (reconciliation).
pub(crate) async fn insert_message(
    tx: &mut sqlx::Transaction<'_, sqlx::Sqlite>,
    entry: &AuditMessage,
) -> DbResult<()> {
    sqlx::query(
        "INSERT INTO audit_log (id, message, level, area, user, viewed, created_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )
    .bind(&entry.id)
    .bind(&entry.message)
    .bind(entry.level)
    .bind(entry.area)
    .bind(&entry.user)
    .bind(entry.viewed)
    .bind(entry.created_at)
    .execute(&mut **tx)
    .await?;

    Ok(())
}
