//! # Maintenance Repository
//!
//! Database operations for system maintenance records.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use yard_core::{MaintenanceKind, MaintenanceRecord, MaintenanceStatus};

/// Repository for maintenance log operations.
#[derive(Debug, Clone)]
pub struct MaintenanceRepository {
    pool: SqlitePool,
}

impl MaintenanceRepository {
    /// Creates a new MaintenanceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MaintenanceRepository { pool }
    }

    /// Registers a maintenance intervention. New records start Pending.
    pub async fn insert(
        &self,
        kind: MaintenanceKind,
        description: &str,
        module_affected: &str,
        actions_taken: &str,
    ) -> DbResult<MaintenanceRecord> {
        let record = MaintenanceRecord {
            id: Uuid::new_v4().to_string(),
            kind,
            description: description.to_string(),
            module_affected: module_affected.to_string(),
            actions_taken: actions_taken.to_string(),
            status: MaintenanceStatus::default(),
            created_at: Utc::now(),
        };

        debug!(id = %record.id, ?kind, module = %module_affected, "Recording maintenance");

        sqlx::query(
            "INSERT INTO maintenance_log (id, kind, description, module_affected, \
             actions_taken, status, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        )
        .bind(&record.id)
        .bind(record.kind)
        .bind(&record.description)
        .bind(&record.module_affected)
        .bind(&record.actions_taken)
        .bind(record.status)
        .bind(record.created_at)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// Moves a record to a new lifecycle status.
    pub async fn set_status(&self, id: &str, status: MaintenanceStatus) -> DbResult<()> {
        let result = sqlx::query("UPDATE maintenance_log SET status = ?2 WHERE id = ?1")
            .bind(id)
            .bind(status)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("MaintenanceRecord", id));
        }

        Ok(())
    }

    /// Lists all records, newest first.
    pub async fn list(&self) -> DbResult<Vec<MaintenanceRecord>> {
        let records = sqlx::query_as::<_, MaintenanceRecord>(
            "SELECT id, kind, description, module_affected, actions_taken, status, created_at \
             FROM maintenance_log ORDER BY created_at DESC, id",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(records)
    }
}
