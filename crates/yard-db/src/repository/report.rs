//! # Report Repository
//!
//! Date-range aggregation over movements, plus the low-stock report.
//!
//! Reports are returned as plain data; rendering (tables, spreadsheets,
//! print) is the caller's concern.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use crate::error::DbResult;
use yard_core::{Money, MovementKind};

// =============================================================================
// Report Types
// =============================================================================

/// One detail row of a movement report.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct ReportLine {
    /// Movement timestamp.
    pub date: DateTime<Utc>,
    /// Product name as frozen on the movement line.
    pub product: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub line_total_cents: i64,
    /// Supplier for purchase reports; None on sales reports.
    pub counterparty: Option<String>,
}

/// Aggregated movements over a date range, with detail rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementReport {
    pub kind: MovementKind,
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    /// Sum of movement totals in the range.
    pub total_cents: i64,
    /// Number of movements in the range.
    pub count: i64,
    /// Detail rows, oldest first, line order preserved within a movement.
    pub lines: Vec<ReportLine>,
}

impl MovementReport {
    /// Returns the aggregate total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// One row of the low-stock report.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LowStockRow {
    pub name: String,
    pub stock: i64,
    pub price_cents: i64,
    pub threshold_winter: i64,
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for report aggregation queries.
#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    /// Creates a new ReportRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Aggregates sales over an inclusive date range.
    pub async fn sales_report(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<MovementReport> {
        self.movement_report(MovementKind::Sale, from, to).await
    }

    /// Aggregates purchases over an inclusive date range.
    pub async fn purchases_report(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<MovementReport> {
        self.movement_report(MovementKind::Purchase, from, to).await
    }

    async fn movement_report(
        &self,
        kind: MovementKind,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> DbResult<MovementReport> {
        let (total_cents, count): (i64, i64) = sqlx::query_as(
            "SELECT COALESCE(SUM(total_cents), 0), COUNT(*) \
             FROM movements WHERE kind = ?1 AND created_at >= ?2 AND created_at <= ?3",
        )
        .bind(kind)
        .bind(from)
        .bind(to)
        .fetch_one(&self.pool)
        .await?;

        let lines = sqlx::query_as::<_, ReportLine>(
            "SELECT m.created_at AS date, l.name_snapshot AS product, l.quantity, \
             l.unit_price_cents, l.line_total_cents, m.counterparty \
             FROM movement_lines l \
             JOIN movements m ON m.id = l.movement_id \
             WHERE m.kind = ?1 AND m.created_at >= ?2 AND m.created_at <= ?3 \
             ORDER BY m.created_at, l.position",
        )
        .bind(kind)
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await?;

        Ok(MovementReport {
            kind,
            from,
            to,
            total_cents,
            count,
            lines,
        })
    }

    /// Lists products at or below their winter threshold, most starved first.
    pub async fn low_stock_report(&self) -> DbResult<Vec<LowStockRow>> {
        let rows = sqlx::query_as::<_, LowStockRow>(
            "SELECT name, stock, price_cents, threshold_winter \
             FROM products WHERE stock <= threshold_winter ORDER BY stock, name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}
