//! # Movement Repository
//!
//! Database operations for purchases and sales, including the transactional
//! half of the stock reconciliation engine.
//!
//! ## Reconciliation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                 MovementRepository::reconcile()                         │
//! │                                                                         │
//! │  1. BEGIN                                                               │
//! │  2. SELECT every referenced product            ── ProductNotFound? ──┐  │
//! │  3. yard_core::plan_movement()                 ── InsufficientStock? │  │
//! │     (totals, line-by-line stock, price LWW)       EmptyMovement?     │  │
//! │  4. UPDATE products (final state per product)     MalformedInput? ───┤  │
//! │  5. INSERT movement header                                           │  │
//! │  6. INSERT movement lines (submission order)                         │  │
//! │  7. INSERT audit rows                                                │  │
//! │  8. COMMIT                                                           │  │
//! │                                                                      ▼  │
//! │                          any error: transaction drops → ROLLBACK        │
//! │                          (no header, no lines, no stock change,         │
//! │                           no audit rows survive)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SQLite serializes writers, so two concurrent reconciliations touching the
//! same product cannot both read stock=5 and commit stock=3; the second one
//! re-reads after the first commits.

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate, NaiveTime, TimeZone, Utc};
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{DbError, DbResult};
use crate::repository::audit;
use yard_core::reconcile::plan_movement;
use yard_core::{
    AuditArea, AuditLevel, AuditMessage, CoreError, LineItem, Money, Movement, MovementKind,
    MovementLine, Product, ValidationError,
};

/// A movement header together with its ordered lines.
#[derive(Debug, Clone)]
pub struct MovementWithLines {
    pub movement: Movement,
    pub lines: Vec<MovementLine>,
}

/// Repository for movement database operations.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    /// Creates a new MovementRepository.
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Registers a purchase or sale: validates availability, computes the
    /// exact total, mutates product stock (and price, for purchases), and
    /// persists the header plus line items. All-or-nothing.
    ///
    /// ## Arguments
    /// * `kind` - Sale or Purchase
    /// * `counterparty` - Supplier name for purchases; None for sales
    /// * `items` - Validated line items in submission order; non-empty
    ///
    /// ## Returns
    /// * `Ok(MovementWithLines)` - The durably persisted movement
    /// * `Err(DbError::Core)` - EmptyMovement, ProductNotFound,
    ///   InsufficientStock, or MalformedInput; nothing was persisted
    pub async fn reconcile(
        &self,
        kind: MovementKind,
        counterparty: Option<&str>,
        items: &[LineItem],
    ) -> DbResult<MovementWithLines> {
        debug!(?kind, lines = items.len(), "Reconciling movement");

        let mut tx = self.pool.begin().await?;

        // Load the current state of every referenced product. Duplicates in
        // the line list collapse to a single read; the planner handles the
        // per-line working stock.
        let mut products: HashMap<String, Product> = HashMap::new();
        for item in items {
            if products.contains_key(&item.product_id) {
                continue;
            }
            let product = sqlx::query_as::<_, Product>(
                "SELECT id, name, category, stock, price_cents, threshold_winter, \
                 threshold_summer, planed, special, length_cm, width_cm, height_cm, \
                 created_at, updated_at FROM products WHERE id = ?1",
            )
            .bind(&item.product_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| CoreError::ProductNotFound(item.product_id.clone()))?;
            products.insert(product.id.clone(), product);
        }

        let plan = plan_movement(kind, items, &products)?;

        let now = Utc::now();
        let movement = Movement {
            id: Uuid::new_v4().to_string(),
            kind,
            counterparty: counterparty.map(str::to_string),
            total_cents: plan.total_cents,
            created_at: now,
        };

        let area = match kind {
            MovementKind::Sale => AuditArea::Sales,
            MovementKind::Purchase => AuditArea::Purchases,
        };

        // Apply product mutations: final stock per product, and the purchase
        // price overwrite when the planner asked for one.
        for mutation in &plan.mutations {
            sqlx::query(
                "UPDATE products SET stock = ?2, \
                 price_cents = COALESCE(?3, price_cents), updated_at = ?4 \
                 WHERE id = ?1",
            )
            .bind(&mutation.product_id)
            .bind(mutation.new_stock)
            .bind(mutation.new_price_cents)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            let name = products
                .get(&mutation.product_id)
                .map(|p| p.name.as_str())
                .unwrap_or(mutation.product_id.as_str());
            audit::insert_message(
                &mut tx,
                &AuditMessage {
                    id: Uuid::new_v4().to_string(),
                    message: format!(
                        "Stock updated for {}. New stock: {}",
                        name, mutation.new_stock
                    ),
                    level: AuditLevel::Info,
                    area,
                    user: None,
                    viewed: false,
                    created_at: now,
                },
            )
            .await?;
        }

        sqlx::query(
            "INSERT INTO movements (id, kind, counterparty, total_cents, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(&movement.id)
        .bind(movement.kind)
        .bind(&movement.counterparty)
        .bind(movement.total_cents)
        .bind(movement.created_at)
        .execute(&mut *tx)
        .await?;

        let mut lines = Vec::with_capacity(plan.lines.len());
        for (position, planned) in plan.lines.iter().enumerate() {
            let line = MovementLine {
                id: Uuid::new_v4().to_string(),
                movement_id: movement.id.clone(),
                product_id: planned.product_id.clone(),
                name_snapshot: planned.name_snapshot.clone(),
                position: position as i64,
                quantity: planned.quantity,
                unit_price_cents: planned.unit_price_cents,
                line_total_cents: planned.line_total_cents,
                created_at: now,
            };

            sqlx::query(
                "INSERT INTO movement_lines (id, movement_id, product_id, name_snapshot, \
                 position, quantity, unit_price_cents, line_total_cents, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )
            .bind(&line.id)
            .bind(&line.movement_id)
            .bind(&line.product_id)
            .bind(&line.name_snapshot)
            .bind(line.position)
            .bind(line.quantity)
            .bind(line.unit_price_cents)
            .bind(line.line_total_cents)
            .bind(line.created_at)
            .execute(&mut *tx)
            .await?;

            lines.push(line);
        }

        let summary = match kind {
            MovementKind::Sale => {
                format!("Sale registered. Total: {}", Money::from_cents(plan.total_cents))
            }
            MovementKind::Purchase => format!(
                "Purchase registered. Total: {}",
                Money::from_cents(plan.total_cents)
            ),
        };
        audit::insert_message(
            &mut tx,
            &AuditMessage {
                id: Uuid::new_v4().to_string(),
                message: summary,
                level: AuditLevel::Success,
                area,
                user: None,
                viewed: false,
                created_at: now,
            },
        )
        .await?;

        tx.commit().await?;

        info!(
            movement_id = %movement.id,
            ?kind,
            total_cents = movement.total_cents,
            lines = lines.len(),
            "Movement reconciled"
        );

        Ok(MovementWithLines { movement, lines })
    }

    /// Gets a movement by ID, with its lines in submission order.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<MovementWithLines>> {
        let movement = sqlx::query_as::<_, Movement>(
            "SELECT id, kind, counterparty, total_cents, created_at \
             FROM movements WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(movement) = movement else {
            return Ok(None);
        };

        let lines = self.lines(id).await?;
        Ok(Some(MovementWithLines { movement, lines }))
    }

    /// Gets the lines of a movement in submission order.
    pub async fn lines(&self, movement_id: &str) -> DbResult<Vec<MovementLine>> {
        let lines = sqlx::query_as::<_, MovementLine>(
            "SELECT id, movement_id, product_id, name_snapshot, position, quantity, \
             unit_price_cents, line_total_cents, created_at \
             FROM movement_lines WHERE movement_id = ?1 ORDER BY position",
        )
        .bind(movement_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(lines)
    }

    /// Lists movements of one kind, newest first.
    pub async fn list_by_kind(&self, kind: MovementKind) -> DbResult<Vec<Movement>> {
        let movements = sqlx::query_as::<_, Movement>(
            "SELECT id, kind, counterparty, total_cents, created_at \
             FROM movements WHERE kind = ?1 ORDER BY created_at DESC",
        )
        .bind(kind)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Lists movements of one kind within a calendar month, newest first.
    ///
    /// ## Arguments
    /// * `year` - Calendar year, e.g. 2026
    /// * `month` - Calendar month, 1-12
    pub async fn list_in_month(
        &self,
        kind: MovementKind,
        year: i32,
        month: u32,
    ) -> DbResult<Vec<Movement>> {
        let start_date = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(|| {
            DbError::from(CoreError::from(ValidationError::OutOfRange {
                field: "month".to_string(),
                min: 1,
                max: 12,
            }))
        })?;
        let end_date = if month == 12 {
            NaiveDate::from_ymd_opt(year + 1, 1, 1)
        } else {
            NaiveDate::from_ymd_opt(year, month + 1, 1)
        }
        .unwrap_or(start_date);

        let start = Utc.from_utc_datetime(&start_date.and_time(NaiveTime::MIN));
        let end = Utc.from_utc_datetime(&end_date.and_time(NaiveTime::MIN));

        let movements = sqlx::query_as::<_, Movement>(
            "SELECT id, kind, counterparty, total_cents, created_at \
             FROM movements \
             WHERE kind = ?1 AND created_at >= ?2 AND created_at < ?3 \
             ORDER BY created_at DESC",
        )
        .bind(kind)
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Lists the distinct years that have movements, newest first.
    ///
    /// Backs the year picker of the purchase listing.
    pub async fn years_with_movements(&self) -> DbResult<Vec<i32>> {
        let movements = sqlx::query_as::<_, Movement>(
            "SELECT id, kind, counterparty, total_cents, created_at FROM movements",
        )
        .fetch_all(&self.pool)
        .await?;

        let mut years: Vec<i32> = movements
            .iter()
            .map(|movement| movement.created_at.year())
            .collect();
        years.sort_unstable_by(|a, b| b.cmp(a));
        years.dedup();
        Ok(years)
    }
}
