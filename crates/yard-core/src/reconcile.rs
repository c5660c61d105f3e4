//! # Reconciliation Planner
//!
//! The pure half of the stock reconciliation engine.
//!
//! ## How Reconciliation Is Split
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                   Stock Reconciliation Engine                           │
//! │                                                                         │
//! │  yard-db::MovementRepository::reconcile()                               │
//! │       │                                                                 │
//! │       │ 1. BEGIN transaction                                            │
//! │       │ 2. Load referenced products                                     │
//! │       ▼                                                                 │
//! │  yard_core::reconcile::plan_movement()  ← THIS MODULE (pure, no I/O)    │
//! │       │                                                                 │
//! │       │ 3. Validate, total, simulate stock line by line                 │
//! │       │ 4. MovementPlan { lines, mutations, total }                     │
//! │       ▼                                                                 │
//! │  yard-db applies the plan: UPDATE products, INSERT header + lines       │
//! │       │                                                                 │
//! │       │ 5. COMMIT (or drop → rollback on any failure)                   │
//! │       ▼                                                                 │
//! │  All-or-nothing: either the whole movement is durable or none of it     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Keeping the planner pure means every invariant (exact totals, line-by-line
//! stock checks, purchase price overwrite) is testable without a database.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{LineItem, MovementKind, Product};
use crate::validation::validate_line_item;

// =============================================================================
// Plan Types
// =============================================================================

/// A fully-computed line, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlannedLine {
    pub product_id: String,
    /// Product name frozen at planning time.
    pub name_snapshot: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// `unit_price_cents × quantity`, exact integer arithmetic.
    pub line_total_cents: i64,
}

/// The final state a product must be written to.
///
/// One mutation per touched product: a product referenced by several lines
/// collapses to its state after the last line. Equivalent to per-line writes
/// inside a single transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMutation {
    pub product_id: String,
    pub new_stock: i64,
    /// `Some` for purchases (last-write-wins on price); `None` for sales.
    pub new_price_cents: Option<i64>,
}

/// Everything the persistence layer needs to commit a movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementPlan {
    pub kind: MovementKind,
    /// Grand total in cents; equals the sum of the planned line totals.
    pub total_cents: i64,
    /// Lines in submission order.
    pub lines: Vec<PlannedLine>,
    /// Product mutations in first-touch order.
    pub mutations: Vec<ProductMutation>,
}

impl MovementPlan {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Planner
// =============================================================================

/// Plans a purchase or sale against a snapshot of the referenced products.
///
/// ## Validation Order
/// 1. `lines` must be non-empty → [`CoreError::EmptyMovement`]
/// 2. Numeric invariants re-checked defensively → [`CoreError::MalformedInput`]
/// 3. Every product reference must resolve → [`CoreError::ProductNotFound`]
/// 4. Sales only: stock is checked line by line against the *working* stock,
///    so a later line sees the decrements of earlier lines referencing the
///    same product → [`CoreError::InsufficientStock`]
///
/// ## Processing
/// For each line in order: `line_total = unit_price × quantity` accumulates
/// into the running total; the working product state mutates (Purchase:
/// `stock += quantity`, `price = unit_price`; Sale: `stock -= quantity`,
/// price untouched).
///
/// Any error aborts the whole plan; the caller never sees a partial one.
///
/// ## Arguments
/// * `kind` - Sale or Purchase
/// * `lines` - Validated line items, in submission order
/// * `products` - Current state of every product the lines may reference,
///   keyed by product ID
pub fn plan_movement(
    kind: MovementKind,
    lines: &[LineItem],
    products: &HashMap<String, Product>,
) -> CoreResult<MovementPlan> {
    if lines.is_empty() {
        return Err(CoreError::EmptyMovement);
    }

    // Working stock/price per product, seeded on first touch.
    // Later lines for the same product see the effects of earlier ones.
    let mut working: HashMap<&str, (i64, i64)> = HashMap::new();
    let mut touch_order: Vec<&str> = Vec::new();

    let mut total = Money::zero();
    let mut planned = Vec::with_capacity(lines.len());

    for line in lines {
        validate_line_item(line)?;

        let product = products
            .get(line.product_id.as_str())
            .ok_or_else(|| CoreError::ProductNotFound(line.product_id.clone()))?;

        let entry = working
            .entry(product.id.as_str())
            .or_insert_with(|| {
                touch_order.push(product.id.as_str());
                (product.stock, product.price_cents)
            });

        match kind {
            MovementKind::Sale => {
                if entry.0 < line.quantity {
                    return Err(CoreError::InsufficientStock {
                        product_id: product.id.clone(),
                        available: entry.0,
                        requested: line.quantity,
                    });
                }
                entry.0 -= line.quantity;
            }
            MovementKind::Purchase => {
                entry.0 += line.quantity;
                entry.1 = line.unit_price_cents;
            }
        }

        let line_total = Money::from_cents(line.unit_price_cents).multiply_quantity(line.quantity);
        total += line_total;

        planned.push(PlannedLine {
            product_id: product.id.clone(),
            name_snapshot: product.name.clone(),
            quantity: line.quantity,
            unit_price_cents: line.unit_price_cents,
            line_total_cents: line_total.cents(),
        });
    }

    let mutations = touch_order
        .into_iter()
        .map(|id| {
            let (stock, price) = working[id];
            ProductMutation {
                product_id: id.to_string(),
                new_stock: stock,
                new_price_cents: match kind {
                    MovementKind::Purchase => Some(price),
                    MovementKind::Sale => None,
                },
            }
        })
        .collect();

    Ok(MovementPlan {
        kind,
        total_cents: total.cents(),
        lines: planned,
        mutations,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn product(id: &str, stock: i64, price_cents: i64) -> Product {
        let now = Utc::now();
        Product {
            id: id.to_string(),
            name: format!("Product {id}"),
            category: "Lumber".to_string(),
            stock,
            price_cents,
            threshold_winter: 10,
            threshold_summer: 5,
            planed: false,
            special: false,
            length_cm: None,
            width_cm: None,
            height_cm: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn catalog(products: Vec<Product>) -> HashMap<String, Product> {
        products.into_iter().map(|p| (p.id.clone(), p)).collect()
    }

    fn line(product_id: &str, quantity: i64, unit_price_cents: i64) -> LineItem {
        LineItem {
            product_id: product_id.to_string(),
            quantity,
            unit_price_cents,
        }
    }

    #[test]
    fn sale_computes_total_and_decrements_stock() {
        let products = catalog(vec![product("p-1", 10, 1000)]);
        let plan = plan_movement(MovementKind::Sale, &[line("p-1", 5, 1500)], &products).unwrap();

        assert_eq!(plan.total_cents, 7500);
        assert_eq!(plan.lines.len(), 1);
        assert_eq!(plan.lines[0].line_total_cents, 7500);
        assert_eq!(plan.mutations.len(), 1);
        assert_eq!(plan.mutations[0].new_stock, 5);
        // Sale never touches the product price
        assert_eq!(plan.mutations[0].new_price_cents, None);
    }

    #[test]
    fn purchase_increments_stock_and_overwrites_price() {
        let products = catalog(vec![product("p-1", 10, 1000)]);
        let plan =
            plan_movement(MovementKind::Purchase, &[line("p-1", 5, 1500)], &products).unwrap();

        assert_eq!(plan.total_cents, 7500);
        assert_eq!(plan.mutations[0].new_stock, 15);
        assert_eq!(plan.mutations[0].new_price_cents, Some(1500));
    }

    #[test]
    fn purchase_price_is_last_write_wins() {
        let products = catalog(vec![product("p-1", 0, 1000)]);
        let lines = [line("p-1", 2, 1200), line("p-1", 3, 900)];
        let plan = plan_movement(MovementKind::Purchase, &lines, &products).unwrap();

        assert_eq!(plan.total_cents, 2 * 1200 + 3 * 900);
        assert_eq!(plan.mutations.len(), 1);
        assert_eq!(plan.mutations[0].new_stock, 5);
        assert_eq!(plan.mutations[0].new_price_cents, Some(900));
    }

    #[test]
    fn empty_movement_is_rejected() {
        let products = catalog(vec![product("p-1", 10, 1000)]);
        let err = plan_movement(MovementKind::Sale, &[], &products).unwrap_err();
        assert!(matches!(err, CoreError::EmptyMovement));
    }

    #[test]
    fn unknown_product_aborts_the_whole_plan() {
        let products = catalog(vec![product("p-1", 10, 1000)]);
        let lines = [line("p-1", 5, 1000), line("ghost", 1, 1000)];
        let err = plan_movement(MovementKind::Sale, &lines, &products).unwrap_err();
        assert!(matches!(err, CoreError::ProductNotFound(id) if id == "ghost"));
    }

    #[test]
    fn sale_over_stock_is_rejected() {
        let products = catalog(vec![product("p-1", 10, 1000)]);
        let err = plan_movement(MovementKind::Sale, &[line("p-1", 15, 1000)], &products)
            .unwrap_err();
        match err {
            CoreError::InsufficientStock {
                product_id,
                available,
                requested,
            } => {
                assert_eq!(product_id, "p-1");
                assert_eq!(available, 10);
                assert_eq!(requested, 15);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    /// Two lines for the same product drain the working stock, not two reads
    /// of the stored stock: 6 + 5 > 10 must fail on the second line even
    /// though each line alone would fit.
    #[test]
    fn sale_stock_is_checked_line_by_line() {
        let products = catalog(vec![product("p-1", 10, 1000)]);
        let lines = [line("p-1", 6, 1000), line("p-1", 5, 1000)];
        let err = plan_movement(MovementKind::Sale, &lines, &products).unwrap_err();
        match err {
            CoreError::InsufficientStock {
                available,
                requested,
                ..
            } => {
                // The second line sees 10 - 6 = 4 remaining
                assert_eq!(available, 4);
                assert_eq!(requested, 5);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn sale_same_product_twice_within_stock_succeeds() {
        let products = catalog(vec![product("p-1", 10, 1000)]);
        let lines = [line("p-1", 6, 1000), line("p-1", 4, 1000)];
        let plan = plan_movement(MovementKind::Sale, &lines, &products).unwrap();

        assert_eq!(plan.total_cents, 10_000);
        assert_eq!(plan.mutations.len(), 1);
        assert_eq!(plan.mutations[0].new_stock, 0);
    }

    #[test]
    fn malformed_input_is_caught_defensively() {
        let products = catalog(vec![product("p-1", 10, 1000)]);

        let err =
            plan_movement(MovementKind::Sale, &[line("p-1", 0, 1000)], &products).unwrap_err();
        assert!(matches!(err, CoreError::MalformedInput(_)));

        let err =
            plan_movement(MovementKind::Sale, &[line("p-1", 1, -5)], &products).unwrap_err();
        assert!(matches!(err, CoreError::MalformedInput(_)));
    }

    #[test]
    fn total_is_exact_over_many_lines() {
        let products = catalog(vec![
            product("p-1", 1000, 999),
            product("p-2", 1000, 1),
            product("p-3", 1000, 123_456),
        ]);
        let lines = [
            line("p-1", 7, 999),
            line("p-2", 13, 1),
            line("p-3", 3, 123_456),
        ];
        let plan = plan_movement(MovementKind::Sale, &lines, &products).unwrap();

        let expected: i64 = 7 * 999 + 13 + 3 * 123_456;
        assert_eq!(plan.total_cents, expected);
        assert_eq!(
            plan.lines.iter().map(|l| l.line_total_cents).sum::<i64>(),
            expected
        );
    }

    #[test]
    fn mutations_preserve_first_touch_order() {
        let products = catalog(vec![
            product("p-1", 10, 100),
            product("p-2", 10, 100),
        ]);
        let lines = [
            line("p-2", 1, 100),
            line("p-1", 1, 100),
            line("p-2", 1, 100),
        ];
        let plan = plan_movement(MovementKind::Sale, &lines, &products).unwrap();

        let order: Vec<&str> = plan.mutations.iter().map(|m| m.product_id.as_str()).collect();
        assert_eq!(order, vec!["p-2", "p-1"]);
        assert_eq!(plan.mutations[0].new_stock, 8);
        assert_eq!(plan.mutations[1].new_stock, 9);
    }
}
