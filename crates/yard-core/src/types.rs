//! # Domain Types
//!
//! Core domain types used throughout Lumberyard.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │    Product      │   │    Movement     │   │  MovementLine   │        │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │        │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │        │
//! │  │  name           │   │  kind           │   │  movement_id    │        │
//! │  │  stock          │   │  counterparty   │   │  quantity       │        │
//! │  │  price_cents    │   │  total_cents    │   │  unit_price     │        │
//! │  │  thresholds     │   └─────────────────┘   └─────────────────┘        │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐        │
//! │  │ StockAdjustment │   │  AuditMessage   │   │ Maintenance     │        │
//! │  │ (manual deltas) │   │  (system log)   │   │ Record          │        │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! Movement lines freeze the product name at movement time. History stays
//! readable even after the product is renamed or removed from the catalog.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::money::Money;

// =============================================================================
// Product
// =============================================================================

/// A product held in the yard's inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name, e.g. "Pine board 2x4".
    pub name: String,

    /// Free-form category, e.g. "Lumber", "Hardware".
    pub category: String,

    /// Current stock level in units.
    pub stock: i64,

    /// Price per unit in cents (smallest currency unit).
    pub price_cents: i64,

    /// Minimum desired stock during the winter season.
    pub threshold_winter: i64,

    /// Minimum desired stock during the summer season.
    pub threshold_summer: i64,

    /// Whether this product has been through the planing process.
    pub planed: bool,

    /// Whether this is a special-order product.
    pub special: bool,

    /// Board length in centimeters, if dimensioned.
    pub length_cm: Option<f64>,

    /// Board width in centimeters, if dimensioned.
    pub width_cm: Option<f64>,

    /// Board height in centimeters, if dimensioned.
    pub height_cm: Option<f64>,

    /// When the product was created.
    pub created_at: DateTime<Utc>,

    /// When the product was last updated.
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the unit price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether a sale of `quantity` units could be satisfied right now.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Movement Kind
// =============================================================================

/// Whether a movement brings stock in (purchase) or takes it out (sale).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum MovementKind {
    /// Goods sold to a customer; stock decreases.
    Sale,
    /// Goods bought from a supplier; stock increases, price follows.
    Purchase,
}

// =============================================================================
// Movement
// =============================================================================

/// A committed purchase or sale.
///
/// Immutable once persisted: there is no update or delete path for
/// movements. Corrections are new movements.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Movement {
    pub id: String,
    pub kind: MovementKind,
    /// Supplier name for purchases; None for sales.
    pub counterparty: Option<String>,
    /// Grand total in cents; equals the sum of the line totals exactly.
    pub total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl Movement {
    /// Returns the grand total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Movement Line
// =============================================================================

/// A persisted line item of a movement.
/// Uses the snapshot pattern to freeze product data at movement time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MovementLine {
    pub id: String,
    pub movement_id: String,
    pub product_id: String,
    /// Product name at movement time (frozen).
    pub name_snapshot: String,
    /// Zero-based position within the movement; preserves submission order.
    pub position: i64,
    pub quantity: i64,
    /// Unit price in cents at movement time (frozen).
    pub unit_price_cents: i64,
    /// Line total before anything else (unit_price × quantity).
    pub line_total_cents: i64,
    pub created_at: DateTime<Utc>,
}

impl MovementLine {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.line_total_cents)
    }
}

// =============================================================================
// Line Item (ephemeral input)
// =============================================================================

/// A validated line item heading into the reconciliation engine.
///
/// Exists only for the duration of one reconciliation call; the persisted
/// counterpart is [`MovementLine`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

// =============================================================================
// Stock Adjustment
// =============================================================================

/// A manual stock correction, recorded as a delta against the prior level.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct StockAdjustment {
    pub id: String,
    pub product_id: String,
    /// Signed change: `new_stock - old_stock`.
    pub delta: i64,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Audit Log
// =============================================================================

/// Severity of an audit message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum AuditLevel {
    Success,
    Error,
    Warning,
    Info,
}

/// The application area an audit message originates from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum AuditArea {
    Inventory,
    Sales,
    Purchases,
    System,
}

/// A human-readable status string recorded in the audit log.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct AuditMessage {
    pub id: String,
    pub message: String,
    pub level: AuditLevel,
    pub area: AuditArea,
    /// Acting user, when known.
    pub user: Option<String>,
    /// Whether an operator has seen this message.
    pub viewed: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Maintenance Records
// =============================================================================

/// Classification of a system maintenance intervention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceKind {
    Corrective,
    Preventive,
    Adaptive,
    Perfective,
}

/// Lifecycle state of a maintenance record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[serde(rename_all = "snake_case")]
pub enum MaintenanceStatus {
    Pending,
    InProgress,
    Completed,
}

impl Default for MaintenanceStatus {
    fn default() -> Self {
        MaintenanceStatus::Pending
    }
}

/// A logged maintenance intervention on the system itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct MaintenanceRecord {
    pub id: String,
    pub kind: MaintenanceKind,
    pub description: String,
    pub module_affected: String,
    pub actions_taken: String,
    pub status: MaintenanceStatus,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn product(stock: i64) -> Product {
        let now = Utc::now();
        Product {
            id: "p-1".to_string(),
            name: "Pine board 2x4".to_string(),
            category: "Lumber".to_string(),
            stock,
            price_cents: 1000,
            threshold_winter: 10,
            threshold_summer: 5,
            planed: false,
            special: false,
            length_cm: Some(240.0),
            width_cm: Some(5.0),
            height_cm: Some(10.0),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_can_sell() {
        let p = product(10);
        assert!(p.can_sell(10));
        assert!(p.can_sell(1));
        assert!(!p.can_sell(11));
    }

    #[test]
    fn test_money_accessors() {
        let p = product(10);
        assert_eq!(p.price().cents(), 1000);
    }

    #[test]
    fn test_maintenance_status_default() {
        assert_eq!(MaintenanceStatus::default(), MaintenanceStatus::Pending);
    }
}
