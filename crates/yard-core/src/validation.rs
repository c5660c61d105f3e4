//! # Validation Module
//!
//! Input validation utilities for Lumberyard.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Caller (form / CLI / API surface)                             │
//! │  ├── Collects raw strings from the user                                 │
//! │  └── THIS MODULE: parse + range-check into typed values                 │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Reconciliation engine (yard-core::reconcile)                  │
//! │  └── Defensive re-check of numeric invariants (MalformedInput)          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                             │
//! │  ├── NOT NULL constraints                                               │
//! │  ├── CHECK constraints                                                  │
//! │  └── Foreign key constraints                                            │
//! │                                                                         │
//! │  Defense in depth: multiple layers catch different errors               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use yard_core::validation::{parse_line_item, validate_quantity};
//!
//! // Parse raw form input into a typed line item
//! let line = parse_line_item("9ec7e2a0-0d2f-4b8e-a6ff-2d43f1b2a111", "5", "1500").unwrap();
//! assert_eq!(line.quantity, 5);
//!
//! // Validate an already-numeric quantity
//! validate_quantity(5).unwrap();
//! ```

use crate::error::{ValidationError, ValidationResult};
use crate::types::LineItem;
use crate::{MAX_LINE_QUANTITY, MAX_MOVEMENT_LINES};

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - Must be between 1 and 200 characters
///
/// ## Example
/// ```rust
/// use yard_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Pine board 2x4").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a product category.
///
/// ## Rules
/// - Must not be empty
/// - Maximum 50 characters
pub fn validate_category(category: &str) -> ValidationResult<()> {
    let category = category.trim();

    if category.is_empty() {
        return Err(ValidationError::Required {
            field: "category".to_string(),
        });
    }

    if category.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "category".to_string(),
            max: 50,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_LINE_QUANTITY
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a price in cents.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (giveaway/scrap items)
///
/// ## Example
/// ```rust
/// use yard_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a stock threshold value.
///
/// ## Rules
/// - Must be non-negative; zero disables alerting for that season
pub fn validate_threshold(threshold: i64) -> ValidationResult<()> {
    if threshold < 0 {
        return Err(ValidationError::OutOfRange {
            field: "threshold".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Line Item Parsing
// =============================================================================

/// Parses raw form input into a typed [`LineItem`].
///
/// This is the explicit boundary between "strings the user typed" and the
/// domain: everything past this point works with validated numbers.
///
/// ## Rules
/// - `product_id` must be non-empty (existence is the engine's concern)
/// - `quantity` must parse as a positive integer within range
/// - `unit_price` must parse as a non-negative integer amount of cents
///
/// ## Returns
/// * `Ok(LineItem)` - Typed, range-checked line item
/// * `Err(ValidationError)` - First field that failed, with the reason
pub fn parse_line_item(
    product_id: &str,
    quantity: &str,
    unit_price: &str,
) -> ValidationResult<LineItem> {
    let product_id = product_id.trim();
    if product_id.is_empty() {
        return Err(ValidationError::Required {
            field: "product".to_string(),
        });
    }

    let quantity: i64 =
        quantity
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidFormat {
                field: "quantity".to_string(),
                reason: "must be a whole number".to_string(),
            })?;
    validate_quantity(quantity)?;

    let unit_price_cents: i64 =
        unit_price
            .trim()
            .parse()
            .map_err(|_| ValidationError::InvalidFormat {
                field: "unit price".to_string(),
                reason: "must be a whole number of cents".to_string(),
            })?;
    validate_price_cents(unit_price_cents)?;

    Ok(LineItem {
        product_id: product_id.to_string(),
        quantity,
        unit_price_cents,
    })
}

/// Validates an already-typed line item (defensive re-check).
pub fn validate_line_item(line: &LineItem) -> ValidationResult<()> {
    if line.product_id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "product".to_string(),
        });
    }
    validate_quantity(line.quantity)?;
    validate_price_cents(line.unit_price_cents)?;
    Ok(())
}

/// Validates the number of lines in a movement before planning runs.
pub fn validate_line_count(count: usize) -> ValidationResult<()> {
    if count > MAX_MOVEMENT_LINES {
        return Err(ValidationError::OutOfRange {
            field: "line items".to_string(),
            min: 1,
            max: MAX_MOVEMENT_LINES as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
