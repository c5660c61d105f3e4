//! # yard-core: Pure Business Logic for Lumberyard
//!
//! This crate is the **heart** of Lumberyard. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Lumberyard Architecture                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                  Caller (form / CLI / API surface)              │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │               ★ yard-core (THIS CRATE) ★                        │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐    │    │
//! │  │   │   types   │  │   money   │  │ reconcile │  │  alerts   │    │    │
//! │  │   │  Product  │  │   Money   │  │  planner  │  │ seasonal  │    │    │
//! │  │   │ Movement  │  │ integers  │  │ (no I/O)  │  │  policy   │    │    │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘    │    │
//! │  │                                                                 │    │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │    │
//! │  └─────────────────────────────┬───────────────────────────────────┘    │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐    │
//! │  │                    yard-db (Database Layer)                     │    │
//! │  │           SQLite queries, migrations, repositories              │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Movement, audit, maintenance)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Input parsing and business rule validation
//! - [`reconcile`] - The pure half of the stock reconciliation engine
//! - [`alerts`] - Seasonal low-stock severity policy
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic, same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod alerts;
pub mod error;
pub mod money;
pub mod reconcile;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use yard_core::Money` instead of
// `use yard_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use reconcile::{plan_movement, MovementPlan, PlannedLine, ProductMutation};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Default winter stock threshold applied to newly registered products.
pub const DEFAULT_THRESHOLD_WINTER: i64 = 10;

/// Default summer stock threshold applied to newly registered products.
pub const DEFAULT_THRESHOLD_SUMMER: i64 = 5;

/// Maximum quantity of a single line item
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 10000 instead of 100)
pub const MAX_LINE_QUANTITY: i64 = 9_999;

/// Maximum line items in a single movement
///
/// ## Business Reason
/// Keeps transaction sizes reasonable; nobody rings up 100+ distinct
/// products at a lumber counter in one go.
pub const MAX_MOVEMENT_LINES: usize = 100;

/// Flat price surcharge, in cents, applied to the planed twin of a product
/// when the planing process creates it.
pub const PLANED_PRICE_SURCHARGE_CENTS: i64 = 3_000;

/// Name suffix given to the planed twin created by the planing process.
pub const PLANED_NAME_SUFFIX: &str = " (planed)";
