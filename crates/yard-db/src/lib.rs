//! # yard-db: Database Layer for Lumberyard
//!
//! This crate provides database access for the Lumberyard system.
//! It uses SQLite for local storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Lumberyard Data Flow                             │
//! │                                                                         │
//! │  Caller (form / CLI / API surface)                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐    │
//! │  │                     yard-db (THIS CRATE)                        │    │
//! │  │                                                                 │    │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐    │    │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │    │    │
//! │  │   │   (pool.rs)   │    │ (product,     │    │  (embedded)  │    │    │
//! │  │   │               │    │  movement,    │    │              │    │    │
//! │  │   │ SqlitePool    │◄───│  audit, ...)  │    │ 001_init.sql │    │    │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘    │    │
//! │  │                                                                 │    │
//! │  └─────────────────────────────────────────────────────────────────┘    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite Database (WAL mode, foreign keys on)                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use yard_db::{Database, DbConfig};
//! use yard_core::{LineItem, MovementKind};
//!
//! let db = Database::new(DbConfig::new("path/to/yard.db")).await?;
//!
//! let sale = db
//!     .movements()
//!     .reconcile(MovementKind::Sale, None, &lines)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::audit::AuditRepository;
pub use repository::maintenance::MaintenanceRepository;
pub use repository::movement::{MovementRepository, MovementWithLines};
pub use repository::product::{NewProduct, ProductFilter, ProductRepository};
pub use repository::report::{LowStockRow, MovementReport, ReportLine, ReportRepository};
