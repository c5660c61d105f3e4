//! # Repository Module
//!
//! Database repository implementations for Lumberyard.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.   │
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │                                                                 │
//! │       │  db.movements().reconcile(kind, counterparty, &lines)           │
//! │       ▼                                                                 │
//! │  MovementRepository                                                     │
//! │  ├── reconcile(&self, kind, counterparty, items)                        │
//! │  ├── get_by_id(&self, id)                                               │
//! │  └── list_in_month(&self, kind, year, month)                            │
//! │       │                                                                 │
//! │       │  SQL Query                                                      │
//! │       ▼                                                                 │
//! │  SQLite Database                                                        │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place                                         │
//! │  • The transactional boundary is explicit and owned here                │
//! │  • yard-core stays pure and testable without a database                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD, stock corrections, planing
//! - [`movement::MovementRepository`] - Reconciliation and movement queries
//! - [`audit::AuditRepository`] - Status message log
//! - [`maintenance::MaintenanceRepository`] - Maintenance records
//! - [`report::ReportRepository`] - Date-range aggregation

pub mod audit;
pub mod maintenance;
pub mod movement;
pub mod product;
pub mod report;
