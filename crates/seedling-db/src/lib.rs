//! # seedling-db: Database Layer for Seedling POS
//!
//! This crate provides database access for the plant-nursery retail backend.
//! It uses SQLite for storage with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Seedling POS Data Flow                             │
//! │                                                                         │
//! │  Presentation layer (out of this workspace)                            │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    seedling-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────────┐   ┌───────────────┐   ┌──────────────────┐  │   │
//! │  │   │   Database   │   │ Repositories  │   │   SaleService    │  │   │
//! │  │   │  (pool.rs)   │   │ product, user │   │ create_sale and  │  │   │
//! │  │   │              │◄──│ sale,         │   │ delete_sale as   │  │   │
//! │  │   │  SqlitePool  │   │ dashboard     │   │ atomic txns      │  │   │
//! │  │   └──────────────┘   └───────────────┘   └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   Embedded migrations: migrations/sqlite/NNN_*.sql              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │                      SQLite Database (WAL mode)                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and service error types
//! - [`repository`] - Repository implementations (product, user, sale, dashboard)
//! - [`service`] - The sale transaction service (the invariant-bearing core)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use seedling_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/seedling.db")).await?;
//!
//! let detail = db.sale_service().create_sale(new_sale).await?;
//! let admin = db.dashboards().admin_dashboard().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod service;

#[cfg(test)]
pub(crate) mod test_support;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult, ServiceError, ServiceResult};
pub use pool::{Database, DbConfig};
pub use service::SaleService;

// Repository re-exports for convenience
pub use repository::dashboard::DashboardRepository;
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::user::UserRepository;
