//! # seedling-core: Pure Business Logic for Seedling POS
//!
//! This crate is the heart of the plant-nursery retail backend. It contains
//! all business rules as pure functions and types with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Seedling POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │       Presentation layer (HTTP, sessions, page props)           │   │
//! │  │              not part of this workspace                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              ★ seedling-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   types      money       validation    password     dashboard   │   │
//! │  │   Product    Money       quantity,     argon2       role-keyed  │   │
//! │  │   User/Role  (cents)     email, ...    hash/verify  summaries   │   │
//! │  │   Sale/Item                                                     │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 seedling-db (Database Layer)                    │   │
//! │  │       SQLite queries, migrations, repositories, sale service    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, User, Sale, SaleItem, ...)
//! - [`money`] - Money type with integer-cent arithmetic (no floating point!)
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//! - [`password`] - Argon2 credential hashing
//! - [`dashboard`] - Role-keyed dashboard summary payloads
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: Every function is deterministic - same input = same output
//! 2. **No I/O**: Database, network, file system access is FORBIDDEN here
//! 3. **Integer Money**: All monetary values are in cents (i64) to avoid float errors
//! 4. **Explicit Errors**: All errors are typed, never strings or panics

// =============================================================================
// Module Declarations
// =============================================================================

pub mod dashboard;
pub mod error;
pub mod money;
pub mod password;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use seedling_core::Money` instead of
// `use seedling_core::money::Money`

pub use dashboard::{AdminDashboard, CashierDashboard, CustomerDashboard, SaleSummary};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct line items allowed in a single sale
///
/// ## Business Reason
/// Prevents runaway carts and keeps transactions reviewable at the counter.
pub const MAX_SALE_ITEMS: usize = 100;

/// Maximum quantity of a single product in one sale
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Stock level at or below which a product shows up on the admin
/// dashboard's low-stock list.
pub const LOW_STOCK_THRESHOLD: i64 = 10;
