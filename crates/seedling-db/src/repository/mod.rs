//! # Repository Module
//!
//! Database repository implementations for Seedling POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern Explained                         │
//! │                                                                         │
//! │  The Repository pattern abstracts database access behind a clean API.  │
//! │                                                                         │
//! │  Caller                                                                 │
//! │       │  db.products().list_active(20)                                 │
//! │       ▼                                                                 │
//! │  ProductRepository                                                     │
//! │  ├── get_by_id(&self, id)                                              │
//! │  ├── insert(&self, product)                                            │
//! │  └── adjust_stock(&self, id, delta)                                    │
//! │       │  SQL                                                            │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! │                                                                         │
//! │  Benefits:                                                              │
//! │  • SQL is isolated in one place per entity                             │
//! │  • Clean separation of concerns, easy to test against :memory:         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Repositories are plain CRUD and read queries. The multi-row atomic
//! operations (create a sale + items + stock decrement, delete + restock)
//! live in [`crate::service`] because they span entities in one transaction.
//!
//! ## Available Repositories
//!
//! - [`product::ProductRepository`] - Catalog CRUD, stock adjustment
//! - [`user::UserRepository`] - Directory CRUD, role queries
//! - [`sale::SaleRepository`] - Sale ledger reads, counts and sums
//! - [`dashboard::DashboardRepository`] - Role-keyed aggregate summaries

pub mod dashboard;
pub mod product;
pub mod sale;
pub mod user;
