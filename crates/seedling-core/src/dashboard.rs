//! # Dashboard Payloads
//!
//! Role-keyed summary structures produced by the dashboard aggregator and
//! consumed as page props by the client UI.
//!
//! These are plain read-model DTOs: point-in-time snapshots of the stores
//! with no invariants or transactional guarantees of their own. The queries
//! that fill them live in `seedling_db::repository::dashboard`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::types::{Product, SaleDetail, SaleStatus};

/// One row of a "recent sales" list, with participant names joined in so the
/// UI needs no follow-up lookups.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleSummary {
    pub id: String,
    pub customer_name: String,
    pub cashier_name: String,
    pub total_amount_cents: i64,
    pub status: SaleStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// Shop-wide overview for admins.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AdminDashboard {
    /// All products, active or not.
    pub total_products: i64,
    /// Completed sales only.
    pub total_sales: i64,
    pub total_customers: i64,
    /// Revenue across completed sales, in cents.
    pub total_revenue_cents: i64,
    /// Five most recent sales, newest first.
    pub recent_sales: Vec<SaleSummary>,
    /// Active products at or below the low-stock threshold.
    pub low_stock_products: Vec<Product>,
}

/// A cashier's view of their own day at the counter.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CashierDashboard {
    /// Sales this cashier recorded today.
    pub today_sales: i64,
    /// Revenue from those sales, in cents.
    pub today_revenue_cents: i64,
    /// Active products with stock on hand.
    pub available_products: i64,
    /// This cashier's five most recent sales, newest first.
    pub recent_sales: Vec<SaleSummary>,
}

/// Storefront view for a customer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomerDashboard {
    /// Up to eight active, in-stock products for the storefront.
    pub featured_products: Vec<Product>,
    /// The customer's five most recent orders with items attached.
    pub recent_orders: Vec<SaleDetail>,
    pub total_orders: i64,
}
