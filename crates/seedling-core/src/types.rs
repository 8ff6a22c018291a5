//! # Domain Types
//!
//! Core domain types used throughout Seedling POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      User       │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (UUID)      │   │  id (UUID)      │   │  id (UUID)      │       │
//! │  │  name           │   │  email (unique) │   │  customer_id    │       │
//! │  │  price_cents    │   │  role           │   │  cashier_id     │       │
//! │  │  stock_quantity │   │  password_hash  │   │  total_amount   │       │
//! │  └─────────────────┘   └─────────────────┘   └────────┬────────┘       │
//! │                                                       │ owns            │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌────────▼────────┐       │
//! │  │      Role       │   │   SaleStatus    │   │    SaleItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  Admin          │   │  Pending        │   │  product_id     │       │
//! │  │  Cashier        │   │  Completed      │   │  quantity       │       │
//! │  │  Customer       │   │  Cancelled      │   │  unit_price     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A `SaleItem` freezes the product name and unit price at sale time. Editing
//! a product's price afterwards never changes what a past sale recorded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Role
// =============================================================================

/// The role a user holds, as a closed enumeration.
///
/// The original string-typed role field is modeled as a tagged variant so an
/// unknown role is unrepresentable past the parsing boundary. Role-based
/// access decisions belong to the presentation layer, not the transactional
/// core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Full catalog and user administration.
    Admin,
    /// Records sales at the counter.
    Cashier,
    /// Buys seedlings; sees their own orders.
    Customer,
}

impl Role {
    /// Returns the lowercase wire representation.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Cashier => "cashier",
            Role::Customer => "customer",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "cashier" => Ok(Role::Cashier),
            "customer" => Ok(Role::Customer),
            _ => Err(ValidationError::NotAllowed {
                field: "role".to_string(),
                allowed: vec![
                    "admin".to_string(),
                    "cashier".to_string(),
                    "customer".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// User
// =============================================================================

/// A user of the shop: admin, cashier or customer.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct User {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name.
    pub name: String,

    /// Email address - unique across all users.
    pub email: String,

    /// Role held by this user.
    pub role: Role,

    /// Argon2 hash of the user's password. Never serialized outward.
    #[serde(skip_serializing, default)]
    #[ts(skip)]
    pub password_hash: String,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_cashier(&self) -> bool {
        self.role == Role::Cashier
    }

    pub fn is_customer(&self) -> bool {
        self.role == Role::Customer
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the nursery catalog (seedlings, vines, supplies).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Display name shown in the catalog and on receipts.
    pub name: String,

    /// Optional long description for product pages.
    pub description: Option<String>,

    /// Price in cents (smallest currency unit).
    pub price_cents: i64,

    /// Units currently available for sale. Invariant: never negative.
    /// Enforced by the sale transaction service's guarded decrement.
    pub stock_quantity: i64,

    /// Whether the product is listed (soft delete flag).
    pub is_active: bool,

    /// Catalog category (e.g. "fruit_seedling").
    pub category: String,

    /// Optional image for the storefront.
    pub image_url: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks whether any stock is available.
    pub fn is_in_stock(&self) -> bool {
        self.stock_quantity > 0
    }

    /// Checks whether `quantity` units can be sold right now.
    pub fn has_enough_stock(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

// =============================================================================
// Sale Status
// =============================================================================

/// The status of a sale.
///
/// The sale transaction service only ever creates sales as `Completed`.
/// `Pending` and `Cancelled` exist in the schema as reserved states for
/// future order flows; no operation in this core transitions into or out
/// of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum SaleStatus {
    Pending,
    Completed,
    Cancelled,
}

impl SaleStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SaleStatus::Pending => "pending",
            SaleStatus::Completed => "completed",
            SaleStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale.
///
/// Invariant: `total_amount_cents` equals the sum of the line totals of the
/// sale's items. Created atomically with its items; deleted as one unit.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: String,

    /// The buying customer (references users).
    pub customer_id: String,

    /// The cashier who recorded the sale (references users). Always supplied
    /// explicitly by the caller - the core holds no ambient session state.
    pub cashier_id: String,

    /// Sum of all item total prices, in cents.
    pub total_amount_cents: i64,

    pub status: SaleStatus,

    pub notes: Option<String>,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl Sale {
    /// Returns the sale total as Money.
    #[inline]
    pub fn total_amount(&self) -> Money {
        Money::from_cents(self.total_amount_cents)
    }
}

// =============================================================================
// Sale Item
// =============================================================================

/// A line item in a sale.
///
/// Uses the snapshot pattern: `product_name` and `unit_price_cents` are
/// frozen copies of the product at sale time, immune to later edits.
/// A SaleItem never exists without its parent Sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: String,
    pub sale_id: String,
    pub product_id: String,

    /// Product name at time of sale (frozen).
    pub product_name: String,

    /// Quantity sold. Always positive.
    pub quantity: i64,

    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,

    /// Line total: quantity × unit price.
    pub total_price_cents: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl SaleItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total as Money.
    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }
}

// =============================================================================
// Sale Detail
// =============================================================================

/// A sale with its line items attached - what `create_sale` returns and what
/// order pages render.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDetail {
    pub sale: Sale,
    pub items: Vec<SaleItem>,
}

// =============================================================================
// Service Inputs
// =============================================================================

/// Caller input for one line of a new sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSaleItem {
    pub product_id: String,
    pub quantity: i64,
}

/// Caller input for creating a sale.
///
/// The cashier is an explicit field, not ambient session state: every service
/// call names its actor.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NewSale {
    pub customer_id: String,
    pub cashier_id: String,
    pub items: Vec<NewSaleItem>,
    pub notes: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
