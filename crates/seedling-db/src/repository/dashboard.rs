//! # Dashboard Repository
//!
//! Role-keyed aggregate queries. Each method composes the product, user and
//! sale repositories into one read-model payload for a dashboard page.
//!
//! ## Consistency Note
//! Each payload is assembled from several independent reads, not one snapshot
//! transaction. A sale landing mid-assembly can make the counters disagree by
//! one; dashboards are informational, so that is acceptable.

use chrono::NaiveDate;
use sqlx::SqlitePool;

use crate::error::DbResult;
use crate::repository::product::ProductRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::user::UserRepository;
use seedling_core::{
    AdminDashboard, CashierDashboard, CustomerDashboard, Product, Role, SaleStatus,
    LOW_STOCK_THRESHOLD,
};

/// How many recent sales/orders a dashboard shows.
const RECENT_LIMIT: u32 = 5;

/// How many products the customer storefront features.
const FEATURED_LIMIT: u32 = 8;

/// Aggregator for role-keyed dashboard payloads.
#[derive(Debug, Clone)]
pub struct DashboardRepository {
    pool: SqlitePool,
}

impl DashboardRepository {
    /// Creates a new DashboardRepository.
    pub fn new(pool: SqlitePool) -> Self {
        DashboardRepository { pool }
    }

    fn products(&self) -> ProductRepository {
        ProductRepository::new(self.pool.clone())
    }

    fn users(&self) -> UserRepository {
        UserRepository::new(self.pool.clone())
    }

    fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.pool.clone())
    }

    /// Shop-wide overview for admins.
    ///
    /// Totals count completed sales only; the five most recent sales and the
    /// low-stock list round out the page.
    pub async fn admin_dashboard(&self) -> DbResult<AdminDashboard> {
        let products = self.products();
        let users = self.users();
        let sales = self.sales();

        Ok(AdminDashboard {
            total_products: products.count().await?,
            total_sales: sales.count_by_status(SaleStatus::Completed).await?,
            total_customers: users.count_by_role(Role::Customer).await?,
            total_revenue_cents: sales.revenue_cents().await?,
            recent_sales: sales.list_recent(RECENT_LIMIT).await?,
            low_stock_products: products.low_stock(LOW_STOCK_THRESHOLD).await?,
        })
    }

    /// A cashier's view of the given calendar day (UTC).
    ///
    /// Today's counters cover only this cashier's sales; the available-product
    /// counter is shop-wide so the cashier knows what can still be sold.
    pub async fn cashier_dashboard(
        &self,
        cashier_id: &str,
        day: NaiveDate,
    ) -> DbResult<CashierDashboard> {
        let products = self.products();
        let sales = self.sales();

        Ok(CashierDashboard {
            today_sales: sales.count_for_cashier_on(cashier_id, day).await?,
            today_revenue_cents: sales.revenue_for_cashier_on(cashier_id, day).await?,
            available_products: products.count_available().await?,
            recent_sales: sales.list_recent_for_cashier(cashier_id, RECENT_LIMIT).await?,
        })
    }

    /// Storefront view for a customer: featured products plus their own
    /// recent orders.
    pub async fn customer_dashboard(&self, customer_id: &str) -> DbResult<CustomerDashboard> {
        let sales = self.sales();

        Ok(CustomerDashboard {
            featured_products: self.featured_products().await?,
            recent_orders: sales
                .list_recent_for_customer(customer_id, RECENT_LIMIT)
                .await?,
            total_orders: sales.count_for_customer(customer_id).await?,
        })
    }

    /// Up to eight active, in-stock products, shuffled so the storefront
    /// rotates between visits.
    async fn featured_products(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(
            r#"
            SELECT
                id, name, description, price_cents, stock_quantity,
                is_active, category, image_url, created_at, updated_at
            FROM products
            WHERE is_active = 1 AND stock_quantity > 0
            ORDER BY RANDOM()
            LIMIT ?1
            "#,
        )
        .bind(FEATURED_LIMIT)
        .fetch_all(&self.pool)
        .await?;

        Ok(products)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_db, test_product, test_user};
    use chrono::Utc;
    use seedling_core::{NewSale, NewSaleItem};

    #[tokio::test]
    async fn test_admin_dashboard() {
        let db = test_db().await;

        let customer = test_user("Cust", "cust@seedling.test", Role::Customer);
        let cashier = test_user("Cash", "cash@seedling.test", Role::Cashier);
        db.users().insert(&customer).await.unwrap();
        db.users().insert(&cashier).await.unwrap();

        let plenty = test_product("Tropical Mango Seedling", 3500, 30);
        let scarce = test_product("Hass Avocado Seedling", 4000, 4);
        db.products().insert(&plenty).await.unwrap();
        db.products().insert(&scarce).await.unwrap();

        db.sale_service()
            .create_sale(NewSale {
                customer_id: customer.id.clone(),
                cashier_id: cashier.id.clone(),
                items: vec![NewSaleItem {
                    product_id: plenty.id.clone(),
                    quantity: 2,
                }],
                notes: None,
            })
            .await
            .unwrap();

        let dash = db.dashboards().admin_dashboard().await.unwrap();
        assert_eq!(dash.total_products, 2);
        assert_eq!(dash.total_sales, 1);
        assert_eq!(dash.total_customers, 1);
        assert_eq!(dash.total_revenue_cents, 7000);
        assert_eq!(dash.recent_sales.len(), 1);
        assert_eq!(dash.recent_sales[0].customer_name, "Cust");
        assert_eq!(dash.low_stock_products.len(), 1);
        assert_eq!(dash.low_stock_products[0].id, scarce.id);
    }

    #[tokio::test]
    async fn test_cashier_dashboard_scoped_to_cashier() {
        let db = test_db().await;

        let customer = test_user("Cust", "cust@seedling.test", Role::Customer);
        let mine = test_user("Mine", "mine@seedling.test", Role::Cashier);
        let other = test_user("Other", "other@seedling.test", Role::Cashier);
        db.users().insert(&customer).await.unwrap();
        db.users().insert(&mine).await.unwrap();
        db.users().insert(&other).await.unwrap();

        let product = test_product("Meyer Lemon Seedling", 2800, 35);
        db.products().insert(&product).await.unwrap();

        for cashier_id in [&mine.id, &mine.id, &other.id] {
            db.sale_service()
                .create_sale(NewSale {
                    customer_id: customer.id.clone(),
                    cashier_id: cashier_id.clone(),
                    items: vec![NewSaleItem {
                        product_id: product.id.clone(),
                        quantity: 1,
                    }],
                    notes: None,
                })
                .await
                .unwrap();
        }

        let today = Utc::now().date_naive();
        let dash = db.dashboards().cashier_dashboard(&mine.id, today).await.unwrap();
        assert_eq!(dash.today_sales, 2);
        assert_eq!(dash.today_revenue_cents, 5600);
        assert_eq!(dash.available_products, 1);
        assert_eq!(dash.recent_sales.len(), 2);
        assert!(dash.recent_sales.iter().all(|s| s.cashier_name == "Mine"));
    }

    #[tokio::test]
    async fn test_customer_dashboard() {
        let db = test_db().await;

        let customer = test_user("Cust", "cust@seedling.test", Role::Customer);
        let stranger = test_user("Stranger", "str@seedling.test", Role::Customer);
        let cashier = test_user("Cash", "cash@seedling.test", Role::Cashier);
        db.users().insert(&customer).await.unwrap();
        db.users().insert(&stranger).await.unwrap();
        db.users().insert(&cashier).await.unwrap();

        let in_stock = test_product("Valencia Orange Seedling", 3000, 40);
        let sold_out = test_product("Red Grape Vine", 2200, 0);
        db.products().insert(&in_stock).await.unwrap();
        db.products().insert(&sold_out).await.unwrap();

        for customer_id in [&customer.id, &stranger.id] {
            db.sale_service()
                .create_sale(NewSale {
                    customer_id: customer_id.clone(),
                    cashier_id: cashier.id.clone(),
                    items: vec![NewSaleItem {
                        product_id: in_stock.id.clone(),
                        quantity: 1,
                    }],
                    notes: None,
                })
                .await
                .unwrap();
        }

        let dash = db.dashboards().customer_dashboard(&customer.id).await.unwrap();

        // Sold-out products never feature
        assert_eq!(dash.featured_products.len(), 1);
        assert_eq!(dash.featured_products[0].id, in_stock.id);

        // Only this customer's orders, with items
        assert_eq!(dash.total_orders, 1);
        assert_eq!(dash.recent_orders.len(), 1);
        assert_eq!(dash.recent_orders[0].sale.customer_id, customer.id);
        assert_eq!(dash.recent_orders[0].items.len(), 1);
    }
}
