//! # Sale Repository
//!
//! Read-side queries over the sale ledger: lookups, listings, counts and
//! revenue sums.
//!
//! Writes are deliberately absent. Creating and deleting sales touches three
//! tables under one transaction (sales, sale_items, products), so those live
//! in [`crate::service::SaleService`]; this repository never mutates.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use sqlx::SqlitePool;

use crate::error::DbResult;
use seedling_core::{Sale, SaleDetail, SaleItem, SaleStatus, SaleSummary};

/// Columns for a joined sale summary row. The customer and cashier are both
/// users, so the table is joined twice under different aliases.
const SUMMARY_SELECT: &str = r#"
    SELECT
        s.id,
        c.name AS customer_name,
        k.name AS cashier_name,
        s.total_amount_cents,
        s.status,
        s.created_at
    FROM sales s
    JOIN users c ON c.id = s.customer_id
    JOIN users k ON k.id = s.cashier_id
"#;

/// Repository for sale ledger reads.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale header by its ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, cashier_id, total_amount_cents, status, notes, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets a sale with its items attached.
    pub async fn get_detail(&self, id: &str) -> DbResult<Option<SaleDetail>> {
        let Some(sale) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let items = self.get_items(id).await?;

        Ok(Some(SaleDetail { sale, items }))
    }

    /// Gets the line items of a sale, in insertion order.
    pub async fn get_items(&self, sale_id: &str) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT
                id, sale_id, product_id, product_name,
                quantity, unit_price_cents, total_price_cents, created_at
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY created_at, id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Lists the most recent sales across the whole shop, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<SaleSummary>> {
        let sql = format!("{SUMMARY_SELECT} ORDER BY s.created_at DESC LIMIT ?1");

        let sales = sqlx::query_as::<_, SaleSummary>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Lists a page of sales, newest first.
    pub async fn list_page(&self, limit: u32, offset: u32) -> DbResult<Vec<SaleSummary>> {
        let sql = format!("{SUMMARY_SELECT} ORDER BY s.created_at DESC LIMIT ?1 OFFSET ?2");

        let sales = sqlx::query_as::<_, SaleSummary>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Lists a cashier's most recent sales, newest first.
    pub async fn list_recent_for_cashier(
        &self,
        cashier_id: &str,
        limit: u32,
    ) -> DbResult<Vec<SaleSummary>> {
        let sql =
            format!("{SUMMARY_SELECT} WHERE s.cashier_id = ?1 ORDER BY s.created_at DESC LIMIT ?2");

        let sales = sqlx::query_as::<_, SaleSummary>(&sql)
            .bind(cashier_id)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        Ok(sales)
    }

    /// Lists a customer's most recent orders with their items, newest first.
    pub async fn list_recent_for_customer(
        &self,
        customer_id: &str,
        limit: u32,
    ) -> DbResult<Vec<SaleDetail>> {
        let sales = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, cashier_id, total_amount_cents, status, notes, created_at
            FROM sales
            WHERE customer_id = ?1
            ORDER BY created_at DESC
            LIMIT ?2
            "#,
        )
        .bind(customer_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        let mut details = Vec::with_capacity(sales.len());
        for sale in sales {
            let items = self.get_items(&sale.id).await?;
            details.push(SaleDetail { sale, items });
        }

        Ok(details)
    }

    /// Counts all sales regardless of status.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts sales in the given status.
    pub async fn count_by_status(&self, status: SaleStatus) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE status = ?1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts a customer's orders.
    pub async fn count_for_customer(&self, customer_id: &str) -> DbResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sales WHERE customer_id = ?1")
                .bind(customer_id)
                .fetch_one(&self.pool)
                .await?;

        Ok(count)
    }

    /// Total revenue across completed sales, in cents.
    pub async fn revenue_cents(&self) -> DbResult<i64> {
        let sum: Option<i64> = sqlx::query_scalar(
            "SELECT SUM(total_amount_cents) FROM sales WHERE status = ?1",
        )
        .bind(SaleStatus::Completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(sum.unwrap_or(0))
    }

    /// Counts the sales a cashier recorded on the given calendar day (UTC).
    pub async fn count_for_cashier_on(&self, cashier_id: &str, day: NaiveDate) -> DbResult<i64> {
        let (start, end) = day_bounds(day);

        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM sales
            WHERE cashier_id = ?1 AND created_at >= ?2 AND created_at < ?3
            "#,
        )
        .bind(cashier_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }

    /// Sums the revenue a cashier took on the given calendar day (UTC), in cents.
    pub async fn revenue_for_cashier_on(&self, cashier_id: &str, day: NaiveDate) -> DbResult<i64> {
        let (start, end) = day_bounds(day);

        let sum: Option<i64> = sqlx::query_scalar(
            r#"
            SELECT SUM(total_amount_cents)
            FROM sales
            WHERE cashier_id = ?1 AND created_at >= ?2 AND created_at < ?3
            "#,
        )
        .bind(cashier_id)
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(sum.unwrap_or(0))
    }
}

/// Half-open UTC bounds `[midnight, next midnight)` of a calendar day.
fn day_bounds(day: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let start = day.and_time(NaiveTime::MIN).and_utc();
    (start, start + Duration::days(1))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{test_db, test_product, test_user};
    use seedling_core::{NewSale, NewSaleItem, Role};

    async fn seeded() -> (crate::pool::Database, String, String, String) {
        let db = test_db().await;

        let customer = test_user("Cust", "cust@seedling.test", Role::Customer);
        let cashier = test_user("Cash", "cash@seedling.test", Role::Cashier);
        db.users().insert(&customer).await.unwrap();
        db.users().insert(&cashier).await.unwrap();

        let product = test_product("Premium Apple Seedling", 2500, 50);
        db.products().insert(&product).await.unwrap();

        (db, customer.id, cashier.id, product.id)
    }

    fn order(customer: &str, cashier: &str, product: &str, quantity: i64) -> NewSale {
        NewSale {
            customer_id: customer.to_string(),
            cashier_id: cashier.to_string(),
            items: vec![NewSaleItem {
                product_id: product.to_string(),
                quantity,
            }],
            notes: None,
        }
    }

    #[tokio::test]
    async fn test_get_detail_and_items() {
        let (db, customer, cashier, product) = seeded().await;

        let created = db
            .sale_service()
            .create_sale(order(&customer, &cashier, &product, 2))
            .await
            .unwrap();

        let detail = db.sales().get_detail(&created.sale.id).await.unwrap().unwrap();
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].quantity, 2);
        assert_eq!(detail.sale.total_amount_cents, 5000);

        assert!(db.sales().get_detail("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_recent_lists_join_names() {
        let (db, customer, cashier, product) = seeded().await;

        for _ in 0..3 {
            db.sale_service()
                .create_sale(order(&customer, &cashier, &product, 1))
                .await
                .unwrap();
        }

        let recent = db.sales().list_recent(2).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].customer_name, "Cust");
        assert_eq!(recent[0].cashier_name, "Cash");
        assert_eq!(recent[0].status, SaleStatus::Completed);

        let for_cashier = db.sales().list_recent_for_cashier(&cashier, 5).await.unwrap();
        assert_eq!(for_cashier.len(), 3);

        let for_customer = db
            .sales()
            .list_recent_for_customer(&customer, 5)
            .await
            .unwrap();
        assert_eq!(for_customer.len(), 3);
        assert_eq!(for_customer[0].items.len(), 1);
    }

    #[tokio::test]
    async fn test_counts_and_revenue() {
        let (db, customer, cashier, product) = seeded().await;

        db.sale_service()
            .create_sale(order(&customer, &cashier, &product, 3))
            .await
            .unwrap();
        db.sale_service()
            .create_sale(order(&customer, &cashier, &product, 1))
            .await
            .unwrap();

        assert_eq!(db.sales().count().await.unwrap(), 2);
        assert_eq!(
            db.sales().count_by_status(SaleStatus::Completed).await.unwrap(),
            2
        );
        assert_eq!(
            db.sales().count_by_status(SaleStatus::Pending).await.unwrap(),
            0
        );
        assert_eq!(db.sales().count_for_customer(&customer).await.unwrap(), 2);
        // 3 × $25.00 + 1 × $25.00
        assert_eq!(db.sales().revenue_cents().await.unwrap(), 10_000);
    }

    #[tokio::test]
    async fn test_cashier_day_window() {
        let (db, customer, cashier, product) = seeded().await;

        db.sale_service()
            .create_sale(order(&customer, &cashier, &product, 2))
            .await
            .unwrap();

        let today = Utc::now().date_naive();
        assert_eq!(
            db.sales().count_for_cashier_on(&cashier, today).await.unwrap(),
            1
        );
        assert_eq!(
            db.sales()
                .revenue_for_cashier_on(&cashier, today)
                .await
                .unwrap(),
            5000
        );

        // A day with no sales reports zero, not NULL
        let yesterday = today.pred_opt().unwrap();
        assert_eq!(
            db.sales()
                .count_for_cashier_on(&cashier, yesterday)
                .await
                .unwrap(),
            0
        );
        assert_eq!(
            db.sales()
                .revenue_for_cashier_on(&cashier, yesterday)
                .await
                .unwrap(),
            0
        );
    }

    #[test]
    fn test_day_bounds_are_half_open() {
        let day = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        let (start, end) = day_bounds(day);
        assert_eq!(end - start, Duration::days(1));
        assert_eq!(start.date_naive(), day);
    }
}
