//! # Sale Transaction Service
//!
//! The invariant-bearing core of Seedling POS: recording a sale and deleting
//! one, each as a single atomic transaction.
//!
//! ## Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    create_sale(NewSale)                                 │
//! │                                                                         │
//! │  validate items ──err──► ValidationError, nothing touched              │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  fold duplicate product lines into one                                 │
//! │       │                                                                 │
//! │       ▼  BEGIN TRANSACTION                                             │
//! │  verify customer + cashier exist                                       │
//! │  for each line:                                                        │
//! │    fetch active product ──err──► ProductNotFound, ROLLBACK             │
//! │    check stock          ──err──► InsufficientStock, ROLLBACK           │
//! │    snapshot name + unit price, accumulate total                        │
//! │  insert sale (completed) + items                                       │
//! │  for each line:                                                        │
//! │    guarded decrement    ──0 rows──► Conflict, ROLLBACK                 │
//! │       │                                                                 │
//! │       ▼  COMMIT                                                        │
//! │  SaleDetail                                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Why a Guarded Decrement?
//! The in-transaction stock check produces a friendly error message, but under
//! concurrency another writer can commit between our read and our write. The
//! decrement therefore re-states the invariant in its WHERE clause
//! (`stock_quantity >= ?`); zero rows affected means the row moved under us,
//! and the whole transaction rolls back with a retryable Conflict.

use chrono::Utc;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use crate::error::{ServiceError, ServiceResult};
use seedling_core::{
    validation::validate_sale_items, CoreError, Money, NewSale, NewSaleItem, Product, Sale,
    SaleDetail, SaleItem, SaleStatus, User,
};

/// Service for recording and deleting sales atomically.
#[derive(Debug, Clone)]
pub struct SaleService {
    pool: SqlitePool,
}

impl SaleService {
    /// Creates a new SaleService.
    pub fn new(pool: SqlitePool) -> Self {
        SaleService { pool }
    }

    /// Records a sale: inserts the sale and its items and decrements product
    /// stock, all in one transaction.
    ///
    /// ## Errors
    /// * `CoreError::Validation` - Empty cart, bad quantity, blank product id
    /// * `CoreError::UserNotFound` - Unknown customer or cashier
    /// * `CoreError::ProductNotFound` - Unknown or delisted product
    /// * `CoreError::InsufficientStock` - A line asks for more than is on hand
    /// * `CoreError::Conflict` - Concurrent sale won the stock; safe to retry
    ///
    /// Any error leaves the database exactly as it was.
    #[instrument(skip(self, input), fields(customer = %input.customer_id, cashier = %input.cashier_id))]
    pub async fn create_sale(&self, input: NewSale) -> ServiceResult<SaleDetail> {
        validate_sale_items(&input.items)?;

        // A cart may mention the same product twice; fold to one line per
        // product so the stock check sees the combined quantity.
        let lines = fold_items(input.items);

        let mut tx = self.pool.begin().await?;

        // Both participants must exist before anything is written
        require_user(&mut tx, &input.customer_id).await?;
        require_user(&mut tx, &input.cashier_id).await?;

        // Pass 1: fetch products, check stock, snapshot prices
        let mut total = Money::zero();
        let mut snapshots: Vec<(Product, i64)> = Vec::with_capacity(lines.len());

        for line in &lines {
            let product = fetch_active_product(&mut tx, &line.product_id).await?;

            if !product.has_enough_stock(line.quantity) {
                warn!(
                    product = %product.name,
                    available = product.stock_quantity,
                    requested = line.quantity,
                    "Sale rejected: insufficient stock"
                );
                return Err(CoreError::InsufficientStock {
                    name: product.name,
                    available: product.stock_quantity,
                    requested: line.quantity,
                }
                .into());
            }

            total += product.price().multiply_quantity(line.quantity);
            snapshots.push((product, line.quantity));
        }

        // Pass 2: write the sale, its items, and the stock decrements
        let now = Utc::now();
        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            customer_id: input.customer_id,
            cashier_id: input.cashier_id,
            total_amount_cents: total.cents(),
            status: SaleStatus::Completed,
            notes: input.notes,
            created_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO sales (id, customer_id, cashier_id, total_amount_cents, status, notes, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.customer_id)
        .bind(&sale.cashier_id)
        .bind(sale.total_amount_cents)
        .bind(sale.status)
        .bind(&sale.notes)
        .bind(sale.created_at)
        .execute(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(snapshots.len());

        for (product, quantity) in snapshots {
            let item = SaleItem {
                id: Uuid::new_v4().to_string(),
                sale_id: sale.id.clone(),
                product_id: product.id.clone(),
                product_name: product.name.clone(),
                quantity,
                unit_price_cents: product.price_cents,
                total_price_cents: product.price().multiply_quantity(quantity).cents(),
                created_at: now,
            };

            sqlx::query(
                r#"
                INSERT INTO sale_items (
                    id, sale_id, product_id, product_name,
                    quantity, unit_price_cents, total_price_cents, created_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
                "#,
            )
            .bind(&item.id)
            .bind(&item.sale_id)
            .bind(&item.product_id)
            .bind(&item.product_name)
            .bind(item.quantity)
            .bind(item.unit_price_cents)
            .bind(item.total_price_cents)
            .bind(item.created_at)
            .execute(&mut *tx)
            .await?;

            // Guarded decrement: the WHERE clause re-checks the invariant so
            // a concurrent committed sale can never drive stock negative
            let result = sqlx::query(
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity - ?2, updated_at = ?3
                WHERE id = ?1 AND stock_quantity >= ?2
                "#,
            )
            .bind(&item.product_id)
            .bind(quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;

            if result.rows_affected() == 0 {
                warn!(product = %item.product_name, "Sale rejected: stock changed concurrently");
                return Err(CoreError::Conflict {
                    entity: "Product".to_string(),
                    id: item.product_id.clone(),
                }
                .into());
            }

            items.push(item);
        }

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            total = %sale.total_amount(),
            lines = items.len(),
            "Sale recorded"
        );

        Ok(SaleDetail { sale, items })
    }

    /// Deletes a sale and returns every sold unit to stock, in one
    /// transaction.
    ///
    /// The restock is relative (`stock_quantity + quantity`), so it composes
    /// with sales that happened since. Restocking may exceed the product's
    /// original level if stock was adjusted downward in between; the ledger
    /// is authoritative about what the deleted sale took.
    ///
    /// ## Errors
    /// * `CoreError::SaleNotFound` - Unknown id, or already deleted
    #[instrument(skip(self))]
    pub async fn delete_sale(&self, sale_id: &str) -> ServiceResult<()> {
        let mut tx = self.pool.begin().await?;

        let sale = sqlx::query_as::<_, Sale>(
            r#"
            SELECT id, customer_id, cashier_id, total_amount_cents, status, notes, created_at
            FROM sales
            WHERE id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;

        // Read the items before the cascade removes them
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT
                id, sale_id, product_id, product_name,
                quantity, unit_price_cents, total_price_cents, created_at
            FROM sale_items
            WHERE sale_id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_all(&mut *tx)
        .await?;

        let now = Utc::now();

        for item in &items {
            debug!(product = %item.product_name, quantity = item.quantity, "Restocking");

            sqlx::query(
                r#"
                UPDATE products
                SET stock_quantity = stock_quantity + ?2, updated_at = ?3
                WHERE id = ?1
                "#,
            )
            .bind(&item.product_id)
            .bind(item.quantity)
            .bind(now)
            .execute(&mut *tx)
            .await?;
        }

        // sale_items go with it via ON DELETE CASCADE
        sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(sale_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        info!(
            sale_id = %sale.id,
            total = %sale.total_amount(),
            lines = items.len(),
            "Sale deleted, stock restored"
        );

        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Folds duplicate product lines into one, summing quantities. Order of first
/// appearance is preserved so receipts read the way the cart was entered.
fn fold_items(items: Vec<NewSaleItem>) -> Vec<NewSaleItem> {
    let mut folded: Vec<NewSaleItem> = Vec::with_capacity(items.len());

    for item in items {
        match folded.iter_mut().find(|f| f.product_id == item.product_id) {
            Some(existing) => existing.quantity += item.quantity,
            None => folded.push(item),
        }
    }

    folded
}

/// Asserts a user exists inside the transaction.
async fn require_user(tx: &mut Transaction<'_, Sqlite>, id: &str) -> ServiceResult<User> {
    sqlx::query_as::<_, User>(
        r#"
        SELECT id, name, email, role, password_hash, created_at, updated_at
        FROM users
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| ServiceError::from(CoreError::UserNotFound(id.to_string())))
}

/// Fetches an active product inside the transaction. Delisted products are
/// not sellable, so they read as not found here.
async fn fetch_active_product(
    tx: &mut Transaction<'_, Sqlite>,
    id: &str,
) -> ServiceResult<Product> {
    sqlx::query_as::<_, Product>(
        r#"
        SELECT
            id, name, description, price_cents, stock_quantity,
            is_active, category, image_url, created_at, updated_at
        FROM products
        WHERE id = ?1 AND is_active = 1
        "#,
    )
    .bind(id)
    .fetch_optional(&mut **tx)
    .await?
    .ok_or_else(|| ServiceError::from(CoreError::ProductNotFound(id.to_string())))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::Database;
    use crate::test_support::{test_db, test_product, test_user};
    use seedling_core::Role;

    struct Fixture {
        db: Database,
        customer_id: String,
        cashier_id: String,
    }

    async fn fixture() -> Fixture {
        let db = test_db().await;

        let customer = test_user("Cust", "cust@seedling.test", Role::Customer);
        let cashier = test_user("Cash", "cash@seedling.test", Role::Cashier);
        db.users().insert(&customer).await.unwrap();
        db.users().insert(&cashier).await.unwrap();

        Fixture {
            db,
            customer_id: customer.id,
            cashier_id: cashier.id,
        }
    }

    impl Fixture {
        fn sale_of(&self, lines: &[(&str, i64)]) -> NewSale {
            NewSale {
                customer_id: self.customer_id.clone(),
                cashier_id: self.cashier_id.clone(),
                items: lines
                    .iter()
                    .map(|(product_id, quantity)| NewSaleItem {
                        product_id: product_id.to_string(),
                        quantity: *quantity,
                    })
                    .collect(),
                notes: None,
            }
        }

        async fn stock_of(&self, product_id: &str) -> i64 {
            self.db
                .products()
                .get_by_id(product_id)
                .await
                .unwrap()
                .unwrap()
                .stock_quantity
        }
    }

    #[tokio::test]
    async fn test_create_sale_decrements_stock_and_totals() {
        let fx = fixture().await;
        let product = test_product("Premium Apple Seedling", 500, 10);
        fx.db.products().insert(&product).await.unwrap();

        let detail = fx
            .db
            .sale_service()
            .create_sale(fx.sale_of(&[(&product.id, 3)]))
            .await
            .unwrap();

        // 3 units at $5.00 is $15.00
        assert_eq!(detail.sale.total_amount_cents, 1500);
        assert_eq!(detail.sale.status, SaleStatus::Completed);
        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].product_name, "Premium Apple Seedling");
        assert_eq!(detail.items[0].unit_price_cents, 500);
        assert_eq!(detail.items[0].total_price_cents, 1500);

        assert_eq!(fx.stock_of(&product.id).await, 7);
    }

    #[tokio::test]
    async fn test_total_is_sum_of_line_totals() {
        let fx = fixture().await;
        let apple = test_product("Premium Apple Seedling", 2500, 50);
        let mango = test_product("Tropical Mango Seedling", 3500, 30);
        fx.db.products().insert(&apple).await.unwrap();
        fx.db.products().insert(&mango).await.unwrap();

        let detail = fx
            .db
            .sale_service()
            .create_sale(fx.sale_of(&[(&apple.id, 2), (&mango.id, 1)]))
            .await
            .unwrap();

        let line_sum: i64 = detail.items.iter().map(|i| i.total_price_cents).sum();
        assert_eq!(detail.sale.total_amount_cents, line_sum);
        assert_eq!(detail.sale.total_amount_cents, 8500);
    }

    #[tokio::test]
    async fn test_insufficient_stock_rejects_and_changes_nothing() {
        let fx = fixture().await;
        let product = test_product("Red Grape Vine", 2200, 2);
        fx.db.products().insert(&product).await.unwrap();

        let err = fx
            .db
            .sale_service()
            .create_sale(fx.sale_of(&[(&product.id, 5)]))
            .await
            .unwrap_err();

        assert!(err.is_insufficient_stock());
        let msg = err.to_string();
        assert!(msg.contains("Red Grape Vine"));
        assert!(msg.contains('2'));
        assert!(msg.contains('5'));

        // Nothing written, nothing decremented
        assert_eq!(fx.stock_of(&product.id).await, 2);
        assert_eq!(fx.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_multi_line_failure_rolls_back_all_lines() {
        let fx = fixture().await;
        let plenty = test_product("Meyer Lemon Seedling", 2800, 35);
        let scarce = test_product("Hass Avocado Seedling", 4000, 1);
        fx.db.products().insert(&plenty).await.unwrap();
        fx.db.products().insert(&scarce).await.unwrap();

        let err = fx
            .db
            .sale_service()
            .create_sale(fx.sale_of(&[(&plenty.id, 3), (&scarce.id, 2)]))
            .await
            .unwrap_err();
        assert!(err.is_insufficient_stock());

        // The passing first line must not have been applied
        assert_eq!(fx.stock_of(&plenty.id).await, 35);
        assert_eq!(fx.stock_of(&scarce.id).await, 1);
        assert_eq!(fx.db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_exact_stock_sells_down_to_zero() {
        let fx = fixture().await;
        let product = test_product("Valencia Orange Seedling", 3000, 4);
        fx.db.products().insert(&product).await.unwrap();

        fx.db
            .sale_service()
            .create_sale(fx.sale_of(&[(&product.id, 4)]))
            .await
            .unwrap();

        assert_eq!(fx.stock_of(&product.id).await, 0);

        // The next unit is not sellable
        let err = fx
            .db
            .sale_service()
            .create_sale(fx.sale_of(&[(&product.id, 1)]))
            .await
            .unwrap_err();
        assert!(err.is_insufficient_stock());
    }

    #[tokio::test]
    async fn test_duplicate_lines_fold_into_one() {
        let fx = fixture().await;
        let product = test_product("Premium Apple Seedling", 2500, 5);
        fx.db.products().insert(&product).await.unwrap();

        // 2 + 2 folds to one line of 4
        let detail = fx
            .db
            .sale_service()
            .create_sale(fx.sale_of(&[(&product.id, 2), (&product.id, 2)]))
            .await
            .unwrap();

        assert_eq!(detail.items.len(), 1);
        assert_eq!(detail.items[0].quantity, 4);
        assert_eq!(fx.stock_of(&product.id).await, 1);
    }

    #[tokio::test]
    async fn test_folded_quantity_checked_against_stock() {
        let fx = fixture().await;
        let product = test_product("Red Grape Vine", 2200, 3);
        fx.db.products().insert(&product).await.unwrap();

        // Each line passes alone; the folded quantity (4) must not
        let err = fx
            .db
            .sale_service()
            .create_sale(fx.sale_of(&[(&product.id, 2), (&product.id, 2)]))
            .await
            .unwrap_err();
        assert!(err.is_insufficient_stock());
        assert_eq!(fx.stock_of(&product.id).await, 3);
    }

    #[tokio::test]
    async fn test_empty_cart_rejected() {
        let fx = fixture().await;

        let err = fx.db.sale_service().create_sale(fx.sale_of(&[])).await.unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Core(CoreError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_zero_quantity_rejected() {
        let fx = fixture().await;
        let product = test_product("Meyer Lemon Seedling", 2800, 10);
        fx.db.products().insert(&product).await.unwrap();

        let err = fx
            .db
            .sale_service()
            .create_sale(fx.sale_of(&[(&product.id, 0)]))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Core(CoreError::Validation(_))));
        assert_eq!(fx.stock_of(&product.id).await, 10);
    }

    #[tokio::test]
    async fn test_unknown_product_rejected() {
        let fx = fixture().await;

        let err = fx
            .db
            .sale_service()
            .create_sale(fx.sale_of(&[("no-such-product", 1)]))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_delisted_product_not_sellable() {
        let fx = fixture().await;
        let product = test_product("Hass Avocado Seedling", 4000, 25);
        fx.db.products().insert(&product).await.unwrap();
        fx.db.products().soft_delete(&product.id).await.unwrap();

        let err = fx
            .db
            .sale_service()
            .create_sale(fx.sale_of(&[(&product.id, 1)]))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(fx.stock_of(&product.id).await, 25);
    }

    #[tokio::test]
    async fn test_unknown_participants_rejected() {
        let fx = fixture().await;
        let product = test_product("Premium Apple Seedling", 2500, 50);
        fx.db.products().insert(&product).await.unwrap();

        let mut sale = fx.sale_of(&[(&product.id, 1)]);
        sale.customer_id = "no-such-user".to_string();
        let err = fx.db.sale_service().create_sale(sale).await.unwrap_err();
        assert!(err.is_not_found());

        let mut sale = fx.sale_of(&[(&product.id, 1)]);
        sale.cashier_id = "no-such-user".to_string();
        let err = fx.db.sale_service().create_sale(sale).await.unwrap_err();
        assert!(err.is_not_found());

        assert_eq!(fx.stock_of(&product.id).await, 50);
    }

    #[tokio::test]
    async fn test_delete_restores_stock_and_removes_items() {
        let fx = fixture().await;
        let product = test_product("Tropical Mango Seedling", 3500, 10);
        fx.db.products().insert(&product).await.unwrap();

        let detail = fx
            .db
            .sale_service()
            .create_sale(fx.sale_of(&[(&product.id, 3)]))
            .await
            .unwrap();
        assert_eq!(fx.stock_of(&product.id).await, 7);

        fx.db.sale_service().delete_sale(&detail.sale.id).await.unwrap();

        assert_eq!(fx.stock_of(&product.id).await, 10);
        assert!(fx.db.sales().get_by_id(&detail.sale.id).await.unwrap().is_none());
        // Cascade removed the items too
        assert!(fx.db.sales().get_items(&detail.sale.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_double_delete_is_not_found() {
        let fx = fixture().await;
        let product = test_product("Valencia Orange Seedling", 3000, 10);
        fx.db.products().insert(&product).await.unwrap();

        let detail = fx
            .db
            .sale_service()
            .create_sale(fx.sale_of(&[(&product.id, 2)]))
            .await
            .unwrap();

        fx.db.sale_service().delete_sale(&detail.sale.id).await.unwrap();

        let err = fx
            .db
            .sale_service()
            .delete_sale(&detail.sale.id)
            .await
            .unwrap_err();
        assert!(err.is_not_found());

        // The second delete must not restock again
        assert_eq!(fx.stock_of(&product.id).await, 10);
    }

    #[tokio::test]
    async fn test_delete_unknown_sale() {
        let fx = fixture().await;
        let err = fx.db.sale_service().delete_sale("no-such-sale").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_snapshot_survives_price_change() {
        let fx = fixture().await;
        let mut product = test_product("Meyer Lemon Seedling", 2800, 20);
        fx.db.products().insert(&product).await.unwrap();

        let detail = fx
            .db
            .sale_service()
            .create_sale(fx.sale_of(&[(&product.id, 1)]))
            .await
            .unwrap();

        // Reprice and rename the product after the sale
        product.price_cents = 9900;
        product.name = "Improved Meyer Lemon".to_string();
        fx.db.products().update(&product).await.unwrap();

        let stored = fx
            .db
            .sales()
            .get_detail(&detail.sale.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.items[0].unit_price_cents, 2800);
        assert_eq!(stored.items[0].product_name, "Meyer Lemon Seedling");
        assert_eq!(stored.sale.total_amount_cents, 2800);
    }

    #[test]
    fn test_fold_items_preserves_first_appearance_order() {
        let items = vec![
            NewSaleItem {
                product_id: "a".to_string(),
                quantity: 1,
            },
            NewSaleItem {
                product_id: "b".to_string(),
                quantity: 2,
            },
            NewSaleItem {
                product_id: "a".to_string(),
                quantity: 3,
            },
        ];

        let folded = fold_items(items);
        assert_eq!(folded.len(), 2);
        assert_eq!(folded[0].product_id, "a");
        assert_eq!(folded[0].quantity, 4);
        assert_eq!(folded[1].product_id, "b");
        assert_eq!(folded[1].quantity, 2);
    }
}
